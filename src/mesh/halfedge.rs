//! Half-edge mesh data structure.
//!
//! Triangles are stored as consecutive triplets of directed half-edges. Each
//! half-edge records the vertex it points **to**, the previous half-edge of
//! its triangle, and its twin on the neighbouring triangle.
//!
//! # Structure
//!
//! - Face `f` owns half-edges `3f`, `3f + 1`, `3f + 2`
//! - `prev` cycles within the triplet; following it three times returns to
//!   the start, and `next(e) == prev(prev(e))`
//! - The start vertex of a half-edge is the target of its `prev`
//! - Each vertex stores one outgoing half-edge
//!
//! # Boundary Handling
//!
//! Boundary half-edges are not materialized. A half-edge on the mesh boundary
//! simply has no twin. Boundary vertices store an outgoing half-edge without a
//! twin so that a one-ring walk starting there sweeps the whole fan.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use super::geometry::Normalization;
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};

/// Texture `z` value meaning "no material assigned".
pub const NO_MATERIAL: f64 = -1.0;

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// Unit normal, filled by [`HalfEdgeMesh::compute_vertex_normals`].
    pub normal: Vector3<f64>,

    /// Texture coordinate. The third component doubles as a material index,
    /// or [`NO_MATERIAL`] when unset.
    pub texture: Vector3<f64>,

    /// Bone weights keyed by joint name. Not normalized at this layer.
    pub weights: HashMap<String, f64>,

    /// One outgoing half-edge (a half-edge whose `prev` targets this vertex).
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: Vector3::zeros(),
            texture: Vector3::new(0.0, 0.0, NO_MATERIAL),
            weights: HashMap::new(),
            halfedge: HalfEdgeId::invalid(),
        }
    }

    /// Create a new vertex from coordinates.
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Material index carried in the texture coordinate, if any.
    pub fn material(&self) -> Option<usize> {
        if self.texture.z >= 0.0 {
            Some(self.texture.z as usize)
        } else {
            None
        }
    }
}

/// A directed half-edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge points to.
    pub vertex: VertexId<I>,

    /// The previous half-edge of the same triangle.
    pub prev: HalfEdgeId<I>,

    /// The opposing half-edge on the adjacent triangle, or none on a boundary.
    pub twin: HalfEdgeId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// A raw half-edge pointing at `vertex`, with no topology yet.
    pub fn to(vertex: VertexId<I>) -> Self {
        Self {
            vertex,
            prev: HalfEdgeId::invalid(),
            twin: HalfEdgeId::invalid(),
        }
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.twin.is_valid()
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::to(VertexId::invalid())
    }
}

/// A triangle mesh in half-edge form.
///
/// Besides connectivity the mesh carries the named joint positions an
/// importer may attach, and the transform applied by
/// [`normalize_bounding_box`](HalfEdgeMesh::normalize_bounding_box).
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,

    pub(crate) halfedges: Vec<HalfEdge<I>>,

    /// Named joint positions supplied alongside the mesh.
    pub joints: HashMap<String, Point3<f64>>,

    pub(crate) normalization: Option<Normalization>,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            joints: HashMap::new(),
            normalization: None,
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_faces * 3),
            joints: HashMap::new(),
            normalization: None,
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of triangles.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.halfedges.len() / 3
    }

    /// Check if the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    /// The transform applied by the last bounding-box normalization.
    #[inline]
    pub fn normalization(&self) -> Option<&Normalization> {
        self.normalization.as_ref()
    }

    // ==================== Topology Queries ====================

    /// The vertex a half-edge points to.
    #[inline]
    pub fn target(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).vertex
    }

    /// The vertex a half-edge starts from.
    #[inline]
    pub fn source(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.target(self.prev(he))
    }

    /// The previous half-edge of the same triangle.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// The next half-edge of the same triangle.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.prev(self.prev(he))
    }

    /// The opposing half-edge, invalid on a boundary.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if a vertex touches the boundary (or is isolated).
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        let start = self.vertex(v).halfedge;
        if !start.is_valid() {
            return true;
        }

        let mut he = start;
        loop {
            if self.is_boundary_halfedge(he) || self.is_boundary_halfedge(self.prev(he)) {
                return true;
            }
            he = self.twin(self.prev(he));
            if he == start {
                return false;
            }
        }
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.num_faces()).map(FaceId::new)
    }

    /// Iterate over outgoing half-edges around a vertex.
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over the one-ring neighbours of a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> VertexNeighborIter<'_, I> {
        VertexNeighborIter {
            inner: self.vertex_halfedges(v),
            last: HalfEdgeId::invalid(),
            tail_done: false,
        }
    }

    /// Iterate over the triangles around a vertex.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| he.face())
    }

    /// Number of one-ring neighbours.
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.vertex_neighbors(v).count()
    }

    /// Get the three vertices of a triangle in counter-clockwise order.
    pub fn face_triangle(&self, f: FaceId<I>) -> [VertexId<I>; 3] {
        let [he0, he1, he2] = f.halfedges();
        [self.target(he2), self.target(he0), self.target(he1)]
    }

    /// Get the positions of the three corners of a triangle.
    pub fn face_positions(&self, f: FaceId<I>) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.face_triangle(f);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    /// Sorted neighbour lists for every vertex, derived from all half-edges.
    ///
    /// Unlike [`vertex_neighbors`](Self::vertex_neighbors) this also sees
    /// every fan of a non-manifold vertex.
    pub fn vertex_adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.vertices.len()];
        for he in self.halfedge_ids() {
            let a = self.source(he).index();
            let b = self.target(he).index();
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
        for list in &mut adjacency {
            list.sort_unstable();
            list.dedup();
        }
        adjacency
    }

    // ==================== Geometry ====================

    /// Unit normal of a triangle.
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        (p1 - p0).cross(&(p2 - p0)).normalize()
    }

    /// Area of a triangle.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        let [p0, p1, p2] = self.face_positions(f);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// Length of the edge under a half-edge.
    pub fn edge_length(&self, he: HalfEdgeId<I>) -> f64 {
        (self.position(self.target(he)) - self.position(self.source(he))).norm()
    }

    /// Axis-aligned bounding box of all vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        let mut min = first;
        let mut max = first;

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        Some((min, max))
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }
}

/// Iterator over the outgoing half-edges of a vertex.
///
/// Rotates with `twin(prev(he))`. Stops after a full turn, or at the boundary
/// when the fan is open. Only the fan containing the vertex's stored
/// half-edge is visited.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
        }
    }
}

impl<I: MeshIndex> Iterator for VertexHalfEdgeIter<'_, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.current.is_valid() {
            return None;
        }

        let result = self.current;
        let next = self.mesh.twin(self.mesh.prev(result));
        self.current = if next == self.start {
            HalfEdgeId::invalid()
        } else {
            next
        };

        Some(result)
    }
}

/// Iterator over the one-ring neighbours of a vertex.
///
/// On an open fan the last neighbour is only reachable through the incoming
/// boundary half-edge, so it is emitted after the outgoing targets.
pub struct VertexNeighborIter<'a, I: MeshIndex = u32> {
    inner: VertexHalfEdgeIter<'a, I>,
    last: HalfEdgeId<I>,
    tail_done: bool,
}

impl<I: MeshIndex> Iterator for VertexNeighborIter<'_, I> {
    type Item = VertexId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        let mesh = self.inner.mesh;
        if let Some(he) = self.inner.next() {
            self.last = he;
            return Some(mesh.target(he));
        }

        if self.tail_done || !self.last.is_valid() {
            return None;
        }
        self.tail_done = true;

        let incoming = mesh.prev(self.last);
        if mesh.is_boundary_halfedge(incoming) {
            Some(mesh.source(incoming))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;

    fn fan_mesh() -> HalfEdgeMesh {
        // Centre vertex 0 surrounded by an open fan of three triangles.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_vertex_creation() {
        let v = Vertex::<u32>::from_coords(1.0, 2.0, 3.0);
        assert_eq!(v.position, Point3::new(1.0, 2.0, 3.0));
        assert!(!v.halfedge.is_valid());
        assert_eq!(v.material(), None);
        assert!(v.weights.is_empty());
    }

    #[test]
    fn test_material_index() {
        let mut v = Vertex::<u32>::from_coords(0.0, 0.0, 0.0);
        v.texture = Vector3::new(0.25, 0.5, 2.0);
        assert_eq!(v.material(), Some(2));

        v.texture.z = NO_MATERIAL;
        assert_eq!(v.material(), None);
        v.texture.z = f64::NAN;
        assert_eq!(v.material(), None);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfEdgeMesh::<u32>::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_triangle_navigation() {
        let mesh = fan_mesh();
        let f = FaceId::new(1);
        assert_eq!(
            mesh.face_triangle(f),
            [VertexId::new(0), VertexId::new(2), VertexId::new(3)]
        );

        for he in f.halfedges() {
            assert_eq!(mesh.prev(mesh.prev(mesh.prev(he))), he);
            assert_eq!(mesh.next(mesh.prev(he)), he);
            assert_eq!(mesh.source(mesh.next(he)), mesh.target(he));
        }
    }

    #[test]
    fn test_open_fan_neighbors() {
        let mesh = fan_mesh();
        let mut neighbors: Vec<usize> = mesh
            .vertex_neighbors(VertexId::new(0))
            .map(|v| v.index())
            .collect();
        neighbors.sort_unstable();
        assert_eq!(neighbors, vec![1, 2, 3, 4]);
        assert_eq!(mesh.vertex_faces(VertexId::new(0)).count(), 3);
        assert!(mesh.is_boundary_vertex(VertexId::new(0)));
    }

    #[test]
    fn test_corner_neighbors() {
        let mesh = fan_mesh();
        let mut neighbors: Vec<usize> = mesh
            .vertex_neighbors(VertexId::new(4))
            .map(|v| v.index())
            .collect();
        neighbors.sort_unstable();
        assert_eq!(neighbors, vec![0, 3]);
        assert_eq!(mesh.valence(VertexId::new(2)), 3);
    }

    #[test]
    fn test_adjacency_matches_one_ring() {
        let mesh = fan_mesh();
        let adjacency = mesh.vertex_adjacency();
        for v in mesh.vertex_ids() {
            let mut ring: Vec<usize> = mesh.vertex_neighbors(v).map(|n| n.index()).collect();
            ring.sort_unstable();
            assert_eq!(ring, adjacency[v.index()]);
        }
    }

    #[test]
    fn test_face_geometry() {
        let mesh = fan_mesh();
        let f = FaceId::new(0);
        assert!((mesh.face_area(f) - 0.5).abs() < 1e-12);
        assert!((mesh.face_normal(f) - Vector3::z()).norm() < 1e-12);

        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(-1.0, -1.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
    }
}
