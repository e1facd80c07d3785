//! Mesh construction utilities.
//!
//! Two entry points lead to a linked half-edge mesh: an indexed triangle list
//! ([`build_from_triangles`]), or the raw vertex and half-edge arrays an
//! importer produces ([`from_raw`]). Both finish with
//! [`HalfEdgeMesh::compute_topology`].

use nalgebra::Point3;

use super::halfedge::{HalfEdge, HalfEdgeMesh, Vertex};
use super::index::{MeshIndex, VertexId};
use crate::error::{Result, RigError};

/// Build a half-edge mesh from vertices and triangle faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///   (counter-clockwise)
///
/// # Returns
/// A half-edge mesh, or an error if the input is invalid. Faces that repeat
/// an already used directed edge are dropped during topology derivation.
///
/// # Example
/// ```
/// use armature::mesh::{build_from_triangles, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    if faces.is_empty() {
        return Err(RigError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(RigError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(RigError::DegenerateFace { face: fi });
        }
    }

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len());
    for &pos in vertices {
        mesh.add_vertex(pos);
    }

    // Half-edge k of a face runs from corner k to corner k + 1, so it
    // points at corner k + 1.
    for face in faces {
        for k in 0..3 {
            mesh.halfedges
                .push(HalfEdge::to(VertexId::new(face[(k + 1) % 3])));
        }
    }

    mesh.compute_topology();
    Ok(mesh)
}

/// Build a mesh from importer output.
///
/// `edges` must be laid out as consecutive triplets, one per triangle, with
/// only the target vertex filled in; any `prev`/`twin` values are recomputed.
///
/// # Errors
/// [`RigError::RawEdgeCount`] if the edge count is not a multiple of three,
/// [`RigError::InvalidVertexIndex`] if a target is out of range.
pub fn from_raw<I: MeshIndex>(
    vertices: Vec<Vertex<I>>,
    edges: Vec<HalfEdge<I>>,
) -> Result<HalfEdgeMesh<I>> {
    if edges.len() % 3 != 0 {
        return Err(RigError::RawEdgeCount { count: edges.len() });
    }

    for (i, he) in edges.iter().enumerate() {
        if !he.vertex.is_valid() || he.vertex.index() >= vertices.len() {
            return Err(RigError::InvalidVertexIndex {
                face: i / 3,
                vertex: he.vertex.index(),
            });
        }
    }

    let mut mesh = HalfEdgeMesh::new();
    mesh.vertices = vertices;
    mesh.halfedges = edges;
    mesh.compute_topology();
    Ok(mesh)
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) tuple.
pub fn to_face_vertex<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<[usize; 3]> = mesh
        .face_ids()
        .map(|f| {
            let [v0, v1, v2] = mesh.face_triangle(f);
            [v0.index(), v1.index(), v2.index()]
        })
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        (vertices, faces)
    }

    #[test]
    fn test_build_tetrahedron() {
        let (vertices, faces) = tetrahedron();
        let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.num_halfedges(), 12);
        assert!(mesh.integrity_check());

        for v in mesh.vertex_ids() {
            assert_eq!(mesh.valence(v), 3);
        }
    }

    #[test]
    fn test_face_vertex_round_trip() {
        let (vertices, faces) = tetrahedron();
        let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
        let (out_vertices, out_faces) = to_face_vertex(&mesh);
        assert_eq!(out_vertices, vertices);
        assert_eq!(out_faces, faces);
    }

    #[test]
    fn test_empty_input() {
        let result: Result<HalfEdgeMesh> = build_from_triangles(&[], &[]);
        assert_eq!(result.unwrap_err(), RigError::EmptyMesh);
    }

    #[test]
    fn test_invalid_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        let result: Result<HalfEdgeMesh> = build_from_triangles(&vertices, &[[0, 1, 5]]);
        assert_eq!(
            result.unwrap_err(),
            RigError::InvalidVertexIndex { face: 0, vertex: 5 }
        );
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = tetrahedron();
        let result: Result<HalfEdgeMesh> = build_from_triangles(&vertices, &[[0, 1, 2], [1, 1, 3]]);
        assert_eq!(result.unwrap_err(), RigError::DegenerateFace { face: 1 });
    }

    #[test]
    fn test_from_raw() {
        let (positions, faces) = tetrahedron();
        let vertices: Vec<Vertex> = positions.iter().map(|&p| Vertex::new(p)).collect();
        let edges: Vec<HalfEdge> = faces
            .iter()
            .flat_map(|f| [f[1], f[2], f[0]])
            .map(|v| HalfEdge::to(VertexId::new(v)))
            .collect();

        let mesh = from_raw(vertices, edges).unwrap();
        assert!(mesh.integrity_check());
        assert!(mesh.halfedge_ids().all(|he| mesh.twin(he).is_valid()));
    }

    #[test]
    fn test_from_raw_rejects_partial_triplet() {
        let vertices: Vec<Vertex> = vec![Vertex::from_coords(0.0, 0.0, 0.0); 3];
        let edges: Vec<HalfEdge> = vec![HalfEdge::to(VertexId::new(0)); 4];
        assert_eq!(
            from_raw(vertices, edges).unwrap_err(),
            RigError::RawEdgeCount { count: 4 }
        );
    }
}
