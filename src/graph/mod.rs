//! Weighted point graphs and geodesic approximation.
//!
//! A [`WeightedGraph`] is an undirected adjacency-list graph over 3D points;
//! edge weights are the Euclidean distances between endpoints. It is the
//! common currency between the mesh (surface graph for geodesic distances)
//! and the skeleton (bone graph).
//!
//! # Example
//!
//! ```
//! use armature::graph::{shortest_paths, ShortestPathOptions, WeightedGraph};
//! use nalgebra::Point3;
//!
//! let mut graph = WeightedGraph::with_vertices(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//! ]);
//! graph.add_edge(0, 1);
//! graph.add_edge(1, 2);
//! assert!(graph.integrity_check());
//!
//! let paths = shortest_paths(&graph, 0, &ShortestPathOptions::default());
//! assert_eq!(paths.distance(2), Some(2.0));
//! assert_eq!(paths.path_to(2), Some(vec![0, 1, 2]));
//! ```

mod shortest_path;

use nalgebra::Point3;

use crate::mesh::{HalfEdgeMesh, MeshIndex};

pub use shortest_path::{
    shortest_paths, shortest_paths_from_many, ShortestPathOptions, ShortestPaths,
};

/// An undirected graph whose vertices are points in space.
///
/// The adjacency lists are expected to be symmetric, free of self loops and
/// free of duplicates; [`integrity_check`](Self::integrity_check) verifies
/// this for graphs assembled by hand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedGraph {
    pub(crate) vertices: Vec<Point3<f64>>,
    pub(crate) edges: Vec<Vec<usize>>,
}

impl WeightedGraph {
    /// Create a graph from positions and adjacency lists, unchecked.
    pub fn new(vertices: Vec<Point3<f64>>, edges: Vec<Vec<usize>>) -> Self {
        Self { vertices, edges }
    }

    /// Create a graph with the given vertices and no edges.
    pub fn with_vertices(vertices: Vec<Point3<f64>>) -> Self {
        let edges = vec![Vec::new(); vertices.len()];
        Self { vertices, edges }
    }

    /// Vertex adjacency graph of a mesh surface.
    pub fn from_mesh<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Self {
        Self {
            vertices: mesh.vertex_ids().map(|v| *mesh.position(v)).collect(),
            edges: mesh.vertex_adjacency(),
        }
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> usize {
        self.vertices.push(position);
        self.edges.push(Vec::new());
        self.vertices.len() - 1
    }

    /// Connect two vertices in both directions. Existing edges are kept once
    /// and self loops are ignored.
    pub fn add_edge(&mut self, a: usize, b: usize) {
        if a == b {
            log::trace!("ignoring self loop on vertex {}", a);
            return;
        }
        if !self.edges[a].contains(&b) {
            self.edges[a].push(b);
        }
        if !self.edges[b].contains(&a) {
            self.edges[b].push(a);
        }
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.edges.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// All vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// All adjacency lists.
    #[inline]
    pub fn edges(&self) -> &[Vec<usize>] {
        &self.edges
    }

    /// Position of a vertex.
    #[inline]
    pub fn position(&self, v: usize) -> &Point3<f64> {
        &self.vertices[v]
    }

    /// Neighbours of a vertex.
    #[inline]
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.edges[v]
    }

    /// Number of neighbours of a vertex.
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.edges[v].len()
    }

    /// Euclidean length of the segment between two vertices.
    #[inline]
    pub fn edge_length(&self, a: usize, b: usize) -> f64 {
        (self.vertices[a] - self.vertices[b]).norm()
    }

    pub(crate) fn scale(&mut self, factor: f64) {
        for p in &mut self.vertices {
            *p = Point3::from(p.coords * factor);
        }
    }

    /// Verify the adjacency invariants.
    ///
    /// Fails on mismatched array sizes, out-of-range neighbours, self loops,
    /// one-directional edges or duplicate neighbours. The violated predicate
    /// is logged; nothing is repaired.
    pub fn integrity_check(&self) -> bool {
        check!("graph", self.vertices.len() == self.edges.len());

        for (i, list) in self.edges.iter().enumerate() {
            for (j, &cur) in list.iter().enumerate() {
                check!("graph", cur < self.edges.len());
                check!("graph", cur != i);
                check!("graph", self.edges[cur].contains(&i));
                check!("graph", !list[..j].contains(&cur));
            }
        }

        true
    }
}
