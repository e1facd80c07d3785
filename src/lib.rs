//! # Armature
//!
//! Geometry substrate for automatic character rigging.
//!
//! Armature provides the data structures an auto-rigger embeds a skeleton
//! with: a half-edge triangle mesh, weighted point graphs with shortest path
//! queries, skeleton hierarchies with a compressed form, and a ray/mesh
//! intersector for casting along a fixed direction.
//!
//! ## Features
//!
//! - **Half-edge meshes**: topology derivation from triangle soup, structural
//!   checks, connectivity, vertex normals and bounding box normalization
//! - **Weighted graphs**: Euclidean-weighted adjacency graphs and Dijkstra
//!   shortest path trees
//! - **Skeletons**: named joint hierarchies with symmetry, feet and fat flags,
//!   a compressed form that elides pass-through joints, and built-in templates
//! - **Intersection**: uniform grid acceleration for repeated parallel rays
//!
//! ## Quick Start
//!
//! ```
//! use armature::prelude::*;
//! use nalgebra::{Point3, Vector3};
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 1.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ];
//! let faces = vec![[0, 2, 1], [0, 3, 2]];
//!
//! let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert!(mesh.integrity_check());
//! mesh.normalize_bounding_box();
//!
//! let intersector = Intersector::new(&mesh, Vector3::y());
//! let hits = intersector.intersect(&Point3::new(0.5, -1.0, 0.25));
//! assert_eq!(hits.len(), 1);
//!
//! let skeleton = Skeleton::human().unwrap();
//! assert!(skeleton.compressed().len() < skeleton.full().num_joints());
//! ```
//!
//! ## Graphs and Shortest Paths
//!
//! ```
//! use armature::prelude::*;
//! # use nalgebra::Point3;
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//! let graph = WeightedGraph::from_mesh(&mesh);
//! let paths = shortest_paths(&graph, 0, &ShortestPathOptions::default());
//! assert_eq!(paths.distance(1), Some(1.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Log and fail an integrity check when a predicate does not hold.
macro_rules! check {
    ($what:literal, $pred:expr) => {
        if !($pred) {
            log::warn!(
                "{} integrity error: {} at {}:{}",
                $what,
                stringify!($pred),
                file!(),
                line!()
            );
            return false;
        }
    };
}

pub mod error;
pub mod graph;
pub mod intersect;
pub mod mesh;
pub mod skeleton;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use armature::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Result, RigError};
    pub use crate::graph::{
        shortest_paths, shortest_paths_from_many, ShortestPathOptions, ShortestPaths,
        WeightedGraph,
    };
    pub use crate::intersect::{Hit, Intersector, IntersectorOptions};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, FaceId, HalfEdge, HalfEdgeId, HalfEdgeMesh,
        MeshIndex, Normalization, Vertex, VertexId,
    };
    pub use crate::skeleton::{
        CompressedId, CompressedSkeleton, FullSkeleton, JointId, Skeleton, SkeletonBuilder,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_tetrahedron() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];

        let faces = vec![
            [0, 2, 1], // bottom
            [0, 1, 3], // front
            [1, 2, 3], // right
            [2, 0, 3], // left
        ];

        let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.num_halfedges(), 12);
        assert!(mesh.integrity_check());
        assert!(mesh.is_connected());

        for v in mesh.vertex_ids() {
            assert!(!mesh.is_boundary_vertex(v), "vertex {:?} should not be on boundary", v);
        }

        let graph = WeightedGraph::from_mesh(&mesh);
        assert!(graph.integrity_check());
        assert_eq!(graph.num_edges(), 6);
    }
}
