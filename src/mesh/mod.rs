//! Half-edge triangle meshes.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`]. Each triangle is a triplet of
//! directed half-edges carrying a target vertex, the previous half-edge of the
//! triangle and the twin on the neighbouring triangle. Vertices additionally
//! carry the per-vertex attributes a rigging pipeline needs: normal, texture
//! coordinate with material slot, and named bone weights.
//!
//! # Index Types
//!
//! Mesh elements are identified by handles generic over the integer type
//! ([`MeshIndex`]): [`VertexId`], [`HalfEdgeId`] and [`FaceId`].
//!
//! # Construction
//!
//! ```
//! use armature::mesh::{HalfEdgeMesh, build_from_triangles};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert!(mesh.integrity_check());
//! assert!(mesh.is_connected());
//!
//! mesh.normalize_bounding_box();
//! mesh.compute_vertex_normals();
//! ```

mod builder;
mod geometry;
mod halfedge;
mod index;
mod topology;

pub use builder::{build_from_triangles, from_raw, to_face_vertex};
pub use geometry::Normalization;
pub use halfedge::{
    HalfEdge, HalfEdgeMesh, Vertex, VertexHalfEdgeIter, VertexNeighborIter, NO_MATERIAL,
};
pub use index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
