//! Error types for armature.
//!
//! Construction-time failures (bad triangle input, malformed skeleton
//! definitions) are reported through [`RigError`]. Structural integrity of an
//! already-built graph or mesh is reported by the `integrity_check` methods as
//! a plain `bool` instead, so callers can decide what a broken structure means
//! for them.

use thiserror::Error;

/// Result type alias using [`RigError`].
pub type Result<T> = std::result::Result<T, RigError>;

/// Errors that can occur while building meshes and skeletons.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RigError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A raw half-edge array cannot be split into face triplets.
    #[error("raw half-edge count {count} is not a multiple of 3")]
    RawEdgeCount {
        /// Number of half-edges supplied.
        count: usize,
    },

    /// A joint name was looked up that was never defined.
    #[error("unknown joint '{name}'")]
    UnknownJoint {
        /// The joint name.
        name: String,
    },

    /// A joint name was defined twice.
    #[error("joint '{name}' is already defined")]
    DuplicateJoint {
        /// The joint name.
        name: String,
    },

    /// The first joint of a skeleton must be its root.
    #[error("skeleton has no root joint")]
    MissingRoot,

    /// A second parentless joint was added.
    #[error("joint '{name}' would be a second root")]
    MultipleRoots {
        /// The offending joint name.
        name: String,
    },

    /// A joint cannot be its own mirror.
    #[error("joint '{name}' cannot be symmetric to itself")]
    InvalidSymmetry {
        /// The joint name.
        name: String,
    },

    /// A tag was applied to a joint that compression elided.
    #[error("joint '{name}' is not part of the compressed skeleton")]
    JointNotKept {
        /// The joint name.
        name: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl RigError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        RigError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    pub(crate) fn unknown_joint(name: &str) -> Self {
        RigError::UnknownJoint {
            name: name.to_string(),
        }
    }
}
