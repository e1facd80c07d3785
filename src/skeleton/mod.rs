//! Skeleton hierarchies.
//!
//! A skeleton is authored as an ordered list of named joints, each attached
//! to an earlier parent, plus left/right symmetry pairs. Authoring happens on
//! a [`SkeletonBuilder`]; [`SkeletonBuilder::build`] freezes the joint tree
//! into a [`FullSkeleton`] and derives its [`CompressedSkeleton`], where
//! chains of pass-through joints collapse into single bones.
//!
//! Positions are authored in the symmetric cube `[-1, 1]³` and stored halved,
//! so a skeleton lines up with a mesh normalized into `[0, 1]³` once shifted.
//!
//! # Example
//!
//! ```
//! use armature::skeleton::SkeletonBuilder;
//! use nalgebra::Point3;
//!
//! let mut builder = SkeletonBuilder::new();
//! builder.joint("root", Point3::new(0.0, 0.0, 0.0), None).unwrap();
//! builder.joint("mid", Point3::new(0.0, 0.4, 0.0), Some("root")).unwrap();
//! builder.joint("leaf", Point3::new(0.0, 1.0, 0.0), Some("mid")).unwrap();
//!
//! let mut skeleton = builder.build().unwrap();
//! assert_eq!(skeleton.full().num_joints(), 3);
//! assert_eq!(skeleton.compressed().len(), 2);
//!
//! skeleton.set_foot("leaf").unwrap();
//! assert!(skeleton.set_foot("mid").is_err());
//! ```

mod compress;
mod templates;

use std::collections::HashMap;
use std::fmt::{self, Debug};

use nalgebra::Point3;

use crate::error::{Result, RigError};
use crate::graph::WeightedGraph;

pub use compress::{compress, CompressedSkeleton};

/// Authoring positions are scaled by this factor on insertion.
const AUTHORING_SCALE: f64 = 0.5;

macro_rules! impl_joint_index {
    ($name:ident, $prefix:literal) => {
        impl $name {
            /// Wrap a raw index.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(index)
            }

            /// The raw index.
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $prefix, self.0)
            }
        }
    };
}

/// Index of a joint in the full skeleton.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JointId(usize);

/// Index of a joint in the compressed skeleton.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompressedId(usize);

impl_joint_index!(JointId, "J");
impl_joint_index!(CompressedId, "C");

/// Incremental skeleton authoring.
///
/// The first joint must be the root and every later joint names an existing
/// parent, so the hierarchy is a tree rooted at joint 0 by construction.
#[derive(Debug, Clone, Default)]
pub struct SkeletonBuilder {
    names: Vec<String>,
    lookup: HashMap<String, JointId>,
    parent: Vec<Option<JointId>>,
    symmetric: Vec<Option<JointId>>,
    graph: WeightedGraph,
}

impl SkeletonBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of joints added so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no joint has been added.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Append a joint at `position` (authoring space) below `parent`.
    ///
    /// `parent` is `None` only for the root, which must come first.
    ///
    /// # Errors
    /// [`RigError::DuplicateJoint`] if the name is taken,
    /// [`RigError::MultipleRoots`] for a second parentless joint,
    /// [`RigError::MissingRoot`] if the first joint has a parent,
    /// [`RigError::UnknownJoint`] if the parent does not exist.
    pub fn joint(
        &mut self,
        name: &str,
        position: Point3<f64>,
        parent: Option<&str>,
    ) -> Result<JointId> {
        if self.lookup.contains_key(name) {
            return Err(RigError::DuplicateJoint {
                name: name.to_string(),
            });
        }

        let parent = match parent {
            None if !self.names.is_empty() => {
                return Err(RigError::MultipleRoots {
                    name: name.to_string(),
                })
            }
            None => None,
            Some(_) if self.names.is_empty() => return Err(RigError::MissingRoot),
            Some(p) => Some(*self.lookup.get(p).ok_or_else(|| RigError::unknown_joint(p))?),
        };

        let id = JointId(self.graph.add_vertex(Point3::from(position.coords * AUTHORING_SCALE)));
        if let Some(p) = parent {
            self.graph.add_edge(id.0, p.0);
        }

        self.names.push(name.to_string());
        self.lookup.insert(name.to_string(), id);
        self.parent.push(parent);
        self.symmetric.push(None);
        Ok(id)
    }

    /// Declare two joints mirror images of each other.
    ///
    /// The later joint records the earlier one, so `symmetric(j) < j` always.
    pub fn symmetric(&mut self, first: &str, second: &str) -> Result<()> {
        let a = *self.lookup.get(first).ok_or_else(|| RigError::unknown_joint(first))?;
        let b = *self.lookup.get(second).ok_or_else(|| RigError::unknown_joint(second))?;
        if a == b {
            return Err(RigError::InvalidSymmetry {
                name: first.to_string(),
            });
        }

        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.symmetric[hi.0] = Some(lo);
        Ok(())
    }

    /// Freeze the joint tree and derive its compressed form.
    pub fn build(self) -> Result<Skeleton> {
        if self.names.is_empty() {
            return Err(RigError::MissingRoot);
        }

        let full = FullSkeleton {
            names: self.names,
            lookup: self.lookup,
            parent: self.parent,
            symmetric: self.symmetric,
            graph: self.graph,
        };
        let compressed = compress(&full);

        log::debug!(
            "built skeleton: {} joints, {} compressed",
            full.num_joints(),
            compressed.len()
        );

        Ok(Skeleton { full, compressed })
    }
}

/// The complete joint tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FullSkeleton {
    names: Vec<String>,
    lookup: HashMap<String, JointId>,
    parent: Vec<Option<JointId>>,
    symmetric: Vec<Option<JointId>>,
    graph: WeightedGraph,
}

impl FullSkeleton {
    /// Number of joints.
    #[inline]
    pub fn num_joints(&self) -> usize {
        self.names.len()
    }

    /// The root joint.
    #[inline]
    pub fn root(&self) -> JointId {
        JointId(0)
    }

    /// Iterate over all joint ids in definition order.
    pub fn joint_ids(&self) -> impl Iterator<Item = JointId> {
        (0..self.names.len()).map(JointId)
    }

    /// Joint names in definition order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of a joint.
    #[inline]
    pub fn name(&self, j: JointId) -> &str {
        &self.names[j.0]
    }

    /// Look up a joint by name.
    #[inline]
    pub fn id(&self, name: &str) -> Option<JointId> {
        self.lookup.get(name).copied()
    }

    /// Stored (halved, possibly rescaled) position of a joint.
    #[inline]
    pub fn position(&self, j: JointId) -> &Point3<f64> {
        self.graph.position(j.0)
    }

    /// Structural parent, `None` for the root.
    #[inline]
    pub fn parent(&self, j: JointId) -> Option<JointId> {
        self.parent[j.0]
    }

    /// Lower-indexed mirror joint, if any.
    #[inline]
    pub fn symmetric(&self, j: JointId) -> Option<JointId> {
        self.symmetric[j.0]
    }

    /// Joints whose parent is `j`.
    pub fn children(&self, j: JointId) -> impl Iterator<Item = JointId> + '_ {
        self.parent
            .iter()
            .enumerate()
            .filter(move |(_, p)| **p == Some(j))
            .map(|(i, _)| JointId(i))
    }

    /// Bone graph over joint positions.
    #[inline]
    pub fn graph(&self) -> &WeightedGraph {
        &self.graph
    }
}

/// A built skeleton: the full joint tree and its compressed form.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    full: FullSkeleton,
    compressed: CompressedSkeleton,
}

impl Skeleton {
    /// The full joint tree.
    #[inline]
    pub fn full(&self) -> &FullSkeleton {
        &self.full
    }

    /// The compressed joint tree.
    #[inline]
    pub fn compressed(&self) -> &CompressedSkeleton {
        &self.compressed
    }

    fn kept(&self, name: &str) -> Result<CompressedId> {
        let j = self.full.id(name).ok_or_else(|| RigError::unknown_joint(name))?;
        self.compressed
            .from_full(j)
            .ok_or_else(|| RigError::JointNotKept {
                name: name.to_string(),
            })
    }

    /// Mark the compressed joint for `name` as a foot.
    ///
    /// # Errors
    /// [`RigError::JointNotKept`] if compression elided the joint.
    pub fn set_foot(&mut self, name: &str) -> Result<()> {
        let c = self.kept(name)?;
        self.compressed.feet[c.index()] = true;
        Ok(())
    }

    /// Mark the compressed joint for `name` as lying in a thick body part.
    ///
    /// # Errors
    /// [`RigError::JointNotKept`] if compression elided the joint.
    pub fn set_fat(&mut self, name: &str) -> Result<()> {
        let c = self.kept(name)?;
        self.compressed.fat[c.index()] = true;
        Ok(())
    }

    /// Uniformly scale joint positions and bone lengths.
    ///
    /// Both representations scale together; fractions along bones are
    /// unchanged.
    pub fn scale(&mut self, factor: f64) -> Result<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(RigError::invalid_param("factor", factor, "must be finite and positive"));
        }

        self.full.graph.scale(factor);
        self.compressed.graph.scale(factor);
        for length in &mut self.compressed.bone_length {
            *length *= factor;
        }
        Ok(())
    }

    /// Gather a position for every full joint, in joint order, from a map of
    /// named positions (typically the joints an importer found in a file).
    ///
    /// # Errors
    /// [`RigError::UnknownJoint`] naming the first joint missing from the map.
    pub fn match_named_positions(
        &self,
        positions: &HashMap<String, Point3<f64>>,
    ) -> Result<Vec<Point3<f64>>> {
        self.full
            .names
            .iter()
            .map(|name| positions.get(name).copied().ok_or_else(|| RigError::unknown_joint(name)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> SkeletonBuilder {
        let mut builder = SkeletonBuilder::new();
        builder.joint("root", Point3::new(0.0, 0.0, 0.0), None).unwrap();
        builder.joint("mid", Point3::new(0.0, 0.6, 0.0), Some("root")).unwrap();
        builder.joint("leaf", Point3::new(0.0, 1.0, 0.0), Some("mid")).unwrap();
        builder
    }

    #[test]
    fn test_positions_halved() {
        let skeleton = chain().build().unwrap();
        let full = skeleton.full();
        let mid = full.id("mid").unwrap();
        assert_eq!(*full.position(mid), Point3::new(0.0, 0.3, 0.0));
        assert_eq!(full.parent(mid), full.id("root"));
        assert_eq!(full.parent(full.root()), None);
        assert_eq!(full.name(mid), "mid");
        assert_eq!(full.children(full.root()).collect::<Vec<_>>(), vec![mid]);
        assert!(full.graph().integrity_check());
    }

    #[test]
    fn test_builder_errors() {
        let mut builder = SkeletonBuilder::new();
        assert_eq!(
            builder.joint("a", Point3::origin(), Some("nowhere")).unwrap_err(),
            RigError::MissingRoot
        );
        builder.joint("a", Point3::origin(), None).unwrap();
        assert_eq!(
            builder.joint("b", Point3::origin(), None).unwrap_err(),
            RigError::MultipleRoots { name: "b".into() }
        );
        assert_eq!(
            builder.joint("a", Point3::origin(), Some("a")).unwrap_err(),
            RigError::DuplicateJoint { name: "a".into() }
        );
        assert_eq!(
            builder.joint("c", Point3::origin(), Some("x")).unwrap_err(),
            RigError::UnknownJoint { name: "x".into() }
        );
        assert_eq!(builder.len(), 1);

        assert_eq!(SkeletonBuilder::new().build().unwrap_err(), RigError::MissingRoot);
    }

    #[test]
    fn test_symmetry_lower_index() {
        let mut builder = chain();
        builder.joint("other", Point3::new(0.5, 0.5, 0.0), Some("root")).unwrap();
        builder.symmetric("other", "mid").unwrap();
        assert_eq!(
            builder.symmetric("mid", "mid").unwrap_err(),
            RigError::InvalidSymmetry { name: "mid".into() }
        );

        let skeleton = builder.build().unwrap();
        let full = skeleton.full();
        let mid = full.id("mid").unwrap();
        let other = full.id("other").unwrap();
        assert_eq!(full.symmetric(other), Some(mid));
        assert_eq!(full.symmetric(mid), None);
        for j in full.joint_ids() {
            if let Some(s) = full.symmetric(j) {
                assert!(s < j);
            }
        }
    }

    #[test]
    fn test_tags_and_errors() {
        let mut skeleton = chain().build().unwrap();
        skeleton.set_foot("leaf").unwrap();
        skeleton.set_fat("root").unwrap();
        assert_eq!(
            skeleton.set_fat("mid").unwrap_err(),
            RigError::JointNotKept { name: "mid".into() }
        );
        assert_eq!(
            skeleton.set_foot("tail").unwrap_err(),
            RigError::UnknownJoint { name: "tail".into() }
        );

        let compressed = skeleton.compressed();
        let leaf = compressed.from_full(skeleton.full().id("leaf").unwrap()).unwrap();
        assert!(compressed.is_foot(leaf));
        assert!(!compressed.is_fat(leaf));
        assert!(compressed.is_fat(CompressedId::new(0)));
    }

    #[test]
    fn test_scale() {
        let mut skeleton = chain().build().unwrap();
        let before = skeleton.clone();
        skeleton.scale(3.0).unwrap();

        let leaf = CompressedId::new(1);
        assert!(
            (skeleton.compressed().bone_length(leaf) - 3.0 * before.compressed().bone_length(leaf))
                .abs()
                < 1e-10
        );
        let mid = skeleton.full().id("mid").unwrap();
        assert!((skeleton.full().position(mid) - Point3::new(0.0, 0.9, 0.0)).norm() < 1e-12);
        assert_eq!(
            skeleton.compressed().fraction_along_bone(mid),
            before.compressed().fraction_along_bone(mid)
        );

        assert!(skeleton.scale(0.0).is_err());
        assert!(skeleton.scale(f64::NAN).is_err());
    }

    #[test]
    fn test_match_named_positions() {
        let skeleton = chain().build().unwrap();
        let mut named = HashMap::new();
        named.insert("leaf".to_string(), Point3::new(0.0, 2.0, 0.0));
        named.insert("root".to_string(), Point3::new(0.0, 0.0, 0.0));
        assert_eq!(
            skeleton.match_named_positions(&named).unwrap_err(),
            RigError::UnknownJoint { name: "mid".into() }
        );

        named.insert("mid".to_string(), Point3::new(0.0, 1.0, 0.0));
        let matched = skeleton.match_named_positions(&named).unwrap();
        assert_eq!(matched[1], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(matched[2], Point3::new(0.0, 2.0, 0.0));
    }
}
