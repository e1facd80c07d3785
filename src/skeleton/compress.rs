//! Compressed skeletons.
//!
//! Joints of degree exactly two in the bone graph only pass a chain through;
//! compression drops them (the root is always kept) and joins each chain into
//! one logical bone. The embedding search runs over this smaller tree, and
//! [`CompressedSkeleton::fraction_along_bone`] lets the result be expanded
//! back to every full joint.

use nalgebra::Point3;

use super::{CompressedId, FullSkeleton, JointId};
use crate::graph::WeightedGraph;

/// Skeleton reduced to root, branching and leaf joints.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedSkeleton {
    to_full: Vec<JointId>,
    from_full: Vec<Option<CompressedId>>,
    parent: Vec<Option<CompressedId>>,
    symmetric: Vec<Option<CompressedId>>,
    /// Indexed by full joint; `None` for kept joints.
    fraction: Vec<Option<f64>>,
    pub(crate) bone_length: Vec<f64>,
    pub(crate) feet: Vec<bool>,
    pub(crate) fat: Vec<bool>,
    pub(crate) graph: WeightedGraph,
}

/// Derive the compressed form of a full skeleton.
///
/// A compressed bone `k` spans from `parent(k)` to `k` through the elided
/// joints between them. Its length is the sum of the full segments, and each
/// elided joint gets the cumulative length from the parent end divided by
/// that total, so fractions strictly increase toward the child.
pub fn compress(full: &FullSkeleton) -> CompressedSkeleton {
    let n = full.num_joints();
    let mut to_full = Vec::new();
    let mut from_full = vec![None; n];

    for j in full.joint_ids() {
        if full.graph().degree(j.index()) == 2 && j != full.root() {
            continue;
        }
        from_full[j.index()] = Some(CompressedId(to_full.len()));
        to_full.push(j);
    }

    let m = to_full.len();
    let mut parent = vec![None; m];
    let mut symmetric = vec![None; m];
    let mut graph = WeightedGraph::with_vertices(
        to_full.iter().map(|&j| *full.position(j)).collect(),
    );

    for (k, &j) in to_full.iter().enumerate() {
        symmetric[k] = full.symmetric(j).and_then(|s| from_full[s.index()]);

        let mut cur = full.parent(j);
        while let Some(p) = cur {
            if let Some(c) = from_full[p.index()] {
                parent[k] = Some(c);
                graph.add_edge(k, c.index());
                break;
            }
            cur = full.parent(p);
        }
    }

    let mut bone_length = vec![0.0; m];
    let mut fraction = vec![None; n];

    for (k, &j) in to_full.iter().enumerate().skip(1) {
        // Segments from the child end up to the compressed parent.
        let mut segments = Vec::new();
        let mut cur = j;
        while let Some(p) = full.parent(cur) {
            segments.push((cur, (full.position(cur) - full.position(p)).norm()));
            cur = p;
            if from_full[p.index()].is_some() {
                break;
            }
        }

        let total: f64 = segments.iter().map(|(_, len)| len).sum();
        bone_length[k] = total;

        let count = segments.len() as f64;
        let mut acc = 0.0;
        for (step, &(joint, len)) in segments.iter().rev().enumerate() {
            acc += len;
            if joint == j {
                continue;
            }
            // Coincident joints fall back to even spacing along the chain.
            fraction[joint.index()] = Some(if total > 0.0 {
                acc / total
            } else {
                (step + 1) as f64 / count
            });
        }
    }

    CompressedSkeleton {
        to_full,
        from_full,
        parent,
        symmetric,
        fraction,
        bone_length,
        feet: vec![false; m],
        fat: vec![false; m],
        graph,
    }
}

impl CompressedSkeleton {
    /// Number of compressed joints.
    #[inline]
    pub fn len(&self) -> usize {
        self.to_full.len()
    }

    /// Always false for a built skeleton, which keeps at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.to_full.is_empty()
    }

    /// Iterate over compressed joint ids.
    pub fn ids(&self) -> impl Iterator<Item = CompressedId> {
        (0..self.to_full.len()).map(CompressedId)
    }

    /// Full joint kept at a compressed slot.
    #[inline]
    pub fn to_full(&self, c: CompressedId) -> JointId {
        self.to_full[c.0]
    }

    /// Compressed slot of a full joint, `None` if it was elided.
    #[inline]
    pub fn from_full(&self, j: JointId) -> Option<CompressedId> {
        self.from_full[j.index()]
    }

    /// Compressed parent, `None` for the root.
    #[inline]
    pub fn parent(&self, c: CompressedId) -> Option<CompressedId> {
        self.parent[c.0]
    }

    /// Mirror joint, `None` if there is none or it was elided.
    #[inline]
    pub fn symmetric(&self, c: CompressedId) -> Option<CompressedId> {
        self.symmetric[c.0]
    }

    /// Length of the bone ending at `c`, summed over its full segments.
    /// Zero for the root.
    #[inline]
    pub fn bone_length(&self, c: CompressedId) -> f64 {
        self.bone_length[c.0]
    }

    /// Position of an elided full joint along the bone it was merged into,
    /// in `(0, 1)` from the parent end. `None` for kept joints.
    #[inline]
    pub fn fraction_along_bone(&self, j: JointId) -> Option<f64> {
        self.fraction[j.index()]
    }

    /// Whether the joint was tagged as a foot.
    #[inline]
    pub fn is_foot(&self, c: CompressedId) -> bool {
        self.feet[c.0]
    }

    /// Whether the joint was tagged as fat.
    #[inline]
    pub fn is_fat(&self, c: CompressedId) -> bool {
        self.fat[c.0]
    }

    /// Bone graph over compressed joint positions.
    #[inline]
    pub fn graph(&self) -> &WeightedGraph {
        &self.graph
    }

    /// Position of a compressed joint.
    #[inline]
    pub fn position(&self, c: CompressedId) -> &Point3<f64> {
        self.graph.position(c.0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::SkeletonBuilder;
    use super::*;

    #[test]
    fn test_chain_collapses() {
        let mut builder = SkeletonBuilder::new();
        builder.joint("root", Point3::new(0.0, 0.0, 0.0), None).unwrap();
        builder.joint("a", Point3::new(0.0, 0.2, 0.0), Some("root")).unwrap();
        builder.joint("b", Point3::new(0.0, 0.6, 0.0), Some("a")).unwrap();
        builder.joint("leaf", Point3::new(0.0, 1.0, 0.0), Some("b")).unwrap();
        let skeleton = builder.build().unwrap();
        let full = skeleton.full();
        let compressed = skeleton.compressed();

        assert_eq!(compressed.len(), 2);
        let leaf = CompressedId::new(1);
        assert_eq!(compressed.to_full(leaf), full.id("leaf").unwrap());
        assert_eq!(compressed.parent(leaf), Some(CompressedId::new(0)));
        assert!((compressed.bone_length(leaf) - 0.5).abs() < 1e-10);
        assert_eq!(compressed.bone_length(CompressedId::new(0)), 0.0);

        let fa = compressed.fraction_along_bone(full.id("a").unwrap()).unwrap();
        let fb = compressed.fraction_along_bone(full.id("b").unwrap()).unwrap();
        assert!((fa - 0.2).abs() < 1e-10);
        assert!((fb - 0.6).abs() < 1e-10);
        assert!(0.0 < fa && fa < fb && fb < 1.0);
        assert_eq!(compressed.fraction_along_bone(full.root()), None);
    }

    #[test]
    fn test_maps_are_inverse() {
        let mut builder = SkeletonBuilder::new();
        builder.joint("hips", Point3::new(0.0, 0.0, 0.0), None).unwrap();
        builder.joint("spine", Point3::new(0.0, 0.5, 0.0), Some("hips")).unwrap();
        builder.joint("lleg", Point3::new(-0.2, -0.5, 0.0), Some("hips")).unwrap();
        builder.joint("rleg", Point3::new(0.2, -0.5, 0.0), Some("hips")).unwrap();
        builder.joint("head", Point3::new(0.0, 0.8, 0.0), Some("spine")).unwrap();
        builder.symmetric("lleg", "rleg").unwrap();
        let skeleton = builder.build().unwrap();
        let full = skeleton.full();
        let compressed = skeleton.compressed();

        // hips has degree 3, spine degree 2.
        assert_eq!(compressed.len(), 4);
        assert_eq!(compressed.from_full(full.id("spine").unwrap()), None);
        for c in compressed.ids() {
            assert_eq!(compressed.from_full(compressed.to_full(c)), Some(c));
        }

        let lleg = compressed.from_full(full.id("lleg").unwrap()).unwrap();
        let rleg = compressed.from_full(full.id("rleg").unwrap()).unwrap();
        assert_eq!(compressed.symmetric(rleg), Some(lleg));

        let head = compressed.from_full(full.id("head").unwrap()).unwrap();
        assert_eq!(compressed.parent(head), Some(CompressedId::new(0)));
        assert!(compressed.graph().integrity_check());
        assert_eq!(compressed.graph().num_edges(), 3);
    }

    #[test]
    fn test_root_kept_at_degree_two() {
        let mut builder = SkeletonBuilder::new();
        builder.joint("root", Point3::new(0.0, 0.0, 0.0), None).unwrap();
        builder.joint("up", Point3::new(0.0, 1.0, 0.0), Some("root")).unwrap();
        builder.joint("down", Point3::new(0.0, -1.0, 0.0), Some("root")).unwrap();
        let skeleton = builder.build().unwrap();

        assert_eq!(skeleton.full().graph().degree(0), 2);
        assert_eq!(skeleton.compressed().len(), 3);
        assert_eq!(skeleton.compressed().to_full(CompressedId::new(0)), skeleton.full().root());
    }

    #[test]
    fn test_coincident_joints() {
        let mut builder = SkeletonBuilder::new();
        builder.joint("root", Point3::origin(), None).unwrap();
        builder.joint("a", Point3::origin(), Some("root")).unwrap();
        builder.joint("leaf", Point3::origin(), Some("a")).unwrap();
        let skeleton = builder.build().unwrap();
        let a = skeleton.full().id("a").unwrap();
        assert_eq!(skeleton.compressed().fraction_along_bone(a), Some(0.5));
    }
}
