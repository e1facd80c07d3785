//! Built-in rig templates.
//!
//! Each template lists `(name, position, parent)` in authoring space, then
//! mirror pairs and the joints tagged as feet or fat. Joint order matters:
//! the first entry is the root and parents always precede their children.

use nalgebra::Point3;

use super::{Skeleton, SkeletonBuilder};
use crate::error::Result;

type JointSpec = (&'static str, [f64; 3], Option<&'static str>);

struct Template {
    joints: &'static [JointSpec],
    symmetric: &'static [(&'static str, &'static str)],
    feet: &'static [&'static str],
    fat: &'static [&'static str],
}

impl Template {
    fn build(&self) -> Result<Skeleton> {
        let mut builder = SkeletonBuilder::new();
        for &(name, [x, y, z], parent) in self.joints {
            builder.joint(name, Point3::new(x, y, z), parent)?;
        }
        for &(a, b) in self.symmetric {
            builder.symmetric(a, b)?;
        }

        let mut skeleton = builder.build()?;
        for name in self.feet {
            skeleton.set_foot(name)?;
        }
        for name in self.fat {
            skeleton.set_fat(name)?;
        }
        Ok(skeleton)
    }
}

const HUMAN: Template = Template {
    joints: &[
        ("hips", [0.0, 0.0, 0.0], None),
        ("spine", [0.0, 0.15, 0.0], Some("hips")),
        ("shoulders", [0.0, 0.575, 0.0], Some("spine")),
        ("head", [0.0, 0.7, 0.0], Some("shoulders")),
        ("lshoulder", [-0.2, 0.5, 0.0], Some("shoulders")),
        ("lelbow", [-0.4, 0.25, 0.075], Some("lshoulder")),
        ("lwrist", [-0.6, 0.0, 0.15], Some("lelbow")),
        ("lhand", [-0.6, -0.025, 0.15], Some("lwrist")),
        ("rshoulder", [0.2, 0.5, 0.0], Some("shoulders")),
        ("relbow", [0.4, 0.25, 0.075], Some("rshoulder")),
        ("rwrist", [0.6, 0.0, 0.15], Some("relbow")),
        ("rhand", [0.6, -0.025, 0.15], Some("rwrist")),
        ("lthigh", [-0.1, 0.0, 0.0], Some("hips")),
        ("lknee", [-0.15, -0.35, 0.0], Some("lthigh")),
        ("lankle", [-0.15, -0.8, 0.0], Some("lknee")),
        ("lfoot", [-0.15, -0.8, 0.1], Some("lankle")),
        ("rthigh", [0.1, 0.0, 0.0], Some("hips")),
        ("rknee", [0.15, -0.35, 0.0], Some("rthigh")),
        ("rankle", [0.15, -0.8, 0.0], Some("rknee")),
        ("rfoot", [0.15, -0.8, 0.1], Some("rankle")),
    ],
    symmetric: &[
        ("lthigh", "rthigh"),
        ("lknee", "rknee"),
        ("lankle", "rankle"),
        ("lfoot", "rfoot"),
        ("lshoulder", "rshoulder"),
        ("lelbow", "relbow"),
        ("lwrist", "rwrist"),
        ("lhand", "rhand"),
    ],
    feet: &["lfoot", "rfoot"],
    fat: &["hips", "shoulders", "head"],
};

const QUADRUPED: Template = Template {
    joints: &[
        ("shoulders", [0.0, 0.0, 0.5], None),
        ("back", [0.0, 0.0, 0.0], Some("shoulders")),
        ("hips", [0.0, 0.0, -0.5], Some("back")),
        ("neck", [0.0, 0.2, 0.63], Some("shoulders")),
        ("head", [0.0, 0.2, 0.9], Some("neck")),
        ("lthigh", [-0.15, 0.0, -0.5], Some("hips")),
        ("lhknee", [-0.2, -0.4, -0.5], Some("lthigh")),
        ("lhfoot", [-0.2, -0.8, -0.5], Some("lhknee")),
        ("rthigh", [0.15, 0.0, -0.5], Some("hips")),
        ("rhknee", [0.2, -0.4, -0.5], Some("rthigh")),
        ("rhfoot", [0.2, -0.8, -0.5], Some("rhknee")),
        ("lshoulder", [-0.2, 0.0, 0.5], Some("shoulders")),
        ("lfknee", [-0.2, -0.4, 0.5], Some("lshoulder")),
        ("lffoot", [-0.2, -0.8, 0.5], Some("lfknee")),
        ("rshoulder", [0.2, 0.0, 0.5], Some("shoulders")),
        ("rfknee", [0.2, -0.4, 0.5], Some("rshoulder")),
        ("rffoot", [0.2, -0.8, 0.5], Some("rfknee")),
        ("tail", [0.0, 0.0, -0.7], Some("hips")),
    ],
    symmetric: &[
        ("lthigh", "rthigh"),
        ("lhknee", "rhknee"),
        ("lhfoot", "rhfoot"),
        ("lshoulder", "rshoulder"),
        ("lfknee", "rfknee"),
        ("lffoot", "rffoot"),
    ],
    feet: &["lhfoot", "rhfoot", "lffoot", "rffoot"],
    fat: &["hips", "shoulders", "head"],
};

const HORSE: Template = Template {
    joints: &[
        ("shoulders", [0.0, 0.0, 0.5], None),
        ("back", [0.0, 0.0, 0.0], Some("shoulders")),
        ("hips", [0.0, 0.0, -0.5], Some("back")),
        ("neck", [0.0, 0.2, 0.63], Some("shoulders")),
        ("head", [0.0, 0.2, 0.9], Some("neck")),
        ("lthigh", [-0.15, 0.0, -0.5], Some("hips")),
        ("lhknee", [-0.2, -0.2, -0.45], Some("lthigh")),
        ("lhheel", [-0.2, -0.4, -0.5], Some("lhknee")),
        ("lhfoot", [-0.2, -0.8, -0.5], Some("lhheel")),
        ("rthigh", [0.15, 0.0, -0.5], Some("hips")),
        ("rhknee", [0.2, -0.2, -0.45], Some("rthigh")),
        ("rhheel", [0.2, -0.4, -0.5], Some("rhknee")),
        ("rhfoot", [0.2, -0.8, -0.5], Some("rhheel")),
        ("lshoulder", [-0.2, 0.0, 0.5], Some("shoulders")),
        ("lfknee", [-0.2, -0.4, 0.5], Some("lshoulder")),
        ("lffoot", [-0.2, -0.8, 0.5], Some("lfknee")),
        ("rshoulder", [0.2, 0.0, 0.5], Some("shoulders")),
        ("rfknee", [0.2, -0.4, 0.5], Some("rshoulder")),
        ("rffoot", [0.2, -0.8, 0.5], Some("rfknee")),
        ("tail", [0.0, 0.0, -0.7], Some("hips")),
    ],
    symmetric: &[
        ("lthigh", "rthigh"),
        ("lhknee", "rhknee"),
        ("lhheel", "rhheel"),
        ("lhfoot", "rhfoot"),
        ("lshoulder", "rshoulder"),
        ("lfknee", "rfknee"),
        ("lffoot", "rffoot"),
    ],
    feet: &["lhfoot", "rhfoot", "lffoot", "rffoot"],
    fat: &["hips", "shoulders", "head"],
};

const CENTAUR: Template = Template {
    joints: &[
        ("shoulders", [0.0, 0.0, 0.5], None),
        ("back", [0.0, 0.0, 0.0], Some("shoulders")),
        ("hips", [0.0, 0.0, -0.5], Some("back")),
        ("hback", [0.0, 0.25, 0.5], Some("shoulders")),
        ("hshoulders", [0.0, 0.5, 0.5], Some("hback")),
        ("head", [0.0, 0.7, 0.5], Some("hshoulders")),
        ("lthigh", [-0.15, 0.0, -0.5], Some("hips")),
        ("lhknee", [-0.2, -0.4, -0.45], Some("lthigh")),
        ("lhfoot", [-0.2, -0.8, -0.5], Some("lhknee")),
        ("rthigh", [0.15, 0.0, -0.5], Some("hips")),
        ("rhknee", [0.2, -0.4, -0.45], Some("rthigh")),
        ("rhfoot", [0.2, -0.8, -0.5], Some("rhknee")),
        ("lshoulder", [-0.2, 0.0, 0.5], Some("shoulders")),
        ("lfknee", [-0.2, -0.4, 0.5], Some("lshoulder")),
        ("lffoot", [-0.2, -0.8, 0.5], Some("lfknee")),
        ("rshoulder", [0.2, 0.0, 0.5], Some("shoulders")),
        ("rfknee", [0.2, -0.4, 0.5], Some("rshoulder")),
        ("rffoot", [0.2, -0.8, 0.5], Some("rfknee")),
        ("hlshoulder", [-0.2, 0.5, 0.5], Some("hshoulders")),
        ("lelbow", [-0.4, 0.25, 0.575], Some("hlshoulder")),
        ("lhand", [-0.6, 0.0, 0.65], Some("lelbow")),
        ("hrshoulder", [0.2, 0.5, 0.5], Some("hshoulders")),
        ("relbow", [0.4, 0.25, 0.575], Some("hrshoulder")),
        ("rhand", [0.6, 0.0, 0.65], Some("relbow")),
        ("tail", [0.0, 0.0, -0.7], Some("hips")),
    ],
    symmetric: &[
        ("lthigh", "rthigh"),
        ("lhknee", "rhknee"),
        ("lhfoot", "rhfoot"),
        ("lshoulder", "rshoulder"),
        ("lfknee", "rfknee"),
        ("lffoot", "rffoot"),
        ("hlshoulder", "hrshoulder"),
        ("lelbow", "relbow"),
        ("lhand", "rhand"),
    ],
    feet: &["lhfoot", "rhfoot", "lffoot", "rffoot"],
    fat: &["hips", "shoulders", "hshoulders", "head"],
};

impl Skeleton {
    /// Biped: hips root, spine, head, two arms and two legs.
    pub fn human() -> Result<Self> {
        HUMAN.build()
    }

    /// Four-legged animal rooted at the shoulders, with a tail.
    pub fn quadruped() -> Result<Self> {
        QUADRUPED.build()
    }

    /// Quadruped with an extra heel joint on each hind leg.
    pub fn horse() -> Result<Self> {
        HORSE.build()
    }

    /// Four-legged body with a humanoid torso, head and arms.
    pub fn centaur() -> Result<Self> {
        CENTAUR.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human() {
        let skeleton = Skeleton::human().unwrap();
        let full = skeleton.full();
        let compressed = skeleton.compressed();

        assert_eq!(full.num_joints(), 20);
        // hips, shoulders, head, both hands, both feet.
        assert_eq!(compressed.len(), 7);
        assert!(full.graph().integrity_check());
        assert!(compressed.graph().integrity_check());

        let lfoot = compressed.from_full(full.id("lfoot").unwrap()).unwrap();
        let rfoot = compressed.from_full(full.id("rfoot").unwrap()).unwrap();
        assert!(compressed.is_foot(lfoot));
        assert_eq!(compressed.symmetric(rfoot), Some(lfoot));
        assert!(compressed.is_fat(compressed.from_full(full.id("head").unwrap()).unwrap()));

        let spine = full.id("spine").unwrap();
        let fraction = compressed.fraction_along_bone(spine).unwrap();
        assert!((fraction - 0.15 / 0.575).abs() < 1e-10);
    }

    #[test]
    fn test_all_templates_build() {
        for (skeleton, joints, feet) in [
            (Skeleton::human(), 20, 2),
            (Skeleton::quadruped(), 18, 4),
            (Skeleton::horse(), 20, 4),
            (Skeleton::centaur(), 25, 4),
        ] {
            let skeleton = skeleton.unwrap();
            let full = skeleton.full();
            let compressed = skeleton.compressed();
            assert_eq!(full.num_joints(), joints);
            assert!(compressed.len() < joints);

            for c in compressed.ids().skip(1) {
                assert!(compressed.parent(c).is_some());
                assert!(compressed.bone_length(c) > 0.0);
            }
            for j in full.joint_ids() {
                if let Some(f) = compressed.fraction_along_bone(j) {
                    assert!(f > 0.0 && f < 1.0);
                }
            }
            assert_eq!(compressed.ids().filter(|&c| compressed.is_foot(c)).count(), feet);
        }
    }
}
