//! Per-vertex geometry passes: normals and bounding-box normalization.

use nalgebra::{Point3, Vector3};

use super::halfedge::HalfEdgeMesh;
use super::index::{FaceId, MeshIndex};

/// A uniform scale followed by a translation, `p' = p * scale + translation`.
///
/// Recorded by [`HalfEdgeMesh::normalize_bounding_box`] so that positions in
/// the normalized space (skeleton embeddings, for instance) can be mapped back
/// onto the original mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    /// Uniform scale factor.
    pub scale: f64,
    /// Translation applied after scaling.
    pub translation: Vector3<f64>,
}

impl Normalization {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            translation: Vector3::zeros(),
        }
    }

    /// Map an original-space point into normalized space.
    #[inline]
    pub fn apply(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::from(p.coords * self.scale + self.translation)
    }

    /// Map a normalized-space point back into the original space.
    #[inline]
    pub fn to_original(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::from((p.coords - self.translation) / self.scale)
    }

    /// `other` applied after `self`.
    pub fn then(&self, other: &Normalization) -> Normalization {
        Normalization {
            scale: self.scale * other.scale,
            translation: self.translation * other.scale + other.translation,
        }
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Self::identity()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Recompute every vertex normal.
    ///
    /// Unnormalized face cross products are summed into each corner, which
    /// weights faces by area, and the sums are normalized per vertex.
    /// Vertices without faces get a zero normal.
    pub fn compute_vertex_normals(&mut self) {
        for v in &mut self.vertices {
            v.normal = Vector3::zeros();
        }

        for f in 0..self.num_faces() {
            let face = FaceId::<I>::new(f);
            let [a, b, c] = self.face_triangle(face);
            let [p0, p1, p2] = self.face_positions(face);
            let n = (p1 - p0).cross(&(p2 - p0));
            for v in [a, b, c] {
                self.vertices[v.index()].normal += n;
            }
        }

        for v in &mut self.vertices {
            v.normal = v.normal.try_normalize(0.0).unwrap_or_else(Vector3::zeros);
        }
    }

    /// Translate and uniformly scale the mesh into the unit cube.
    ///
    /// The longest axis of the bounding box maps exactly onto `[0, 1]`; the
    /// shorter axes are centred at `0.5`. Named joints are moved with the
    /// mesh. Returns the transform that was applied (also accumulated into
    /// [`normalization`](Self::normalization)). A mesh without vertices is
    /// left untouched.
    pub fn normalize_bounding_box(&mut self) -> Normalization {
        let Some((min, max)) = self.bounding_box() else {
            return Normalization::identity();
        };

        let extent = (max - min).max();
        let scale = if extent > 0.0 { 1.0 / extent } else { 1.0 };
        let center = nalgebra::center(&min, &max);
        let transform = Normalization {
            scale,
            translation: Vector3::repeat(0.5) - center.coords * scale,
        };

        for v in &mut self.vertices {
            v.position = transform.apply(&v.position);
        }
        for p in self.joints.values_mut() {
            *p = transform.apply(p);
        }

        self.normalization = Some(match &self.normalization {
            Some(previous) => previous.then(&transform),
            None => transform,
        });

        log::debug!(
            "normalized bounding box: scale {:.6}, translation {:?}",
            transform.scale,
            transform.translation
        );

        transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_triangles, VertexId};

    fn tetrahedron() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(2.0, 1.0, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_flat_normals() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3]];
        let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
        mesh.compute_vertex_normals();

        for (_, v) in mesh.vertices() {
            assert!((v.normal - Vector3::z()).norm() < 1e-12);
        }
    }

    #[test]
    fn test_closed_normals_point_outward() {
        let mut mesh = tetrahedron();
        mesh.compute_vertex_normals();

        let centroid = Point3::new(2.0, 0.75, 0.25);
        for (_, v) in mesh.vertices() {
            assert!((v.normal.norm() - 1.0).abs() < 1e-12);
            assert!(v.normal.dot(&(v.position - centroid)) > 0.0);
        }
    }

    #[test]
    fn test_normalize_bounding_box() {
        let mut mesh = tetrahedron();
        mesh.joints
            .insert("hips".to_string(), Point3::new(2.0, 1.0, 0.5));

        let t = mesh.normalize_bounding_box();
        assert!((t.scale - 0.25).abs() < 1e-12);

        let (min, max) = mesh.bounding_box().unwrap();
        // Longest axis (x) spans [0, 1]; the others are centred.
        assert!((min.x - 0.0).abs() < 1e-12 && (max.x - 1.0).abs() < 1e-12);
        assert!(((min.y + max.y) * 0.5 - 0.5).abs() < 1e-12);
        assert!(((min.z + max.z) * 0.5 - 0.5).abs() < 1e-12);
        assert!((max.y - min.y - 0.5).abs() < 1e-12);

        let hips = mesh.joints["hips"];
        assert!((hips - Point3::new(0.5, 0.5, 0.5)).norm() < 1e-12);

        let original = t.to_original(mesh.position(VertexId::new(1)));
        assert!((original - Point3::new(4.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_normalize_twice_accumulates() {
        let mut mesh = tetrahedron();
        mesh.normalize_bounding_box();
        let second = mesh.normalize_bounding_box();
        assert!((second.scale - 1.0).abs() < 1e-12);
        assert!(second.translation.norm() < 1e-12);

        let total = mesh.normalization().unwrap();
        assert!((total.scale - 0.25).abs() < 1e-12);
        let back = total.to_original(mesh.position(VertexId::new(2)));
        assert!((back - Point3::new(2.0, 2.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_normalize_empty_mesh() {
        let mut mesh = HalfEdgeMesh::<u32>::new();
        assert_eq!(mesh.normalize_bounding_box(), Normalization::identity());
        assert!(mesh.normalization().is_none());
    }
}
