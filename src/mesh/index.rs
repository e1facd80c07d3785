//! Index handles for mesh elements.
//!
//! Vertices, half-edges and faces are addressed by small `Copy` handles that
//! wrap an integer. Faces are stored implicitly: face `f` owns the half-edge
//! triplet `3f, 3f + 1, 3f + 2`, so converting between the two is arithmetic.

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Integer types usable as mesh indices.
///
/// The largest value of each type is reserved as the "none" sentinel, which is
/// how boundary half-edges encode a missing twin.
pub trait MeshIndex:
    Copy + Clone + Eq + PartialEq + Ord + PartialOrd + Hash + Debug + Send + Sync + 'static
{
    /// The largest storable index.
    const MAX: Self;

    /// Sentinel for "no element".
    const INVALID: Self;

    /// Convert from usize.
    ///
    /// # Panics
    /// Panics in debug builds if the value does not fit.
    fn from_usize(v: usize) -> Self;

    /// Convert to usize.
    fn to_usize(self) -> usize;

    /// Check if this is a real index rather than the sentinel.
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

macro_rules! impl_mesh_index {
    ($ty:ty) => {
        impl MeshIndex for $ty {
            const MAX: Self = <$ty>::MAX - 1;
            const INVALID: Self = <$ty>::MAX;

            #[inline]
            fn from_usize(v: usize) -> Self {
                debug_assert!(
                    v <= Self::MAX as usize,
                    "index {} too large for {}",
                    v,
                    stringify!($ty)
                );
                v as $ty
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    };
}

impl_mesh_index!(u16);
impl_mesh_index!(u32);
impl_mesh_index!(u64);

/// A vertex handle.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// A half-edge handle.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId<I: MeshIndex = u32>(I);

/// A triangle handle.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create a handle from a raw position.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// The "none" handle.
            #[inline]
            pub fn invalid() -> Self {
                Self(I::INVALID)
            }

            /// Position in the owning array.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// The underlying integer.
            #[inline]
            pub fn raw(self) -> I {
                self.0
            }

            /// Check if this handle refers to an element.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0.is_valid()
            }

            /// `Some(self)` for a real handle, `None` for the sentinel.
            #[inline]
            pub fn valid(self) -> Option<Self> {
                self.is_valid().then_some(self)
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(NONE)", $display)
                }
            }
        }

        impl<I: MeshIndex> Default for $name<I> {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl<I: MeshIndex> From<usize> for $name<I> {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(HalfEdgeId, "HE");
impl_index_type!(FaceId, "F");

impl<I: MeshIndex> HalfEdgeId<I> {
    /// The face whose triplet contains this half-edge.
    #[inline]
    pub fn face(self) -> FaceId<I> {
        FaceId::new(self.index() / 3)
    }
}

impl<I: MeshIndex> FaceId<I> {
    /// The `k`-th half-edge (0, 1 or 2) of this face.
    #[inline]
    pub fn halfedge(self, k: usize) -> HalfEdgeId<I> {
        debug_assert!(k < 3);
        HalfEdgeId::new(self.index() * 3 + k)
    }

    /// All three half-edges of this face in storage order.
    #[inline]
    pub fn halfedges(self) -> [HalfEdgeId<I>; 3] {
        [self.halfedge(0), self.halfedge(1), self.halfedge(2)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id() {
        let v: VertexId = VertexId::new(42);
        assert_eq!(v.index(), 42);
        assert!(v.is_valid());
        assert_eq!(v.valid(), Some(v));

        let none: VertexId = VertexId::invalid();
        assert!(!none.is_valid());
        assert_eq!(none.valid(), None);
    }

    #[test]
    fn test_face_triplets() {
        let f: FaceId = FaceId::new(4);
        let [a, b, c] = f.halfedges();
        assert_eq!((a.index(), b.index(), c.index()), (12, 13, 14));
        assert_eq!(c.face(), f);
    }

    #[test]
    fn test_small_indices() {
        let v: VertexId<u16> = VertexId::new(1000);
        assert_eq!(v.index(), 1000);
        assert!(!VertexId::<u16>::invalid().is_valid());
    }

    #[test]
    fn test_debug_format() {
        let he: HalfEdgeId = HalfEdgeId::new(7);
        assert_eq!(format!("{:?}", he), "HE(7)");

        let none: HalfEdgeId = HalfEdgeId::invalid();
        assert_eq!(format!("{:?}", none), "HE(NONE)");
    }
}
