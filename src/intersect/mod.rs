//! Ray casting against a mesh along one fixed direction.
//!
//! An [`Intersector`] is bound to a mesh and a direction. Construction
//! projects the mesh onto the plane perpendicular to the direction and
//! buckets every triangle footprint into a uniform grid; each query then
//! projects the ray origin, scans one bucket and solves the ray/plane
//! distance with a single dot product per candidate triangle.
//!
//! Rigging casts many parallel rays (one per vertex and candidate bone
//! position) in the same few directions, which is what this layout serves.
//!
//! # Example
//!
//! ```
//! use armature::intersect::Intersector;
//! use armature::mesh::{build_from_triangles, HalfEdgeMesh};
//! use nalgebra::{Point3, Vector3};
//!
//! let vertices = vec![
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 1.0),
//! ];
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 2, 1]]).unwrap();
//!
//! let intersector = Intersector::new(&mesh, Vector3::y());
//! let hits = intersector.intersect(&Point3::new(0.2, 0.0, 0.2));
//! assert_eq!(hits.len(), 1);
//! assert!((hits[0].y - 1.0).abs() < 1e-12);
//! ```

mod grid;

use nalgebra::{Point2, Point3, Vector3};

use crate::mesh::{FaceId, HalfEdgeMesh, MeshIndex};
use grid::{CellGrid, Rect2};

/// Options for intersector construction.
#[derive(Debug, Clone)]
pub struct IntersectorOptions {
    /// Grid resolution along each projected axis.
    pub grid_cells: usize,

    /// Triangles with `|n̂ · d̂|` at or below this are treated as parallel to
    /// the direction and never hit.
    pub coplanar_epsilon: f64,

    /// Directions shorter than this are rejected; every query then misses.
    pub min_direction_norm: f64,
}

impl Default for IntersectorOptions {
    fn default() -> Self {
        Self {
            grid_cells: 200,
            coplanar_epsilon: 1e-8,
            min_direction_norm: 1e-12,
        }
    }
}

impl IntersectorOptions {
    /// Set grid resolution (at least one cell).
    pub fn with_grid_cells(mut self, cells: usize) -> Self {
        self.grid_cells = cells.max(1);
        self
    }

    /// Set the parallel-plane threshold.
    pub fn with_coplanar_epsilon(mut self, epsilon: f64) -> Self {
        self.coplanar_epsilon = epsilon;
        self
    }

    /// Set the minimum accepted direction length.
    pub fn with_min_direction_norm(mut self, norm: f64) -> Self {
        self.min_direction_norm = norm;
        self
    }
}

/// A ray/triangle intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<I: MeshIndex = u32> {
    /// Intersection point on the triangle plane.
    pub point: Point3<f64>,

    /// The triangle hit.
    pub face: FaceId<I>,

    /// Signed offset from the query point along the unit direction.
    /// Negative values lie behind the query point.
    pub distance: f64,
}

/// Projection frame perpendicular to the cast direction.
#[derive(Debug, Clone)]
struct Frame {
    dir: Vector3<f64>,
    u: Vector3<f64>,
    v: Vector3<f64>,
}

impl Frame {
    /// Right-handed frame `(u, v, dir)` for a unit direction.
    fn new(dir: Vector3<f64>) -> Self {
        let axis = if dir.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let u = dir.cross(&axis).normalize();
        let v = dir.cross(&u);
        Self { dir, u, v }
    }

    #[inline]
    fn project(&self, p: &Point3<f64>) -> Point2<f64> {
        Point2::new(self.u.dot(&p.coords), self.v.dot(&p.coords))
    }
}

#[inline]
fn cross2(o: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Side of `p` relative to the edge `a -> b`, positive on the left.
///
/// Evaluated from the lexicographically smaller endpoint, so the two faces
/// sharing an edge get exactly opposite values.
#[inline]
fn edge_side(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> f64 {
    if (a.x, a.y) > (b.x, b.y) {
        -cross2(b, a, p)
    } else {
        cross2(a, b, p)
    }
}

/// Top or left edge of a counter-clockwise triangle.
#[inline]
fn is_top_left(a: &Point2<f64>, b: &Point2<f64>) -> bool {
    (a.y == b.y && b.x < a.x) || b.y < a.y
}

/// Half-open point-in-triangle test.
///
/// Interior points are inside. Points on an edge count only for top and left
/// edges, so a point on an edge or vertex shared by adjacent footprints is
/// claimed by exactly one of them. Degenerate footprints contain nothing.
fn triangle_contains(tri: &[Point2<f64>; 3], p: &Point2<f64>) -> bool {
    let area = cross2(&tri[0], &tri[1], &tri[2]);
    if area == 0.0 || area.is_nan() {
        return false;
    }
    let tri = if area > 0.0 {
        *tri
    } else {
        [tri[0], tri[2], tri[1]]
    };

    (0..3).all(|k| {
        let (a, b) = (&tri[k], &tri[(k + 1) % 3]);
        let side = edge_side(a, b, p);
        side > 0.0 || (side == 0.0 && is_top_left(a, b))
    })
}

/// Directional ray caster over a borrowed mesh.
///
/// Queries take `&self` and allocate only their result, so one intersector
/// can serve many threads.
#[derive(Debug, Clone)]
pub struct Intersector<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    direction: Vector3<f64>,
    frame: Option<Frame>,
    /// Projected vertex positions.
    points: Vec<Point2<f64>>,
    /// Per-face normal divided by `n · d`; `None` when parallel to `d`.
    scaled_normals: Vec<Option<Vector3<f64>>>,
    grid: Option<CellGrid>,
}

impl<'a, I: MeshIndex> Intersector<'a, I> {
    /// Build an intersector with default options.
    pub fn new(mesh: &'a HalfEdgeMesh<I>, direction: Vector3<f64>) -> Self {
        Self::with_options(mesh, direction, &IntersectorOptions::default())
    }

    /// Build an intersector.
    ///
    /// A direction shorter than `options.min_direction_norm` has no
    /// perpendicular plane; it is logged and yields an intersector that never
    /// reports hits.
    pub fn with_options(
        mesh: &'a HalfEdgeMesh<I>,
        direction: Vector3<f64>,
        options: &IntersectorOptions,
    ) -> Self {
        let mut intersector = Self {
            mesh,
            direction,
            frame: None,
            points: Vec::new(),
            scaled_normals: Vec::new(),
            grid: None,
        };

        let Some(dir) = direction.try_normalize(options.min_direction_norm) else {
            log::warn!(
                "intersector direction {:?} is too short, no hits will be reported",
                direction
            );
            return intersector;
        };
        let frame = Frame::new(dir);

        intersector.points = mesh.vertex_ids().map(|v| frame.project(mesh.position(v))).collect();
        intersector.scaled_normals = mesh
            .face_ids()
            .map(|f| {
                let [a, b, c] = mesh.face_positions(f);
                let normal = (b - a).cross(&(c - a)).try_normalize(0.0)?;
                let along = normal.dot(&dir);
                (along.abs() > options.coplanar_epsilon).then(|| normal / along)
            })
            .collect();

        let bounds = Rect2::from_points(&intersector.points);
        if !bounds.is_empty() {
            let mut grid = CellGrid::new(bounds, options.grid_cells);
            for f in mesh.face_ids() {
                if intersector.scaled_normals[f.index()].is_none() {
                    continue;
                }
                let footprint = intersector.footprint(f);
                grid.insert(f.index(), &Rect2::from_points(&footprint));
            }

            log::debug!(
                "intersector: {} faces, {}x{} grid, {} cells occupied",
                mesh.num_faces(),
                options.grid_cells.max(1),
                options.grid_cells.max(1),
                grid.occupied_cells()
            );
            intersector.grid = Some(grid);
        }

        intersector.frame = Some(frame);
        intersector
    }

    /// The direction as given at construction.
    #[inline]
    pub fn direction(&self) -> &Vector3<f64> {
        &self.direction
    }

    /// The mesh being intersected.
    #[inline]
    pub fn mesh(&self) -> &'a HalfEdgeMesh<I> {
        self.mesh
    }

    fn footprint(&self, f: FaceId<I>) -> [Point2<f64>; 3] {
        self.mesh.face_triangle(f).map(|v| self.points[v.index()])
    }

    /// Points where the line through `point` along the direction crosses the
    /// mesh, in no particular order.
    pub fn intersect(&self, point: &Point3<f64>) -> Vec<Point3<f64>> {
        self.intersect_with_faces(point)
            .into_iter()
            .map(|hit| hit.point)
            .collect()
    }

    /// Like [`intersect`](Self::intersect), keeping the face and signed
    /// distance of every crossing.
    ///
    /// The whole line is tested, so crossings behind `point` come back with a
    /// negative distance. A point projecting exactly onto an edge or vertex
    /// shared by adjacent faces is reported once, not once per face.
    pub fn intersect_with_faces(&self, point: &Point3<f64>) -> Vec<Hit<I>> {
        let (Some(frame), Some(grid)) = (&self.frame, &self.grid) else {
            return Vec::new();
        };

        let p = frame.project(point);
        if !grid.bounds().contains(&p) {
            return Vec::new();
        }

        grid.candidates(&p)
            .iter()
            .filter_map(|&fi| {
                let f = FaceId::new(fi);
                let scaled = self.scaled_normals[fi]?;
                if !triangle_contains(&self.footprint(f), &p) {
                    return None;
                }

                let corner = self.mesh.position(self.mesh.face_triangle(f)[0]);
                let distance = scaled.dot(&(corner - point));
                Some(Hit {
                    point: point + frame.dir * distance,
                    face: f,
                    distance,
                })
            })
            .collect()
    }

    /// Hits ordered front to back along the direction.
    pub fn sorted_hits(&self, point: &Point3<f64>) -> Vec<Hit<I>> {
        let mut hits = self.intersect_with_faces(point);
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
