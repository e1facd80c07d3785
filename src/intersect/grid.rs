//! Uniform 2D bucket grid.

use nalgebra::{Point2, Vector2};

/// Axis-aligned rectangle in the projection plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rect2 {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Rect2 {
    /// An empty rectangle; extending it by a point yields that point.
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::INFINITY, f64::INFINITY),
            max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points<'p>(points: impl IntoIterator<Item = &'p Point2<f64>>) -> Self {
        points.into_iter().fold(Self::empty(), |mut rect, p| {
            rect.extend(p);
            rect
        })
    }

    pub fn extend(&mut self, p: &Point2<f64>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn size(&self) -> Vector2<f64> {
        self.max - self.min
    }

    /// Closed containment test.
    pub fn contains(&self, p: &Point2<f64>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Square grid of `cells × cells` buckets over a rectangle.
///
/// Items are registered by their bounding rectangle and may land in several
/// buckets. Lookups outside the rectangle clamp to the border cells.
#[derive(Debug, Clone)]
pub(crate) struct CellGrid {
    bounds: Rect2,
    cells: usize,
    buckets: Vec<Vec<usize>>,
}

impl CellGrid {
    pub fn new(bounds: Rect2, cells: usize) -> Self {
        let cells = cells.max(1);
        Self {
            bounds,
            cells,
            buckets: vec![Vec::new(); cells * cells],
        }
    }

    pub fn bounds(&self) -> &Rect2 {
        &self.bounds
    }

    fn axis_cell(&self, value: f64, min: f64, extent: f64) -> usize {
        if extent <= 0.0 {
            return 0;
        }
        let cell = ((value - min) / extent * self.cells as f64).floor();
        // Negative and NaN both clamp to zero through the cast.
        (cell as usize).min(self.cells - 1)
    }

    pub fn cell_of(&self, p: &Point2<f64>) -> (usize, usize) {
        let size = self.bounds.size();
        (
            self.axis_cell(p.x, self.bounds.min.x, size.x),
            self.axis_cell(p.y, self.bounds.min.y, size.y),
        )
    }

    pub fn insert(&mut self, item: usize, extent: &Rect2) {
        let (x0, y0) = self.cell_of(&extent.min);
        let (x1, y1) = self.cell_of(&extent.max);
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.buckets[y * self.cells + x].push(item);
            }
        }
    }

    pub fn candidates(&self, p: &Point2<f64>) -> &[usize] {
        let (x, y) = self.cell_of(p);
        &self.buckets[y * self.cells + x]
    }

    pub fn occupied_cells(&self) -> usize {
        self.buckets.iter().filter(|b| !b.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_grid(cells: usize) -> CellGrid {
        let bounds = Rect2::from_points(&[Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]);
        CellGrid::new(bounds, cells)
    }

    #[test]
    fn test_rect_extend() {
        let rect = Rect2::from_points(&[
            Point2::new(1.0, -2.0),
            Point2::new(-1.0, 3.0),
            Point2::new(0.5, 0.5),
        ]);
        assert_eq!(rect.min, Point2::new(-1.0, -2.0));
        assert_eq!(rect.max, Point2::new(1.0, 3.0));
        assert!(rect.contains(&Point2::new(1.0, 3.0)));
        assert!(!rect.contains(&Point2::new(1.1, 0.0)));
        assert!(Rect2::empty().is_empty());
    }

    #[test]
    fn test_cell_clamping() {
        let grid = unit_grid(4);
        assert_eq!(grid.cell_of(&Point2::new(0.0, 0.0)), (0, 0));
        assert_eq!(grid.cell_of(&Point2::new(1.0, 1.0)), (3, 3));
        assert_eq!(grid.cell_of(&Point2::new(0.3, 0.6)), (1, 2));
        assert_eq!(grid.cell_of(&Point2::new(-5.0, 7.0)), (0, 3));
    }

    #[test]
    fn test_insert_spans_cells() {
        let mut grid = unit_grid(4);
        let extent = Rect2::from_points(&[Point2::new(0.1, 0.1), Point2::new(0.6, 0.3)]);
        grid.insert(7, &extent);

        assert_eq!(grid.occupied_cells(), 6);
        assert_eq!(grid.candidates(&Point2::new(0.55, 0.28)), &[7]);
        assert!(grid.candidates(&Point2::new(0.9, 0.9)).is_empty());
    }

    #[test]
    fn test_degenerate_bounds() {
        let bounds = Rect2::from_points(&[Point2::new(2.0, 0.0), Point2::new(2.0, 1.0)]);
        let mut grid = CellGrid::new(bounds, 8);
        grid.insert(0, &bounds);
        assert_eq!(grid.candidates(&Point2::new(2.0, 0.5)), &[0]);
        assert_eq!(CellGrid::new(bounds, 0).cells, 1);
    }
}
