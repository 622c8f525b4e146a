//! Crop masking by even-odd point-in-polygon testing.

use heatmap_common::{Bounds, Polygon};

/// Even-odd (ray casting) test: a horizontal ray from `(x, y)` crosses the
/// polygon's edges an odd number of times iff the point is inside.
///
/// Orientation and starting vertex do not affect the result.
pub fn point_in_polygon(polygon: &Polygon, x: f64, y: f64) -> bool {
    let mut inside = false;
    for ([xi, yi], [xj, yj]) in polygon.edges() {
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
    }
    inside
}

/// A crop polygon with its bounding box cached for early rejection.
#[derive(Debug, Clone)]
pub struct PolygonMask {
    polygon: Polygon,
    bounds: Option<Bounds>,
}

impl PolygonMask {
    pub fn new(polygon: Polygon) -> Self {
        let bounds = polygon.bounds();
        Self { polygon, bounds }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        match self.bounds {
            Some(b) if x >= b.min_x && x <= b.max_x && y >= b.min_y && y <= b.max_y => {
                point_in_polygon(&self.polygon, x, y)
            }
            _ => false,
        }
    }

    /// Whether the bounding box intersects a `width` x `height` raster.
    pub fn overlaps_raster(&self, width: u32, height: u32) -> bool {
        self.bounds.map_or(false, |b| {
            b.max_x >= 0.0 && b.max_y >= 0.0 && b.min_x <= width as f64 && b.min_y <= height as f64
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Polygon {
        Polygon::new(vec![[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]])
    }

    #[test]
    fn test_triangle() {
        let t = triangle();
        assert!(point_in_polygon(&t, 2.0, 2.0));
        assert!(!point_in_polygon(&t, 8.0, 8.0));
        assert!(!point_in_polygon(&t, -1.0, 2.0));
    }

    #[test]
    fn test_concave() {
        // U shape open at the top
        let u = Polygon::new(vec![
            [0.0, 0.0],
            [3.0, 0.0],
            [3.0, 10.0],
            [7.0, 10.0],
            [7.0, 0.0],
            [10.0, 0.0],
            [10.0, 12.0],
            [0.0, 12.0],
        ]);
        assert!(point_in_polygon(&u, 1.5, 5.0));
        assert!(!point_in_polygon(&u, 5.0, 5.0));
        assert!(point_in_polygon(&u, 5.0, 11.0));
    }

    #[test]
    fn test_mask_rejects_outside_bounds() {
        let mask = PolygonMask::new(triangle());
        assert!(mask.contains(1.0, 1.0));
        assert!(!mask.contains(20.0, 1.0));
        assert!(mask.overlaps_raster(5, 5));
        assert!(!PolygonMask::new(Polygon::default()).contains(0.0, 0.0));
    }
}
