//! Boundary polygons.

use serde::{Deserialize, Serialize};

/// Axis-aligned extent of a vertex set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Closed polygon in pixel space; the last vertex connects to the first.
///
/// Self-intersection is not checked.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Polygon {
    pub vertices: Vec<[f64; 2]>,
}

impl Polygon {
    pub fn new(vertices: Vec<[f64; 2]>) -> Self {
        Self { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Enough vertices to enclose an area.
    pub fn is_closed_area(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Extent of the vertices, `None` for an empty polygon.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.vertices.first()?;
        let init = Bounds {
            min_x: first[0],
            min_y: first[1],
            max_x: first[0],
            max_y: first[1],
        };
        Some(self.vertices.iter().fold(init, |b, v| Bounds {
            min_x: b.min_x.min(v[0]),
            min_y: b.min_y.min(v[1]),
            max_x: b.max_x.max(v[0]),
            max_y: b.max_y.max(v[1]),
        }))
    }

    /// Edges as `(start, end)` pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = ([f64; 2], [f64; 2])> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

impl From<Vec<[f64; 2]>> for Polygon {
    fn from(vertices: Vec<[f64; 2]>) -> Self {
        Self::new(vertices)
    }
}
