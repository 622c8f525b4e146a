//! Plate carrée framing of a geographic polygon onto a pixel grid.
//!
//! Longitude and latitude share one scale (pixels per degree), so the raster
//! keeps the polygon's aspect ratio in degrees. The vertical axis is flipped:
//! north maps to smaller pixel rows.

use heatmap_common::{GeoCoord, GeoPoint, HeatmapError, HeatmapResult, Polygon, SamplePoint};

use crate::haversine::meters_per_degree_lat;

/// Slack absorbed before rounding a scaled extent up, so that
/// `extent * (width / extent)` never rounds to `width + 1`.
const CEIL_TOLERANCE: f64 = 1e-9;

/// How the raster size is chosen.
///
/// Exactly one of `px_per_degree` or (`width` and/or `height`) must be set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sizing {
    pub px_per_degree: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Sizing {
    pub fn px_per_degree(scale: f64) -> Self {
        Self {
            px_per_degree: Some(scale),
            ..Self::default()
        }
    }

    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    pub fn height(height: u32) -> Self {
        Self {
            height: Some(height),
            ..Self::default()
        }
    }

    /// Fit inside `width` x `height`, padding the short side.
    pub fn fit(width: u32, height: u32) -> Self {
        Self {
            px_per_degree: None,
            width: Some(width),
            height: Some(height),
        }
    }

    /// Check the directive combination before any projection.
    pub fn validate(&self) -> HeatmapResult<()> {
        match (self.px_per_degree, self.width, self.height) {
            (None, None, None) => Err(HeatmapError::configuration(
                "provide one of: pxPerDegree, width or height",
            )),
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(HeatmapError::configuration(
                "provide either pxPerDegree or width and/or height, not both",
            )),
            (Some(scale), None, None) if !(scale.is_finite() && scale > 0.0) => Err(
                HeatmapError::configuration(format!("pxPerDegree must be positive, got {}", scale)),
            ),
            (_, Some(0), _) => Err(HeatmapError::configuration("width must be positive")),
            (_, _, Some(0)) => Err(HeatmapError::configuration("height must be positive")),
            _ => Ok(()),
        }
    }
}

/// The frame derived from a polygon and a sizing directive.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoProjector {
    /// `[min lng, min lat]`
    pub origin: [f64; 2],
    /// `[max lng, max lat]`
    pub end: [f64; 2],
    /// Pixels per degree, shared by both axes.
    pub scale: f64,
    pub width: u32,
    pub height: u32,
    /// Rows of padding below the polygon when the raster was grown to a
    /// requested height.
    pub offset: u32,
    /// Length of one degree of latitude at the polygon's centre.
    pub meters_per_degree: f64,
}

impl GeoProjector {
    /// Frame `polygon` according to `sizing`.
    ///
    /// # Errors
    /// `Configuration` for an invalid sizing combination, fewer than two
    /// vertices, a polygon with zero extent on either axis, or a scaled
    /// extent that does not fit a `u32`. Two vertices
    /// frame a bounding box; cropping needs three.
    pub fn new(polygon: &[GeoCoord], sizing: Sizing) -> HeatmapResult<Self> {
        sizing.validate()?;
        if polygon.len() < 2 {
            return Err(HeatmapError::configuration(format!(
                "framing needs at least 2 geographic vertices, got {}",
                polygon.len()
            )));
        }

        let (min_lng, max_lng) = min_max(polygon.iter().map(|c| c.lng));
        let (min_lat, max_lat) = min_max(polygon.iter().map(|c| c.lat));
        let extent_lng = max_lng - min_lng;
        let extent_lat = max_lat - min_lat;
        if !(extent_lng > 0.0 && extent_lat > 0.0) {
            return Err(HeatmapError::configuration(
                "polygon has zero extent in longitude or latitude",
            ));
        }

        let scale = match (sizing.px_per_degree, sizing.width, sizing.height) {
            (Some(scale), _, _) => scale,
            (None, Some(w), Some(h)) => (w as f64 / extent_lng).min(h as f64 / extent_lat),
            (None, Some(w), None) => w as f64 / extent_lng,
            (None, None, Some(h)) => h as f64 / extent_lat,
            (None, None, None) => {
                return Err(HeatmapError::configuration("no sizing directive"));
            }
        };

        let raw_width = scaled_ceil(extent_lng * scale, "width")?;
        let raw_height = scaled_ceil(extent_lat * scale, "height")?;

        let (width, height, offset) = match (sizing.px_per_degree, sizing.width, sizing.height) {
            (None, Some(w), Some(h)) => (
                raw_width.max(w),
                raw_height.max(h),
                h.saturating_sub(raw_height),
            ),
            _ => (raw_width, raw_height, 0),
        };

        let projector = Self {
            origin: [min_lng, min_lat],
            end: [max_lng, max_lat],
            scale,
            width,
            height,
            offset,
            meters_per_degree: meters_per_degree_lat((min_lat + max_lat) / 2.0),
        };

        tracing::debug!(
            scale = projector.scale,
            width = projector.width,
            height = projector.height,
            offset = projector.offset,
            origin_lng = min_lng,
            origin_lat = min_lat,
            "framed geographic polygon"
        );

        Ok(projector)
    }

    /// Pixel coordinates of a geographic coordinate.
    #[inline]
    pub fn project(&self, coord: GeoCoord) -> [f64; 2] {
        [
            (coord.lng - self.origin[0]) * self.scale,
            self.height as f64 - (coord.lat - self.origin[1]) * self.scale - self.offset as f64,
        ]
    }

    /// Convert a real-world distance into pixels along the latitude axis.
    pub fn meters_to_pixels(&self, meters: f64) -> f64 {
        meters / self.meters_per_degree * self.scale
    }

    /// Project a geographic sample; `radius_meters` becomes the point's
    /// pixel `radius` and `sigma`.
    pub fn project_point(&self, point: &GeoPoint) -> SamplePoint {
        let [px, py] = self.project(point.coord());
        let mut params = point.params;
        if let Some(meters) = point.radius_meters {
            let pixels = self.meters_to_pixels(meters);
            params.radius = Some(pixels);
            params.sigma = Some(pixels);
        }
        SamplePoint {
            px,
            py,
            value: point.value,
            params,
        }
    }

    pub fn project_polygon(&self, polygon: &[GeoCoord]) -> Polygon {
        Polygon::new(polygon.iter().map(|c| self.project(*c)).collect())
    }
}

/// A polygon and its points, projected into pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub frame: GeoProjector,
    pub polygon: Polygon,
    pub points: Vec<SamplePoint>,
}

/// Frame `polygon` and project it together with `points`.
pub fn project(polygon: &[GeoCoord], points: &[GeoPoint], sizing: Sizing) -> HeatmapResult<Projection> {
    let frame = GeoProjector::new(polygon, sizing)?;
    let projected_polygon = frame.project_polygon(polygon);
    let projected_points = points.iter().map(|p| frame.project_point(p)).collect();
    Ok(Projection {
        frame,
        polygon: projected_polygon,
        points: projected_points,
    })
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn scaled_ceil(extent: f64, axis: &str) -> HeatmapResult<u32> {
    let pixels = (extent - CEIL_TOLERANCE).ceil().max(1.0);
    if !pixels.is_finite() || pixels > u32::MAX as f64 {
        return Err(HeatmapError::configuration(format!(
            "projected {} of {} pixels is out of range",
            axis, extent
        )));
    }
    Ok(pixels as u32)
}
