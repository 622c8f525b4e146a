//! Sample points and their kernel parameters.

use serde::{Deserialize, Serialize};

/// Kernel shape parameters attached to a sample point.
///
/// Every field is optional; missing values fall back to the kernel
/// defaults resolved once per render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KernelParams {
    /// Cut-off distance in pixels (step, bump, sigmoidBorder).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Gaussian width in pixels, or the overshoot factor of sigmoidBorder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigma: Option<f64>,
    /// Decay rate per pixel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<f64>,
    /// Polynomial exponent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<f64>,
    /// Angular frequency in degrees per pixel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omega: Option<f64>,
    /// Phase offset in radians.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<f64>,
}

impl KernelParams {
    /// Fill every missing field from `fallback`.
    pub fn or(self, fallback: KernelParams) -> KernelParams {
        KernelParams {
            radius: self.radius.or(fallback.radius),
            sigma: self.sigma.or(fallback.sigma),
            epsilon: self.epsilon.or(fallback.epsilon),
            degree: self.degree.or(fallback.degree),
            omega: self.omega.or(fallback.omega),
            phase: self.phase.or(fallback.phase),
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = Some(sigma);
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub fn with_degree(mut self, degree: f64) -> Self {
        self.degree = Some(degree);
        self
    }
}

/// A weighted sample located in pixel space.
///
/// `py` grows downwards, as in the output raster.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SamplePoint {
    pub px: f64,
    pub py: f64,
    pub value: f64,
    #[serde(flatten)]
    pub params: KernelParams,
}

impl SamplePoint {
    pub fn new(px: f64, py: f64, value: f64) -> Self {
        Self {
            px,
            py,
            value,
            params: KernelParams::default(),
        }
    }

    pub fn with_params(mut self, params: KernelParams) -> Self {
        self.params = params;
        self
    }

    /// Euclidean distance from pixel coordinates `(x, y)`.
    #[inline]
    pub fn distance(&self, x: f64, y: f64) -> f64 {
        ((x - self.px).powi(2) + (y - self.py).powi(2)).sqrt()
    }
}

/// A geographic vertex in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GeoCoord {
    pub lat: f64,
    pub lng: f64,
}

impl GeoCoord {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A weighted sample located in geographic space.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    pub value: f64,
    /// Real-world reach of the point; overrides `radius` and `sigma`
    /// once converted to pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<f64>,
    #[serde(flatten)]
    pub params: KernelParams,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64, value: f64) -> Self {
        Self {
            lat,
            lng,
            value,
            radius_meters: None,
            params: KernelParams::default(),
        }
    }

    pub fn with_radius_meters(mut self, meters: f64) -> Self {
        self.radius_meters = Some(meters);
        self
    }

    pub fn coord(&self) -> GeoCoord {
        GeoCoord::new(self.lat, self.lng)
    }
}
