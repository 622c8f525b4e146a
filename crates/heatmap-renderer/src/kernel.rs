//! Distance-decay kernels.
//!
//! Each kernel maps a pixel-to-point distance onto a dimensionless weight,
//! 1 at the point for every kernel except `SigmoidBorder`.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use heatmap_common::{HeatmapError, KernelParams};

/// Kernel parameters with every default applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedParams {
    pub radius: f64,
    pub sigma: f64,
    pub epsilon: f64,
    pub degree: f64,
    pub omega: f64,
    pub phase: f64,
}

impl Default for ResolvedParams {
    fn default() -> Self {
        Self {
            radius: 10.0,
            sigma: 10.0,
            epsilon: 0.05,
            degree: 2.0,
            omega: 1.0,
            phase: 0.0,
        }
    }
}

/// The closed set of kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    /// exp(-(d/σ)²)
    Gaussian,
    /// exp(-d·ε)
    Exponential,
    /// 1 / (1 + d·ε)
    Linear,
    /// 1 / (1 + (d·ε)^n)
    Polynomial,
    /// 1 / sqrt(1 + (d·ε)²)
    InverseMultiquadratic,
    /// (1 + cos(d·ω·π/180 + φ)) / 2
    Cosine,
    /// cosine · exponential
    DampedCosine,
    /// 1 inside the radius, 0 outside
    Step,
    /// Smooth compactly supported bump
    Bump,
    /// (1 + σ) / (1 + exp(ε·(d - r)))
    SigmoidBorder,
}

impl Kernel {
    pub const ALL: [Kernel; 10] = [
        Kernel::Gaussian,
        Kernel::Exponential,
        Kernel::Linear,
        Kernel::Polynomial,
        Kernel::InverseMultiquadratic,
        Kernel::Cosine,
        Kernel::DampedCosine,
        Kernel::Step,
        Kernel::Bump,
        Kernel::SigmoidBorder,
    ];

    /// Registry name.
    pub fn name(&self) -> &'static str {
        match self {
            Kernel::Gaussian => "gaussian",
            Kernel::Exponential => "exponential",
            Kernel::Linear => "linear",
            Kernel::Polynomial => "polynomial",
            Kernel::InverseMultiquadratic => "inverseMultiquadratic",
            Kernel::Cosine => "cosine",
            Kernel::DampedCosine => "dampedCosine",
            Kernel::Step => "step",
            Kernel::Bump => "bump",
            Kernel::SigmoidBorder => "sigmoidBorder",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Kernel::name).collect()
    }

    /// Parameters used when neither the point nor the render overrides them.
    pub fn base_params(&self) -> ResolvedParams {
        match self {
            // σ is an overshoot factor here, not a width.
            Kernel::SigmoidBorder => ResolvedParams {
                sigma: 0.0,
                ..ResolvedParams::default()
            },
            _ => ResolvedParams::default(),
        }
    }

    /// Weight at distance `d` (pixels).
    #[inline]
    pub fn evaluate(&self, d: f64, p: &ResolvedParams) -> f64 {
        match self {
            Kernel::Gaussian => gaussian(d, p.sigma),
            Kernel::Exponential => exponential(d, p.epsilon),
            Kernel::Linear => polynomial(d, p.epsilon, 1.0),
            Kernel::Polynomial => polynomial(d, p.epsilon, p.degree),
            Kernel::InverseMultiquadratic => 1.0 / (1.0 + (d * p.epsilon).powi(2)).sqrt(),
            Kernel::Cosine => cosine(d, p.omega, p.phase),
            Kernel::DampedCosine => cosine(d, p.omega, p.phase) * exponential(d, p.epsilon),
            Kernel::Step => {
                if d < p.radius {
                    1.0
                } else {
                    0.0
                }
            }
            Kernel::Bump => bump(d, p.radius),
            Kernel::SigmoidBorder => (1.0 + p.sigma) / (1.0 + (p.epsilon * (d - p.radius)).exp()),
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kernel {
    type Err = HeatmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inverseLinear" => return Ok(Kernel::Linear),
            "inversePolynomial" => return Ok(Kernel::Polynomial),
            _ => {}
        }
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| HeatmapError::unknown_kernel(s, &Self::names()))
    }
}

/// Render-wide fallbacks for kernel parameters.
///
/// Resolution order for each field: the point's own value, then the
/// render override, then the kernel's base default.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KernelDefaults {
    overrides: KernelParams,
}

impl KernelDefaults {
    pub fn new(overrides: KernelParams) -> Self {
        Self { overrides }
    }

    pub fn resolve(&self, kernel: Kernel, params: &KernelParams) -> ResolvedParams {
        let base = kernel.base_params();
        let merged = params.or(self.overrides);
        ResolvedParams {
            radius: merged.radius.unwrap_or(base.radius),
            sigma: merged.sigma.unwrap_or(base.sigma),
            epsilon: merged.epsilon.unwrap_or(base.epsilon),
            degree: merged.degree.unwrap_or(base.degree),
            omega: merged.omega.unwrap_or(base.omega),
            phase: merged.phase.unwrap_or(base.phase),
        }
    }
}

#[inline]
fn gaussian(d: f64, sigma: f64) -> f64 {
    if sigma <= 0.0 {
        return if d == 0.0 { 1.0 } else { 0.0 };
    }
    (-(d / sigma).powi(2)).exp()
}

#[inline]
fn exponential(d: f64, epsilon: f64) -> f64 {
    (-d * epsilon).exp()
}

#[inline]
fn polynomial(d: f64, epsilon: f64, degree: f64) -> f64 {
    1.0 / (1.0 + (d * epsilon).powf(degree))
}

#[inline]
fn cosine(d: f64, omega: f64, phase: f64) -> f64 {
    (1.0 + (d * omega * PI / 180.0 + phase).cos()) / 2.0
}

#[inline]
fn bump(d: f64, radius: f64) -> f64 {
    if d >= radius {
        return 0.0;
    }
    if d == 0.0 {
        return 1.0;
    }
    (1.0 / (1.0 - 1.0 / (d / radius).powi(2))).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for kernel in Kernel::ALL {
            assert_eq!(kernel.name().parse::<Kernel>().unwrap(), kernel);
        }
    }

    #[test]
    fn test_legacy_aliases() {
        assert_eq!("inverseLinear".parse::<Kernel>().unwrap(), Kernel::Linear);
        assert_eq!("inversePolynomial".parse::<Kernel>().unwrap(), Kernel::Polynomial);
    }

    #[test]
    fn test_unknown_kernel() {
        let err = "geoGaussian".parse::<Kernel>().unwrap_err();
        match err {
            HeatmapError::UnknownKernel { name, valid } => {
                assert_eq!(name, "geoGaussian");
                assert!(valid.contains("gaussian"));
                assert!(valid.contains("sigmoidBorder"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolution_order() {
        let defaults = KernelDefaults::new(KernelParams::default().with_epsilon(0.5));
        let point = KernelParams::default().with_sigma(30.0);
        let p = defaults.resolve(Kernel::Gaussian, &point);
        assert_eq!(p.sigma, 30.0);
        assert_eq!(p.epsilon, 0.5);
        assert_eq!(p.radius, 10.0);
    }

    #[test]
    fn test_sigmoid_border_base_sigma() {
        let p = KernelDefaults::default().resolve(Kernel::SigmoidBorder, &KernelParams::default());
        assert_eq!(p.sigma, 0.0);
    }

    #[test]
    fn test_bump_edges() {
        let p = ResolvedParams::default();
        assert_eq!(Kernel::Bump.evaluate(0.0, &p), 1.0);
        assert_eq!(Kernel::Bump.evaluate(p.radius, &p), 0.0);
        let mid = Kernel::Bump.evaluate(p.radius / 2.0, &p);
        // exp(1 / (1 - 4)) = exp(-1/3)
        assert!((mid - (-1.0f64 / 3.0).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_gaussian() {
        let p = ResolvedParams {
            sigma: 0.0,
            ..ResolvedParams::default()
        };
        assert_eq!(Kernel::Gaussian.evaluate(0.0, &p), 1.0);
        assert_eq!(Kernel::Gaussian.evaluate(1.0, &p), 0.0);
    }
}
