//! Aggregation methods: combine every point's weighted contribution at a
//! pixel into one intensity.

use std::fmt;
use std::str::FromStr;

use heatmap_common::HeatmapError;

use crate::kernel::{Kernel, ResolvedParams};

/// One point as seen from one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub value: f64,
    /// Primary kernel weight.
    pub weight: f64,
    pub distance: f64,
}

impl Contribution {
    pub fn new(value: f64, weight: f64, distance: f64) -> Self {
        Self {
            value,
            weight,
            distance,
        }
    }

    #[inline]
    fn weighted(&self) -> f64 {
        self.value * self.weight
    }
}

/// Intensity produced for one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregate {
    Scalar(f64),
    /// Intensity plus data coverage in [0, 1], rendered as alpha.
    WithConfidence { value: f64, confidence: f64 },
}

impl Aggregate {
    pub fn value(&self) -> f64 {
        match *self {
            Aggregate::Scalar(v) => v,
            Aggregate::WithConfidence { value, .. } => value,
        }
    }
}

/// Registry names of the aggregation methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Sum,
    Max,
    Nearest,
    Shepards,
    AlphaShepards,
}

impl MethodKind {
    pub const ALL: [MethodKind; 5] = [
        MethodKind::Sum,
        MethodKind::Max,
        MethodKind::Nearest,
        MethodKind::Shepards,
        MethodKind::AlphaShepards,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MethodKind::Sum => "sum",
            MethodKind::Max => "max",
            MethodKind::Nearest => "nearest",
            MethodKind::Shepards => "shepards",
            MethodKind::AlphaShepards => "alphaShepards",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(MethodKind::name).collect()
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MethodKind {
    type Err = HeatmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or_else(|| HeatmapError::unknown_method(s, &Self::names()))
    }
}

/// Distance weighting used by Shepard's methods, independent of the
/// primary kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InnerKernel {
    pub kernel: Kernel,
    pub params: ResolvedParams,
}

impl InnerKernel {
    #[inline]
    pub fn weight(&self, distance: f64) -> f64 {
        self.kernel.evaluate(distance, &self.params)
    }
}

/// A fully configured aggregation method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    Sum { clamp: bool },
    Max,
    Nearest,
    Shepards(InnerKernel),
    /// Shepard's value plus the inner-weighted mean of the primary weights
    /// as confidence.
    AlphaShepards(InnerKernel),
}

impl Method {
    pub fn kind(&self) -> MethodKind {
        match self {
            Method::Sum { .. } => MethodKind::Sum,
            Method::Max => MethodKind::Max,
            Method::Nearest => MethodKind::Nearest,
            Method::Shepards(_) => MethodKind::Shepards,
            Method::AlphaShepards(_) => MethodKind::AlphaShepards,
        }
    }

    /// Whether the method yields a confidence channel.
    pub fn has_confidence(&self) -> bool {
        matches!(self, Method::AlphaShepards(_))
    }

    /// Combine one pixel's contributions. An empty slice yields zero
    /// intensity (and zero confidence).
    pub fn aggregate(&self, contributions: &[Contribution]) -> Aggregate {
        match self {
            Method::Sum { clamp } => {
                let total: f64 = contributions.iter().map(Contribution::weighted).sum();
                Aggregate::Scalar(if *clamp { total.clamp(0.0, 1.0) } else { total })
            }
            Method::Max => Aggregate::Scalar(
                contributions
                    .iter()
                    .filter(|c| c.weight > 0.0)
                    .map(Contribution::weighted)
                    .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
                    .unwrap_or(0.0),
            ),
            Method::Nearest => {
                let mut nearest: Option<&Contribution> = None;
                for c in contributions.iter().filter(|c| c.weight > 0.0) {
                    // Strict comparison: the first point at the minimum wins.
                    if nearest.map_or(true, |n| c.distance < n.distance) {
                        nearest = Some(c);
                    }
                }
                Aggregate::Scalar(nearest.map_or(0.0, Contribution::weighted))
            }
            Method::Shepards(inner) => Aggregate::Scalar(shepards(inner, contributions).0),
            Method::AlphaShepards(inner) => {
                let (value, coverage, den) = shepards(inner, contributions);
                Aggregate::WithConfidence {
                    value,
                    confidence: if den > 0.0 { coverage / den } else { 0.0 },
                }
            }
        }
    }
}

/// Shepard's value `Σ(v·w·iw) / Σiw` together with the accumulated
/// primary coverage `Σ(w·iw)` and the normaliser `Σiw`.
fn shepards(inner: &InnerKernel, contributions: &[Contribution]) -> (f64, f64, f64) {
    let (mut num, mut coverage, mut den) = (0.0, 0.0, 0.0);
    for c in contributions {
        let iw = inner.weight(c.distance);
        num += c.weighted() * iw;
        coverage += c.weight * iw;
        den += iw;
    }
    let value = if den > 0.0 { num / den } else { 0.0 };
    (value, coverage, den)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inner() -> InnerKernel {
        InnerKernel {
            kernel: Kernel::Polynomial,
            params: ResolvedParams {
                degree: 3.0,
                ..ResolvedParams::default()
            },
        }
    }

    #[test]
    fn test_sum_and_clamp() {
        let cs = [Contribution::new(0.8, 1.0, 1.0), Contribution::new(0.6, 0.5, 2.0)];
        assert!((Method::Sum { clamp: false }.aggregate(&cs).value() - 1.1).abs() < 1e-12);
        assert_eq!(Method::Sum { clamp: true }.aggregate(&cs).value(), 1.0);
    }

    #[test]
    fn test_max_ignores_zero_weights() {
        let cs = [Contribution::new(-1.0, 0.0, 1.0), Contribution::new(-0.5, 1.0, 2.0)];
        assert_eq!(Method::Max.aggregate(&cs).value(), -0.5);
        assert_eq!(Method::Max.aggregate(&[]).value(), 0.0);
    }

    #[test]
    fn test_nearest_first_minimum_wins() {
        let cs = [
            Contribution::new(0.2, 1.0, 5.0),
            Contribution::new(0.4, 1.0, 3.0),
            Contribution::new(0.9, 1.0, 3.0),
            Contribution::new(1.0, 0.0, 1.0),
        ];
        assert_eq!(Method::Nearest.aggregate(&cs).value(), 0.4);
    }

    #[test]
    fn test_shepards_single_point() {
        let cs = [Contribution::new(0.7, 0.5, 12.0)];
        assert!((Method::Shepards(inner()).aggregate(&cs).value() - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_shepards_zero_inner_weight() {
        let step = InnerKernel {
            kernel: Kernel::Step,
            params: ResolvedParams::default(),
        };
        let cs = [Contribution::new(1.0, 1.0, 100.0)];
        assert_eq!(Method::Shepards(step).aggregate(&cs).value(), 0.0);
        assert_eq!(Method::Shepards(step).aggregate(&[]).value(), 0.0);
    }

    #[test]
    fn test_alpha_shepards_channels() {
        let cs = [Contribution::new(0.8, 0.25, 4.0)];
        match Method::AlphaShepards(inner()).aggregate(&cs) {
            Aggregate::WithConfidence { value, confidence } => {
                assert!((value - 0.2).abs() < 1e-12);
                assert!((confidence - 0.25).abs() < 1e-12);
            }
            other => panic!("expected confidence channel, got {:?}", other),
        }
        assert_eq!(
            Method::AlphaShepards(inner()).aggregate(&[]),
            Aggregate::WithConfidence {
                value: 0.0,
                confidence: 0.0
            }
        );
    }

    #[test]
    fn test_alpha_shepards_value_matches_shepards() {
        let cs = [
            Contribution::new(0.8, 0.25, 4.0),
            Contribution::new(0.3, 0.9, 10.0),
        ];
        let shepards = Method::Shepards(inner()).aggregate(&cs).value();
        let alpha = Method::AlphaShepards(inner()).aggregate(&cs).value();
        assert!((alpha - shepards).abs() < 1e-12);
    }

    #[test]
    fn test_method_names() {
        for kind in MethodKind::ALL {
            assert_eq!(kind.name().parse::<MethodKind>().unwrap(), kind);
        }
        assert!(matches!(
            "idw".parse::<MethodKind>(),
            Err(HeatmapError::UnknownMethod { .. })
        ));
    }
}
