//! Colormap construction and lookup.
//!
//! A colormap is a dense table built from a list of colour stops. Each pair
//! of adjacent stops is interpolated in HSLuv along the shortest hue arc,
//! with lightness and saturation blended linearly, so transitions keep
//! their perceived brightness instead of going muddy through RGB.

use heatmap_common::{HeatmapError, HeatmapResult};

use crate::hsluv::{hsluv_to_rgb, rgb_to_hsluv};
use crate::style::hex_to_rgb;

pub type Rgb = [u8; 3];

/// Resolution used by every preset.
pub const DEFAULT_STEPS: usize = 255;

/// Preset registry: name, hex stops, optional segment weights.
const PRESETS: &[(&str, &[&str], Option<&[f64]>)] = &[
    (
        "default",
        &["#FEFFFE", "#00FF00", "#FFFF00", "#FF0000"],
        Some(&[3.0, 4.0, 3.0]),
    ),
    ("teelights", &["#00FF00", "#FFFF00", "#FF0000"], None),
    (
        "jet",
        &[
            "#00007F", "#0000FF", "#007FFF", "#00FFFF", "#7FFF7F", "#FFFF00", "#FF7F00", "#FF0000",
            "#7F0000",
        ],
        None,
    ),
    (
        "parula",
        &[
            "#352A87", "#0F5CDD", "#1481D6", "#06A4CA", "#2EB7A4", "#87BF77", "#D1BB59", "#FEC832",
            "#F9FB0E",
        ],
        None,
    ),
    ("gray", &["#000000", "#FFFFFF"], None),
    (
        "magma",
        &["#000004", "#3B0F70", "#8C2981", "#DE4968", "#FE9F6D", "#FCFDBF"],
        None,
    ),
    (
        "plasma",
        &["#0D0887", "#6A00A8", "#B12A90", "#E16462", "#FCA636", "#F0F921"],
        None,
    ),
    (
        "inferno",
        &["#000004", "#420A68", "#932667", "#DD513A", "#FCA50A", "#FCFFA4"],
        None,
    ),
    (
        "viridis",
        &["#440154", "#414487", "#2A788E", "#22A884", "#7AD151", "#FDE725"],
        None,
    ),
];

/// Names accepted by [`ColorStops::preset`].
pub fn preset_names() -> Vec<&'static str> {
    PRESETS.iter().map(|(name, _, _)| *name).collect()
}

/// Ordered colour stops with optional per-segment weights.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStops {
    pub colors: Vec<Rgb>,
    /// One weight per segment (`colors.len() - 1`); uniform when `None`.
    pub weights: Option<Vec<f64>>,
    /// Requested table resolution.
    pub steps: usize,
}

impl ColorStops {
    pub fn new(colors: Vec<Rgb>, steps: usize) -> Self {
        Self {
            colors,
            weights: None,
            steps,
        }
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Parse `#RRGGBB` stops.
    pub fn from_hex<S: AsRef<str>>(
        values: &[S],
        weights: Option<Vec<f64>>,
        steps: usize,
    ) -> HeatmapResult<Self> {
        let colors = values
            .iter()
            .map(|v| {
                hex_to_rgb(v.as_ref()).map(|(r, g, b)| [r, g, b]).ok_or_else(|| {
                    HeatmapError::configuration(format!("invalid hex color '{}'", v.as_ref()))
                })
            })
            .collect::<HeatmapResult<Vec<_>>>()?;
        Ok(Self {
            colors,
            weights,
            steps,
        })
    }

    /// Look up a named preset.
    ///
    /// # Errors
    /// `UnknownColorPreset` listing the registry when `name` is not in it.
    pub fn preset(name: &str) -> HeatmapResult<Self> {
        let (_, values, weights) = PRESETS
            .iter()
            .find(|(preset, _, _)| *preset == name)
            .ok_or_else(|| HeatmapError::unknown_color_preset(name, &preset_names()))?;
        Self::from_hex(values, weights.map(<[f64]>::to_vec), DEFAULT_STEPS)
    }

    /// Table entries allotted to each segment: `ceil(wᵢ / Σw · steps)`.
    ///
    /// The sum can exceed `steps`; lookups clamp.
    pub fn segment_steps(&self) -> HeatmapResult<Vec<usize>> {
        if self.colors.len() < 2 {
            return Err(HeatmapError::configuration(format!(
                "a colormap needs at least 2 colors, got {}",
                self.colors.len()
            )));
        }
        if self.steps == 0 {
            return Err(HeatmapError::configuration("colormap steps must be positive"));
        }
        let segments = self.colors.len() - 1;
        let weights = match &self.weights {
            Some(w) if w.len() != segments => {
                return Err(HeatmapError::configuration(format!(
                    "{} colors need {} weights, got {}",
                    self.colors.len(),
                    segments,
                    w.len()
                )));
            }
            Some(w) => w.clone(),
            None => vec![1.0; segments],
        };
        if weights.iter().any(|w| !(w.is_finite() && *w > 0.0)) {
            return Err(HeatmapError::configuration(
                "colormap weights must be positive",
            ));
        }
        let total: f64 = weights.iter().sum();
        Ok(weights
            .iter()
            .map(|w| (w / total * self.steps as f64).ceil() as usize)
            .collect())
    }

    /// Build the dense table.
    pub fn build(&self) -> HeatmapResult<Colormap> {
        let steps = self.segment_steps()?;
        let mut entries = Vec::with_capacity(steps.iter().map(|s| s + 1).sum());
        for (pair, segment_steps) in self.colors.windows(2).zip(steps) {
            entries.extend(interpolate_hsluv(pair[0], pair[1], segment_steps));
        }

        tracing::debug!(
            stops = self.colors.len(),
            requested_steps = self.steps,
            table_len = entries.len(),
            overshoot = entries.len().saturating_sub(self.steps),
            "built colormap"
        );

        Ok(Colormap { entries })
    }
}

/// `steps + 1` colours from `from` to `to` inclusive, interpolated in HSLuv
/// along the shorter hue arc.
pub fn interpolate_hsluv(from: Rgb, to: Rgb, steps: usize) -> Vec<Rgb> {
    // steps >= 1 whenever the weight is positive
    let steps = steps.max(1);
    let [h1, s1, l1] = rgb_to_hsluv(normalize(from));
    let [h2, s2, l2] = rgb_to_hsluv(normalize(to));
    let h1 = h1.to_radians();
    let h2 = h2.to_radians();
    let delta = (h2 - h1).sin().atan2((h2 - h1).cos());

    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let hue = (h1 + delta * t).to_degrees().rem_euclid(360.0);
            let rgb = hsluv_to_rgb([hue, s1 * (1.0 - t) + s2 * t, l1 * (1.0 - t) + l2 * t]);
            rgb.map(to_channel)
        })
        .collect()
}

fn normalize(rgb: Rgb) -> [f64; 3] {
    rgb.map(|c| c as f64 / 255.0)
}

fn to_channel(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Read-only intensity-to-colour table.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    entries: Vec<Rgb>,
}

impl Colormap {
    /// Wrap an existing table. Returns `None` for an empty one.
    pub fn from_entries(entries: Vec<Rgb>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Rgb] {
        &self.entries
    }

    /// Colour for zero intensity.
    pub fn first(&self) -> Rgb {
        self.entries[0]
    }

    /// Colour for full intensity.
    pub fn last(&self) -> Rgb {
        self.entries[self.entries.len() - 1]
    }

    /// Table index for an intensity: `round(v · len)`, clamped to the
    /// table. Negative and NaN intensities map to the first entry.
    #[inline]
    pub fn index_for(&self, value: f64) -> usize {
        let scaled = (value * self.entries.len() as f64).round();
        if scaled.is_nan() || scaled <= 0.0 {
            0
        } else {
            (scaled as usize).min(self.entries.len() - 1)
        }
    }

    #[inline]
    pub fn lookup(&self, value: f64) -> Rgb {
        self.entries[self.index_for(value)]
    }
}
