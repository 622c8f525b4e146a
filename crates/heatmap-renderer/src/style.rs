//! Render options: kernel, method, colours and crop selection.
//!
//! Options arrive with names as strings and are resolved into closed enums
//! by [`RenderOptions::resolve`] before any pixel is evaluated, so an
//! unknown name fails the request up front.

use serde::{Deserialize, Serialize};

use heatmap_common::{HeatmapResult, KernelParams, SamplePoint};

use crate::aggregate::{InnerKernel, Method, MethodKind};
use crate::colormap::{ColorStops, Colormap, DEFAULT_STEPS};
use crate::kernel::{Kernel, KernelDefaults, ResolvedParams};

pub const DEFAULT_KERNEL: &str = "gaussian";
pub const DEFAULT_METHOD: &str = "shepards";
pub const DEFAULT_INNER_KERNEL: &str = "polynomial";
pub const DEFAULT_PRESET: &str = "default";

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Colormap selection: a preset name or explicit stops.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Preset(String),
    Stops(ColorStopsSpec),
}

impl Default for ColorSpec {
    fn default() -> Self {
        ColorSpec::Preset(DEFAULT_PRESET.to_string())
    }
}

/// Explicit colour stops as written in a document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ColorStopsSpec {
    #[serde(default = "default_steps")]
    pub steps: usize,
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
}

fn default_steps() -> usize {
    DEFAULT_STEPS
}

impl ColorSpec {
    pub fn to_stops(&self) -> HeatmapResult<ColorStops> {
        match self {
            ColorSpec::Preset(name) => ColorStops::preset(name),
            ColorSpec::Stops(custom) => {
                ColorStops::from_hex(&custom.values, custom.weights.clone(), custom.steps)
            }
        }
    }
}

/// Extra arguments of the aggregation method.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct MethodArgs {
    /// Inner distance kernel of Shepard's methods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel: Option<String>,
    /// Parameters of the inner kernel.
    pub kernel_args: KernelParams,
    /// Clamp `sum` to [0, 1].
    pub clamp: bool,
}

/// Rendering options shared by the planar and geographic entry points.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct RenderOptions {
    pub kernel: String,
    pub method: String,
    pub method_args: MethodArgs,
    pub colors: ColorSpec,
    /// Mask pixels outside the polygon; the default depends on the entry
    /// point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<bool>,
    /// Render-wide fallbacks for point kernel parameters.
    pub kernel_defaults: KernelParams,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            kernel: DEFAULT_KERNEL.to_string(),
            method: DEFAULT_METHOD.to_string(),
            method_args: MethodArgs::default(),
            colors: ColorSpec::default(),
            crop: None,
            kernel_defaults: KernelParams::default(),
        }
    }
}

impl RenderOptions {
    /// Load options from a JSON string
    pub fn from_json(json_str: &str) -> HeatmapResult<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    pub fn with_kernel(mut self, kernel: impl Into<String>) -> Self {
        self.kernel = kernel.into();
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_method_args(mut self, args: MethodArgs) -> Self {
        self.method_args = args;
        self
    }

    pub fn with_colors(mut self, colors: ColorSpec) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_crop(mut self, crop: bool) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn with_kernel_defaults(mut self, defaults: KernelParams) -> Self {
        self.kernel_defaults = defaults;
        self
    }

    /// Resolve every name and build the colormap.
    ///
    /// # Errors
    /// `UnknownKernel`, `UnknownMethod` or `UnknownColorPreset` for names
    /// outside the registries; `Configuration` for malformed colours.
    pub fn resolve(&self) -> HeatmapResult<RenderPlan> {
        let kernel: Kernel = self.kernel.parse()?;
        let kind: MethodKind = self.method.parse()?;
        let defaults = KernelDefaults::new(self.kernel_defaults);

        let inner = || -> HeatmapResult<InnerKernel> {
            let name = self
                .method_args
                .kernel
                .as_deref()
                .unwrap_or(DEFAULT_INNER_KERNEL);
            let kernel: Kernel = name.parse()?;
            Ok(InnerKernel {
                kernel,
                params: defaults.resolve(kernel, &self.method_args.kernel_args),
            })
        };

        let method = match kind {
            MethodKind::Sum => Method::Sum {
                clamp: self.method_args.clamp,
            },
            MethodKind::Max => Method::Max,
            MethodKind::Nearest => Method::Nearest,
            MethodKind::Shepards => Method::Shepards(inner()?),
            MethodKind::AlphaShepards => Method::AlphaShepards(inner()?),
        };

        let colormap = self.colors.to_stops()?.build()?;

        Ok(RenderPlan {
            kernel,
            method,
            colormap,
            defaults,
        })
    }
}

/// Options with every name resolved; immutable for the whole render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub kernel: Kernel,
    pub method: Method,
    pub colormap: Colormap,
    pub defaults: KernelDefaults,
}

impl RenderPlan {
    /// Kernel parameters of every point, defaults applied.
    pub fn point_params(&self, points: &[SamplePoint]) -> Vec<ResolvedParams> {
        points
            .iter()
            .map(|p| self.defaults.resolve(self.kernel, &p.params))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatmap_common::HeatmapError;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#FF0000"), Some((255, 0, 0)));
        assert_eq!(hex_to_rgb("#00FF00"), Some((0, 255, 0)));
        assert_eq!(hex_to_rgb(" #0000ff "), Some((0, 0, 255)));
        assert_eq!(hex_to_rgb("FEFFFE"), Some((254, 255, 254)));
        assert_eq!(hex_to_rgb("#GGGGGG"), None);
        assert_eq!(hex_to_rgb("#FFF"), None);
    }

    #[test]
    fn test_defaults_resolve() {
        let plan = RenderOptions::default().resolve().unwrap();
        assert_eq!(plan.kernel, Kernel::Gaussian);
        assert!(matches!(plan.method, Method::Shepards(inner) if inner.kernel == Kernel::Polynomial));
        assert!(plan.colormap.len() >= DEFAULT_STEPS);
    }

    #[test]
    fn test_options_json() {
        let json = r##"{
            "kernel": "step",
            "method": "shepards",
            "methodArgs": {"kernel": "polynomial", "kernelArgs": {"epsilon": 0.005, "degree": 3}},
            "colors": {"steps": 30, "values": ["#111122", "#44AA11", "#DDDDFF"], "weights": [1, 2]},
            "crop": true
        }"##;
        let options = RenderOptions::from_json(json).unwrap();
        assert_eq!(options.crop, Some(true));
        let plan = options.resolve().unwrap();
        match plan.method {
            Method::Shepards(inner) => {
                assert_eq!(inner.params.epsilon, 0.005);
                assert_eq!(inner.params.degree, 3.0);
            }
            other => panic!("unexpected method {:?}", other),
        }
        assert!(plan.colormap.len() >= 30);
    }

    #[test]
    fn test_preset_by_name() {
        let options = RenderOptions::from_json(r#"{"colors": "viridis"}"#).unwrap();
        assert_eq!(options.colors, ColorSpec::Preset("viridis".into()));
        assert!(options.resolve().is_ok());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(RenderOptions::from_json(r#"{"kernal": "step"}"#).is_err());
        assert!(RenderOptions::from_json(r#"{"methodArgs": {"power": 2}}"#).is_err());
    }

    #[test]
    fn test_unknown_names_fail_fast() {
        let err = RenderOptions::default().with_kernel("boxcar").resolve().unwrap_err();
        assert!(matches!(err, HeatmapError::UnknownKernel { .. }));

        let err = RenderOptions::default().with_method("idw").resolve().unwrap_err();
        assert!(matches!(err, HeatmapError::UnknownMethod { .. }));

        let err = RenderOptions::default()
            .with_colors(ColorSpec::Preset("rainbow".into()))
            .resolve()
            .unwrap_err();
        assert!(matches!(err, HeatmapError::UnknownColorPreset { .. }));

        let args = MethodArgs {
            kernel: Some("boxcar".into()),
            ..MethodArgs::default()
        };
        let err = RenderOptions::default()
            .with_method_args(args)
            .resolve()
            .unwrap_err();
        assert!(matches!(err, HeatmapError::UnknownKernel { .. }));
    }
}
