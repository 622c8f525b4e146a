//! Planar and geographic render entry points.
//!
//! Both entry points resolve every option before touching a pixel, so a
//! request either fails with a configuration or lookup error or produces a
//! complete PNG.

use std::sync::atomic::AtomicBool;

use image::RgbaImage;
use serde::Deserialize;
use tracing::{debug, warn};

use geo_projection::{project, Projection, Sizing};
use heatmap_common::{
    GeoCoord, GeoPoint, HeatmapError, HeatmapResult, KernelParams, Polygon, SamplePoint,
};

use crate::config::RasterConfig;
use crate::encode::encode_png;
use crate::gradient::Rasterizer;
use crate::mask::PolygonMask;
use crate::style::{
    ColorSpec, MethodArgs, RenderOptions, RenderPlan, DEFAULT_KERNEL, DEFAULT_METHOD,
};

/// A render over points already in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapRequest {
    pub points: Vec<SamplePoint>,
    pub width: u32,
    pub height: u32,
    /// Crop polygon in pixel space.
    pub coords: Option<Polygon>,
    pub options: RenderOptions,
}

/// Encoded output of a planar render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHeatmap {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl HeatmapRequest {
    pub fn new(points: Vec<SamplePoint>, width: u32, height: u32) -> Self {
        Self {
            points,
            width,
            height,
            coords: None,
            options: RenderOptions::default(),
        }
    }

    pub fn with_coords(mut self, coords: Polygon) -> Self {
        self.coords = Some(coords);
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse a planar request document.
    pub fn from_json(json_str: &str) -> HeatmapResult<Self> {
        let doc: PlanarDocument = serde_json::from_str(json_str)?;
        Ok(doc.into_request())
    }

    /// The crop mask, or `None` when cropping is off.
    fn mask(&self) -> HeatmapResult<Option<PolygonMask>> {
        let crop = self.options.crop.unwrap_or(false);
        match (&self.coords, crop) {
            (Some(coords), true) => crop_mask(coords).map(Some),
            (None, true) => Err(HeatmapError::configuration(
                "crop requested without a crop polygon",
            )),
            (Some(_), false) => {
                warn!("crop polygon supplied but crop is disabled; ignoring it");
                Ok(None)
            }
            (None, false) => Ok(None),
        }
    }
}

/// Render to an RGBA raster without encoding.
pub fn render_heatmap_image(
    request: &HeatmapRequest,
    config: RasterConfig,
    cancel: Option<&AtomicBool>,
) -> HeatmapResult<RgbaImage> {
    check_raster(config, request.width, request.height)?;
    let plan = request.options.resolve()?;
    rasterize(request, &plan, config, cancel)
}

/// Render a planar request to PNG with settings from the environment.
pub fn render_heatmap(request: &HeatmapRequest) -> HeatmapResult<RenderedHeatmap> {
    render_heatmap_with_config(request, RasterConfig::from_env(), None)
}

/// Render a planar request to PNG, aborting with `Cancelled` once `cancel`
/// is set.
pub fn render_with_cancel(
    request: &HeatmapRequest,
    cancel: &AtomicBool,
) -> HeatmapResult<RenderedHeatmap> {
    render_heatmap_with_config(request, RasterConfig::from_env(), Some(cancel))
}

/// Render a planar request to PNG with explicit execution settings.
pub fn render_heatmap_with_config(
    request: &HeatmapRequest,
    config: RasterConfig,
    cancel: Option<&AtomicBool>,
) -> HeatmapResult<RenderedHeatmap> {
    let img = render_heatmap_image(request, config, cancel)?;
    Ok(RenderedHeatmap {
        png: encode_png(&img)?,
        width: img.width(),
        height: img.height(),
    })
}

fn check_raster(config: RasterConfig, width: u32, height: u32) -> HeatmapResult<()> {
    config
        .validate()
        .and_then(|()| config.check_size(width, height))
        .map_err(HeatmapError::Configuration)
}

/// Rasterize a planar request against an already resolved plan.
fn rasterize(
    request: &HeatmapRequest,
    plan: &RenderPlan,
    config: RasterConfig,
    cancel: Option<&AtomicBool>,
) -> HeatmapResult<RgbaImage> {
    let (width, height) = (request.width, request.height);
    let mask = request.mask()?;

    if !request.points.is_empty() && request.points.iter().all(|p| !in_raster(p, width, height)) {
        warn!(
            points = request.points.len(),
            width, height, "all sample points lie outside the raster"
        );
    }
    if mask.as_ref().map_or(false, |m| !m.overlaps_raster(width, height)) {
        warn!(width, height, "crop polygon lies outside the raster");
    }

    Rasterizer::new(plan, &request.points)
        .with_mask(mask.as_ref())
        .with_config(config)
        .render_with_cancel(width, height, cancel)
}

/// A render over geo-located points framed by a geographic polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoHeatmapRequest {
    pub polygon: Vec<GeoCoord>,
    pub points: Vec<GeoPoint>,
    pub sizing: Sizing,
    pub options: RenderOptions,
}

/// Encoded output of a geographic render with its georeference.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedGeoHeatmap {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// `[min lng, min lat]` in degrees.
    pub origin: [f64; 2],
    /// `[max lng, max lat]` in degrees.
    pub end: [f64; 2],
    /// Pixels per degree.
    pub scale: f64,
}

impl GeoHeatmapRequest {
    pub fn new(polygon: Vec<GeoCoord>, points: Vec<GeoPoint>, sizing: Sizing) -> Self {
        Self {
            polygon,
            points,
            sizing,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse a geographic request document.
    pub fn from_json(json_str: &str) -> HeatmapResult<Self> {
        let doc: GeoDocument = serde_json::from_str(json_str)?;
        Ok(doc.into_request())
    }
}

/// Project a geographic request and render it through the planar path,
/// with settings from the environment.
///
/// Cropping to the polygon is on unless the options turn it off.
pub fn render_geo_heatmap(request: &GeoHeatmapRequest) -> HeatmapResult<RenderedGeoHeatmap> {
    render_geo_heatmap_with_config(request, RasterConfig::from_env(), None)
}

/// Geographic render with explicit execution settings.
pub fn render_geo_heatmap_with_config(
    request: &GeoHeatmapRequest,
    config: RasterConfig,
    cancel: Option<&AtomicBool>,
) -> HeatmapResult<RenderedGeoHeatmap> {
    config.validate().map_err(HeatmapError::Configuration)?;
    request.sizing.validate()?;
    // fail on bad names before projecting anything
    let plan = request.options.resolve()?;

    let crop = request.options.crop.unwrap_or(true);
    if crop && request.polygon.len() < 3 {
        return Err(HeatmapError::configuration(format!(
            "crop requires a polygon with at least 3 vertices, got {}",
            request.polygon.len()
        )));
    }

    let Projection {
        frame,
        polygon,
        points,
    } = project(&request.polygon, &request.points, request.sizing)?;
    check_raster(config, frame.width, frame.height)?;

    debug!(
        points = points.len(),
        scale = frame.scale,
        width = frame.width,
        height = frame.height,
        crop,
        "Rendering geographic heatmap"
    );

    let planar = HeatmapRequest {
        points,
        width: frame.width,
        height: frame.height,
        coords: crop.then_some(polygon),
        options: RenderOptions {
            crop: Some(crop),
            ..request.options.clone()
        },
    };
    let img = rasterize(&planar, &plan, config, cancel)?;

    Ok(RenderedGeoHeatmap {
        png: encode_png(&img)?,
        width: img.width(),
        height: img.height(),
        origin: frame.origin,
        end: frame.end,
        scale: frame.scale,
    })
}

fn crop_mask(coords: &Polygon) -> HeatmapResult<PolygonMask> {
    if !coords.is_closed_area() {
        return Err(HeatmapError::configuration(format!(
            "crop requires a polygon with at least 3 vertices, got {}",
            coords.len()
        )));
    }
    Ok(PolygonMask::new(coords.clone()))
}

fn in_raster(point: &SamplePoint, width: u32, height: u32) -> bool {
    point.px >= 0.0 && point.py >= 0.0 && point.px < width as f64 && point.py < height as f64
}

/// Rendering keys shared by both request documents.
#[derive(Debug, Default)]
struct RenderKeys {
    kernel: Option<String>,
    method: Option<String>,
    method_args: Option<MethodArgs>,
    colors: Option<ColorSpec>,
    crop: Option<bool>,
    kernel_defaults: Option<KernelParams>,
}

impl RenderKeys {
    fn into_options(self) -> RenderOptions {
        RenderOptions {
            kernel: self.kernel.unwrap_or_else(|| DEFAULT_KERNEL.to_string()),
            method: self.method.unwrap_or_else(|| DEFAULT_METHOD.to_string()),
            method_args: self.method_args.unwrap_or_default(),
            colors: self.colors.unwrap_or_default(),
            crop: self.crop,
            kernel_defaults: self.kernel_defaults.unwrap_or_default(),
        }
    }
}

// `deny_unknown_fields` does not combine with `flatten`, so both documents
// spell out the rendering keys.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PlanarDocument {
    points: Vec<SamplePoint>,
    width: u32,
    height: u32,
    #[serde(default)]
    coords: Option<Polygon>,
    #[serde(default)]
    kernel: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    method_args: Option<MethodArgs>,
    #[serde(default)]
    colors: Option<ColorSpec>,
    #[serde(default)]
    crop: Option<bool>,
    #[serde(default)]
    kernel_defaults: Option<KernelParams>,
}

impl PlanarDocument {
    fn into_request(self) -> HeatmapRequest {
        let keys = RenderKeys {
            kernel: self.kernel,
            method: self.method,
            method_args: self.method_args,
            colors: self.colors,
            crop: self.crop,
            kernel_defaults: self.kernel_defaults,
        };
        HeatmapRequest {
            points: self.points,
            width: self.width,
            height: self.height,
            coords: self.coords,
            options: keys.into_options(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct GeoDocument {
    geo_coords: Vec<GeoCoord>,
    #[serde(default)]
    geo_points: Vec<GeoPoint>,
    #[serde(default, alias = "pxPerDeg")]
    px_per_degree: Option<f64>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    kernel: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    method_args: Option<MethodArgs>,
    #[serde(default)]
    colors: Option<ColorSpec>,
    #[serde(default)]
    crop: Option<bool>,
    #[serde(default)]
    kernel_defaults: Option<KernelParams>,
}

impl GeoDocument {
    fn into_request(self) -> GeoHeatmapRequest {
        let keys = RenderKeys {
            kernel: self.kernel,
            method: self.method,
            method_args: self.method_args,
            colors: self.colors,
            crop: self.crop,
            kernel_defaults: self.kernel_defaults,
        };
        GeoHeatmapRequest {
            polygon: self.geo_coords,
            points: self.geo_points,
            sizing: Sizing {
                px_per_degree: self.px_per_degree,
                width: self.width,
                height: self.height,
            },
            options: keys.into_options(),
        }
    }
}
