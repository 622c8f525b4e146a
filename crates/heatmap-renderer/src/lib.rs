//! Heatmap rasterization for scattered sample points.
//!
//! Pipeline stages:
//! - Kernels: distance decay per point
//! - Aggregation methods: combine contributions at each pixel
//! - Colormap: HSLuv-interpolated intensity table
//! - Polygon mask: optional crop
//! - Rasterizer and PNG encoding
//!
//! [`render_heatmap`] renders points already in pixel space;
//! [`render_geo_heatmap`] frames a geographic polygon first.

pub mod aggregate;
pub mod colormap;
pub mod config;
pub mod encode;
pub mod gradient;
pub mod hsluv;
pub mod kernel;
pub mod mask;
pub mod render;
pub mod style;

pub use aggregate::{Aggregate, Contribution, InnerKernel, Method, MethodKind};
pub use colormap::{preset_names, ColorStops, Colormap, Rgb};
pub use config::RasterConfig;
pub use encode::encode_png;
pub use gradient::Rasterizer;
pub use kernel::{Kernel, KernelDefaults, ResolvedParams};
pub use mask::{point_in_polygon, PolygonMask};
pub use render::{
    render_geo_heatmap, render_geo_heatmap_with_config, render_heatmap,
    render_heatmap_image, render_heatmap_with_config, render_with_cancel, GeoHeatmapRequest,
    HeatmapRequest, RenderedGeoHeatmap, RenderedHeatmap,
};
pub use style::{ColorSpec, ColorStopsSpec, MethodArgs, RenderOptions, RenderPlan};
