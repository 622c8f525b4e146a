//! PNG encoding of rendered rasters.

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};

use heatmap_common::{HeatmapError, HeatmapResult};

/// Encode an RGBA raster as an 8-bit RGBA PNG.
pub fn encode_png(img: &RgbaImage) -> HeatmapResult<Vec<u8>> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)
        .map_err(|e| HeatmapError::Encoding(e.to_string()))?;
    Ok(png)
}
