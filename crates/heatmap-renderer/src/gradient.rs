//! Heatmap rasterization.
//!
//! Every output pixel is evaluated independently: each sample point
//! contributes `value · kernel(distance)`, the aggregation method combines
//! the contributions, and the colormap turns the intensity into a colour.
//! Rows are split across the rayon pool for rasters above the configured
//! threshold.

use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbaImage;
use rayon::prelude::*;
use tracing::debug;

use heatmap_common::{HeatmapError, HeatmapResult, SamplePoint};

use crate::aggregate::{Aggregate, Contribution};
use crate::config::RasterConfig;
use crate::kernel::ResolvedParams;
use crate::mask::PolygonMask;
use crate::style::RenderPlan;

/// Fully transparent pixel written outside the crop polygon.
pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Evaluates a set of points against a resolved render plan.
pub struct Rasterizer<'a> {
    plan: &'a RenderPlan,
    points: &'a [SamplePoint],
    params: Vec<ResolvedParams>,
    mask: Option<&'a PolygonMask>,
    config: RasterConfig,
}

impl<'a> Rasterizer<'a> {
    pub fn new(plan: &'a RenderPlan, points: &'a [SamplePoint]) -> Self {
        Self {
            plan,
            points,
            params: plan.point_params(points),
            mask: None,
            config: RasterConfig::default(),
        }
    }

    /// Pixels whose centre falls outside `mask` are written transparent.
    pub fn with_mask(mut self, mask: Option<&'a PolygonMask>) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_config(mut self, config: RasterConfig) -> Self {
        self.config = config;
        self
    }

    /// Aggregate at pixel `(x, y)`, ignoring the mask.
    pub fn evaluate(&self, x: f64, y: f64) -> Aggregate {
        let mut scratch = Vec::with_capacity(self.points.len());
        self.evaluate_into(x, y, &mut scratch)
    }

    fn evaluate_into(&self, x: f64, y: f64, scratch: &mut Vec<Contribution>) -> Aggregate {
        scratch.clear();
        scratch.extend(self.points.iter().zip(&self.params).map(|(point, params)| {
            let distance = point.distance(x, y);
            Contribution::new(
                point.value,
                self.plan.kernel.evaluate(distance, params),
                distance,
            )
        }));
        self.plan.method.aggregate(scratch)
    }

    /// RGBA for an aggregate. Opaque unless the method carries confidence.
    pub fn shade(&self, aggregate: Aggregate) -> [u8; 4] {
        let [r, g, b] = self.plan.colormap.lookup(aggregate.value());
        let alpha = match aggregate {
            Aggregate::Scalar(_) => 255,
            Aggregate::WithConfidence { confidence, .. } => {
                // NaN confidence clamps to NaN; treat it as none
                let c = if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) };
                (c * 255.0).round() as u8
            }
        };
        [r, g, b, alpha]
    }

    fn masked_out(&self, x: u32, y: u32) -> bool {
        self.mask
            .map_or(false, |m| !m.contains(x as f64 + 0.5, y as f64 + 0.5))
    }

    fn render_row(
        &self,
        y: u32,
        row: &mut [u8],
        scratch: &mut Vec<Contribution>,
        cancel: Option<&AtomicBool>,
    ) -> HeatmapResult<()> {
        if cancel.map_or(false, |flag| flag.load(Ordering::Relaxed)) {
            return Err(HeatmapError::Cancelled);
        }

        for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
            let x = x as u32;
            let rgba = if self.masked_out(x, y) {
                TRANSPARENT
            } else {
                self.shade(self.evaluate_into(x as f64, y as f64, scratch))
            };
            pixel.copy_from_slice(&rgba);
        }
        Ok(())
    }

    /// Render a `width` x `height` raster.
    pub fn render(&self, width: u32, height: u32) -> HeatmapResult<RgbaImage> {
        self.render_with_cancel(width, height, None)
    }

    /// Render, checking `cancel` before each row.
    ///
    /// # Errors
    /// `Configuration` for a zero or oversized dimension, `Cancelled` once
    /// the flag is observed set.
    pub fn render_with_cancel(
        &self,
        width: u32,
        height: u32,
        cancel: Option<&AtomicBool>,
    ) -> HeatmapResult<RgbaImage> {
        self.config
            .validate()
            .and_then(|()| self.config.check_size(width, height))
            .map_err(HeatmapError::Configuration)?;

        let pixels = width as usize * height as usize;
        let parallel = self.config.use_parallel(pixels);
        debug!(
            width,
            height,
            points = self.points.len(),
            kernel = %self.plan.kernel,
            method = %self.plan.method.kind(),
            colormap_len = self.plan.colormap.len(),
            masked = self.mask.is_some(),
            parallel,
            "Rasterizing heatmap"
        );

        if self.points.is_empty() {
            return self.fill_constant(width, height, cancel);
        }

        let mut img = RgbaImage::new(width, height);
        let row_len = width as usize * 4;
        let buf: &mut [u8] = &mut img;

        if parallel {
            buf.par_chunks_mut(row_len).enumerate().try_for_each_init(
                || Vec::with_capacity(self.points.len()),
                |scratch, (y, row)| self.render_row(y as u32, row, scratch, cancel),
            )?;
        } else {
            let mut scratch = Vec::with_capacity(self.points.len());
            for (y, row) in buf.chunks_mut(row_len).enumerate() {
                self.render_row(y as u32, row, &mut scratch, cancel)?;
            }
        }

        Ok(img)
    }

    /// Without points every unmasked pixel takes the empty aggregate's colour.
    fn fill_constant(
        &self,
        width: u32,
        height: u32,
        cancel: Option<&AtomicBool>,
    ) -> HeatmapResult<RgbaImage> {
        let background = self.shade(self.plan.method.aggregate(&[]));
        let mut img = RgbaImage::new(width, height);
        for (y, row) in img.rows_mut().enumerate() {
            if cancel.map_or(false, |flag| flag.load(Ordering::Relaxed)) {
                return Err(HeatmapError::Cancelled);
            }
            for (x, pixel) in row.enumerate() {
                pixel.0 = if self.masked_out(x as u32, y as u32) {
                    TRANSPARENT
                } else {
                    background
                };
            }
        }
        Ok(img)
    }
}
