//! Execution settings for the rasterizer.

use serde::{Deserialize, Serialize};

/// Pixel count below which rows render on the calling thread.
pub const PARALLEL_THRESHOLD: usize = 4096;

/// Largest raster accepted by default (16384 x 16384).
pub const MAX_PIXELS: usize = 1 << 28;

/// How a raster is evaluated. Does not affect pixel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterConfig {
    /// Evaluate rows on the rayon pool.
    pub parallel: bool,

    /// Minimum pixel count before rows are evaluated in parallel.
    pub parallel_threshold: usize,

    /// Upper bound on `width * height` for a single raster.
    pub max_pixels: usize,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: PARALLEL_THRESHOLD,
            max_pixels: MAX_PIXELS,
        }
    }
}

impl RasterConfig {
    /// Sequential evaluation regardless of raster size.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from `lookup`, keeping the default for any key
    /// that is missing or fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("HEATMAP_PARALLEL") {
            config.parallel = val.to_lowercase() == "true" || val == "1";
        }

        if let Some(val) = lookup("HEATMAP_PARALLEL_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                config.parallel_threshold = threshold;
            }
        }

        if let Some(val) = lookup("HEATMAP_MAX_PIXELS") {
            if let Ok(max) = val.parse() {
                config.max_pixels = max;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.parallel_threshold == 0 {
            return Err("parallel_threshold must be > 0".to_string());
        }

        if self.max_pixels == 0 {
            return Err("max_pixels must be > 0".to_string());
        }

        Ok(())
    }

    /// Check that a `width` x `height` RGBA raster is non-empty and fits
    /// both `max_pixels` and the address space.
    pub fn check_size(&self, width: u32, height: u32) -> Result<(), String> {
        if width == 0 || height == 0 {
            return Err(format!(
                "raster size must be non-zero, got {}x{}",
                width, height
            ));
        }

        let pixels = (width as usize)
            .checked_mul(height as usize)
            .filter(|&pixels| pixels <= self.max_pixels);
        let bytes = pixels.and_then(|pixels| pixels.checked_mul(4));
        match bytes {
            Some(bytes) if bytes <= isize::MAX as usize => Ok(()),
            _ => Err(format!(
                "raster size {}x{} exceeds max_pixels {}",
                width, height, self.max_pixels
            )),
        }
    }

    /// Whether a raster of `pixels` pixels should be split across threads.
    pub fn use_parallel(&self, pixels: usize) -> bool {
        self.parallel && pixels >= self.parallel_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = RasterConfig::default();
        assert!(config.parallel);
        assert_eq!(config.parallel_threshold, 4096);
        assert_eq!(config.max_pixels, 1 << 28);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_use_parallel() {
        let config = RasterConfig::default();
        assert!(!config.use_parallel(64 * 63));
        assert!(config.use_parallel(64 * 64));
        assert!(!RasterConfig::sequential().use_parallel(1 << 20));
    }

    #[test]
    fn test_validate_zero_threshold() {
        let config = RasterConfig {
            parallel_threshold: 0,
            ..RasterConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RasterConfig {
            max_pixels: 0,
            ..RasterConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup_parses_values() {
        let config = RasterConfig::from_lookup(lookup(&[
            ("HEATMAP_PARALLEL", "0"),
            ("HEATMAP_PARALLEL_THRESHOLD", "128"),
            ("HEATMAP_MAX_PIXELS", "1000000"),
        ]));
        assert!(!config.parallel);
        assert_eq!(config.parallel_threshold, 128);
        assert_eq!(config.max_pixels, 1_000_000);

        let config = RasterConfig::from_lookup(lookup(&[("HEATMAP_PARALLEL", "TRUE")]));
        assert!(config.parallel);
    }

    #[test]
    fn test_from_lookup_keeps_defaults_on_bad_input() {
        let config = RasterConfig::from_lookup(lookup(&[
            ("HEATMAP_PARALLEL_THRESHOLD", "many"),
            ("HEATMAP_MAX_PIXELS", "-1"),
        ]));
        assert_eq!(config, RasterConfig::default());
        assert_eq!(RasterConfig::from_lookup(|_| None), RasterConfig::default());
    }

    #[test]
    fn test_check_size() {
        let config = RasterConfig::default();
        assert!(config.check_size(16384, 16384).is_ok());
        assert!(config.check_size(16384, 16385).is_err());
        assert!(config.check_size(0, 10).is_err());
        assert!(config.check_size(u32::MAX, u32::MAX).is_err());

        let unbounded = RasterConfig {
            max_pixels: usize::MAX,
            ..RasterConfig::default()
        };
        assert!(unbounded.check_size(u32::MAX, u32::MAX).is_err());
    }
}
