//! Error types for heatmap rendering.

use thiserror::Error;

/// Result type alias using HeatmapError.
pub type HeatmapResult<T> = Result<T, HeatmapError>;

/// Errors surfaced before (or instead of) producing a raster.
///
/// Every variant except `Encoding` and `Cancelled` is detected while the
/// request is being resolved, before any pixel is computed.
#[derive(Debug, Error)]
pub enum HeatmapError {
    /// Conflicting, missing or malformed configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unknown kernel '{name}', choose one of: {valid}")]
    UnknownKernel { name: String, valid: String },

    #[error("unknown method '{name}', choose one of: {valid}")]
    UnknownMethod { name: String, valid: String },

    #[error("unknown color preset '{name}', choose one of: {valid}")]
    UnknownColorPreset { name: String, valid: String },

    /// The image encoder rejected the pixel buffer.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// Rendering was cancelled between rows.
    #[error("render cancelled")]
    Cancelled,
}

impl HeatmapError {
    /// Create a Configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an UnknownKernel error listing the registry.
    pub fn unknown_kernel(name: impl Into<String>, valid: &[&str]) -> Self {
        Self::UnknownKernel {
            name: name.into(),
            valid: valid.join(", "),
        }
    }

    /// Create an UnknownMethod error listing the registry.
    pub fn unknown_method(name: impl Into<String>, valid: &[&str]) -> Self {
        Self::UnknownMethod {
            name: name.into(),
            valid: valid.join(", "),
        }
    }

    /// Create an UnknownColorPreset error listing the registry.
    pub fn unknown_color_preset(name: impl Into<String>, valid: &[&str]) -> Self {
        Self::UnknownColorPreset {
            name: name.into(),
            valid: valid.join(", "),
        }
    }

    /// True for errors caused by a name missing from a registry.
    pub fn is_unknown_name(&self) -> bool {
        matches!(
            self,
            Self::UnknownKernel { .. } | Self::UnknownMethod { .. } | Self::UnknownColorPreset { .. }
        )
    }
}

impl From<serde_json::Error> for HeatmapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(format!("invalid JSON: {}", err))
    }
}
