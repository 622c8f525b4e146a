//! Shared types for the heatmap workspace.
//!
//! Holds the data model every stage of the pipeline reads:
//! - Sample points in pixel space and in geographic space
//! - Per-point kernel parameters
//! - Boundary polygons
//! - The error taxonomy

pub mod error;
pub mod point;
pub mod polygon;

pub use error::{HeatmapError, HeatmapResult};
pub use point::{GeoCoord, GeoPoint, KernelParams, SamplePoint};
pub use polygon::{Bounds, Polygon};
