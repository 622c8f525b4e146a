//! Geographic framing for heatmap rasters.
//!
//! Projects a boundary polygon and its sample points from degrees onto a
//! pixel grid with a uniform scale, and converts real-world distances into
//! pixel distances. Implemented from scratch without external dependencies.

pub mod geographic;
pub mod haversine;

pub use geographic::{project, GeoProjector, Projection, Sizing};
pub use haversine::{haversine_distance, meters_per_degree_lat, EARTH_RADIUS_M};
