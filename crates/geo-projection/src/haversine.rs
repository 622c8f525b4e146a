//! Great-circle distances on a spherical Earth.

use heatmap_common::GeoCoord;

/// Mean Earth radius (IUGG) in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two coordinates in meters.
pub fn haversine_distance(a: GeoCoord, b: GeoCoord) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Length of one degree of latitude centred on `lat`, in meters.
pub fn meters_per_degree_lat(lat: f64) -> f64 {
    // Keep the one-degree span inside [-90, 90].
    let center = lat.clamp(-89.5, 89.5);
    haversine_distance(
        GeoCoord::new(center - 0.5, 0.0),
        GeoCoord::new(center + 0.5, 0.0),
    )
}
