//! Sample point generators.
//!
//! Random generators take an explicit seed so failures reproduce.

use heatmap_common::{GeoPoint, KernelParams, SamplePoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniformly scattered points inside a `width` x `height` raster with
/// values in [0, 1] and radius/sigma between 5 and 50 pixels.
pub fn random_points(count: usize, width: u32, height: u32, seed: u64) -> Vec<SamplePoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let reach = rng.gen_range(5.0..50.0);
            SamplePoint::new(
                rng.gen_range(0.0..width as f64),
                rng.gen_range(0.0..height as f64),
                rng.gen_range(0.0..=1.0),
            )
            .with_params(KernelParams::default().with_radius(reach).with_sigma(reach))
        })
        .collect()
}

/// A regular lattice of points spaced `spacing` pixels apart, valued by a
/// diagonal ramp from 0 (top-left) to 1 (bottom-right).
pub fn lattice_points(width: u32, height: u32, spacing: u32) -> Vec<SamplePoint> {
    let spacing = spacing.max(1);
    let span = (width + height).max(1) as f64;
    let mut points = Vec::new();
    for y in (0..height).step_by(spacing as usize) {
        for x in (0..width).step_by(spacing as usize) {
            points.push(SamplePoint::new(x as f64, y as f64, (x + y) as f64 / span));
        }
    }
    points
}

/// Points scattered over a lat/lng box, each with a real-world radius.
pub fn random_geo_points(
    count: usize,
    (min_lat, min_lng, max_lat, max_lng): (f64, f64, f64, f64),
    radius_meters: f64,
    seed: u64,
) -> Vec<GeoPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            GeoPoint::new(
                rng.gen_range(min_lat..max_lat),
                rng.gen_range(min_lng..max_lng),
                rng.gen_range(0.0..=1.0),
            )
            .with_radius_meters(radius_meters)
        })
        .collect()
}
