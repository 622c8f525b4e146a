//! Field boundaries and sample sets taken from real surveys.

use heatmap_common::{GeoCoord, GeoPoint, KernelParams, SamplePoint};

/// Four-vertex field near 22.3°S 46.5°E.
pub fn quad_field() -> Vec<GeoCoord> {
    vec![
        GeoCoord::new(-22.26924577079028, 46.4980277099864),
        GeoCoord::new(-22.409055199135516, 46.56592929983902),
        GeoCoord::new(-22.31616056603905, 46.575269328013256),
        GeoCoord::new(-22.262028340717983, 46.54215326288493),
    ]
}

/// Small irregular plot near 22.87°S 47.02°W (about 100 m across).
pub fn small_plot() -> Vec<GeoCoord> {
    vec![
        GeoCoord::new(-22.865522082592253, -47.02332024971935),
        GeoCoord::new(-22.865561625617033, -47.023153952760424),
        GeoCoord::new(-22.865635768757492, -47.02294474045726),
        GeoCoord::new(-22.86568519749531, -47.022743574781146),
        GeoCoord::new(-22.865853255069396, -47.022601417703356),
        GeoCoord::new(-22.866031198156556, -47.022528998059954),
        GeoCoord::new(-22.866273398095142, -47.02245926062557),
        GeoCoord::new(-22.866456283476946, -47.0226631085107),
        GeoCoord::new(-22.866579854541495, -47.02279990117046),
        GeoCoord::new(-22.86636731224087, -47.02291791836711),
        GeoCoord::new(-22.86613051700791, -47.02298715474466),
        GeoCoord::new(-22.865974816933218, -47.02318295600275),
        GeoCoord::new(-22.865932802596777, -47.023448494695224),
        GeoCoord::new(-22.865754859380743, -47.023515549920596),
        GeoCoord::new(-22.865604101751465, -47.02337339284281),
    ]
}

/// Soil samples inside `small_plot`, 50 m reach each.
pub fn small_plot_samples() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(-22.865974, -47.022887, 1.0).with_radius_meters(50.0),
        GeoPoint::new(-22.865874, -47.022787, 0.0).with_radius_meters(50.0),
        GeoPoint::new(-22.865774, -47.023287, 1.0).with_radius_meters(50.0),
        GeoPoint::new(-22.866274, -47.022687, 0.0).with_radius_meters(50.0),
    ]
}

/// Ten planar points spread over a 144 x 144 raster with per-point shapes.
pub fn planar_scatter() -> Vec<SamplePoint> {
    let point = |px: f64, py: f64, value: f64, radius: f64, sigma: f64| {
        SamplePoint::new(px, py, value).with_params(
            KernelParams::default()
                .with_radius(radius)
                .with_sigma(sigma)
                .with_epsilon(0.05),
        )
    };
    vec![
        point(10.0, 10.0, 1.0, 10.0, 30.0),
        point(123.0, 33.0, 0.3, 30.0, 10.0),
        point(26.0, 11.0, 0.2, 20.0, 10.0),
        point(67.0, 114.0, 0.9, 30.0, 40.0),
        point(44.0, 88.0, 0.9, 40.0, 10.0),
        point(98.0, 99.0, 0.5, 50.0, 10.0),
        point(111.0, 111.0, 0.2, 30.0, 10.0),
        point(43.0, 98.0, 0.7, 10.0, 20.0),
        point(86.0, 12.0, 0.7, 40.0, 10.0),
        point(49.0, 88.0, 0.8, 30.0, 20.0),
    ]
}

/// Square crop polygon inset 20 px from the edges of a `size` raster.
pub fn inset_square(size: f64) -> Vec<[f64; 2]> {
    vec![
        [20.0, 20.0],
        [size - 20.0, 20.0],
        [size - 20.0, size - 20.0],
        [20.0, size - 20.0],
    ]
}
