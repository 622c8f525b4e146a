//! Tests for geographic framing against real field boundaries.

use geo_projection::{haversine_distance, project, GeoProjector, Sizing};
use heatmap_common::{GeoCoord, HeatmapError};
use test_utils::{assert_approx_eq, fixtures, random_geo_points};

fn corners(polygon: &[GeoCoord]) -> Vec<GeoCoord> {
    let min_lat = polygon.iter().map(|c| c.lat).fold(f64::INFINITY, f64::min);
    let max_lat = polygon.iter().map(|c| c.lat).fold(f64::NEG_INFINITY, f64::max);
    let min_lng = polygon.iter().map(|c| c.lng).fold(f64::INFINITY, f64::min);
    let max_lng = polygon.iter().map(|c| c.lng).fold(f64::NEG_INFINITY, f64::max);
    vec![
        GeoCoord::new(min_lat, min_lng),
        GeoCoord::new(min_lat, max_lng),
        GeoCoord::new(max_lat, min_lng),
        GeoCoord::new(max_lat, max_lng),
    ]
}

fn assert_inside_raster(frame: &GeoProjector, coord: GeoCoord) {
    let [x, y] = frame.project(coord);
    let slack = 1e-6;
    assert!(x >= -slack && x <= frame.width as f64 + slack, "x={} width={}", x, frame.width);
    assert!(y >= -slack && y <= frame.height as f64 + slack, "y={} height={}", y, frame.height);
}

#[test]
fn test_corners_project_inside_raster() {
    let sizings = [
        Sizing::px_per_degree(250_000.0),
        Sizing::width(512),
        Sizing::height(300),
        Sizing::fit(400, 400),
        Sizing::fit(100, 700),
    ];
    for polygon in [fixtures::quad_field(), fixtures::small_plot()] {
        for sizing in sizings {
            let frame = GeoProjector::new(&polygon, sizing).unwrap();
            for corner in corners(&polygon) {
                assert_inside_raster(&frame, corner);
            }
            for vertex in &polygon {
                assert_inside_raster(&frame, *vertex);
            }
        }
    }
}

#[test]
fn test_width_and_height_directives_are_exact() {
    for polygon in [fixtures::quad_field(), fixtures::small_plot()] {
        for width in [64, 333, 1024] {
            let frame = GeoProjector::new(&polygon, Sizing::width(width)).unwrap();
            assert_eq!(frame.width, width);
            assert_eq!(frame.offset, 0);
        }
        for height in [50, 481] {
            let frame = GeoProjector::new(&polygon, Sizing::height(height)).unwrap();
            assert_eq!(frame.height, height);
        }
    }
}

#[test]
fn test_fit_never_exceeds_requested_box() {
    let polygon = fixtures::quad_field();
    // the field is taller than wide, so height limits the scale
    let frame = GeoProjector::new(&polygon, Sizing::fit(300, 200)).unwrap();
    assert_eq!((frame.width, frame.height), (300, 200));
    assert_eq!(frame.offset, 0);
    let extent_lat = frame.end[1] - frame.origin[1];
    assert_approx_eq!(frame.scale, 200.0 / extent_lat, 1e-9);
}

#[test]
fn test_scale_preserves_aspect_ratio() {
    let polygon = fixtures::small_plot();
    let frame = GeoProjector::new(&polygon, Sizing::px_per_degree(1_000_000.0)).unwrap();
    let extent_lng = frame.end[0] - frame.origin[0];
    let extent_lat = frame.end[1] - frame.origin[1];
    assert_eq!(frame.width, (extent_lng * 1_000_000.0).ceil() as u32);
    assert_eq!(frame.height, (extent_lat * 1_000_000.0).ceil() as u32);
}

#[test]
fn test_radius_meters_scale_with_resolution() {
    let polygon = fixtures::small_plot();
    let samples = fixtures::small_plot_samples();
    let coarse = project(&polygon, &samples, Sizing::width(100)).unwrap();
    let fine = project(&polygon, &samples, Sizing::width(400)).unwrap();

    let coarse_radius = coarse.points[0].params.radius.unwrap();
    let fine_radius = fine.points[0].params.radius.unwrap();
    assert_approx_eq!(fine_radius / coarse_radius, 4.0, 1e-9);
    assert_eq!(coarse.polygon.len(), polygon.len());
}

#[test]
fn test_radius_meters_matches_haversine() {
    let polygon = fixtures::quad_field();
    let frame = GeoProjector::new(&polygon, Sizing::px_per_degree(2000.0)).unwrap();
    let center_lat = (frame.origin[1] + frame.end[1]) / 2.0;
    let one_degree = haversine_distance(
        GeoCoord::new(center_lat - 0.5, 0.0),
        GeoCoord::new(center_lat + 0.5, 0.0),
    );
    assert_approx_eq!(frame.meters_to_pixels(one_degree), 2000.0, 1e-6);
}

#[test]
fn test_random_points_inside_bounds_project_inside_raster() {
    let polygon = fixtures::quad_field();
    let frame = GeoProjector::new(&polygon, Sizing::fit(256, 256)).unwrap();
    let bounds = (frame.origin[1], frame.origin[0], frame.end[1], frame.end[0]);
    for point in random_geo_points(200, bounds, 25.0, 11) {
        assert_inside_raster(&frame, point.coord());
    }
}

#[test]
fn test_missing_directive() {
    let err = GeoProjector::new(&fixtures::quad_field(), Sizing::default()).unwrap_err();
    assert!(matches!(err, HeatmapError::Configuration(_)));
}
