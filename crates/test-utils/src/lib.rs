//! Shared test utilities for the heatmap workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Approximate equality macros for floats and colours
//! - Sample point generators
//! - Real field polygons used as fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, fixtures};
//! ```

pub mod fixtures;
pub mod generators;

pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro asserting two RGB(A) byte arrays differ by at most `tolerance`
/// per channel.
///
/// ```
/// use test_utils::assert_color_near;
///
/// assert_color_near!([254, 255, 254], [255, 255, 255], 1);
/// ```
#[macro_export]
macro_rules! assert_color_near {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left = $left;
        let right = $right;
        assert_eq!(left.len(), right.len(), "channel count differs");
        for (channel, (l, r)) in left.iter().zip(right.iter()).enumerate() {
            let diff = (*l as i32 - *r as i32).abs();
            if diff > $tolerance as i32 {
                panic!(
                    "assertion failed: colors differ in channel {}\n  left: `{:?}`,\n right: `{:?}`",
                    channel, left, right
                );
            }
        }
    }};
}
