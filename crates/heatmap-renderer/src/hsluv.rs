//! HSLuv colour space.
//!
//! A human-friendly variant of CIE LCh(uv): saturation is expressed as a
//! percentage of the largest chroma displayable in sRGB for the given
//! lightness and hue, so every (H, S, L) in range maps to a valid colour.
//! Channels are H in degrees [0, 360), S and L in [0, 100]; RGB channels
//! are normalised to [0, 1].

use std::f64::consts::PI;

/// XYZ (D65) to linear sRGB.
const M: [[f64; 3]; 3] = [
    [3.240969941904521, -1.537383177570093, -0.498610760293],
    [-0.96924363628087, 1.87596750150772, 0.041555057407175],
    [0.055630079696993, -0.20397695888897, 1.056971514242878],
];

/// Linear sRGB to XYZ (D65).
const M_INV: [[f64; 3]; 3] = [
    [0.41239079926595, 0.35758433938387, 0.18048078840183],
    [0.21263900587151, 0.71516867876775, 0.072192315360733],
    [0.019330818715591, 0.11919477979462, 0.95053215224966],
];

const REF_U: f64 = 0.19783000664283;
const REF_V: f64 = 0.46831999493879;
const KAPPA: f64 = 903.2962962;
const EPSILON: f64 = 0.0088564516;

/// Convert normalised sRGB to `[H, S, L]`.
pub fn rgb_to_hsluv(rgb: [f64; 3]) -> [f64; 3] {
    lch_to_hsluv(luv_to_lch(xyz_to_luv(rgb_to_xyz(rgb))))
}

/// Convert `[H, S, L]` to normalised sRGB (not clamped).
pub fn hsluv_to_rgb(hsl: [f64; 3]) -> [f64; 3] {
    xyz_to_rgb(luv_to_xyz(lch_to_luv(hsluv_to_lch(hsl))))
}

/// Lines bounding the sRGB gamut in the (u, v) plane at lightness `l`,
/// as (slope, intercept) pairs.
fn gamut_bounds(l: f64) -> [(f64, f64); 6] {
    let sub1 = (l + 16.0).powi(3) / 1_560_896.0;
    let sub2 = if sub1 > EPSILON { sub1 } else { l / KAPPA };

    let mut bounds = [(0.0, 0.0); 6];
    for (c, row) in M.iter().enumerate() {
        let [m1, m2, m3] = *row;
        for t in 0..2 {
            let t = t as f64;
            let top1 = (284_517.0 * m1 - 94_839.0 * m3) * sub2;
            let top2 = (838_422.0 * m3 + 769_860.0 * m2 + 731_718.0 * m1) * l * sub2
                - 769_860.0 * t * l;
            let bottom = (632_260.0 * m3 - 126_452.0 * m2) * sub2 + 126_452.0 * t;
            bounds[c * 2 + t as usize] = (top1 / bottom, top2 / bottom);
        }
    }
    bounds
}

fn max_chroma_for(l: f64, h: f64) -> f64 {
    let hrad = h / 360.0 * 2.0 * PI;
    gamut_bounds(l)
        .iter()
        .map(|&(slope, intercept)| intercept / (hrad.sin() - slope * hrad.cos()))
        .filter(|len| *len >= 0.0)
        .fold(f64::INFINITY, f64::min)
}

fn dot(row: &[f64; 3], v: [f64; 3]) -> f64 {
    row[0] * v[0] + row[1] * v[1] + row[2] * v[2]
}

fn from_linear(c: f64) -> f64 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn to_linear(c: f64) -> f64 {
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

fn xyz_to_rgb(xyz: [f64; 3]) -> [f64; 3] {
    [
        from_linear(dot(&M[0], xyz)),
        from_linear(dot(&M[1], xyz)),
        from_linear(dot(&M[2], xyz)),
    ]
}

fn rgb_to_xyz(rgb: [f64; 3]) -> [f64; 3] {
    let linear = [to_linear(rgb[0]), to_linear(rgb[1]), to_linear(rgb[2])];
    [
        dot(&M_INV[0], linear),
        dot(&M_INV[1], linear),
        dot(&M_INV[2], linear),
    ]
}

fn y_to_l(y: f64) -> f64 {
    if y <= EPSILON {
        y * KAPPA
    } else {
        116.0 * y.cbrt() - 16.0
    }
}

fn l_to_y(l: f64) -> f64 {
    if l <= 8.0 {
        l / KAPPA
    } else {
        ((l + 16.0) / 116.0).powi(3)
    }
}

fn xyz_to_luv([x, y, z]: [f64; 3]) -> [f64; 3] {
    let divider = x + 15.0 * y + 3.0 * z;
    let l = y_to_l(y);
    if l == 0.0 || divider == 0.0 {
        return [l, 0.0, 0.0];
    }
    let var_u = 4.0 * x / divider;
    let var_v = 9.0 * y / divider;
    [l, 13.0 * l * (var_u - REF_U), 13.0 * l * (var_v - REF_V)]
}

fn luv_to_xyz([l, u, v]: [f64; 3]) -> [f64; 3] {
    if l == 0.0 {
        return [0.0, 0.0, 0.0];
    }
    let var_u = u / (13.0 * l) + REF_U;
    let var_v = v / (13.0 * l) + REF_V;
    let y = l_to_y(l);
    let x = -(9.0 * y * var_u) / ((var_u - 4.0) * var_v - var_u * var_v);
    let z = (9.0 * y - 15.0 * var_v * y - var_v * x) / (3.0 * var_v);
    [x, y, z]
}

fn luv_to_lch([l, u, v]: [f64; 3]) -> [f64; 3] {
    let c = (u * u + v * v).sqrt();
    let h = if c < 1e-8 {
        0.0
    } else {
        v.atan2(u).to_degrees().rem_euclid(360.0)
    };
    [l, c, h]
}

fn lch_to_luv([l, c, h]: [f64; 3]) -> [f64; 3] {
    let hrad = h.to_radians();
    [l, hrad.cos() * c, hrad.sin() * c]
}

fn hsluv_to_lch([h, s, l]: [f64; 3]) -> [f64; 3] {
    if l > 99.9999999 {
        return [100.0, 0.0, h];
    }
    if l < 1e-8 {
        return [0.0, 0.0, h];
    }
    [l, max_chroma_for(l, h) / 100.0 * s, h]
}

fn lch_to_hsluv([l, c, h]: [f64; 3]) -> [f64; 3] {
    if l > 99.9999999 {
        return [h, 0.0, 100.0];
    }
    if l < 1e-8 {
        return [h, 0.0, 0.0];
    }
    [h, c / max_chroma_for(l, h) * 100.0, l]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rgb_close(a: [f64; 3], b: [f64; 3]) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-6, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn test_primaries_round_trip() {
        for rgb in [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 0.0],
            [0.2, 0.4, 0.6],
            [254.0 / 255.0, 1.0, 254.0 / 255.0],
        ] {
            assert_rgb_close(hsluv_to_rgb(rgb_to_hsluv(rgb)), rgb);
        }
    }

    #[test]
    fn test_black_and_white() {
        let white = rgb_to_hsluv([1.0, 1.0, 1.0]);
        assert!((white[2] - 100.0).abs() < 1e-6);
        let black = rgb_to_hsluv([0.0, 0.0, 0.0]);
        assert_eq!(black[2], 0.0);
        assert_rgb_close(hsluv_to_rgb([0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_pure_red_reference() {
        // Reference values published at hsluv.org.
        let [h, s, l] = rgb_to_hsluv([1.0, 0.0, 0.0]);
        assert!((h - 12.177).abs() < 1e-2);
        assert!((s - 100.0).abs() < 1e-6);
        assert!((l - 53.237).abs() < 1e-2);
    }
}
