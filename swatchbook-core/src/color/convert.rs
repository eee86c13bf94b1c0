//! Conversions into RGB
//!
//! One pure function per source space. Output is always clamped to 0.0..=1.0.

use super::ColorSpace;

// D65 reference white
const WHITE_X: f64 = 0.95047;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.08883;

const LAB_DELTA: f64 = 6.0 / 29.0;

pub(super) fn to_rgb(space: ColorSpace, components: &[f32]) -> [f32; 3] {
    let rgb = match space {
        ColorSpace::Rgb => [components[0], components[1], components[2]],
        ColorSpace::Gray => gray_to_rgb(components[0]),
        ColorSpace::Cmyk => cmyk_to_rgb(components[0], components[1], components[2], components[3]),
        ColorSpace::Lab => lab_to_rgb(components[0], components[1], components[2]),
    };
    rgb.map(|c| c.clamp(0.0, 1.0))
}

fn gray_to_rgb(value: f32) -> [f32; 3] {
    [value, value, value]
}

fn cmyk_to_rgb(c: f32, m: f32, y: f32, k: f32) -> [f32; 3] {
    [(1.0 - c) * (1.0 - k), (1.0 - m) * (1.0 - k), (1.0 - y) * (1.0 - k)]
}

fn lab_to_rgb(l: f32, a: f32, b: f32) -> [f32; 3] {
    let fy = (l as f64 + 16.0) / 116.0;
    let fx = fy + a as f64 / 500.0;
    let fz = fy - b as f64 / 200.0;

    let x = WHITE_X * lab_f_inverse(fx);
    let y = WHITE_Y * lab_f_inverse(fy);
    let z = WHITE_Z * lab_f_inverse(fz);

    // XYZ -> linear sRGB (IEC 61966-2-1)
    let r = 3.2404542 * x - 1.5371385 * y - 0.4985314 * z;
    let g = -0.9692660 * x + 1.8760108 * y + 0.0415560 * z;
    let b = 0.0556434 * x - 0.2040259 * y + 1.0572252 * z;

    [srgb_compand(r), srgb_compand(g), srgb_compand(b)]
}

fn lab_f_inverse(t: f64) -> f64 {
    if t > LAB_DELTA {
        t * t * t
    } else {
        3.0 * LAB_DELTA * LAB_DELTA * (t - 4.0 / 29.0)
    }
}

fn srgb_compand(linear: f64) -> f32 {
    let linear = linear.clamp(0.0, 1.0);
    let value = if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    value as f32
}
