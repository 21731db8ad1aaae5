//! Display-space (sRGB hex) ↔ linear color conversion.
//!
//! Linear values are kept as `f32` like the renderer; the transfer functions
//! are evaluated in `f64` so that every 8-bit channel survives a round trip.

use shared::HexColor;

use crate::state::Color;

fn srgb_to_linear(c: f64) -> f64 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

fn linear_to_srgb(c: f64) -> f64 {
    if c < 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(0.41666) - 0.055
    }
}

fn quantize(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn linear_from_hex(hex: HexColor) -> Color {
    let [r, g, b] = hex.0.map(|v| srgb_to_linear(f64::from(v) / 255.0) as f32);
    Color { r, g, b }
}

pub fn hex_from_linear(color: Color) -> HexColor {
    let channel = |c: f32| quantize(linear_to_srgb(f64::from(c)));
    HexColor::from_rgb(channel(color.r), channel(color.g), channel(color.b))
}
