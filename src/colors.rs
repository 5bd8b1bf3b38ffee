//! Color constants and helpers.
//!
//! Pixels are packed as ARGB8888 `u32`s, matching the streaming texture the
//! window presents. Shading math works on [`Rgb`] with `f32` channels that
//! are nominally in `[0, 1]` but are only clamped when packed.

use std::ops::{Add, Mul};

use thiserror::Error;

pub const BACKGROUND: u32 = 0xFF1E1E1E;
pub const WIREFRAME: u32 = 0xFF202020;
pub const AXIS_X: u32 = 0xFFFF4040;
pub const AXIS_Y: u32 = 0xFF40FF40;
pub const AXIS_Z: u32 = 0xFF4080FF;

/// Default ground color, `#84bbfa`.
pub const GROUND: Rgb = Rgb::new(0x84 as f32 / 255.0, 0xbb as f32 / 255.0, 0xfa as f32 / 255.0);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color '{0}'; expected #rrggbb")]
pub struct ColorParseError(pub String);

/// A linear RGB triple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(text: &str) -> Result<Self, ColorParseError> {
        let digits = text.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError(text.to_string()));
        }
        let value =
            u32::from_str_radix(digits, 16).map_err(|_| ColorParseError(text.to_string()))?;
        Ok(Self::from_argb(0xFF00_0000 | value))
    }

    pub fn from_argb(color: u32) -> Self {
        let (r, g, b) = unpack_color(color);
        Self::new(r, g, b)
    }

    /// Packs into ARGB8888, clamping each channel to `[0, 1]`.
    pub fn to_argb(self) -> u32 {
        pack_color(self.r, self.g, self.b, 1.0)
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        let (r, g, b) = lerp_color((self.r, self.g, self.b), (other.r, other.g, other.b), t);
        Self::new(r, g, b)
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

impl Add for Rgb {
    type Output = Rgb;

    fn add(self, rhs: Rgb) -> Rgb {
        Rgb::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl Mul<f32> for Rgb {
    type Output = Rgb;

    fn mul(self, rhs: f32) -> Rgb {
        Rgb::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

/// Packs float channels into ARGB8888. Channels are clamped, NaN packs as 0.
#[inline]
pub fn pack_color(r: f32, g: f32, b: f32, a: f32) -> u32 {
    #[inline]
    fn channel(value: f32) -> u32 {
        // `as` maps NaN to 0
        (value.clamp(0.0, 1.0) * 255.0).round() as u32
    }
    (channel(a) << 24) | (channel(r) << 16) | (channel(g) << 8) | channel(b)
}

/// Unpacks the RGB channels of an ARGB8888 color into `[0, 1]` floats.
#[inline]
pub fn unpack_color(color: u32) -> (f32, f32, f32) {
    let r = ((color >> 16) & 0xFF) as f32 / 255.0;
    let g = ((color >> 8) & 0xFF) as f32 / 255.0;
    let b = (color & 0xFF) as f32 / 255.0;
    (r, g, b)
}

#[inline]
pub fn lerp_color(a: (f32, f32, f32), b: (f32, f32, f32), t: f32) -> (f32, f32, f32) {
    (
        a.0 + (b.0 - a.0) * t,
        a.1 + (b.1 - a.1) * t,
        a.2 + (b.2 - a.2) * t,
    )
}

/// Alpha-blends `src` over `dst`, both packed. The result is opaque.
#[inline]
pub fn blend(dst: u32, src: u32, alpha: f32) -> u32 {
    let (r, g, b) = lerp_color(unpack_color(dst), unpack_color(src), alpha);
    pack_color(r, g, b, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pack_unpack_round_trip() {
        let (r, g, b) = unpack_color(pack_color(1.0, 0.5, 0.0, 1.0));
        assert_relative_eq!(r, 1.0);
        assert_relative_eq!(g, 128.0 / 255.0);
        assert_relative_eq!(b, 0.0);
    }

    #[test]
    fn packing_clamps_out_of_range_channels() {
        assert_eq!(pack_color(1.7, -0.3, 0.0, 1.0), 0xFFFF0000);
        assert_eq!(Rgb::new(f32::NAN, 0.0, 2.0).to_argb(), 0xFF0000FF);
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Rgb::from_hex("#84bbfa").unwrap(), GROUND);
        assert_eq!(Rgb::from_hex("ffffff").unwrap(), Rgb::WHITE);
        assert_eq!(Rgb::from_hex("#84bbfa").unwrap().to_argb(), 0xFF84BBFA);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Rgb::from_hex("#84bbf").is_err());
        assert!(Rgb::from_hex("#84bbfz").is_err());
        assert!(Rgb::from_hex("blue").is_err());
    }

    #[test]
    fn blend_halfway() {
        let mixed = blend(0xFF000000, 0xFFFFFFFF, 0.5);
        assert_eq!(mixed, 0xFF808080);
    }
}
