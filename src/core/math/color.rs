//! Colors and gradient stops.
//!
//! Channels are straight (non-premultiplied) floats in [0, 1]. Interpolation is
//! linear per RGBA channel; only `brighten`/`darken` go through linear light.

use serde::{Deserialize, Serialize};

use super::easing::clamp_unit;

pub const DEFAULT_GAMMA: f32 = 2.2;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional)
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::from_rgba8(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::from_rgba8(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (clamp_unit(c) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Packed `0xRRGGBBAA`, the layout the render buffer hands to JS
    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.to_rgba8())
    }

    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// Linear per-channel blend, `t` clamped to [0, 1]
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = clamp_unit(t);
        Rgba::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba { a: clamp_unit(a), ..self }
    }

    /// Scale light intensity by `1 + amount` in linear space
    pub fn brighten(self, amount: f32, gamma: f32) -> Rgba {
        self.scale_linear(1.0 + amount.max(0.0), gamma)
    }

    /// Scale light intensity by `1 - amount` in linear space
    pub fn darken(self, amount: f32, gamma: f32) -> Rgba {
        self.scale_linear(1.0 - clamp_unit(amount), gamma)
    }

    fn scale_linear(self, factor: f32, gamma: f32) -> Rgba {
        let gamma = if gamma.is_finite() && gamma > 0.0 { gamma } else { DEFAULT_GAMMA };
        let convert = |c: f32| {
            let linear = clamp_unit(c).powf(gamma) * factor;
            clamp_unit(linear).powf(1.0 / gamma)
        };
        Rgba::new(convert(self.r), convert(self.g), convert(self.b), self.a)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::WHITE
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgba::from_hex(&value).ok_or_else(|| format!("invalid color '{value}', expected #RRGGBB or #RRGGBBAA"))
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_hex()
    }
}

/// One stop of a radial/linear gradient fill
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrips_through_u8() {
        let c = Rgba::from_hex("#3A7BFF").unwrap();
        assert_eq!(c.to_rgba8(), [0x3A, 0x7B, 0xFF, 0xFF]);
        assert_eq!(c.to_hex(), "#3A7BFF");
        assert_eq!(Rgba::from_hex("00000080").unwrap().to_rgba8()[3], 0x80);
        assert!(Rgba::from_hex("#12345").is_none());
        assert!(Rgba::from_hex("#GG0000").is_none());
    }

    #[test]
    fn lerp_is_linear_per_channel() {
        let a = Rgba::new(0.0, 0.2, 1.0, 1.0);
        let b = Rgba::new(1.0, 0.4, 0.0, 0.0);
        let mid = a.lerp(b, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.g - 0.3).abs() < 1e-6);
        assert!((mid.b - 0.5).abs() < 1e-6);
        assert!((mid.a - 0.5).abs() < 1e-6);
        assert_eq!(a.lerp(b, 4.0), b);
    }

    #[test]
    fn gamma_brighten_and_darken_stay_in_range() {
        let c = Rgba::new(0.5, 0.5, 0.5, 0.7);
        let bright = c.brighten(0.5, DEFAULT_GAMMA);
        let dark = c.darken(0.5, DEFAULT_GAMMA);
        assert!(bright.r > c.r && bright.r <= 1.0);
        assert!(dark.r < c.r && dark.r >= 0.0);
        assert_eq!(bright.a, 0.7);
        // Halving linear light of mid grey lands at 0.5 * 0.5^(1/2.2)
        let expected = (0.5f32.powf(2.2) * 0.5).powf(1.0 / 2.2);
        assert!((dark.g - expected).abs() < 1e-5);
        assert_eq!(Rgba::WHITE.brighten(1.0, 2.2).r, 1.0);
    }
}
