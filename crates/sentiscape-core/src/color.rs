//! Linear RGB color math and the packed pixel format of the raster surface.

use bytemuck::{Pod, Zeroable};

/// RGB color with channels nominally in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Clamps every channel into `0.0..=1.0`; NaN channels become 0.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            r: clamp_channel(self.r),
            g: clamp_channel(self.g),
            b: clamp_channel(self.b),
        }
    }

    #[must_use]
    pub fn scale(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }

    /// Component-wise product.
    #[must_use]
    pub fn modulate(self, other: Rgb) -> Self {
        Self::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    /// Linear interpolation, `t == 0` yields `self`.
    #[must_use]
    pub fn lerp(self, other: Rgb, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    pub fn luminance(self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    pub fn is_valid(self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }

    pub fn to_rgba8(self, alpha: f32) -> Rgba8 {
        let c = self.clamped();
        Rgba8 {
            r: to_byte(c.r),
            g: to_byte(c.g),
            b: to_byte(c.b),
            a: to_byte(clamp_channel(alpha)),
        }
    }
}

#[inline]
fn clamp_channel(c: f32) -> f32 {
    if c.is_nan() {
        0.0
    } else {
        c.clamp(0.0, 1.0)
    }
}

#[inline]
fn to_byte(c: f32) -> u8 {
    (c * 255.0 + 0.5) as u8
}

/// One surface pixel, laid out exactly like canvas `ImageData` (RGBA bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Source-over blend of `src` (with coverage `alpha`) onto `self`.
    #[inline]
    pub fn blend(&mut self, src: Rgb, alpha: f32) {
        let a = alpha.clamp(0.0, 1.0);
        if a.is_nan() || a <= 0.0 {
            return;
        }
        let s = src.clamped();
        let mix = |d: u8, s: f32| -> u8 {
            let d = d as f32 / 255.0;
            to_byte(d + (s - d) * a)
        };
        self.r = mix(self.r, s.r);
        self.g = mix(self.g, s.g);
        self.b = mix(self.b, s.b);
        self.a = 255;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_bytes() {
        let c = Rgb::from_hex(0xff8000);
        assert_eq!(c.to_rgba8(1.0), Rgba8::opaque(255, 128, 0));
    }

    #[test]
    fn clamped_removes_out_of_range_and_nan() {
        let c = Rgb::new(1.7, -0.2, f32::NAN).clamped();
        assert!(c.is_valid());
        assert_eq!(c, Rgb::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn blend_full_alpha_replaces_pixel() {
        let mut px = Rgba8::opaque(0, 0, 0);
        px.blend(Rgb::WHITE, 1.0);
        assert_eq!(px, Rgba8::opaque(255, 255, 255));
        let mut half = Rgba8::opaque(0, 0, 0);
        half.blend(Rgb::WHITE, 0.5);
        assert!(half.r > 120 && half.r < 135);
    }
}
