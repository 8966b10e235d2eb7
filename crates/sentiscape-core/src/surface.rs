//! CPU raster target and the handful of primitives the compositor needs.
//!
//! Everything reduces to alpha-blended triangles (edge-function rasteriser
//! with barycentric color interpolation) and soft discs. There is no depth
//! buffer; callers draw back to front.

use crate::color::{Rgb, Rgba8};
use crate::error::SurfaceError;
use glam::Vec2;

pub const MAX_SURFACE_DIM: u32 = 8192;

/// Static copy of a composited frame, tightly packed RGBA8 rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Snapshot {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.rgba.get(i..i + 4).map(|s| [s[0], s[1], s[2], s[3]])
    }
}

pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

fn check_dims(width: u32, height: u32) -> Result<(), SurfaceError> {
    if width == 0 || height == 0 {
        return Err(SurfaceError::ZeroSized { width, height });
    }
    if width > MAX_SURFACE_DIM || height > MAX_SURFACE_DIM {
        return Err(SurfaceError::TooLarge {
            width,
            height,
            max: MAX_SURFACE_DIM,
        });
    }
    Ok(())
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        check_dims(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![Rgba8::default(); (width * height) as usize],
        })
    }

    /// Reallocates for new dimensions; returns whether anything changed.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<bool, SurfaceError> {
        check_dims(width, height)?;
        if width == self.width && height == self.height {
            return Ok(false);
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![Rgba8::default(); (width * height) as usize];
        Ok(true)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Raw RGBA bytes, ready for `ImageData` or an image encoder.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.width,
            height: self.height,
            rgba: self.as_bytes().to_vec(),
        }
    }

    pub fn clear(&mut self, color: Rgb) {
        let px = color.to_rgba8(1.0);
        self.pixels.fill(px);
    }

    /// Opaque top-to-bottom gradient.
    pub fn vertical_gradient(&mut self, top: Rgb, bottom: Rgb) {
        let h = self.height.max(2) - 1;
        let w = self.width as usize;
        for (y, row) in self.pixels.chunks_exact_mut(w).enumerate() {
            let c = top.lerp(bottom, y as f32 / h as f32).to_rgba8(1.0);
            row.fill(c);
        }
    }

    /// Blends a color into every pixel of one row span, with per-pixel alpha.
    pub fn blend_row(&mut self, y: u32, mut alpha_at: impl FnMut(u32) -> f32, color: Rgb) {
        if y >= self.height {
            return;
        }
        let start = (y * self.width) as usize;
        for x in 0..self.width {
            let a = alpha_at(x);
            if a > 0.0 {
                self.pixels[start + x as usize].blend(color, a);
            }
        }
    }

    #[inline]
    fn blend_at(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let i = y as usize * self.width as usize + x as usize;
        self.pixels[i].blend(color, alpha);
    }

    /// Triangle with colors interpolated across its vertices.
    pub fn fill_triangle(&mut self, pts: [Vec2; 3], colors: [Rgb; 3], alpha: f32) {
        if alpha <= 0.0 || !pts.iter().all(|p| p.is_finite()) {
            return;
        }
        let [a, b, c] = pts;
        let area = edge(a, b, c);
        if area.abs() < 1e-6 {
            return;
        }
        let min = a.min(b).min(c).floor().max(Vec2::ZERO);
        let max = a
            .max(b)
            .max(c)
            .ceil()
            .min(Vec2::new(self.width as f32 - 1.0, self.height as f32 - 1.0));
        if min.x > max.x || min.y > max.y {
            return;
        }
        let inv_area = 1.0 / area;
        let flat = colors[0] == colors[1] && colors[1] == colors[2];

        for y in min.y as i32..=max.y as i32 {
            for x in min.x as i32..=max.x as i32 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(b, c, p) * inv_area;
                let w1 = edge(c, a, p) * inv_area;
                let w2 = edge(a, b, p) * inv_area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let color = if flat {
                    colors[0]
                } else {
                    Rgb::new(
                        colors[0].r * w0 + colors[1].r * w1 + colors[2].r * w2,
                        colors[0].g * w0 + colors[1].g * w1 + colors[2].g * w2,
                        colors[0].b * w0 + colors[1].b * w1 + colors[2].b * w2,
                    )
                };
                self.blend_at(x, y, color, alpha);
            }
        }
    }

    pub fn fill_triangle_flat(&mut self, pts: [Vec2; 3], color: Rgb, alpha: f32) {
        self.fill_triangle(pts, [color; 3], alpha);
    }

    /// Convex polygon fanned from `center` through consecutive `ring` points.
    pub fn fill_fan(&mut self, center: Vec2, ring: &[Vec2], color: Rgb, alpha: f32) {
        for (i, &p) in ring.iter().enumerate() {
            let q = ring[(i + 1) % ring.len()];
            self.fill_triangle_flat([center, p, q], color, alpha);
        }
    }

    /// Disc with a one pixel soft edge.
    pub fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        if alpha <= 0.0 || radius <= 0.0 || !center.is_finite() {
            return;
        }
        let r_outer = radius + 0.5;
        let x0 = (center.x - r_outer).floor().max(0.0) as i32;
        let x1 = (center.x + r_outer).ceil().min(self.width as f32 - 1.0) as i32;
        let y0 = (center.y - r_outer).floor().max(0.0) as i32;
        let y1 = (center.y + r_outer).ceil().min(self.height as f32 - 1.0) as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_at(x, y, color, alpha * coverage);
                }
            }
        }
    }

    /// Thick segment drawn as a quad.
    pub fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, color: Rgb, alpha: f32) {
        let dir = b - a;
        let Some(n) = dir.perp().try_normalize() else {
            return;
        };
        let off = n * (width.max(0.5) * 0.5);
        self.fill_triangle_flat([a + off, b + off, b - off], color, alpha);
        self.fill_triangle_flat([a + off, b - off, a - off], color, alpha);
    }
}

/// Twice the signed area of `(a, b, p)`.
#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
