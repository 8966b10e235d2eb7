//! Height-field terrain built from a noise grid.
//!
//! A [`Terrain`] is built in one go and handed out by value, so the engine
//! either keeps rendering the previous grid or swaps in a complete new one.

use crate::color::Rgb;
use crate::constants::*;
use crate::noise::{self, NoiseField};
use crate::palette::Palette;
use crate::params::SentimentClass;
use glam::Vec3;

/// Shape constants chosen from the sentiment class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainProfile {
    pub max_height: f32,
    pub roughness: f32,
    pub variation: f32,
    pub smoothing: f32,
}

impl TerrainProfile {
    pub fn for_sentiment(class: SentimentClass, score: f32) -> Self {
        let m = score.abs().min(1.0);
        match class {
            // rolling hills
            SentimentClass::Positive => Self {
                max_height: 90.0,
                roughness: 0.45,
                variation: 0.8 + 0.2 * m,
                smoothing: 0.6,
            },
            SentimentClass::Neutral => Self {
                max_height: 110.0,
                roughness: 0.55,
                variation: 0.9,
                smoothing: 0.35,
            },
            // jagged peaks
            SentimentClass::Negative => Self {
                max_height: 150.0,
                roughness: 0.72,
                variation: 1.0 + 0.2 * m,
                smoothing: 0.1,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainPoint {
    pub position: Vec3,
    pub height: f32,
    /// Normalised noise value the point was built from; drives its color band.
    pub elevation: f32,
    pub color: Rgb,
    pub normal: Vec3,
}

#[derive(Clone, Debug)]
pub struct Terrain {
    resolution: usize,
    spacing: f32,
    profile: TerrainProfile,
    points: Vec<TerrainPoint>,
}

impl Terrain {
    /// Builds a full grid. `resolution` is clamped to at least 2.
    pub fn build(
        resolution: usize,
        spacing: f32,
        palette: &Palette,
        class: SentimentClass,
        score: f32,
        seed: u64,
    ) -> Self {
        let resolution = resolution.max(2);
        let profile = TerrainProfile::for_sentiment(class, score);
        let field = noise::generate(resolution, profile.roughness, seed);

        let mut terrain = Self {
            resolution,
            spacing,
            profile,
            points: raw_points(&field, spacing, &profile, palette),
        };
        terrain.compute_normals(false);
        if profile.smoothing > 0.0 {
            terrain.smooth(profile.smoothing);
        }
        terrain
    }

    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn profile(&self) -> &TerrainProfile {
        &self.profile
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &TerrainPoint {
        &self.points[row * self.resolution + col]
    }

    pub fn points(&self) -> &[TerrainPoint] {
        &self.points
    }

    /// Every quad as `[top-left, top-right, bottom-right, bottom-left]`.
    pub fn quads(&self) -> impl Iterator<Item = [&TerrainPoint; 4]> + '_ {
        let n = self.resolution;
        (0..n - 1).flat_map(move |r| {
            (0..n - 1).map(move |c| {
                [
                    self.get(r, c),
                    self.get(r, c + 1),
                    self.get(r + 1, c + 1),
                    self.get(r + 1, c),
                ]
            })
        })
    }

    /// Reassigns band colors from a new palette without touching geometry.
    pub fn recolor(&mut self, palette: &Palette) {
        for p in &mut self.points {
            p.color = band_color(p.elevation, palette);
        }
    }

    /// One blend pass over interior points towards their 8-neighbour mean.
    /// Border points keep their heights and their raw normals.
    fn smooth(&mut self, factor: f32) {
        let n = self.resolution;
        if n < 3 {
            return;
        }
        let factor = factor.clamp(0.0, 1.0);
        let heights: Vec<f32> = self.points.iter().map(|p| p.height).collect();
        for r in 1..n - 1 {
            for c in 1..n - 1 {
                let mut sum = 0.0;
                for dr in [-1_isize, 0, 1] {
                    for dc in [-1_isize, 0, 1] {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        let rr = (r as isize + dr) as usize;
                        let cc = (c as isize + dc) as usize;
                        sum += heights[rr * n + cc];
                    }
                }
                let own = heights[r * n + c];
                let smoothed = own * (1.0 - factor) + (sum / 8.0) * factor;
                let p = &mut self.points[r * n + c];
                p.height = smoothed;
                p.position.y = smoothed;
            }
        }
        self.compute_normals(true);
    }

    /// Central differences on rows and columns; one-sided at the borders.
    fn compute_normals(&mut self, interior_only: bool) {
        let n = self.resolution;
        let heights: Vec<f32> = self.points.iter().map(|p| p.height).collect();
        let h = |r: usize, c: usize| heights[r * n + c];
        for r in 0..n {
            for c in 0..n {
                let border = r == 0 || c == 0 || r == n - 1 || c == n - 1;
                if interior_only && border {
                    continue;
                }
                let (c0, c1) = (c.saturating_sub(1), (c + 1).min(n - 1));
                let (r0, r1) = (r.saturating_sub(1), (r + 1).min(n - 1));
                let dx = (h(r, c1) - h(r, c0)) / ((c1 - c0) as f32 * self.spacing);
                let dz = (h(r1, c) - h(r0, c)) / ((r1 - r0) as f32 * self.spacing);
                self.points[r * n + c].normal = Vec3::new(-dx, 1.0, -dz).normalize();
            }
        }
    }
}

fn raw_points(
    field: &NoiseField,
    spacing: f32,
    profile: &TerrainProfile,
    palette: &Palette,
) -> Vec<TerrainPoint> {
    let n = field.size();
    let half_width = (n - 1) as f32 * spacing * 0.5;
    let mut points = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            let elevation = field.get(row, col);
            let height = elevation * profile.max_height * profile.variation;
            points.push(TerrainPoint {
                position: Vec3::new(
                    col as f32 * spacing - half_width,
                    height,
                    TERRAIN_Z_OFFSET + row as f32 * spacing,
                ),
                height,
                elevation,
                color: band_color(elevation, palette),
                normal: Vec3::Y,
            });
        }
    }
    points
}

fn band_color(elevation: f32, palette: &Palette) -> Rgb {
    let band = if elevation < BAND_LOW_MAX {
        palette.secondary
    } else if elevation < BAND_MID_MAX {
        palette.primary
    } else {
        palette.accent
    };
    band.lerp(palette.shadow, (1.0 - elevation) * VALLEY_SHADOW_MIX)
        .clamped()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;
    use crate::params::SceneParameters;

    fn flat_terrain(n: usize) -> Terrain {
        let pal = palette::map(&SceneParameters::default());
        let field = NoiseField::flat_for_tests(n);
        let profile = TerrainProfile::for_sentiment(SentimentClass::Neutral, 0.0);
        let mut t = Terrain {
            resolution: n,
            spacing: 10.0,
            profile,
            points: raw_points(&field, 10.0, &profile, &pal),
        };
        t.compute_normals(false);
        t
    }

    #[test]
    fn flat_grid_has_straight_up_normals() {
        let t = flat_terrain(5);
        for p in t.points() {
            assert!((p.normal - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn smoothing_leaves_border_untouched() {
        let mut t = flat_terrain(5);
        for p in &mut t.points {
            p.height = 0.0;
            p.position.y = 0.0;
        }
        t.points[2 * 5 + 2].height = 50.0;
        t.points[2 * 5 + 2].position.y = 50.0;
        t.points[0].height = 30.0;
        let border_normal = t.points[0].normal;
        t.smooth(0.5);
        assert_eq!(t.points[0].height, 30.0);
        assert_eq!(t.points[0].normal, border_normal);
        assert!((t.get(2, 2).height - 25.0).abs() < 1e-4);
    }
}
