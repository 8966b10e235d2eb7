//! Midpoint-displacement height fields.
//!
//! The grid is subdivided recursively: edge midpoints and the centre of each
//! square are the average of its corners plus an offset hashed from the
//! sample's coordinates. Because the offset only depends on the coordinates
//! and the build seed, two quadrants that share an edge compute the same
//! values for it, so recursion order does not matter.

/// Square grid of values in `[0, 1]`, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseField {
    size: usize,
    values: Vec<f32>,
}

impl NoiseField {
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.values[row * self.size + col]
    }

    #[cfg(test)]
    pub(crate) fn flat_for_tests(size: usize) -> Self {
        Self {
            size,
            values: vec![0.5; size * size],
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Bilinear sample with wrap-around in both axes; `u`, `v` in any range.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let n = self.size;
        if n == 1 {
            return self.values[0];
        }
        let span = (n - 1) as f32;
        let x = u.rem_euclid(1.0) * span;
        let y = v.rem_euclid(1.0) * span;
        let x0 = (x.floor() as usize).min(n - 2);
        let y0 = (y.floor() as usize).min(n - 2);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;
        let top = self.get(y0, x0) + (self.get(y0, x0 + 1) - self.get(y0, x0)) * fx;
        let bottom = self.get(y0 + 1, x0) + (self.get(y0 + 1, x0 + 1) - self.get(y0 + 1, x0)) * fx;
        top + (bottom - top) * fy
    }
}

/// Builds a `resolution x resolution` field normalised to `[0, 1]`.
///
/// `roughness` in `(0, 1)` is the factor by which displacement shrinks per
/// subdivision level; higher values keep more fine detail.
pub fn generate(resolution: usize, roughness: f32, seed: u64) -> NoiseField {
    let resolution = resolution.max(1);
    let roughness = roughness.clamp(0.05, 0.95);
    let work = working_size(resolution);

    let mut grid = vec![0.0_f32; work * work];
    let last = work - 1;
    for &(x, y) in &[(0, 0), (last, 0), (0, last), (last, last)] {
        grid[y * work + x] = 0.5 + coord_offset(seed, x, y);
    }
    subdivide(&mut grid, work, seed, (0, 0, last, last), 1.0, roughness);

    let mut values = Vec::with_capacity(resolution * resolution);
    for row in 0..resolution {
        values.extend_from_slice(&grid[row * work..row * work + resolution]);
    }
    normalize(&mut values);
    NoiseField {
        size: resolution,
        values,
    }
}

/// Smallest `2^k + 1` that covers `resolution`.
fn working_size(resolution: usize) -> usize {
    let mut n = 1;
    while n + 1 < resolution {
        n *= 2;
    }
    n + 1
}

fn subdivide(
    grid: &mut [f32],
    size: usize,
    seed: u64,
    (x0, y0, x1, y1): (usize, usize, usize, usize),
    scale: f32,
    roughness: f32,
) {
    if x1 - x0 < 2 || y1 - y0 < 2 {
        return;
    }
    let mx = (x0 + x1) / 2;
    let my = (y0 + y1) / 2;
    let at = |x: usize, y: usize| y * size + x;

    let tl = grid[at(x0, y0)];
    let tr = grid[at(x1, y0)];
    let bl = grid[at(x0, y1)];
    let br = grid[at(x1, y1)];

    let mut displace = |x: usize, y: usize, base: f32| {
        grid[at(x, y)] = base + coord_offset(seed, x, y) * scale;
    };
    displace(mx, y0, (tl + tr) * 0.5);
    displace(mx, y1, (bl + br) * 0.5);
    displace(x0, my, (tl + bl) * 0.5);
    displace(x1, my, (tr + br) * 0.5);
    displace(mx, my, (tl + tr + bl + br) * 0.25);

    let next = scale * roughness;
    subdivide(grid, size, seed, (x0, y0, mx, my), next, roughness);
    subdivide(grid, size, seed, (mx, y0, x1, my), next, roughness);
    subdivide(grid, size, seed, (x0, my, mx, y1), next, roughness);
    subdivide(grid, size, seed, (mx, my, x1, y1), next, roughness);
}

/// Deterministic pseudo-random offset in `[-0.5, 0.5)` for a grid coordinate.
fn coord_offset(seed: u64, x: usize, y: usize) -> f32 {
    let mut h = seed
        ^ (x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    h = h.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    h ^= h >> 33;
    (h >> 40) as f32 / (1u64 << 24) as f32 - 0.5
}

fn normalize(values: &mut [f32]) {
    let (min, max) = values
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;
    if !range.is_finite() || range < 1e-6 {
        values.iter_mut().for_each(|v| *v = 0.5);
        return;
    }
    for v in values.iter_mut() {
        *v = ((*v - min) / range).clamp(0.0, 1.0);
    }
}
