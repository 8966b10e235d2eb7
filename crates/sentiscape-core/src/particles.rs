//! Typed, finite-lifetime particle pool.
//!
//! Every kind has its own spawn distribution, per-frame behavior and draw
//! primitive, selected with a `match` on [`ParticleKind`]. Updates are scaled
//! by the frame delta so behavior does not depend on the frame rate.

use crate::color::Rgb;
use crate::constants::*;
use crate::palette::{Palette, Swatch};
use crate::params::{SceneParameters, SentimentClass};
use fnv::FnvHashMap;
use glam::Vec3;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Dust,
    Star,
    Energy,
    Flare,
}

/// Shape used when a particle is rasterised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Disc,
    Quad,
    Star { points: u8 },
    CrossFlare,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn pick(&self, rng: &mut impl Rng) -> f32 {
        if self.max <= self.min {
            self.min
        } else {
            rng.gen_range(self.min..self.max)
        }
    }
}

/// Spawn distribution of one particle kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KindProfile {
    pub size: Span,
    pub speed: Span,
    pub alpha: Span,
    pub life: Span,
    pub spin: f32,
    pub swatch: Swatch,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 4] = [
        ParticleKind::Dust,
        ParticleKind::Star,
        ParticleKind::Energy,
        ParticleKind::Flare,
    ];

    pub fn profile(self) -> KindProfile {
        match self {
            ParticleKind::Dust => KindProfile {
                size: Span::new(2.0, 4.0),
                speed: Span::new(1.0, 6.0),
                alpha: Span::new(0.3, 0.6),
                life: Span::new(6.0, 12.0),
                spin: 0.5,
                swatch: Swatch::Secondary,
            },
            ParticleKind::Star => KindProfile {
                size: Span::new(2.0, 4.0),
                speed: Span::new(0.0, 1.0),
                alpha: Span::new(0.7, 1.0),
                life: Span::new(8.0, 16.0),
                spin: 0.3,
                swatch: Swatch::Highlight,
            },
            ParticleKind::Energy => KindProfile {
                size: Span::new(3.0, 5.0),
                speed: Span::new(15.0, 35.0),
                alpha: Span::new(0.6, 0.9),
                life: Span::new(2.0, 5.0),
                spin: 3.0,
                swatch: Swatch::Accent,
            },
            ParticleKind::Flare => KindProfile {
                size: Span::new(6.0, 12.0),
                speed: Span::new(4.0, 12.0),
                alpha: Span::new(0.5, 0.8),
                life: Span::new(1.5, 3.5),
                spin: 1.0,
                swatch: Swatch::Primary,
            },
        }
    }

    pub fn primitive(self) -> Primitive {
        match self {
            ParticleKind::Dust => Primitive::Disc,
            ParticleKind::Energy => Primitive::Quad,
            ParticleKind::Star => Primitive::Star { points: 5 },
            ParticleKind::Flare => Primitive::CrossFlare,
        }
    }
}

/// Base population per kind, ordered like [`ParticleKind::ALL`].
pub fn base_population(class: SentimentClass) -> [usize; 4] {
    match class {
        SentimentClass::Positive => [20, 40, 50, 6],
        SentimentClass::Neutral => [30, 30, 30, 8],
        SentimentClass::Negative => [50, 15, 15, 12],
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub position: Vec3,
    pub velocity: Vec3,
    pub size: f32,
    pub base_size: f32,
    pub color: Rgb,
    pub alpha: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub life: f32,
    pub max_life: f32,
    /// Oscillation phase for twinkle/pulse.
    pub phase: f32,
}

impl Particle {
    /// Remaining life in `(0, 1]` while alive.
    #[inline]
    pub fn life_ratio(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: StdRng,
    cap: usize,
    spawn_rate: f32,
    weights: [usize; 4],
    magnitude: f32,
    motion: bool,
    palette: Option<Palette>,
    spawn_budget: f32,
    time: f64,
}

impl ParticleSystem {
    pub fn new(cap: usize, spawn_rate: f32, seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(cap),
            rng: StdRng::seed_from_u64(seed),
            cap,
            spawn_rate: spawn_rate.max(0.0),
            weights: base_population(SentimentClass::Neutral),
            magnitude: 0.0,
            motion: true,
            palette: None,
            spawn_budget: 0.0,
            time: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.particles.shrink_to_fit();
        self.spawn_budget = 0.0;
    }

    /// Live particles per kind.
    pub fn census(&self) -> FnvHashMap<ParticleKind, usize> {
        let mut counts = FnvHashMap::default();
        for p in &self.particles {
            *counts.entry(p.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Target count per kind for a parameter snapshot, scaled to fit the cap.
    pub fn target_population(&self, params: &SceneParameters) -> [usize; 4] {
        let scale = (0.6 + 0.8 * params.magnitude()) * params.text_weight();
        let mut counts = base_population(params.sentiment_class).map(|n| (n as f32 * scale).round() as usize);
        let total: usize = counts.iter().sum();
        if total > self.cap {
            let shrink = self.cap as f32 / total as f32;
            counts = counts.map(|n| (n as f32 * shrink).floor() as usize);
        }
        counts
    }

    /// Rebuilds the whole pool for a new sentiment.
    pub fn reseed(&mut self, params: &SceneParameters, palette: &Palette) {
        self.weights = base_population(params.sentiment_class);
        self.magnitude = params.magnitude();
        self.motion = params.motion_enabled;
        self.palette = Some(*palette);
        self.spawn_budget = 0.0;

        let targets = self.target_population(params);
        self.particles.clear();
        for (kind, count) in ParticleKind::ALL.into_iter().zip(targets) {
            for _ in 0..count {
                let p = self.spawn(kind, palette);
                self.particles.push(p);
            }
        }
        log::debug!(
            "[particles] reseed class={} total={} targets={:?}",
            params.sentiment_class.name(),
            self.particles.len(),
            targets
        );
    }

    /// Follows a non-material parameter change without rebuilding the pool.
    pub fn retune(&mut self, params: &SceneParameters) {
        self.weights = base_population(params.sentiment_class);
        self.magnitude = params.magnitude();
        self.motion = params.motion_enabled;
    }

    /// Applies a palette change without rebuilding the pool.
    pub fn set_palette(&mut self, palette: &Palette) {
        self.palette = Some(*palette);
        for p in &mut self.particles {
            p.color = palette.swatch(p.kind.profile().swatch);
        }
    }

    /// Creates one particle of `kind` somewhere inside the simulation volume.
    pub fn spawn(&mut self, kind: ParticleKind, palette: &Palette) -> Particle {
        let profile = kind.profile();
        let rng = &mut self.rng;
        let position = Vec3::new(
            rng.gen_range(-PARTICLE_BOUNDS_X..PARTICLE_BOUNDS_X),
            rng.gen_range(PARTICLE_BOUNDS_Y[0]..PARTICLE_BOUNDS_Y[1]),
            rng.gen_range(PARTICLE_BOUNDS_Z[0]..PARTICLE_BOUNDS_Z[1]),
        );
        let velocity = random_unit(rng) * profile.speed.pick(rng);
        let base_size = profile.size.pick(rng);
        let max_life = profile.life.pick(rng).max(0.1);
        Particle {
            kind,
            position,
            velocity,
            size: base_size,
            base_size,
            color: palette.swatch(profile.swatch),
            alpha: profile.alpha.pick(rng),
            rotation: rng.gen_range(0.0..TAU),
            rotation_speed: rng.gen_range(-1.0..1.0) * profile.spin,
            life: max_life,
            max_life,
            phase: rng.gen_range(0.0..TAU),
        }
    }

    /// Advances the pool by `dt_sec`. With motion disabled only the size
    /// oscillation runs; positions, lifetimes and the population are frozen.
    pub fn tick(&mut self, dt_sec: f32) {
        let dt = if dt_sec.is_finite() {
            dt_sec.clamp(0.0, MAX_FRAME_DT_SEC)
        } else {
            0.0
        };
        self.time += f64::from(dt);
        let time = self.time;

        if self.motion {
            let rng = &mut self.rng;
            for p in &mut self.particles {
                step_particle(p, dt, rng);
            }
            self.particles.retain(Particle::is_alive);
        }
        for p in &mut self.particles {
            oscillate(p, time);
        }

        if self.motion {
            self.replenish(dt);
        }
    }

    fn replenish(&mut self, dt: f32) {
        let Some(palette) = self.palette else {
            return;
        };
        self.spawn_budget += self.spawn_rate * self.magnitude * dt;
        let Ok(dist) = WeightedIndex::new(self.weights) else {
            self.spawn_budget = 0.0;
            return;
        };
        while self.spawn_budget >= 1.0 {
            if self.particles.len() >= self.cap {
                // throttled, not queued
                self.spawn_budget = 0.0;
                break;
            }
            self.spawn_budget -= 1.0;
            let kind = ParticleKind::ALL[dist.sample(&mut self.rng)];
            let p = self.spawn(kind, &palette);
            self.particles.push(p);
        }
    }

    #[cfg(test)]
    fn weight_of(&self, kind: ParticleKind) -> usize {
        let i = ParticleKind::ALL.iter().position(|k| *k == kind).unwrap_or(0);
        self.weights[i]
    }
}

fn random_unit(rng: &mut impl Rng) -> Vec3 {
    let v = Vec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    );
    v.try_normalize().unwrap_or(Vec3::Y)
}

fn step_particle(p: &mut Particle, dt: f32, rng: &mut impl Rng) {
    match p.kind {
        ParticleKind::Dust => {
            p.velocity += random_unit(rng) * DUST_JITTER * dt;
            p.velocity.y -= DUST_GRAVITY * dt;
        }
        ParticleKind::Energy => {
            p.velocity += random_unit(rng) * ENERGY_JITTER * dt;
            p.velocity = p.velocity.clamp_length_max(ENERGY_MAX_SPEED);
        }
        ParticleKind::Star => {
            p.velocity *= (1.0 - 2.0 * dt).max(0.0);
        }
        ParticleKind::Flare => {
            p.velocity += random_unit(rng) * FLARE_JITTER * dt;
        }
    }
    p.position += p.velocity * dt;
    p.rotation = (p.rotation + p.rotation_speed * dt) % TAU;
    p.life -= dt;
    keep_in_bounds(p);
}

/// Angle in `[0, TAU)` of an `hz` oscillation at `time`, reduced in f64.
fn cycle_angle(hz: f32, time: f64) -> f32 {
    (f64::from(hz) * time).fract() as f32 * TAU
}

fn oscillate(p: &mut Particle, time: f64) {
    p.size = match p.kind {
        ParticleKind::Star => {
            p.base_size * (1.0 + STAR_TWINKLE_DEPTH * (cycle_angle(STAR_TWINKLE_HZ, time) + p.phase).sin())
        }
        ParticleKind::Flare => {
            p.base_size * (1.0 + FLARE_PULSE_DEPTH * (cycle_angle(FLARE_PULSE_HZ, time) + p.phase).sin())
        }
        ParticleKind::Dust | ParticleKind::Energy => p.base_size,
    };
}

/// Wraps x/y; particles leaving the depth range re-enter at the opposite plane.
fn keep_in_bounds(p: &mut Particle) {
    let width = 2.0 * PARTICLE_BOUNDS_X;
    if p.position.x > PARTICLE_BOUNDS_X {
        p.position.x -= width;
    } else if p.position.x < -PARTICLE_BOUNDS_X {
        p.position.x += width;
    }
    let [y0, y1] = PARTICLE_BOUNDS_Y;
    if p.position.y < y0 {
        p.position.y = y1 - (y0 - p.position.y) % (y1 - y0);
    } else if p.position.y > y1 {
        p.position.y = y0 + (p.position.y - y1) % (y1 - y0);
    }
    let [z0, z1] = PARTICLE_BOUNDS_Z;
    if p.position.z < z0 {
        p.position.z = z1;
    } else if p.position.z > z1 {
        p.position.z = z0;
    }
    if !p.position.is_finite() {
        p.position = Vec3::new(0.0, (y0 + y1) * 0.5, z1);
        p.velocity = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;

    #[test]
    fn out_of_bounds_particles_wrap_back_inside() {
        let pal = palette::map(&SceneParameters::default());
        let mut sys = ParticleSystem::new(10, 0.0, 3);
        let mut p = sys.spawn(ParticleKind::Dust, &pal);
        p.position = Vec3::new(PARTICLE_BOUNDS_X + 5.0, -3.0, PARTICLE_BOUNDS_Z[0] - 1.0);
        keep_in_bounds(&mut p);
        assert!(p.position.x.abs() <= PARTICLE_BOUNDS_X);
        assert!(p.position.y >= PARTICLE_BOUNDS_Y[0] && p.position.y <= PARTICLE_BOUNDS_Y[1]);
        assert_eq!(p.position.z, PARTICLE_BOUNDS_Z[1]);
    }

    #[test]
    fn reseed_tracks_class_weights() {
        let pal = palette::map(&SceneParameters::default());
        let mut sys = ParticleSystem::new(MAX_PARTICLES, SPAWN_RATE_PER_SEC, 9);
        sys.reseed(&SceneParameters::new(SentimentClass::Negative, -0.5), &pal);
        assert!(sys.weight_of(ParticleKind::Dust) > sys.weight_of(ParticleKind::Energy));
        sys.reseed(&SceneParameters::new(SentimentClass::Positive, 0.5), &pal);
        assert!(sys.weight_of(ParticleKind::Energy) > sys.weight_of(ParticleKind::Dust));
    }

    #[test]
    fn twinkle_phase_stays_precise_after_long_runs() {
        let day = 86_400.0_f64;
        let a = cycle_angle(STAR_TWINKLE_HZ, day);
        let b = cycle_angle(STAR_TWINKLE_HZ, day + 1.0 / 60.0);
        assert!((0.0..TAU).contains(&a));
        let step = (b - a).rem_euclid(TAU);
        let expected = TAU * STAR_TWINKLE_HZ / 60.0;
        assert!((step - expected).abs() < 1e-3, "step {step} vs {expected}");
    }

    #[test]
    fn energy_speed_is_clamped() {
        let pal = palette::map(&SceneParameters::default());
        let mut sys = ParticleSystem::new(10, 0.0, 11);
        let mut p = sys.spawn(ParticleKind::Energy, &pal);
        p.velocity = Vec3::new(1000.0, 0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(1);
        step_particle(&mut p, 0.016, &mut rng);
        assert!(p.velocity.length() <= ENERGY_MAX_SPEED + 1e-3);
    }
}
