// Integration tests for the particle pool: lifetimes, caps, spawning and the motion flag.

use sentiscape_core::constants::{MAX_PARTICLES, PARTICLE_BOUNDS_X, PARTICLE_BOUNDS_Z, SPAWN_RATE_PER_SEC};
use sentiscape_core::palette;
use sentiscape_core::{ParticleKind, ParticleSystem, SceneParameters, SentimentClass};

const DT: f32 = 1.0 / 60.0;

fn seeded(params: &SceneParameters, cap: usize, seed: u64) -> ParticleSystem {
    let mut sys = ParticleSystem::new(cap, SPAWN_RATE_PER_SEC, seed);
    sys.reseed(params, &palette::map(params));
    sys
}

fn assert_lifetimes(sys: &ParticleSystem) {
    for p in sys.particles() {
        assert!(p.life > 0.0, "dead particle left in pool: {p:?}");
        assert!(p.life <= p.max_life);
        let ratio = p.life_ratio();
        assert!(ratio > 0.0 && ratio <= 1.0);
    }
}

#[test]
fn live_particles_keep_life_within_bounds() {
    let params = SceneParameters::new(SentimentClass::Positive, 0.9);
    let mut sys = seeded(&params, MAX_PARTICLES, 17);
    assert_lifetimes(&sys);
    for frame in 0..900 {
        // mix in a few long frames to exercise the dt clamp
        let dt = if frame % 97 == 0 { 0.5 } else { DT };
        sys.tick(dt);
        assert_lifetimes(&sys);
    }
}

#[test]
fn zero_score_population_stays_below_cap() {
    let params = SceneParameters::new(SentimentClass::Neutral, 0.0);
    let mut sys = seeded(&params, MAX_PARTICLES, 4);
    for _ in 0..1000 {
        sys.tick(DT);
        assert!(sys.len() < sys.cap());
    }
}

#[test]
fn strong_sentiment_never_exceeds_cap() {
    let params = SceneParameters::new(SentimentClass::Positive, 1.0).with_text("x".repeat(300));
    let mut sys = seeded(&params, 50, 21);
    assert!(sys.len() <= 50);
    for _ in 0..1000 {
        sys.tick(0.1);
        assert!(sys.len() <= 50);
    }
}

#[test]
fn motion_disabled_freezes_positions_and_population() {
    let params = SceneParameters::new(SentimentClass::Negative, -0.7).with_motion(false);
    let mut sys = seeded(&params, MAX_PARTICLES, 12);
    let before: Vec<_> = sys.particles().iter().map(|p| (p.position, p.life)).collect();
    let census = sys.census();
    for _ in 0..240 {
        sys.tick(DT);
    }
    let after: Vec<_> = sys.particles().iter().map(|p| (p.position, p.life)).collect();
    assert_eq!(before, after);
    assert_eq!(census, sys.census());
}

#[test]
fn reseed_favours_kinds_by_sentiment() {
    let pos = seeded(&SceneParameters::new(SentimentClass::Positive, 0.8), MAX_PARTICLES, 2);
    let neg = seeded(&SceneParameters::new(SentimentClass::Negative, -0.8), MAX_PARTICLES, 2);
    let pc = pos.census();
    let nc = neg.census();
    let count = |m: &fnv::FnvHashMap<ParticleKind, usize>, k| m.get(&k).copied().unwrap_or(0);

    assert!(count(&pc, ParticleKind::Energy) > count(&pc, ParticleKind::Dust));
    assert!(count(&pc, ParticleKind::Star) > count(&pc, ParticleKind::Dust));
    assert!(count(&nc, ParticleKind::Dust) > count(&nc, ParticleKind::Energy));
    assert!(count(&nc, ParticleKind::Flare) > count(&pc, ParticleKind::Flare));
    assert_eq!(pc.values().sum::<usize>(), pos.len());
}

#[test]
fn particles_stay_inside_the_volume() {
    let params = SceneParameters::new(SentimentClass::Positive, 1.0);
    let mut sys = seeded(&params, MAX_PARTICLES, 33);
    for _ in 0..600 {
        sys.tick(DT);
    }
    for p in sys.particles() {
        assert!(p.position.is_finite());
        assert!(p.position.x.abs() <= PARTICLE_BOUNDS_X);
        assert!(p.position.z >= PARTICLE_BOUNDS_Z[0] && p.position.z <= PARTICLE_BOUNDS_Z[1]);
    }
}

#[test]
fn spawned_particles_take_palette_colors() {
    let params = SceneParameters::new(SentimentClass::Neutral, 0.2);
    let pal = palette::map(&params);
    let mut sys = ParticleSystem::new(10, 0.0, 1);
    for kind in ParticleKind::ALL {
        let p = sys.spawn(kind, &pal);
        assert_eq!(p.kind, kind);
        assert_eq!(p.life, p.max_life);
        assert_eq!(p.color, pal.swatch(kind.profile().swatch));
    }
}

/// An empty pool that spawns but was never reseeded.
fn empty_pool(params: &SceneParameters) -> ParticleSystem {
    let mut sys = ParticleSystem::new(MAX_PARTICLES, SPAWN_RATE_PER_SEC, 8);
    sys.set_palette(&palette::map(params));
    sys.retune(params);
    sys
}

#[test]
fn replenishment_scales_with_time_and_score() {
    let full = SceneParameters::new(SentimentClass::Positive, 1.0);
    let half = SceneParameters::new(SentimentClass::Positive, 0.5);
    let still = SceneParameters::new(SentimentClass::Positive, 0.0);
    let (mut a, mut b, mut c) = (empty_pool(&full), empty_pool(&half), empty_pool(&still));

    // one second: shorter than any lifetime, so nothing retires yet
    for _ in 0..60 {
        a.tick(DT);
        b.tick(DT);
        c.tick(DT);
    }
    assert!((22..=24).contains(&a.len()), "full score spawned {}", a.len());
    assert!((10..=12).contains(&b.len()), "half score spawned {}", b.len());
    assert!(c.is_empty());

    for _ in 0..60 {
        a.tick(DT);
    }
    // a few early flares may already have burned out
    assert!((40..=48).contains(&a.len()), "two seconds spawned {}", a.len());
}

#[test]
fn zero_score_pool_never_grows() {
    let params = SceneParameters::new(SentimentClass::Negative, 0.0);
    let mut sys = seeded(&params, MAX_PARTICLES, 6);
    let mut last = sys.len();
    for _ in 0..600 {
        sys.tick(DT);
        assert!(sys.len() <= last);
        last = sys.len();
    }
}

#[test]
fn only_stars_and_flares_twinkle() {
    let params = SceneParameters::new(SentimentClass::Neutral, 0.6).with_motion(false);
    let mut sys = seeded(&params, MAX_PARTICLES, 19);
    let mut varied = vec![false; sys.len()];
    for _ in 0..30 {
        sys.tick(DT);
        for (seen, p) in varied.iter_mut().zip(sys.particles()) {
            match p.kind {
                ParticleKind::Star | ParticleKind::Flare => *seen |= p.size != p.base_size,
                ParticleKind::Dust | ParticleKind::Energy => assert_eq!(p.size, p.base_size),
            }
        }
    }
    for (seen, p) in varied.iter().zip(sys.particles()) {
        if matches!(p.kind, ParticleKind::Star | ParticleKind::Flare) {
            assert!(seen, "{:?} never changed size", p.kind);
        }
    }
}
