// Integration tests for projection, Lambertian lighting and distance fog.

use glam::{Vec2, Vec3};
use sentiscape_core::constants::{CAMERA_PITCH_LIMITS, CAMERA_YAW_LIMIT, LIGHT_MAX, LIGHT_MIN};
use sentiscape_core::lighting::{self, LightSource};
use sentiscape_core::palette;
use sentiscape_core::{Camera, Rgb, SceneParameters};

fn overhead_light() -> Vec<LightSource> {
    vec![LightSource::fixed(Vec3::new(0.0, 100.0, 0.0), 1.0, Rgb::WHITE)]
}

#[test]
fn facing_the_light_is_brighter_than_facing_away() {
    let lights = overhead_light();
    let ambient = 0.2;
    let facing = lighting::illuminate(Vec3::ZERO, Vec3::Y, &lights, ambient);
    let away = lighting::illuminate(Vec3::ZERO, -Vec3::Y, &lights, ambient);
    let edge_on = lighting::illuminate(Vec3::ZERO, Vec3::X, &lights, ambient);
    assert!(facing > away);
    assert!((away - ambient).abs() < 1e-6, "back-facing must be ambient only");
    assert!((edge_on - ambient).abs() < 1e-6);
}

#[test]
fn illumination_is_clamped() {
    let bright: Vec<_> = (0..8)
        .map(|_| LightSource::fixed(Vec3::new(0.0, 10.0, 0.0), 5.0, Rgb::WHITE))
        .collect();
    let hot = lighting::illuminate(Vec3::ZERO, Vec3::Y, &bright, 1.0);
    assert!((hot - LIGHT_MAX).abs() < 1e-6);
    let dark = lighting::illuminate(Vec3::ZERO, -Vec3::Y, &[], 0.0);
    assert!((dark - LIGHT_MIN).abs() < 1e-6);
}

#[test]
fn fog_blend_is_monotonic_in_distance() {
    let base = Rgb::new(0.9, 0.1, 0.2);
    let fog = Rgb::new(0.2, 0.6, 0.8);
    let gap = |c: Rgb| (c.r - fog.r).abs() + (c.g - fog.g).abs() + (c.b - fog.b).abs();

    let mut last = f32::INFINITY;
    for step in 0..400 {
        let d = step as f32 * 10.0;
        let gap_now = gap(lighting::apply_fog(base, d, 0.002, fog));
        assert!(gap_now <= last + 1e-6, "fog inverted at distance {d}");
        last = gap_now;
    }
    assert!(last < 0.01);
    assert!(gap(base) - gap(lighting::apply_fog(base, 0.0, 0.002, fog)) < 1e-5);
}

#[test]
fn lit_terrain_colors_stay_valid() {
    let params = SceneParameters::default();
    let pal = palette::map(&params);
    let rig = lighting::default_rig(&pal);
    for normal in [Vec3::Y, Vec3::X, -Vec3::Y, Vec3::new(0.3, 0.9, -0.2).normalize()] {
        let c = lighting::shade(pal.primary, Vec3::new(10.0, 20.0, 200.0), normal, &rig, 0.3);
        assert!(c.is_valid());
    }
}

#[test]
fn orbiting_light_moves_and_fixed_light_does_not() {
    let pal = palette::map(&SceneParameters::default());
    let mut rig = lighting::default_rig(&pal);
    let before: Vec<Vec3> = rig.iter().map(|l| l.position).collect();
    for light in rig.iter_mut() {
        light.advance(1.0);
    }
    assert_eq!(rig[0].position, before[0]);
    assert_ne!(rig[1].position, before[1]);
}

#[test]
fn points_ahead_project_and_points_behind_do_not() {
    let cam = Camera::default();
    let ahead = cam.position + Vec3::new(0.0, -100.0, 400.0);
    let behind = cam.position + Vec3::new(0.0, 0.0, -200.0);
    let p = cam.project(ahead, 800.0, 600.0);
    assert!(p.visible);
    assert!(p.scale > 0.0 && p.scale <= 1.0);
    assert!(p.distance > 0.0);
    assert!(!cam.project(behind, 800.0, 600.0).visible);
}

#[test]
fn farther_points_shrink() {
    let mut cam = Camera::default();
    cam.pitch = 0.0;
    let near = cam.project(cam.position + Vec3::new(10.0, 0.0, 100.0), 800.0, 600.0);
    let far = cam.project(cam.position + Vec3::new(10.0, 0.0, 800.0), 800.0, 600.0);
    assert!(near.scale > far.scale);
    assert!(near.distance < far.distance);
    assert!(near.screen.x > far.screen.x);
    assert!((near.screen.y - 300.0).abs() < 1e-3);
}

#[test]
fn camera_settles_home_without_input() {
    let mut cam = Camera::default();
    cam.position += Vec3::new(300.0, -50.0, 0.0);
    for _ in 0..600 {
        cam.update(1.0 / 60.0, false, false);
    }
    assert!((cam.position - cam.target).length() < 1.0);
}

#[test]
fn idle_drift_keeps_moving_after_days_of_runtime() {
    let mut cam = Camera::default();
    cam.update(10.0 * 86_400.0, true, false);
    let before = cam.target;
    cam.update(1.0 / 60.0, true, false);
    let step = (cam.target - before).length();
    assert!(step > 0.0, "drift stalled");
    assert!(step < 0.1, "drift jumped by {step}");
    assert!(cam.position.is_finite());
}

#[test]
fn pointer_drag_rotates_within_limits() {
    let mut cam = Camera::default();
    cam.pointer_pressed(Vec2::new(0.5, 0.5), true);
    cam.pointer_moved(Vec2::new(1.0, 1.0), true);
    assert!(cam.is_dragging());
    for _ in 0..600 {
        cam.update(1.0 / 60.0, true, true);
    }
    assert!(cam.yaw > 0.0 && cam.yaw <= CAMERA_YAW_LIMIT);
    assert!(cam.pitch >= CAMERA_PITCH_LIMITS[0] && cam.pitch <= CAMERA_PITCH_LIMITS[1]);
    cam.pointer_released();
    assert!(!cam.is_dragging());
}

#[test]
fn pointer_is_ignored_when_not_interactive() {
    let mut cam = Camera::default();
    cam.pointer_pressed(Vec2::new(0.1, 0.1), false);
    assert!(!cam.is_dragging());
}
