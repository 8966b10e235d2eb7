//! Lambertian point lights and exponential distance fog.

use crate::color::Rgb;
use crate::constants::*;
use crate::palette::Palette;
use glam::Vec3;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orbit {
    pub center: Vec3,
    pub radius: f32,
    pub radians_per_sec: f32,
    pub angle: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSource {
    pub position: Vec3,
    pub intensity: f32,
    pub color: Rgb,
    pub orbit: Option<Orbit>,
}

impl LightSource {
    pub fn fixed(position: Vec3, intensity: f32, color: Rgb) -> Self {
        Self {
            position,
            intensity,
            color,
            orbit: None,
        }
    }

    pub fn orbiting(orbit: Orbit, intensity: f32, color: Rgb) -> Self {
        let mut light = Self {
            position: orbit.center,
            intensity,
            color,
            orbit: Some(orbit),
        };
        light.place_on_orbit();
        light
    }

    /// Moves an orbiting light along its circle; fixed lights ignore this.
    pub fn advance(&mut self, dt_sec: f32) {
        if let Some(orbit) = self.orbit.as_mut() {
            orbit.angle = (orbit.angle + orbit.radians_per_sec * dt_sec) % std::f32::consts::TAU;
        }
        self.place_on_orbit();
    }

    fn place_on_orbit(&mut self) {
        if let Some(o) = self.orbit {
            self.position = o.center + Vec3::new(o.angle.cos() * o.radius, 0.0, o.angle.sin() * o.radius);
        }
    }

    /// Diffuse contribution of this light at a surface point, before ambient.
    pub fn contribution(&self, point: Vec3, normal: Vec3) -> f32 {
        let to_light = self.position - point;
        let dist_sq = to_light.length_squared();
        if dist_sq <= f32::EPSILON {
            return 0.0;
        }
        let dir = to_light / dist_sq.sqrt();
        let lambert = normal.dot(dir);
        if lambert <= 0.0 {
            return 0.0;
        }
        let attenuation = 1.0 / (1.0 + dist_sq / (LIGHT_FALLOFF * LIGHT_FALLOFF));
        lambert * self.intensity * attenuation
    }
}

pub type Lights = SmallVec<[LightSource; 2]>;

/// The default rig: a fixed sun and an orbiting moon, colored from the palette.
pub fn default_rig(palette: &Palette) -> Lights {
    let [sun_color, moon_color] = palette.light_colors();
    let mut lights = Lights::new();
    lights.push(LightSource::fixed(Vec3::from(SUN_POSITION), SUN_INTENSITY, sun_color));
    lights.push(LightSource::orbiting(
        Orbit {
            center: Vec3::from(MOON_ORBIT_CENTER),
            radius: MOON_ORBIT_RADIUS,
            radians_per_sec: MOON_ORBIT_RAD_PER_SEC,
            angle: 0.0,
        },
        MOON_INTENSITY,
        moon_color,
    ));
    lights
}

/// Recolors an existing rig in place, keeping orbit phase.
pub fn recolor(lights: &mut [LightSource], palette: &Palette) {
    for (light, color) in lights.iter_mut().zip(palette.light_colors()) {
        light.color = color;
    }
}

/// Ambient plus the sum of diffuse contributions, clamped to `[0.1, 1.2]`.
pub fn illuminate(point: Vec3, normal: Vec3, lights: &[LightSource], ambient: f32) -> f32 {
    let diffuse: f32 = lights.iter().map(|l| l.contribution(point, normal)).sum();
    (ambient + diffuse).clamp(LIGHT_MIN, LIGHT_MAX)
}

/// Contribution-weighted light color; white when nothing reaches the point.
pub fn light_tint(point: Vec3, normal: Vec3, lights: &[LightSource]) -> Rgb {
    let mut total = 0.0;
    let mut acc = Rgb::BLACK;
    for light in lights {
        let w = light.contribution(point, normal);
        if w > 0.0 {
            acc = Rgb::new(acc.r + light.color.r * w, acc.g + light.color.g * w, acc.b + light.color.b * w);
            total += w;
        }
    }
    if total <= f32::EPSILON {
        Rgb::WHITE
    } else {
        acc.scale(1.0 / total).clamped()
    }
}

/// Lit surface color: base scaled by intensity, tinted towards the lights.
pub fn shade(base: Rgb, point: Vec3, normal: Vec3, lights: &[LightSource], ambient: f32) -> Rgb {
    let intensity = illuminate(point, normal, lights, ambient);
    let tint = Rgb::WHITE.lerp(light_tint(point, normal, lights), LIGHT_TINT_STRENGTH);
    base.modulate(tint).scale(intensity).clamped()
}

/// Fraction of the original color that survives `distance` of fog.
#[inline]
pub fn fog_factor(distance: f32, density: f32) -> f32 {
    (-density.max(0.0) * distance.max(0.0)).exp()
}

/// Blends `color` towards `fog_color` per channel.
pub fn apply_fog(color: Rgb, distance: f32, density: f32, fog_color: Rgb) -> Rgb {
    let keep = fog_factor(distance, density);
    fog_color.lerp(color, keep).clamped()
}
