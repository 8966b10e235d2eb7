//! Per-frame compositing: sky, one depth-sorted list of terrain quads and
//! particle sprites drawn back to front, then the sentiment trend overlay.

use crate::camera::{Camera, Projection};
use crate::color::Rgb;
use crate::constants::*;
use crate::history::EmotionHistory;
use crate::lighting::{self, LightSource};
use crate::noise::NoiseField;
use crate::palette::Palette;
use crate::params::SentimentClass;
use crate::particles::{Particle, Primitive};
use crate::surface::Surface;
use crate::terrain::Terrain;
use glam::Vec2;
use instant::Instant;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Corners in grid order (tl, tr, br, bl), already lit and fogged.
    TerrainQuad { corners: [Vec2; 4], colors: [Rgb; 4] },
    Sprite {
        primitive: Primitive,
        center: Vec2,
        radius: f32,
        rotation: f32,
        color: Rgb,
        alpha: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    /// Distance from the camera; larger is farther.
    pub depth: f32,
    pub shape: Shape,
}

/// Borrowed view of everything one frame draws.
pub struct SceneView<'a> {
    pub terrain: Option<&'a Terrain>,
    pub particles: &'a [Particle],
    pub camera: &'a Camera,
    pub lights: &'a [LightSource],
    pub palette: &'a Palette,
    pub clouds: Option<&'a NoiseField>,
    pub cloud_offset: f32,
    pub history: &'a EmotionHistory,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub quads: usize,
    pub sprites: usize,
    pub overlay_drawn: bool,
    pub elapsed_ms: f32,
}

pub struct Compositor {
    items: Vec<DrawItem>,
    frame_budget_ms: f32,
}

impl Compositor {
    pub fn new(frame_budget_ms: f32) -> Self {
        Self {
            items: Vec::new(),
            frame_budget_ms,
        }
    }

    /// Items of the last composed frame, in draw order.
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn release(&mut self) {
        self.items = Vec::new();
    }

    pub fn compose(&mut self, surface: &mut Surface, view: &SceneView<'_>) -> FrameStats {
        let started = Instant::now();
        let size = surface.size();

        paint_sky(surface, view);

        self.items.clear();
        let quads = gather_terrain(view, size, &mut self.items);
        let sprites = gather_particles(view, size, &mut self.items);
        sort_back_to_front(&mut self.items);
        for item in &self.items {
            draw_item(surface, item);
        }

        let spent_ms = started.elapsed().as_secs_f32() * 1000.0;
        let overlay_drawn = if spent_ms <= self.frame_budget_ms {
            draw_history(surface, view.history);
            true
        } else {
            log::debug!(
                "[compositor] over budget ({:.1}ms > {:.1}ms), overlay skipped",
                spent_ms,
                self.frame_budget_ms
            );
            false
        };

        FrameStats {
            quads,
            sprites,
            overlay_drawn,
            elapsed_ms: started.elapsed().as_secs_f32() * 1000.0,
        }
    }
}

/// Farthest first. `total_cmp` keeps this a total order even for odd floats.
pub fn sort_back_to_front(items: &mut [DrawItem]) {
    items.sort_by(|a, b| b.depth.total_cmp(&a.depth));
}

pub fn gather_terrain(view: &SceneView<'_>, size: Vec2, out: &mut Vec<DrawItem>) -> usize {
    let Some(terrain) = view.terrain else {
        return 0;
    };
    let atmosphere = &view.palette.atmosphere;
    let before = out.len();

    // Light and project every grid point once; quads share corners.
    let lit: Vec<(Projection, Rgb)> = terrain
        .points()
        .iter()
        .map(|p| {
            let proj = view.camera.project(p.position, size.x, size.y);
            let shaded = lighting::shade(
                p.color,
                p.position,
                p.normal,
                view.lights,
                atmosphere.ambient_light,
            );
            let fogged = lighting::apply_fog(
                shaded,
                proj.distance,
                atmosphere.fog_density,
                atmosphere.fog_color,
            );
            (proj, fogged)
        })
        .collect();

    let n = terrain.resolution();
    for r in 0..n - 1 {
        for c in 0..n - 1 {
            let idx = [r * n + c, r * n + c + 1, (r + 1) * n + c + 1, (r + 1) * n + c];
            let corners = idx.map(|i| &lit[i]);
            if corners.iter().any(|(p, _)| !p.visible) {
                continue;
            }
            let depth = corners.iter().map(|(p, _)| p.distance).sum::<f32>() * 0.25;
            if !depth.is_finite() {
                continue;
            }
            out.push(DrawItem {
                depth,
                shape: Shape::TerrainQuad {
                    corners: corners.map(|(p, _)| p.screen),
                    colors: corners.map(|(_, c)| *c),
                },
            });
        }
    }
    out.len() - before
}

pub fn gather_particles(view: &SceneView<'_>, size: Vec2, out: &mut Vec<DrawItem>) -> usize {
    let atmosphere = &view.palette.atmosphere;
    let before = out.len();
    for p in view.particles.iter().filter(|p| p.is_alive()) {
        let proj = view.camera.project(p.position, size.x, size.y);
        if !proj.visible || !proj.distance.is_finite() {
            continue;
        }
        let radius = (p.size * proj.pixel_scale).max(0.5);
        let c = proj.screen;
        let margin = radius * 3.0;
        if c.x < -margin || c.y < -margin || c.x > size.x + margin || c.y > size.y + margin {
            continue;
        }
        out.push(DrawItem {
            depth: proj.distance,
            shape: Shape::Sprite {
                primitive: p.kind.primitive(),
                center: c,
                radius,
                rotation: p.rotation,
                color: lighting::apply_fog(
                    p.color,
                    proj.distance,
                    atmosphere.fog_density,
                    atmosphere.fog_color,
                ),
                alpha: p.alpha * p.life_ratio(),
            },
        });
    }
    out.len() - before
}

pub fn draw_item(surface: &mut Surface, item: &DrawItem) {
    match item.shape {
        Shape::TerrainQuad { corners, colors } => {
            let [a, b, c, d] = corners;
            let [ca, cb, cc, cd] = colors;
            surface.fill_triangle([a, b, c], [ca, cb, cc], 1.0);
            surface.fill_triangle([a, c, d], [ca, cc, cd], 1.0);
        }
        Shape::Sprite {
            primitive,
            center,
            radius,
            rotation,
            color,
            alpha,
        } => draw_sprite(surface, primitive, center, radius, rotation, color, alpha),
    }
}

fn draw_sprite(
    surface: &mut Surface,
    primitive: Primitive,
    center: Vec2,
    radius: f32,
    rotation: f32,
    color: Rgb,
    alpha: f32,
) {
    match primitive {
        Primitive::Disc => surface.fill_disc(center, radius, color, alpha),
        Primitive::Quad => {
            let ring: Vec<Vec2> = (0..4)
                .map(|i| center + Vec2::from_angle(rotation + i as f32 * std::f32::consts::FRAC_PI_2) * radius)
                .collect();
            surface.fill_fan(center, &ring, color, alpha);
        }
        Primitive::Star { points } => {
            let spikes = points.max(3) as usize;
            let step = std::f32::consts::PI / spikes as f32;
            let ring: Vec<Vec2> = (0..spikes * 2)
                .map(|i| {
                    let r = if i % 2 == 0 { radius * 1.6 } else { radius * 0.6 };
                    center + Vec2::from_angle(rotation + i as f32 * step) * r
                })
                .collect();
            surface.fill_disc(center, radius * 1.8, color, alpha * 0.15);
            surface.fill_fan(center, &ring, color, alpha);
        }
        Primitive::CrossFlare => {
            let arm = Vec2::from_angle(rotation) * radius * 2.5;
            let width = (radius * 0.3).max(1.0);
            surface.fill_disc(center, radius * 1.4, color, alpha * 0.25);
            surface.stroke_line(center - arm, center + arm, width, color, alpha);
            surface.stroke_line(center - arm.perp(), center + arm.perp(), width, color, alpha);
            surface.fill_disc(center, radius * 0.6, Rgb::WHITE.lerp(color, 0.4), alpha);
        }
    }
}

/// Vertical gradient, drifting cloud layer and a glow for each visible light.
pub fn paint_sky(surface: &mut Surface, view: &SceneView<'_>) {
    let palette = view.palette;
    surface.vertical_gradient(palette.sky_top(), palette.sky_horizon());

    if let Some(clouds) = view.clouds {
        let w = surface.width().max(1) as f32;
        let band = (surface.height() as f32 * SKY_CLOUD_FRACTION).max(1.0);
        let tint = palette.highlight.lerp(palette.atmosphere.fog_color, 0.3);
        let offset = view.cloud_offset;
        for y in 0..band as u32 {
            let v = y as f32 / band;
            let fade = 1.0 - v;
            surface.blend_row(
                y,
                |x| {
                    let n = clouds.sample(x as f32 / w + offset, v * 0.5);
                    let a = ((n - CLOUD_THRESHOLD) / (1.0 - CLOUD_THRESHOLD)).clamp(0.0, 1.0);
                    a * CLOUD_MAX_ALPHA * fade
                },
                tint,
            );
        }
    }

    let size = surface.size();
    for light in view.lights {
        let proj = view.camera.project(light.position, size.x, size.y);
        if proj.visible {
            let r = (light.intensity * 40.0 * proj.pixel_scale).max(2.0);
            surface.fill_disc(proj.screen, r * 2.0, light.color, 0.08);
            surface.fill_disc(proj.screen, r, light.color, 0.35);
        }
    }
}

fn class_color(class: SentimentClass) -> Rgb {
    match class {
        SentimentClass::Positive => Rgb::from_hex(0x7CFC9A),
        SentimentClass::Neutral => Rgb::from_hex(0xC8D0E0),
        SentimentClass::Negative => Rgb::from_hex(0xFF7A7A),
    }
}

/// Screen-space trend line of recent scores in the bottom-right corner.
pub fn draw_history(surface: &mut Surface, history: &EmotionHistory) {
    if history.is_empty() {
        return;
    }
    let size = surface.size();
    let [w, h] = OVERLAY_SIZE;
    let origin = Vec2::new(size.x - w - OVERLAY_MARGIN, size.y - h - OVERLAY_MARGIN);
    if origin.x < 0.0 || origin.y < 0.0 {
        return;
    }
    let panel = [
        origin,
        origin + Vec2::new(w, 0.0),
        origin + Vec2::new(w, h),
        origin + Vec2::new(0.0, h),
    ];
    let backdrop = Rgb::from_hex(0x0A0E18);
    surface.fill_triangle_flat([panel[0], panel[1], panel[2]], backdrop, 0.55);
    surface.fill_triangle_flat([panel[0], panel[2], panel[3]], backdrop, 0.55);

    let mid = origin.y + h * 0.5;
    surface.stroke_line(
        Vec2::new(origin.x + 4.0, mid),
        Vec2::new(origin.x + w - 4.0, mid),
        1.0,
        Rgb::WHITE,
        0.2,
    );

    let slots = history.capacity().max(2) - 1;
    let amp = h * 0.5 - 4.0;
    let to_screen = |i: usize, score: f32| {
        Vec2::new(
            origin.x + 4.0 + (w - 8.0) * i as f32 / slots as f32,
            mid - score.clamp(-1.0, 1.0) * amp,
        )
    };
    let samples: Vec<_> = history.iter().collect();
    for (i, pair) in samples.windows(2).enumerate() {
        let a = to_screen(i, pair[0].score);
        let b = to_screen(i + 1, pair[1].score);
        surface.stroke_line(a, b, 2.0, class_color(pair[1].class), 0.9);
    }
    if let Some(last) = samples.last() {
        let p = to_screen(samples.len() - 1, last.score);
        surface.fill_disc(p, 3.0, class_color(last.class), 1.0);
    }
}
