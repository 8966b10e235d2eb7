//! The engine object: owns every piece of scene state and exposes an explicit
//! `start`/`stop` lifecycle plus `tick`/`render` for whatever host schedules it.
//!
//! Parameter updates from other threads travel through a [`SceneHandle`] and
//! are applied at the top of [`Engine::tick`], so a frame never observes a
//! half-applied change.

use crate::camera::Camera;
use crate::compositor::{Compositor, FrameStats, SceneView};
use crate::config::EngineConfig;
use crate::constants::*;
use crate::error::{EngineError, SurfaceError};
use crate::history::{EmotionHistory, EmotionSample};
use crate::lighting::{self, LightSource, Lights};
use crate::noise::{self, NoiseField};
use crate::palette::{self, Palette};
use crate::params::{SceneParameters, SceneUpdate};
use crate::particles::ParticleSystem;
use crate::surface::{Snapshot, Surface};
use crate::terrain::Terrain;
use glam::Vec2;
use rand::prelude::*;
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Clone, Debug, PartialEq)]
pub enum SceneMessage {
    Replace(SceneParameters),
    Update(SceneUpdate),
}

/// Cheap, cloneable sender for parameter updates from producer threads.
#[derive(Clone, Debug)]
pub struct SceneHandle {
    tx: Sender<SceneMessage>,
}

impl SceneHandle {
    /// Queues a full replacement. Returns false once the engine is gone.
    pub fn set(&self, params: SceneParameters) -> bool {
        self.tx.send(SceneMessage::Replace(params)).is_ok()
    }

    /// Queues a partial update. Returns false once the engine is gone.
    pub fn update(&self, update: SceneUpdate) -> bool {
        self.tx.send(SceneMessage::Update(update)).is_ok()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Stopped,
    /// No surface yet, or the container is zero-sized.
    NoSurface,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    Drawn(FrameStats),
    Skipped(SkipReason),
}

impl FrameOutcome {
    pub fn is_drawn(&self) -> bool {
        matches!(self, FrameOutcome::Drawn(_))
    }
}

pub struct Engine {
    config: EngineConfig,
    params: SceneParameters,
    /// Parameters the current terrain and particle pool were built from.
    built_from: SceneParameters,
    palette: Palette,
    terrain: Option<Terrain>,
    clouds: Option<NoiseField>,
    cloud_offset: f32,
    particles: ParticleSystem,
    camera: Camera,
    lights: Lights,
    history: EmotionHistory,
    surface: Option<Surface>,
    size: (u32, u32),
    compositor: Compositor,
    rng: StdRng,
    inbox: Receiver<SceneMessage>,
    outbox: Sender<SceneMessage>,
    running: bool,
    generation: u64,
    clock: f64,
}

impl Engine {
    /// Validates the config and prepares a stopped engine. Nothing heavy is
    /// built until [`Engine::start`].
    pub fn new(config: EngineConfig, params: SceneParameters) -> Result<Self, EngineError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let params = params.sanitized();
        let palette = palette::map(&params);
        let mut particles = ParticleSystem::new(config.max_particles, config.spawn_rate, rng.gen());
        particles.retune(&params);
        let (outbox, inbox) = mpsc::channel();

        Ok(Self {
            camera: Camera::new(config.fov),
            lights: lighting::default_rig(&palette),
            history: EmotionHistory::new(config.history_capacity),
            compositor: Compositor::new(config.frame_budget_ms),
            built_from: params.clone(),
            params,
            palette,
            terrain: None,
            clouds: None,
            cloud_offset: 0.0,
            particles,
            surface: None,
            size: (0, 0),
            rng,
            inbox,
            outbox,
            running: false,
            generation: 0,
            clock: 0.0,
            config,
        })
    }

    pub fn handle(&self) -> SceneHandle {
        SceneHandle {
            tx: self.outbox.clone(),
        }
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.regenerate();
        if self.history.is_empty() {
            self.record_sample();
        }
        if let Err(err) = self.acquire_surface() {
            log::debug!("[engine] started without a surface: {err}");
        }
        log::info!(
            "[engine] started class={} score={:.2}",
            self.params.sentiment_class.name(),
            self.params.sentiment_score
        );
    }

    /// Releases the surface, terrain and particle pool. Parameters, history
    /// and the configured size survive so a later `start` picks up where the
    /// scene left off.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.surface = None;
        self.terrain = None;
        self.clouds = None;
        self.particles.clear();
        self.compositor.release();
        log::info!("[engine] stopped after {} generations", self.generation);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Applies a full parameter snapshot immediately.
    pub fn set_params(&mut self, params: SceneParameters) {
        self.apply(params);
    }

    /// Applies a partial update immediately.
    pub fn update(&mut self, update: &SceneUpdate) {
        if update.is_empty() {
            return;
        }
        let next = update.apply_to(&self.params);
        self.apply(next);
    }

    fn drain_inbox(&mut self) {
        let mut pending: Option<SceneParameters> = None;
        while let Ok(msg) = self.inbox.try_recv() {
            let base = pending.as_ref().unwrap_or(&self.params);
            pending = Some(match msg {
                SceneMessage::Replace(p) => p.sanitized(),
                SceneMessage::Update(u) => u.apply_to(base),
            });
        }
        if let Some(next) = pending {
            self.apply(next);
        }
    }

    fn apply(&mut self, next: SceneParameters) {
        let next = next.sanitized();
        if next == self.params {
            return;
        }
        let material = next.differs_materially(&self.built_from, self.config.regen_threshold);
        let sentiment_changed = next.sentiment_class != self.params.sentiment_class
            || next.sentiment_score != self.params.sentiment_score;
        self.params = next;
        self.palette = palette::map(&self.params);
        lighting::recolor(&mut self.lights, &self.palette);
        if sentiment_changed {
            self.record_sample();
        }

        if !self.running {
            self.particles.retune(&self.params);
            return;
        }
        if material {
            self.regenerate();
        } else {
            if let Some(terrain) = self.terrain.as_mut() {
                terrain.recolor(&self.palette);
            }
            self.particles.set_palette(&self.palette);
            self.particles.retune(&self.params);
        }
    }

    fn record_sample(&mut self) {
        self.history.push(EmotionSample {
            timestamp: self.clock,
            score: self.params.sentiment_score,
            class: self.params.sentiment_class,
        });
    }

    /// Builds a fresh terrain and cloud field, then swaps them in whole.
    fn regenerate(&mut self) {
        let bonus = ((self.params.text_weight() - 1.0) * TERRAIN_MAX_TEXT_BONUS as f32).round() as usize;
        let resolution = self.config.terrain_resolution + bonus;
        let terrain = Terrain::build(
            resolution,
            self.config.terrain_spacing,
            &self.palette,
            self.params.sentiment_class,
            self.params.sentiment_score,
            self.rng.gen(),
        );
        let clouds = noise::generate(CLOUD_RESOLUTION, CLOUD_ROUGHNESS, self.rng.gen());

        self.terrain = Some(terrain);
        self.clouds = Some(clouds);
        self.particles.reseed(&self.params, &self.palette);
        self.built_from = self.params.clone();
        self.generation += 1;
        log::info!(
            "[engine] regenerated #{} class={} score={:.2} grid={}x{} particles={}",
            self.generation,
            self.params.sentiment_class.name(),
            self.params.sentiment_score,
            resolution,
            resolution,
            self.particles.len()
        );
    }

    /// Advances the simulation. Pending parameter messages are applied first.
    pub fn tick(&mut self, dt_sec: f32) {
        self.drain_inbox();
        if !self.running {
            return;
        }
        let dt = if dt_sec.is_finite() {
            dt_sec.clamp(0.0, MAX_FRAME_DT_SEC)
        } else {
            0.0
        };
        self.clock += dt as f64;

        let motion = self.params.motion_enabled;
        if motion {
            for light in self.lights.iter_mut() {
                light.advance(dt);
            }
            self.cloud_offset = (self.cloud_offset + CLOUD_DRIFT_PER_SEC * dt).rem_euclid(1.0);
        }
        self.particles.tick(dt);
        self.camera.update(dt, motion, self.params.interactivity_enabled);
    }

    /// Composites the current state onto the surface.
    pub fn render(&mut self) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Skipped(SkipReason::Stopped);
        }
        let Some(surface) = self.surface.as_mut() else {
            log::debug!("[engine] frame skipped: no surface");
            return FrameOutcome::Skipped(SkipReason::NoSurface);
        };
        let view = SceneView {
            terrain: self.terrain.as_ref(),
            particles: self.particles.particles(),
            camera: &self.camera,
            lights: &self.lights,
            palette: &self.palette,
            clouds: self.clouds.as_ref(),
            cloud_offset: self.cloud_offset,
            history: &self.history,
        };
        FrameOutcome::Drawn(self.compositor.compose(surface, &view))
    }

    pub fn frame(&mut self, dt_sec: f32) -> FrameOutcome {
        self.tick(dt_sec);
        self.render()
    }

    /// Records the container size and re-acquires the surface while running.
    /// A zero-sized container drops the surface; frames are skipped until a
    /// usable size arrives.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<bool, SurfaceError> {
        let changed = self.size != (width, height);
        self.size = (width, height);
        if !self.running {
            return Ok(changed);
        }
        self.acquire_surface().map(|_| changed)
    }

    fn acquire_surface(&mut self) -> Result<(), SurfaceError> {
        let (w, h) = self.size;
        let result = match self.surface.take() {
            Some(mut surface) => surface.resize(w, h).map(|_| surface),
            None => Surface::new(w, h),
        };
        self.surface = Some(result?);
        Ok(())
    }

    /// Pointer position in surface pixels.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if let Some(uv) = self.normalize_pointer(x, y) {
            self.camera.pointer_moved(uv, self.params.interactivity_enabled);
        }
    }

    pub fn pointer_pressed(&mut self, x: f32, y: f32) {
        if let Some(uv) = self.normalize_pointer(x, y) {
            self.camera.pointer_pressed(uv, self.params.interactivity_enabled);
        }
    }

    pub fn pointer_released(&mut self) {
        self.camera.pointer_released();
    }

    fn normalize_pointer(&self, x: f32, y: f32) -> Option<Vec2> {
        let (w, h) = self.size;
        if w == 0 || h == 0 {
            return None;
        }
        Some(Vec2::new(x / w as f32, y / h as f32))
    }

    /// Copy of the last composited frame. Touches no simulation state.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.surface.as_ref().map(Surface::snapshot)
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn params(&self) -> &SceneParameters {
        &self.params
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn terrain(&self) -> Option<&Terrain> {
        self.terrain.as_ref()
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn lights(&self) -> &[LightSource] {
        &self.lights
    }

    pub fn history(&self) -> &EmotionHistory {
        &self.history
    }

    /// Number of terrain/particle rebuilds so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Simulated seconds since construction.
    pub fn clock(&self) -> f64 {
        self.clock
    }
}
