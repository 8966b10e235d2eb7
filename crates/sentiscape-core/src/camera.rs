//! Pinhole camera with damped following and optional pointer orbit.

use crate::constants::*;
use glam::{Vec2, Vec3};

/// Result of projecting one world-space point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub screen: Vec2,
    /// Perspective factor `fov / (fov + depth)`.
    pub scale: f32,
    /// Screen pixels per world unit at this point (`scale` times viewport zoom).
    pub pixel_scale: f32,
    /// Euclidean distance from the camera, used for fog and sorting.
    pub distance: f32,
    /// Depth along the view axis after rotation.
    pub depth: f32,
    pub visible: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct DragAnchor {
    start: Vec2,
    yaw: f32,
    pitch: f32,
}

#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    target_yaw: f32,
    target_pitch: f32,
    home: Vec3,
    pointer: Option<Vec2>,
    drag: Option<DragAnchor>,
    drift_time: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CAMERA_FOV)
    }
}

impl Camera {
    pub fn new(fov: f32) -> Self {
        let home = Vec3::from(CAMERA_HOME);
        Self {
            position: home,
            target: home,
            yaw: 0.0,
            pitch: CAMERA_HOME_PITCH,
            fov: fov.max(1.0),
            target_yaw: 0.0,
            target_pitch: CAMERA_HOME_PITCH,
            home,
            pointer: None,
            drag: None,
            drift_time: 0.0,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pointer position in normalised surface coordinates (`[0, 1]` each axis).
    pub fn pointer_moved(&mut self, uv: Vec2, interactive: bool) {
        if !interactive || !uv.is_finite() {
            return;
        }
        let uv = uv.clamp(Vec2::ZERO, Vec2::ONE);
        self.pointer = Some(uv);
        if let Some(anchor) = self.drag {
            let delta = uv - anchor.start;
            self.target_yaw = (anchor.yaw + delta.x * CAMERA_DRAG_RADIANS)
                .clamp(-CAMERA_YAW_LIMIT, CAMERA_YAW_LIMIT);
            self.target_pitch = (anchor.pitch + delta.y * CAMERA_DRAG_RADIANS)
                .clamp(CAMERA_PITCH_LIMITS[0], CAMERA_PITCH_LIMITS[1]);
        }
    }

    pub fn pointer_pressed(&mut self, uv: Vec2, interactive: bool) {
        if !interactive || !uv.is_finite() {
            return;
        }
        let uv = uv.clamp(Vec2::ZERO, Vec2::ONE);
        self.pointer = Some(uv);
        self.drag = Some(DragAnchor {
            start: uv,
            yaw: self.target_yaw,
            pitch: self.target_pitch,
        });
    }

    pub fn pointer_released(&mut self) {
        self.drag = None;
    }

    /// Exponential damping of position and rotation towards their targets.
    pub fn update(&mut self, dt_sec: f32, motion: bool, interactive: bool) {
        let dt = dt_sec.max(0.0);
        if motion {
            self.drift_time += f64::from(dt);
        }
        let t = self.drift_time;
        let drift = if motion {
            Vec3::new(
                (t * 0.11).sin() as f32 * CAMERA_IDLE_DRIFT[0],
                (t * 0.07).sin() as f32 * CAMERA_IDLE_DRIFT[1],
                0.0,
            )
        } else {
            Vec3::ZERO
        };

        let pan = match (interactive, self.pointer) {
            (true, Some(uv)) => Vec3::new(
                (uv.x - 0.5) * 2.0 * CAMERA_POINTER_PAN[0],
                -(uv.y - 0.5) * 2.0 * CAMERA_POINTER_PAN[1],
                0.0,
            ),
            _ => Vec3::ZERO,
        };
        if !interactive {
            self.pointer = None;
            self.drag = None;
            self.target_yaw = 0.0;
            self.target_pitch = CAMERA_HOME_PITCH;
        }

        self.target = self.home + drift + pan;
        let alpha = 1.0 - (-dt / CAMERA_POSITION_TAU_SEC).exp();
        self.position += (self.target - self.position) * alpha;

        let alpha_rot = 1.0 - (-dt / CAMERA_ROTATION_TAU_SEC).exp();
        self.yaw += (self.target_yaw - self.yaw) * alpha_rot;
        self.pitch += (self.target_pitch - self.pitch) * alpha_rot;
        self.yaw = self.yaw.clamp(-CAMERA_YAW_LIMIT, CAMERA_YAW_LIMIT);
        self.pitch = self.pitch.clamp(CAMERA_PITCH_LIMITS[0], CAMERA_PITCH_LIMITS[1]);
    }

    /// World point to camera space: translate, then yaw, then pitch.
    pub fn to_view(&self, point: Vec3) -> Vec3 {
        let rel = point - self.position;
        let (sy, cy) = self.yaw.sin_cos();
        let x = rel.x * cy - rel.z * sy;
        let z = rel.x * sy + rel.z * cy;
        let (sp, cp) = self.pitch.sin_cos();
        let y = rel.y * cp + z * sp;
        let z = -rel.y * sp + z * cp;
        Vec3::new(x, y, z)
    }

    /// Projects onto a `width x height` surface.
    pub fn project(&self, point: Vec3, width: f32, height: f32) -> Projection {
        let view = self.to_view(point);
        let distance = (point - self.position).length();
        let denom = self.fov + view.z;
        let visible = view.z > CAMERA_NEAR && denom > 0.0;
        let scale = if denom > f32::EPSILON { self.fov / denom } else { 0.0 };
        let zoom = height.max(1.0) / CAMERA_VIEW_HEIGHT;
        let pixel_scale = scale * zoom;
        Projection {
            screen: Vec2::new(
                width * 0.5 + view.x * pixel_scale,
                height * 0.5 - view.y * pixel_scale,
            ),
            scale,
            pixel_scale,
            distance,
            depth: view.z,
            visible,
        }
    }
}
