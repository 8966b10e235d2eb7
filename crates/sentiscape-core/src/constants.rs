/// Scene tuning constants shared by every host.
///
/// World units are roughly "pixels at unit scale": the projection maps them
/// straight to screen pixels when `fov / (fov + depth) == 1`.

// Terrain layout
pub const TERRAIN_RESOLUTION: usize = 32; // rows == cols
pub const TERRAIN_MAX_TEXT_BONUS: usize = 8; // extra rows/cols for long utterances
pub const TERRAIN_SPACING: f32 = 24.0; // world units between grid points
pub const TERRAIN_Z_OFFSET: f32 = 40.0; // first row sits this far in front of the origin

// Elevation bands (normalised noise)
pub const BAND_LOW_MAX: f32 = 0.33;
pub const BAND_MID_MAX: f32 = 0.66;
pub const VALLEY_SHADOW_MIX: f32 = 0.25; // how much valleys lean towards the shadow color

// Sky
pub const CLOUD_RESOLUTION: usize = 33;
pub const CLOUD_ROUGHNESS: f32 = 0.5;
pub const CLOUD_THRESHOLD: f32 = 0.55; // noise below this is clear sky
pub const CLOUD_MAX_ALPHA: f32 = 0.45;
pub const CLOUD_DRIFT_PER_SEC: f32 = 0.004; // uv units
pub const SKY_CLOUD_FRACTION: f32 = 0.55; // clouds only in the upper part of the frame

// Particles
pub const MAX_PARTICLES: usize = 400;
pub const SPAWN_RATE_PER_SEC: f32 = 24.0; // at |score| == 1
pub const PARTICLE_BOUNDS_X: f32 = 420.0; // half-width
pub const PARTICLE_BOUNDS_Y: [f32; 2] = [0.0, 320.0];
pub const PARTICLE_BOUNDS_Z: [f32; 2] = [20.0, 820.0];
pub const DUST_GRAVITY: f32 = 4.0; // units/s^2
pub const DUST_JITTER: f32 = 6.0;
pub const ENERGY_JITTER: f32 = 40.0;
pub const ENERGY_MAX_SPEED: f32 = 60.0;
pub const FLARE_JITTER: f32 = 14.0;
pub const STAR_TWINKLE_HZ: f32 = 0.6;
pub const STAR_TWINKLE_DEPTH: f32 = 0.5;
pub const FLARE_PULSE_HZ: f32 = 1.8;
pub const FLARE_PULSE_DEPTH: f32 = 0.6;

// Camera
pub const CAMERA_FOV: f32 = 500.0;
pub const CAMERA_NEAR: f32 = 1.0; // minimum rotated depth for a visible point
pub const CAMERA_HOME: [f32; 3] = [0.0, 200.0, 30.0];
pub const CAMERA_HOME_PITCH: f32 = 0.3; // radians, positive looks down
pub const CAMERA_VIEW_HEIGHT: f32 = 240.0; // world units spanning the surface height at scale 1
pub const CAMERA_POSITION_TAU_SEC: f32 = 1.2;
pub const CAMERA_ROTATION_TAU_SEC: f32 = 0.35;
pub const CAMERA_IDLE_DRIFT: [f32; 2] = [40.0, 12.0]; // x/y amplitude
pub const CAMERA_POINTER_PAN: [f32; 2] = [120.0, 60.0];
pub const CAMERA_DRAG_RADIANS: f32 = 1.2; // rotation for a full-width drag
pub const CAMERA_PITCH_LIMITS: [f32; 2] = [-0.1, 0.7];
pub const CAMERA_YAW_LIMIT: f32 = 0.6;

// Lighting
pub const LIGHT_MIN: f32 = 0.1;
pub const LIGHT_MAX: f32 = 1.2;
pub const LIGHT_FALLOFF: f32 = 600.0; // distance at which a light is half strength
pub const LIGHT_TINT_STRENGTH: f32 = 0.35;
pub const SUN_POSITION: [f32; 3] = [-260.0, 420.0, 300.0];
pub const SUN_INTENSITY: f32 = 0.9;
pub const MOON_ORBIT_CENTER: [f32; 3] = [0.0, 260.0, 420.0];
pub const MOON_ORBIT_RADIUS: f32 = 320.0;
pub const MOON_ORBIT_RAD_PER_SEC: f32 = 0.25;
pub const MOON_INTENSITY: f32 = 0.55;

// Frame pacing
pub const MAX_FRAME_DT_SEC: f32 = 0.25;
pub const FRAME_BUDGET_MS: f32 = 12.0;

// History overlay
pub const HISTORY_CAPACITY: usize = 64;
pub const OVERLAY_SIZE: [f32; 2] = [180.0, 56.0];
pub const OVERLAY_MARGIN: f32 = 12.0;

// Regeneration
pub const REGEN_SCORE_THRESHOLD: f32 = 0.2;
