/// Web host tuning.
///
/// The scene is rasterised on the CPU, so the backing store is capped well
/// below what a high-DPI screen would ask for.
// Element looked up when `SceneHost::new` gets an empty id
pub const DEFAULT_CANVAS_ID: &str = "app-canvas";

// Upper bound on device pixels per CSS pixel for the backing store
pub const MAX_PIXEL_RATIO: f64 = 1.0;

// Longest edge of the backing store, in device pixels
pub const MAX_BACKING_EDGE: u32 = 1280;

// Frames longer than this (tab in background, debugger pause) are not simulated in full
pub const MAX_HOST_DT_SEC: f32 = 0.1;
