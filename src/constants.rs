// Rendering and interaction tuning for the web host.

// Camera: fixed look-at from +Z, 50 degree vertical fov
pub const CAMERA_Z: f32 = 5.0;
pub const CAMERA_FOV_Y: f32 = 0.872_664_6; // 50 degrees
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;

// Field palette (#ADFF2F green with a white pulse glow)
pub const NODE_COLOR: [f32; 3] = [0.678, 1.0, 0.184];
pub const GLOW_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

// World-space half-extent of a node billboard quad
pub const NODE_BASE_SIZE: f32 = 0.035;

// Clicks are cast onto the mid-shell sphere to pick a pulse origin
pub const PULSE_PICK_RADIUS: f32 = 1.75;

// Post-processing defaults
pub const BLOOM_STRENGTH: f32 = 0.4;
pub const BLOOM_THRESHOLD: f32 = 0.2;
pub const VIGNETTE_STRENGTH: f32 = 1.1;

// Background clear color (deep blue-black)
pub const CLEAR_COLOR: [f64; 3] = [0.015, 0.02, 0.045];

// DOM ids and the single persisted key
pub const CANVAS_ID: &str = "field-canvas";
pub const MOTION_TOGGLE_ID: &str = "motion-toggle";
pub const MOTION_STORAGE_KEY: &str = "synaptic.motion";
