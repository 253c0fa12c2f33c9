// Page and render tuning constants

// Neural renderer camera
pub const CAMERA_Z: f32 = 100.0;
pub const CAMERA_FOVY_DEG: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR: f32 = 200.0;

// Page controller
pub const SCROLL_THROTTLE_MS: i32 = 100;
pub const SCROLLED_THRESHOLD_PX: f64 = 20.0; // body gets `scrolled` past this
pub const NAV_PROBE_X: f32 = 0.0; // element-under-point probe for nav highlighting
pub const NAV_PROBE_Y: f32 = 100.0;

// Orientation watcher settle delay; some devices report a stale orientation
// until shortly after the transition
pub const ORIENTATION_SETTLE_MS: i32 = 300;

// Slider activation slide-in distance
pub const INITIAL_SLIDE_IN_PX: f32 = 100.0;
