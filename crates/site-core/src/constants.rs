// Gesture, animation, and scene tuning shared by the controllers and views.

// Slider gesture handling
pub const DEFAULT_STEP_PX: f32 = 100.0; // advance per committed gesture
pub const DEFAULT_THRESHOLD_PX: f32 = 50.0; // minimum shift for a release to commit
pub const CLASSIFY_SHIFT_PX: f32 = 5.0; // axis dominance required to classify a gesture
pub const RUBBER_BAND_DIVISOR: f32 = 3.0; // live-drag damping past either limit

// Acceleration tiers, keyed on gesture speed in px/ms
pub const ACCEL_TIER_2_SPEED: f32 = 0.3;
pub const ACCEL_TIER_3_SPEED: f32 = 0.6;
pub const ACCEL_TIER_4_SPEED: f32 = 1.0;

// Committed-move durations in seconds; accelerated moves get the shorter end
pub const DURATION_LANDSCAPE_FAST_SEC: f32 = 0.3; // landscape, accel >= 3
pub const DURATION_LANDSCAPE_SLOW_SEC: f32 = 0.4; // landscape, accel < 3
pub const DURATION_PORTRAIT_FAST_SEC: f32 = 0.2; // portrait, accel >= 3
pub const DURATION_PORTRAIT_SLOW_SEC: f32 = 0.3; // portrait, accel < 3
pub const DURATION_DEFAULT_LANDSCAPE_SEC: f32 = 0.3; // manual moves and init
pub const DURATION_DEFAULT_PORTRAIT_SEC: f32 = 0.2;

// Neural scene generation
pub const SEGMENT_STEP: f32 = 5.0; // world units advanced per branch segment
pub const BRANCH_NODE_COUNT: usize = 10; // nodes per base branch
pub const STEM_JITTER: f32 = std::f32::consts::PI / 5.0; // per-segment angular wobble
pub const SUB_BRANCH_SPREAD: f32 = std::f32::consts::PI / 3.0; // sub-branch fan-out base

// Base branch departure angles from the origin, degrees (x rotation, z rotation)
pub const BASE_BRANCH_ANGLES: [(f32, f32); 6] = [
    (0.0, 0.0),
    (90.0, 90.0),
    (180.0, 0.0),
    (90.0, 270.0),
    (270.0, 90.0),
    (270.0, 270.0),
];

// Particle flow
pub const SPAWN_INTERVAL_SEC: f32 = 1.0;
pub const PARTICLE_SPEED_MIN: f32 = 0.8; // segments per second
pub const PARTICLE_SPEED_MAX: f32 = 1.5;
pub const BRANCH_SWITCH_PROBABILITY: f64 = 0.5;
pub const SCENE_ROTATION_RATE: f32 = 0.06; // radians per second, applied to y and z

// Scene palette
pub const NODE_COLOR: [f32; 3] = [0.122, 0.525, 0.929]; // #1f86ed
pub const PARTICLE_COLOR: [f32; 3] = [0.0, 0.796, 0.863]; // #00cbdc
pub const LINE_COLOR: [f32; 3] = [0.008, 0.498, 0.996]; // #027ffe
pub const NODE_SCALE: f32 = 1.0;
pub const PARTICLE_SCALE: f32 = 1.0;
pub const LINE_HALF_WIDTH: f32 = 0.05;
