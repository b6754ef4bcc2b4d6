// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Tolerance used by every intersection, shadow and normalization test. The
// same value offsets reflected rays off the surface they leave.
pub const EPSILON: f64 = 1e-8;

// Camera defaults
pub const DEFAULT_VIEW_ANGLE: f64 = 80.0;
pub const DEFAULT_CAMERA_POSITION: [f64; 3] = [125.0, 125.0, 125.0];
pub const DEFAULT_CAMERA_LOOK_AT: [f64; 3] = [0.0, 0.0, 0.0];
pub const DEFAULT_CAMERA_UP: [f64; 3] = [0.0, 0.0, 1.0];

// Floor defaults
pub const DEFAULT_FLOOR_WIDTH: f64 = 1000.0;
pub const DEFAULT_TILE_WIDTH: f64 = 20.0;

// Runtime parameters
pub const DEFAULT_OUT_FILE: &str = "out.bmp";
pub const DEFAULT_REFLECTION_DEPTH: usize = 3;
pub const DEFAULT_IMAGE_SIZE: usize = 500;
