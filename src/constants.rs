use glam::Vec3;

// Scene layout and tuning constants shared by the core and the native frontend.

// Surrounding cube (room) geometry
pub const CUBE_WIDTH: f32 = 1500.0;
pub const CUBE_HEIGHT: f32 = 600.0;
pub const CUBE_DEPTH: f32 = CUBE_HEIGHT * 1.5;
pub const CUBE_POSITION: [f32; 3] = [50.0, 50.0, 50.0];

// Cube scale range driven by room size
pub const MIN_CUBE_SCALE: f32 = 0.5;
pub const MAX_CUBE_SCALE: f32 = 1.0;

// Anchor spheres
pub const SPHERE_RADIUS: f32 = 5.2;
pub const MIN_SPHERE_SCALE: f32 = 0.5;
pub const MAX_SPHERE_SCALE: f32 = 1.5;
pub const SPHERE_SCALE_LOG_BASE: f32 = 10.0;
pub const MIX_SPHERE_SCALE_FACTOR: f32 = 10.0;
pub const SPHERE_FRONT_Z_OFFSET: f32 = 300.0; // pushed in front of the wave grid
pub const SPHERE_BACK_Z_OFFSET: f32 = 200.0;
pub const SPHERE_ROTATION_STEP: f32 = 0.1; // extra spin per sphere index

// Emitter anchors; indices 0-1 orbit the left anchor, 2-3 the right one
pub const NUM_EMITTERS: usize = 4;
pub const LEFT_GROUP_LEN: usize = 2;
pub const EMITTER_LEFT_X: f32 = -140.0;
pub const EMITTER_RIGHT_X: f32 = 160.0;
pub const EMITTER_Y: f32 = 10.0;
pub const EMITTER_Z: f32 = 10.0;
pub const EMITTER_ORBIT_RADIUS: f32 = 16.0;
pub const EMITTER_ORBIT_SPEED: f32 = 0.35; // radians per second

// Output classification (dBFS)
pub const LOUD_OUTPUT_DB: f32 = -12.0;
pub const LOW_OUTPUT_DB: f32 = -50.0;
pub const LOUD_OUTPUT_FACTOR: f32 = 6.0;

// Point light
pub const POINT_LIGHT_INTENSITY: f32 = 200_000.0;
pub const POINT_LIGHT_POSITION: [f32; 3] = [-30.0, 90.0, -10.0];

// Colors (linear RGB)
pub const SPHERE_COLOR: [f32; 3] = [0.247, 0.271, 0.412];
pub const FREEZE_COLOR: [f32; 3] = [0.376, 0.647, 0.980];
pub const SPRITE_COLORS: [[f32; 3]; 2] = [
    [0.357, 0.753, 1.0], // cyan
    [0.298, 0.361, 1.0], // indigo
];
pub const DAMPING_COLOR: [f32; 3] = [1.0, 0.498, 0.0]; // orange

// Levels handler phase accumulation
pub const LEVELS_MIN_OSCILLATION: f32 = 0.1;
pub const LEVELS_REDUCTION_EXP: f32 = 1.67;

#[inline]
pub fn cube_position_vec3() -> Vec3 {
    Vec3::from(CUBE_POSITION)
}

#[inline]
pub fn cube_half_extents() -> Vec3 {
    Vec3::new(CUBE_WIDTH, CUBE_HEIGHT, CUBE_DEPTH) * 0.5
}
