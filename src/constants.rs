pub const DEFAULT_SCREEN_WIDTH: u32 = 1920;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 1080;
pub const DEFAULT_WINDOW_TITLE: &str = "datboi";

pub const DEFAULT_ASSET_PATH: &str = "datboi.png";

// Sprite sheet layout of the default asset

pub const DEFAULT_CELL_WIDTH: f32 = 312.0;
pub const DEFAULT_CELL_HEIGHT: f32 = 390.0;
pub const DEFAULT_FRAME_COUNT: u32 = 4;
pub const DEFAULT_FRAME_TIME: f32 = 0.1;

// Bounce

pub const DEFAULT_BOUND_X: f32 = 3300.0;
pub const DEFAULT_BOUND_Y: f32 = 700.0;
pub const DEFAULT_SPEED_X: f32 = 400.0;
pub const DEFAULT_SPEED_Y: f32 = 560.0;

// Simulation

pub const DEFAULT_FIXED_STEP: f32 = 1.0 / 60.0;
pub const FPS_LOG_INTERVAL_FRAMES: u32 = 300;

// Camera

pub const DEFAULT_FOV_RADIANS: f32 = 45.0;
pub const DEFAULT_Z_NEAR: f32 = 0.1;
pub const DEFAULT_Z_FAR: f32 = 100.0;
pub const DEFAULT_CAMERA_DISTANCE: f32 = 2.0;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.5,
    g: 0.5,
    b: 0.5,
    a: 1.0,
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);
