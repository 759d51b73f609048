use cgmath::{Matrix4, Rad};
use std::f32::consts::PI;

use crate::constants::{
    DEFAULT_CAMERA_DISTANCE, DEFAULT_FOV_RADIANS, DEFAULT_Z_FAR, DEFAULT_Z_NEAR,
    OPENGL_TO_WGPU_MATRIX,
};

/// Fixed perspective camera looking down -z at the sprite plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub distance: f32,
    pub aspect: f32,
    /// Any angle; folded into (0, pi) by `effective_fov` before projecting.
    pub fov: Rad<f32>,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            distance: DEFAULT_CAMERA_DISTANCE,
            aspect,
            fov: Rad(DEFAULT_FOV_RADIANS),
            z_near: DEFAULT_Z_NEAR,
            z_far: DEFAULT_Z_FAR,
        }
    }

    pub fn view(&self) -> Matrix4<f32> {
        Matrix4::from_translation(cgmath::vec3(0.0, 0.0, -self.distance))
    }

    /// Field of view folded into (0, pi). The projection only depends on
    /// |tan(fov / 2)|, so this frames identically to the unfolded angle;
    /// 45 rad reduces to about 1.018 rad.
    pub fn effective_fov(&self) -> Rad<f32> {
        Rad(fold_fov(self.fov.0))
    }

    pub fn projection(&self) -> Matrix4<f32> {
        let proj = cgmath::perspective(self.effective_fov(), self.aspect, self.z_near, self.z_far);
        OPENGL_TO_WGPU_MATRIX * proj
    }
}

fn fold_fov(angle: f32) -> f32 {
    let turn = 2.0 * PI;
    let reduced = angle.rem_euclid(turn);
    let folded = if reduced > PI { turn - reduced } else { reduced };
    folded.max(FOV_EPSILON).min(PI - FOV_EPSILON)
}

const FOV_EPSILON: f32 = 1e-4;
