use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::renderer::CameraUniform;

/// Pitch stays just short of straight up/down so `forward` never lines up
/// with the up vector
pub const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

pub const DEFAULT_FOV_DEGREES: f32 = 75.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 1000.0;
pub const DEFAULT_SPAWN: Vec3 = Vec3::new(0.0, 25.0, 10.0);

/// Perspective camera steered by yaw and pitch.
///
/// Yaw 0 looks down +Z; yaw PI looks down -Z towards the lobby's back doors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstPersonCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self::new(DEFAULT_SPAWN)
    }
}

impl FirstPersonCamera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: PI,
            pitch: 0.0,
            fov_y: DEFAULT_FOV_DEGREES.to_radians(),
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            aspect: 16.0 / 9.0,
        }
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Forward flattened onto the floor plane
    pub fn horizontal_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    pub fn right(&self) -> Vec3 {
        self.horizontal_forward().cross(Vec3::Y).normalize()
    }

    /// Turns the camera towards `target` without moving it
    pub fn look_at(&mut self, target: Vec3) {
        let direction = target - self.position;
        if direction.length_squared() <= f32::EPSILON {
            return;
        }
        let direction = direction.normalize();
        self.yaw = direction.x.atan2(direction.z);
        self.pitch = direction.y.asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(2.0 * PI);
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Follows a window resize; zero-sized (minimised) windows are ignored
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
            position: self.position.to_array(),
            _pad: 0.0,
        }
    }
}
