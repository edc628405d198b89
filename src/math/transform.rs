use glam::{EulerRot, Mat4, Quat, Vec3};

/// Local translation / rotation / scale of a scene node
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation_y(mut self, angle: f32) -> Self {
        self.rotation = Quat::from_rotation_y(angle);
        self
    }

    pub fn with_rotation_x(mut self, angle: f32) -> Self {
        self.rotation = Quat::from_rotation_x(angle);
        self
    }

    /// Euler angles applied in XYZ order
    pub fn with_euler(mut self, euler: [f32; 3]) -> Self {
        self.rotation = Quat::from_euler(EulerRot::XYZ, euler[0], euler[1], euler[2]);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_uniform_scale(self, scale: f32) -> Self {
        self.with_scale(Vec3::splat(scale))
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Mat4> for Transform {
    fn from(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn identity_matrix() {
        assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn scale_then_rotate_then_translate() {
        let t = Transform::from_translation(Vec3::new(10.0, 0.0, 0.0))
            .with_rotation_y(FRAC_PI_2)
            .with_uniform_scale(2.0);
        let p = t.matrix().transform_point3(Vec3::X);
        // X scaled to 2, rotated to -Z, then shifted
        assert!((p - Vec3::new(10.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn round_trips_through_matrix() {
        let t = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0)).with_rotation_y(0.5);
        let back = Transform::from(t.matrix());
        assert!((back.translation - t.translation).length() < 1e-5);
        assert!(back.rotation.abs_diff_eq(t.rotation, 1e-5));
    }
}
