use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Rotation from Euler angles applied in X, then Y, then Z order.
    pub fn with_euler_xyz(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Linear RGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub Vec3);

impl Rgb {
    pub const WHITE: Self = Self(Vec3::ONE);

    /// Build a color from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Self(Vec3::new(r, g, b))
    }

    pub fn to_array(self) -> [f32; 3] {
        self.0.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn euler_rotation_about_y() {
        let t = Transform::default().with_euler_xyz(0.0, std::f32::consts::FRAC_PI_2, 0.0);
        let rotated = t.rotation * Vec3::X;
        assert!((rotated - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn hex_color_unpacks_channels() {
        let c = Rgb::from_hex(0x404040);
        assert!((c.0.x - 64.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.0.x, c.0.y);
        assert_eq!(c.0.y, c.0.z);
        assert_eq!(Rgb::from_hex(0xffffff), Rgb::WHITE);
    }
}
