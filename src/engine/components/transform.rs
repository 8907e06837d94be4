use serde::{ Deserialize, Serialize };

use crate::engine::utils::math::{ model_matrix, normal_matrix, Mat4x4, Vec3, VEC3_ZERO };

/// Placement of a single draw: world position, uniform scale and an
/// axis-angle rotation in degrees.
///
/// A zero `axis` means "no rotation", whatever the angle.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: f32,
    pub angle_degrees: f32,
    pub axis: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, scale: f32, angle_degrees: f32, axis: Vec3) -> Self {
        Self {
            position,
            scale,
            angle_degrees,
            axis,
        }
    }

    /// Translation and scale only.
    pub fn at(position: Vec3, scale: f32) -> Self {
        Self::new(position, scale, 0.0, VEC3_ZERO)
    }

    pub fn identity() -> Self {
        Self::at(VEC3_ZERO, 1.0)
    }

    pub fn has_rotation(&self) -> bool {
        self.axis != VEC3_ZERO
    }

    /// Order: Scale -> Rotate -> Translate
    pub fn get_matrix(&self) -> Mat4x4 {
        model_matrix(self.position, self.scale, self.angle_degrees, self.axis)
    }

    pub fn get_normal_matrix(&self) -> Mat4x4 {
        normal_matrix(&self.get_matrix())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
