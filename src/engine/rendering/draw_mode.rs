use serde::{ Deserialize, Serialize };

use crate::engine::utils::math::Vec3;

/// Fragment shading path, selected per draw call.
///
/// Discriminants are the values of the `mode` uniform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum DrawMode {
    /// Flat color scaled by diffuse + ambient light.
    Color = 0,
    /// Albedo texture scaled by diffuse + ambient light. Ignores the color.
    #[default]
    Textured = 1,
    /// Flat color, no lighting.
    UnlitColor = 2,
}

impl DrawMode {
    pub fn uniform_value(self) -> i32 {
        self as i32
    }

    pub fn uses_color(self) -> bool {
        !matches!(self, DrawMode::Textured)
    }
}

pub const WHITE: Vec3 = [1.0, 1.0, 1.0];
pub const BLUE: Vec3 = [0.0, 0.0, 1.0];
pub const GREEN: Vec3 = [0.0, 1.0, 0.0];
pub const RED: Vec3 = [1.0, 0.0, 0.0];
pub const BLACK: Vec3 = [0.0, 0.0, 0.0];
