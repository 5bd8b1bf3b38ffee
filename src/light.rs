//! Lighting for the plot scene.

use crate::colors::Rgb;
use crate::math::Vec3;

/// A directional light plus a uniform ambient term.
///
/// Directional lights are ideal for simulating distant light sources like the sun,
/// where all rays are effectively parallel.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// The normalized direction the light is pointing (not where it comes from).
    pub direction: Vec3,
    pub ambient_intensity: f32,
    /// Multiplier for the diffuse lighting contribution.
    pub diffuse_strength: f32,
}

impl Default for DirectionalLight {
    /// Shining down and away from the upper right, as seen from the default camera.
    fn default() -> Self {
        Self::new(Vec3::new(-1.0, -1.0, 0.5))
    }
}

impl DirectionalLight {
    /// Create a new directional light pointing in the given direction.
    /// The direction will be normalized automatically.
    pub fn new(direction: Vec3) -> Self {
        DirectionalLight {
            direction: direction.normalize(),
            ambient_intensity: 0.35,
            diffuse_strength: 1.0,
        }
    }

    /// Diffuse factor in [0.0, 1.0] for a surface facing `normal`.
    pub fn intensity(&self, normal: Vec3) -> f32 {
        // Negate direction: light pointing at surface = positive dot product
        (-self.direction).dot(normal.normalize()).max(0.0)
    }

    /// Lights `base` for a two-sided surface: both faces of a triangle
    /// receive light, so the sign of `normal` does not matter.
    ///
    /// A zero normal (an isolated or undefined vertex) gets ambient only.
    pub fn shade(&self, base: Rgb, normal: Vec3) -> Rgb {
        let diffuse = (-self.direction).dot(normal.normalize()).abs();
        base * (self.ambient_intensity + self.diffuse_strength * diffuse)
    }
}
