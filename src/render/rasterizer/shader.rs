//! Pixel shaders for triangle rasterization.
//!
//! This module provides a trait-based abstraction for per-pixel shading computations,
//! similar to how GPUs separate the fixed-function rasterizer from programmable
//! fragment/pixel shaders.
//!
//! # Architecture
//!
//! The rasterizer handles:
//! - Bounding box computation
//! - Edge function evaluation
//! - Inside/outside testing
//! - Barycentric coordinate calculation
//!
//! The shader handles attribute interpolation and the final color.

use crate::colors::Rgb;

/// Trait for per-pixel shading computations.
///
/// The rasterizer calls `shade()` for each pixel inside the triangle,
/// providing the barycentric coordinates for attribute interpolation.
///
/// # Barycentric Coordinates
///
/// The `lambda` parameter contains three weights [λ₀, λ₁, λ₂] that:
/// - Sum to 1.0 for any point inside the triangle
/// - Represent the "influence" of each vertex on the current pixel
/// - Can be used to interpolate any per-vertex attribute:
///   `attr_at_pixel = λ₀*attr₀ + λ₁*attr₁ + λ₂*attr₂`
pub trait PixelShader {
    /// Compute the packed color for a pixel given its barycentric coordinates.
    fn shade(&self, lambda: [f32; 3]) -> u32;
}

/// Flat shader - returns a constant color for all pixels.
///
/// Used for the ground plane, which is drawn in its material color.
pub struct FlatShader {
    color: u32,
}

impl FlatShader {
    pub fn new(color: Rgb) -> Self {
        Self {
            color: color.to_argb(),
        }
    }
}

impl PixelShader for FlatShader {
    #[inline]
    fn shade(&self, _lambda: [f32; 3]) -> u32 {
        self.color
    }
}

/// Gouraud shader - interpolates vertex colors using barycentric coordinates.
///
/// Used for the surface, whose colors are lit per vertex and then
/// interpolated across each triangle.
pub struct GouraudShader {
    colors: [Rgb; 3],
}

impl GouraudShader {
    pub fn new(colors: [Rgb; 3]) -> Self {
        Self { colors }
    }
}

impl PixelShader for GouraudShader {
    #[inline]
    fn shade(&self, lambda: [f32; 3]) -> u32 {
        let [c0, c1, c2] = self.colors;
        (c0 * lambda[0] + c1 * lambda[1] + c2 * lambda[2]).to_argb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_ignores_weights() {
        let shader = FlatShader::new(Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(shader.shade([1.0, 0.0, 0.0]), 0xFFFF0000);
        assert_eq!(shader.shade([0.2, 0.3, 0.5]), 0xFFFF0000);
    }

    #[test]
    fn gouraud_hits_vertex_colors_at_corners() {
        let shader = GouraudShader::new([
            Rgb::new(1.0, 0.0, 0.0),
            Rgb::new(0.0, 1.0, 0.0),
            Rgb::new(0.0, 0.0, 1.0),
        ]);
        assert_eq!(shader.shade([1.0, 0.0, 0.0]), 0xFFFF0000);
        assert_eq!(shader.shade([0.0, 1.0, 0.0]), 0xFF00FF00);
        assert_eq!(shader.shade([0.0, 0.0, 1.0]), 0xFF0000FF);
    }

    #[test]
    fn gouraud_blends_between_vertices() {
        let shader = GouraudShader::new([Rgb::BLACK, Rgb::WHITE, Rgb::WHITE]);
        assert_eq!(shader.shade([0.5, 0.25, 0.25]), 0xFF808080);
    }
}
