//! Triangle rasterization.
//!
//! The renderer hands screen-space triangles to a [`Rasterizer`] together
//! with a [`PixelShader`] that picks each covered pixel's color.

mod edgefunction;
mod shader;

pub use edgefunction::EdgeFunctionRasterizer;
pub use shader::{FlatShader, GouraudShader, PixelShader};

use super::framebuffer::FrameBuffer;
use crate::math::Vec3;

/// A triangle ready for rasterization in screen space.
///
/// `x` and `y` are pixel coordinates; `z` holds 1/w for depth testing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub points: [Vec3; 3],
}

impl Triangle {
    pub fn new(points: [Vec3; 3]) -> Self {
        Self { points }
    }
}

/// How covered pixels are written to the frame buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Coverage {
    /// Depth-tested, writes color and depth.
    Opaque,
    /// Depth-tested, blends color at the given opacity and leaves depth alone.
    Translucent(f32),
}

/// Trait for triangle rasterization algorithms.
///
/// Implementors define how triangles are filled into a pixel buffer.
pub trait Rasterizer {
    /// Fill a triangle into the frame buffer, coloring pixels with `shader`.
    fn fill_triangle<S: PixelShader>(
        &self,
        triangle: &Triangle,
        buffer: &mut FrameBuffer,
        shader: &S,
        coverage: Coverage,
    );
}
