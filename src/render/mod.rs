//! Software rendering of the plot scene.

pub mod clipper;
pub mod framebuffer;
pub mod rasterizer;
mod renderer;

pub use framebuffer::FrameBuffer;
pub use rasterizer::{
    Coverage, EdgeFunctionRasterizer, FlatShader, GouraudShader, PixelShader, Rasterizer, Triangle,
};
pub use renderer::{FrameStats, Renderer};
