//! Interactive 3D surface plots of `z = f(x, y)`, rendered on the CPU.
//!
//! A plot request flows through a fixed pipeline: the expression is parsed
//! into an evaluable [`Expression`], sampled over `[-n, n] × [-n, n]`, colored
//! by position, triangulated into a [`Mesh`] and swapped into the [`Scene`]
//! alongside a translucent ground plane. SDL2 is used only for the window and
//! input; rendering is done in software.
//!
//! # Quick Start
//!
//! ```ignore
//! use surfplot::prelude::*;
//!
//! let mut plotter = Plotter::new(PlotParams::default())?;
//! plotter.plot("sin(x) * cos(y)", plotter.params())?;
//!
//! let mut renderer = Renderer::new(800, 600);
//! let camera = OrbitCamera::for_half_width(plotter.params().half_width);
//! renderer.render(plotter.scene(), &camera, &Projection::for_viewport(800, 600));
//! renderer.framebuffer().save("plot.png".as_ref())?;
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod colorize;
pub mod colors;
pub mod config;
pub mod controls;
pub mod error;
pub mod expr;
pub mod ground;
pub mod light;
pub mod math;
pub mod mesh;
pub mod plotter;
pub mod presets;
pub mod projection;
pub mod render;
pub mod sampler;
pub mod scene;
pub mod surface;
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use error::Error;
pub use expr::{parse_function, Expression, ParseError};
pub use mesh::Mesh;
pub use plotter::{PlotError, PlotEvent, PlotParams, PlotReport, Plotter};
pub use projection::Projection;
pub use scene::{RenderMode, Scene};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use surfplot::prelude::*;
/// ```
pub mod prelude {
    // Camera
    pub use crate::camera::{OrbitCamera, OrbitCameraController};

    // Pipeline
    pub use crate::expr::{parse_function, Expression};
    pub use crate::plotter::{Parameter, PlotEvent, PlotParams, Plotter};
    pub use crate::sampler::{sample, SampleGrid, SurfaceFunction};
    pub use crate::scene::{RenderMode, Scene};

    // Rendering
    pub use crate::light::DirectionalLight;
    pub use crate::projection::Projection;
    pub use crate::render::Renderer;

    // Math
    pub use crate::math::{Mat4, Vec3, Vec4};

    // Window & Input
    pub use crate::controls::{Action, Controls};
    pub use crate::window::{FrameLimiter, InputState, Key, Window, WindowEvent};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::{
        Coverage, EdgeFunctionRasterizer, FlatShader, FrameBuffer, GouraudShader, Rasterizer,
        Triangle,
    };
    pub use crate::surface::build_surface;
}
