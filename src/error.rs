//! Crate-level error type.

use thiserror::Error;

use crate::colors::ColorParseError;
use crate::plotter::PlotError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error(transparent)]
    Color(#[from] ColorParseError),

    #[error("window size must be non-zero, got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// SDL reports failures as plain strings.
    #[error("window system error: {0}")]
    Window(String),

    #[error("could not write image: {0}")]
    Image(#[from] image::ImageError),
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Window(message)
    }
}
