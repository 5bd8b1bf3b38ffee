//! Position-derived vertex colors.
//!
//! Each channel is the matching coordinate mapped affinely from `[-n, n]` to
//! `[0, 1]`: red follows x, green follows y and blue follows height. Heights
//! outside `[-n, n]` give channels outside `[0, 1]`; they are left as they are
//! and only clamped when a pixel is packed.

use crate::colors::Rgb;
use crate::sampler::{SampleGrid, SamplePoint};

/// Maps one coordinate from `[-n, n]` onto `[0, 1]`.
#[inline]
pub fn normalize(coord: f64, half_width: f64) -> f64 {
    (coord + half_width) / (2.0 * half_width)
}

/// Color of a single sample.
#[inline]
pub fn colorize(point: &SamplePoint, half_width: f64) -> Rgb {
    Rgb::new(
        normalize(point.x, half_width) as f32,
        normalize(point.y, half_width) as f32,
        normalize(point.z, half_width) as f32,
    )
}

/// Colors for every sample of `grid`, in grid order.
pub fn colorize_grid(grid: &SampleGrid) -> Vec<Rgb> {
    let half_width = grid.half_width();
    grid.points()
        .iter()
        .map(|p| colorize(p, half_width))
        .collect()
}
