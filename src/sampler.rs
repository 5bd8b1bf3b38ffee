//! Parametric sampling of `z = f(x, y)` over a square domain.
//!
//! The domain `[-n, n] × [-n, n]` is parameterized by `(u, v) ∈ [0, 1]²` and
//! cut into `segments × segments` cells. Points are stored row-major: row `i`
//! holds `v = i / segments`, column `j` holds `u = j / segments`, and the
//! point lives at index `i * (segments + 1) + j`. The triangulation in
//! [`crate::mesh::grid_faces`] relies on this order.

use thiserror::Error;

/// Lower bound on segments per axis, so coarse steps still give a surface.
pub const MIN_SEGMENTS: usize = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("a {segments} x {segments} grid is too large to sample")]
    TooLarge { segments: usize },
}

/// A scalar function of two variables that can be sampled onto a grid.
pub trait SurfaceFunction {
    fn eval(&self, x: f64, y: f64) -> f64;
}

impl<F> SurfaceFunction for F
where
    F: Fn(f64, f64) -> f64,
{
    #[inline]
    fn eval(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SamplePoint {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Number of segments per axis: `max(10, floor(2n / step))`.
///
/// There is no upper bound. Very small steps request very large grids.
pub fn segment_count(half_width: f64, step: f64) -> usize {
    let raw = (2.0 * half_width / step).floor();
    // `as` saturates, and maps NaN to 0
    MIN_SEGMENTS.max(raw as usize)
}

/// A `(segments + 1) × (segments + 1)` lattice of sampled points.
#[derive(Clone, Debug)]
pub struct SampleGrid {
    half_width: f64,
    segments: usize,
    points: Vec<SamplePoint>,
}

impl SampleGrid {
    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Points per row (and per column).
    pub fn side(&self) -> usize {
        self.segments + 1
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at row `i` (the `v` direction) and column `j` (the `u` direction).
    pub fn get(&self, i: usize, j: usize) -> Option<&SamplePoint> {
        if i > self.segments || j > self.segments {
            return None;
        }
        self.points.get(i * self.side() + j)
    }

    /// Number of samples whose height came out as `NaN` or infinite.
    pub fn non_finite_count(&self) -> usize {
        self.points.iter().filter(|p| !p.is_finite()).count()
    }
}

/// Samples `f` on the grid derived from `half_width` and `step`.
///
/// Non-finite results are stored as they are. Fails when the grid's point
/// or face count overflows, or its storage cannot be allocated.
pub fn sample<F>(f: &F, half_width: f64, step: f64) -> Result<SampleGrid, SampleError>
where
    F: SurfaceFunction + ?Sized,
{
    let segments = segment_count(half_width, step);
    let too_large = || SampleError::TooLarge { segments };

    let side = segments.checked_add(1).ok_or_else(too_large)?;
    let len = side.checked_mul(side).ok_or_else(too_large)?;
    // Two faces per cell once triangulated
    segments
        .checked_mul(segments)
        .and_then(|cells| cells.checked_mul(2))
        .ok_or_else(too_large)?;

    let mut points = Vec::new();
    points.try_reserve_exact(len).map_err(|_| too_large())?;

    for i in 0..side {
        let v = i as f64 / segments as f64;
        for j in 0..side {
            let u = j as f64 / segments as f64;
            let x = (u - 0.5) * 2.0 * half_width;
            let y = (v - 0.5) * 2.0 * half_width;
            points.push(SamplePoint {
                x,
                y,
                z: f.eval(x, y),
            });
        }
    }

    Ok(SampleGrid {
        half_width,
        segments,
        points,
    })
}
