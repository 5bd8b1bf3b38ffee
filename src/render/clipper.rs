//! Clip-space clipping against the homogeneous clip cube.
//!
//! Clipping occurs after projection (in homogeneous clip space), before the
//! perspective divide. The clip volume is defined by:
//!
//! ```text
//! -w <= x <= w
//! -w <= y <= w
//! -w <= z <= w
//! ```
//!
//! The planes are fixed, so nothing needs rebuilding when the projection
//! changes.

use crate::colors::Rgb;
use crate::math::Vec4;

/// A vertex in homogeneous clip space with an interpolatable color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipVertex {
    /// Position in clip space (x, y, z, w) - before perspective divide
    pub position: Vec4,
    pub color: Rgb,
}

impl ClipVertex {
    pub fn new(position: Vec4, color: Rgb) -> Self {
        Self { position, color }
    }

    /// Linearly interpolate all attributes between two vertices.
    /// Used when a polygon edge crosses a clipping plane.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            color: self.color.lerp(other.color, t),
        }
    }
}

/// The 6 planes of the canonical clip-space cube.
#[derive(Clone, Copy, Debug)]
pub enum ClipPlane {
    /// x >= -w
    Left,
    /// x <= w
    Right,
    /// y >= -w
    Bottom,
    /// y <= w
    Top,
    /// z >= -w
    Near,
    /// z <= w
    Far,
}

impl ClipPlane {
    pub const ALL: [ClipPlane; 6] = [
        ClipPlane::Left,
        ClipPlane::Right,
        ClipPlane::Bottom,
        ClipPlane::Top,
        ClipPlane::Near,
        ClipPlane::Far,
    ];

    /// Returns the signed distance from a vertex to this plane.
    /// Positive = inside the clip volume, Negative = outside.
    pub fn signed_distance(&self, v: &ClipVertex) -> f32 {
        let p = v.position;
        match self {
            Self::Left => p.w + p.x,
            Self::Right => p.w - p.x,
            Self::Bottom => p.w + p.y,
            Self::Top => p.w - p.y,
            Self::Near => p.w + p.z,
            Self::Far => p.w - p.z,
        }
    }
}

/// A convex polygon in clip space.
///
/// Used as an intermediate representation during clipping. After clipping
/// against all planes, it is fanned back into triangles for rasterization.
#[derive(Clone, Debug, Default)]
pub struct ClipPolygon {
    pub vertices: Vec<ClipVertex>,
}

impl ClipPolygon {
    pub fn from_triangle(v0: ClipVertex, v1: ClipVertex, v2: ClipVertex) -> Self {
        Self {
            vertices: vec![v0, v1, v2],
        }
    }

    /// Returns true if the polygon has been completely clipped away.
    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Clip this polygon against a single plane using the Sutherland-Hodgman algorithm.
    pub fn clip_against_plane(&self, plane: ClipPlane) -> Self {
        if self.is_empty() {
            return Self::default();
        }

        let mut output = Vec::with_capacity(self.vertices.len() + 1);
        for (i, current) in self.vertices.iter().enumerate() {
            let next = &self.vertices[(i + 1) % self.vertices.len()];

            let d1 = plane.signed_distance(current);
            let d2 = plane.signed_distance(next);

            if d1 >= 0.0 {
                output.push(*current);
                if d2 < 0.0 {
                    // Leaving the volume
                    output.push(current.lerp(next, d1 / (d1 - d2)));
                }
            } else if d2 >= 0.0 {
                // Entering the volume
                output.push(current.lerp(next, d1 / (d1 - d2)));
            }
        }

        Self { vertices: output }
    }

    /// Clips against all six planes. The result may be empty.
    pub fn clip(self) -> Self {
        let mut result = self;
        for plane in ClipPlane::ALL {
            if result.is_empty() {
                break;
            }
            result = result.clip_against_plane(plane);
        }
        result
    }

    /// Fan-triangulates this convex polygon.
    pub fn triangulate(&self) -> impl Iterator<Item = [&ClipVertex; 3]> {
        (1..self.vertices.len().saturating_sub(1))
            .map(move |i| [&self.vertices[0], &self.vertices[i], &self.vertices[i + 1]])
    }
}

/// Clips a line segment against the clip cube, returning the visible part.
pub fn clip_line(mut a: ClipVertex, mut b: ClipVertex) -> Option<(ClipVertex, ClipVertex)> {
    for plane in ClipPlane::ALL {
        let da = plane.signed_distance(&a);
        let db = plane.signed_distance(&b);
        match (da >= 0.0, db >= 0.0) {
            (true, true) => {}
            (false, false) => return None,
            (true, false) => b = a.lerp(&b, da / (da - db)),
            (false, true) => a = a.lerp(&b, da / (da - db)),
        }
    }
    Some((a, b))
}
