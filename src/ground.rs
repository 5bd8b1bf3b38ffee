//! Reference ground plane under the surface.
//!
//! The plane is a flat square of side `100 × n` in the z = 0 plane of plot
//! space, subdivided into 10 × 10 cells. It is recreated whenever the domain
//! half-width changes. Its color, opacity and vertical offset are material
//! settings and survive the rebuild.
//!
//! The plane lies under the surface, perpendicular to the function value, and
//! its offset moves it along plot z. This differs from the browser version,
//! which rotated its plane about x and offset it along the y input axis, so
//! there the ground stood perpendicular to `y` instead.

use log::debug;

use crate::colors::{self, Rgb};
use crate::math::Vec3;
use crate::mesh::{grid_faces, Mesh, MeshResource, ResourceTracker};

/// Ground side length per unit of domain half-width.
pub const GROUND_SIZE_FACTOR: f64 = 100.0;
/// Default vertical offset per unit of domain half-width.
pub const GROUND_OFFSET_FACTOR: f64 = -5.0;
pub const GROUND_SEGMENTS: usize = 10;
pub const GROUND_OPACITY: f32 = 0.5;

pub const GROUND_NAME: &str = "ground";

/// Colors the ground cycles through from the keyboard, starting at the default.
pub const GROUND_PALETTE: [Rgb; 5] = [
    colors::GROUND,
    Rgb::new(0xa0 as f32 / 255.0, 0xa0 as f32 / 255.0, 0xa0 as f32 / 255.0),
    Rgb::new(0x9a as f32 / 255.0, 0xd1 as f32 / 255.0, 0x8b as f32 / 255.0),
    Rgb::new(0xf2 as f32 / 255.0, 0xc3 as f32 / 255.0, 0x8b as f32 / 255.0),
    Rgb::new(0x2b as f32 / 255.0, 0x2b as f32 / 255.0, 0x2b as f32 / 255.0),
];

/// The palette entry after `current`. Colors outside the palette restart it.
pub fn next_palette_color(current: Rgb) -> Rgb {
    let next = GROUND_PALETTE
        .iter()
        .position(|&c| c == current)
        .map_or(0, |i| (i + 1) % GROUND_PALETTE.len());
    GROUND_PALETTE[next]
}

/// Side length of the ground plane for a domain half-width.
pub fn ground_size(half_width: f64) -> f64 {
    half_width * GROUND_SIZE_FACTOR
}

pub struct GroundPlane {
    mesh: MeshResource,
    half_width: f64,
    color: Rgb,
    opacity: f32,
    offset: f32,
}

impl GroundPlane {
    /// Creates the plane for `half_width` with the default look: `#84bbfa`,
    /// half transparent, `5 × n` below the origin.
    pub fn new(tracker: &ResourceTracker, half_width: f64) -> Self {
        Self {
            mesh: tracker.track(build_ground(half_width)),
            half_width,
            color: colors::GROUND,
            opacity: GROUND_OPACITY,
            offset: (GROUND_OFFSET_FACTOR * half_width) as f32,
        }
    }

    /// Recreates the plane for a new half-width. The old mesh is dropped.
    pub fn resize(&mut self, tracker: &ResourceTracker, half_width: f64) {
        self.mesh = tracker.track(build_ground(half_width));
        self.half_width = half_width;
        debug!(
            "ground plane resized to {:.1} x {:.1}",
            ground_size(half_width),
            ground_size(half_width)
        );
    }

    pub fn mesh(&self) -> &MeshResource {
        &self.mesh
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    pub fn size(&self) -> f64 {
        ground_size(self.half_width)
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Height of the plane along the plot's z axis.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: f32) {
        self.offset = offset;
    }
}

fn build_ground(half_width: f64) -> Mesh {
    let half = (ground_size(half_width) / 2.0) as f32;
    let side = GROUND_SEGMENTS + 1;
    let mut positions = Vec::with_capacity(side * side);
    for i in 0..side {
        let v = i as f32 / GROUND_SEGMENTS as f32;
        for j in 0..side {
            let u = j as f32 / GROUND_SEGMENTS as f32;
            positions.push(Vec3::new((u - 0.5) * 2.0 * half, (v - 0.5) * 2.0 * half, 0.0));
        }
    }
    // Shading uses the material color, so vertex colors stay neutral
    let colors = vec![Rgb::WHITE; positions.len()];
    Mesh::new(
        GROUND_NAME,
        positions,
        colors,
        grid_faces(GROUND_SEGMENTS, GROUND_SEGMENTS),
    )
}
