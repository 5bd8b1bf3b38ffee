//! Assembles a sampled grid into a renderable surface mesh.

use crate::colorize::colorize_grid;
use crate::math::Vec3;
use crate::mesh::{grid_faces, Mesh};
use crate::sampler::SampleGrid;

pub const SURFACE_NAME: &str = "surface";

/// Builds the surface mesh for `grid`: one vertex per sample, colored by
/// position, triangulated in grid order.
pub fn build_surface(grid: &SampleGrid) -> Mesh {
    let positions = grid
        .points()
        .iter()
        .map(|p| Vec3::new(p.x as f32, p.y as f32, p.z as f32))
        .collect();
    let colors = colorize_grid(grid);
    let faces = grid_faces(grid.segments(), grid.segments());
    Mesh::new(SURFACE_NAME, positions, colors, faces)
}
