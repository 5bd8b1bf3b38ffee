//! The two renderable objects a plot puts on screen, plus the axes helper.
//!
//! Geometry lives in plot space, where z is the function value. The renderer
//! maps plot space to world space (y up) with [`PLOT_TO_WORLD`].

use log::debug;

use crate::ground::GroundPlane;
use crate::math::Mat4;
use crate::mesh::{Mesh, MeshResource, ResourceTracker};

/// Swaps the y and z axes: plot `(x, y, z)` becomes world `(x, z, y)`.
pub const PLOT_TO_WORLD: Mat4 = Mat4::new([
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
]);

/// Axis helper length per unit of domain half-width.
pub const AXES_LENGTH_FACTOR: f64 = 10.0;

/// How the surface is drawn. The ground plane is always filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Filled,
    Wireframe,
    FilledWireframe,
}

impl RenderMode {
    /// The mode after this one when cycling with the wireframe key.
    pub fn next(self) -> Self {
        match self {
            RenderMode::Filled => RenderMode::Wireframe,
            RenderMode::Wireframe => RenderMode::FilledWireframe,
            RenderMode::FilledWireframe => RenderMode::Filled,
        }
    }

    pub fn draws_faces(self) -> bool {
        matches!(self, RenderMode::Filled | RenderMode::FilledWireframe)
    }

    pub fn draws_edges(self) -> bool {
        matches!(self, RenderMode::Wireframe | RenderMode::FilledWireframe)
    }
}

pub struct Scene {
    tracker: ResourceTracker,
    surface: Option<MeshResource>,
    ground: GroundPlane,
    pub render_mode: RenderMode,
    pub show_axes: bool,
}

impl Scene {
    /// Creates a scene with no surface and a ground plane sized for `half_width`.
    pub fn new(half_width: f64) -> Self {
        let tracker = ResourceTracker::new();
        let ground = GroundPlane::new(&tracker, half_width);
        Self {
            tracker,
            surface: None,
            ground,
            render_mode: RenderMode::default(),
            show_axes: true,
        }
    }

    pub fn surface(&self) -> Option<&MeshResource> {
        self.surface.as_ref()
    }

    pub fn ground(&self) -> &GroundPlane {
        &self.ground
    }

    pub fn ground_mut(&mut self) -> &mut GroundPlane {
        &mut self.ground
    }

    pub fn tracker(&self) -> &ResourceTracker {
        &self.tracker
    }

    /// Length of each axis line for the current ground size.
    pub fn axes_length(&self) -> f32 {
        (self.ground.half_width() * AXES_LENGTH_FACTOR) as f32
    }

    /// Installs `mesh` as the displayed surface and releases the previous one.
    pub fn replace_surface(&mut self, mesh: Mesh) {
        let incoming = self.tracker.track(mesh);
        if let Some(previous) = self.surface.replace(incoming) {
            debug!(
                "releasing previous surface ({} vertices)",
                previous.vertex_count()
            );
            drop(previous);
        }
    }

    /// Recreates the ground plane at `half_width`.
    pub fn rebuild_ground(&mut self, half_width: f64) {
        self.ground.resize(&self.tracker, half_width);
    }

    /// Model matrix of the ground plane in plot space.
    pub fn ground_transform(&self) -> Mat4 {
        Mat4::translation(0.0, 0.0, self.ground.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Rgb;
    use crate::math::Vec3;
    use crate::mesh::grid_faces;

    fn tiny_mesh() -> Mesh {
        let positions = vec![Vec3::ZERO; 4];
        Mesh::new("tiny", positions, vec![Rgb::BLACK; 4], grid_faces(1, 1))
    }

    #[test]
    fn replacing_surface_releases_old_mesh() {
        let mut scene = Scene::new(1.0);
        // The ground plane is the only resource at first
        assert_eq!(scene.tracker().live(), 1);

        scene.replace_surface(tiny_mesh());
        scene.replace_surface(tiny_mesh());
        scene.replace_surface(tiny_mesh());

        assert_eq!(scene.tracker().live(), 2);
        assert_eq!(scene.tracker().created(), 4);
    }

    #[test]
    fn render_modes_cycle() {
        let mut mode = RenderMode::default();
        assert!(mode.draws_faces() && !mode.draws_edges());
        mode = mode.next();
        assert_eq!(mode, RenderMode::Wireframe);
        assert!(!mode.draws_faces());
        mode = mode.next();
        assert!(mode.draws_faces() && mode.draws_edges());
        assert_eq!(mode.next(), RenderMode::Filled);
    }

    #[test]
    fn plot_to_world_puts_height_on_world_up() {
        let p = PLOT_TO_WORLD.transform_point(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!((p.x, p.y, p.z), (1.0, 3.0, 2.0));
    }

    #[test]
    fn ground_transform_applies_offset() {
        let mut scene = Scene::new(1.0);
        scene.ground_mut().set_offset(-2.5);
        let p = scene.ground_transform().transform_point(Vec3::ZERO);
        assert_eq!(p.z, -2.5);
    }
}
