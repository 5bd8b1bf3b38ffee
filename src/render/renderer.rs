//! Draws a [`Scene`] into a [`FrameBuffer`].
//!
//! Each mesh goes through the same pipeline: model (plot to world), view and
//! projection transforms into clip space, clipping against the clip cube,
//! perspective divide and viewport mapping, then rasterization. Triangles
//! with a non-finite vertex are skipped.
//!
//! Draw order matters for the translucent ground plane, which is blended
//! last over everything opaque:
//! 1. surface faces (Gouraud, per-vertex lit colors)
//! 2. axes helper lines
//! 3. surface edges, in the wireframe render modes
//! 4. ground plane (flat, blended at its opacity, no depth write)

use log::trace;

use super::clipper::{clip_line, ClipPolygon, ClipVertex};
use super::framebuffer::FrameBuffer;
use super::rasterizer::{
    Coverage, EdgeFunctionRasterizer, FlatShader, GouraudShader, PixelShader, Rasterizer, Triangle,
};
use crate::camera::OrbitCamera;
use crate::colors::{self, Rgb};
use crate::light::DirectionalLight;
use crate::math::{Mat4, Vec3, Vec4};
use crate::mesh::Mesh;
use crate::projection::Projection;
use crate::scene::{Scene, PLOT_TO_WORLD};

/// Per-frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Triangles handed to the rasterizer after clipping.
    pub triangles: usize,
    /// Faces skipped because a vertex was not finite.
    pub skipped_faces: usize,
}

pub struct Renderer {
    framebuffer: FrameBuffer,
    rasterizer: EdgeFunctionRasterizer,
    light: DirectionalLight,
    lit_colors: Vec<Rgb>,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            framebuffer: FrameBuffer::new(width, height),
            rasterizer: EdgeFunctionRasterizer::new(),
            light: DirectionalLight::default(),
            lit_colors: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    pub fn height(&self) -> u32 {
        self.framebuffer.height()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.framebuffer.resize(width, height);
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    pub fn light(&self) -> &DirectionalLight {
        &self.light
    }

    pub fn set_light(&mut self, light: DirectionalLight) {
        self.light = light;
    }

    /// Renders one frame of `scene` as seen by `camera`.
    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &OrbitCamera,
        projection: &Projection,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        self.framebuffer.clear(colors::BACKGROUND);

        let view_projection = projection.matrix() * camera.view_matrix();
        let surface_mvp = view_projection * PLOT_TO_WORLD;

        if let Some(surface) = scene.surface() {
            self.light_vertices(surface);
            if scene.render_mode.draws_faces() {
                self.fill_mesh(
                    surface,
                    surface_mvp,
                    GouraudShader::new,
                    Coverage::Opaque,
                    &mut stats,
                );
            }
        }

        if scene.show_axes {
            self.draw_axes(surface_mvp, scene.axes_length());
        }

        if let Some(surface) = scene.surface() {
            if scene.render_mode.draws_edges() {
                // Alone, edges carry the surface colors; over faces they are dark
                let color = if scene.render_mode.draws_faces() {
                    Some(colors::WIREFRAME)
                } else {
                    None
                };
                self.draw_edges(surface, surface_mvp, color);
            }
        }

        let ground = scene.ground();
        let ground_mvp = surface_mvp * scene.ground_transform();
        // The plane's normal is plot +z, world up
        let ground_color = self.light.shade(ground.color(), Vec3::UP);
        self.lit_colors.clear();
        self.lit_colors.resize(ground.mesh().vertex_count(), ground_color);
        let shade = |_: [Rgb; 3]| FlatShader::new(ground_color);
        self.fill_mesh(
            ground.mesh(),
            ground_mvp,
            shade,
            Coverage::Translucent(ground.opacity()),
            &mut stats,
        );

        trace!(
            "frame: {} triangles, {} skipped faces",
            stats.triangles,
            stats.skipped_faces
        );
        stats
    }

    /// Fills `lit_colors` with the mesh's vertex colors under the light.
    fn light_vertices(&mut self, mesh: &Mesh) {
        let light = self.light;
        self.lit_colors.clear();
        self.lit_colors.extend(
            mesh.colors()
                .iter()
                .zip(mesh.normals())
                .map(|(&color, &normal)| {
                    light.shade(color, PLOT_TO_WORLD.transform_direction(normal))
                }),
        );
    }

    /// Rasterizes every face of `mesh`, colored from `lit_colors`.
    fn fill_mesh<S, F>(
        &mut self,
        mesh: &Mesh,
        mvp: Mat4,
        make_shader: F,
        coverage: Coverage,
        stats: &mut FrameStats,
    ) where
        S: PixelShader,
        F: Fn([Rgb; 3]) -> S,
    {
        let positions = mesh.positions();
        let (width, height) = (self.framebuffer.width(), self.framebuffer.height());

        for face in mesh.faces() {
            let [a, b, c] = face.indices();
            if ![a, b, c].iter().all(|&i| positions[i].is_finite()) {
                stats.skipped_faces += 1;
                continue;
            }

            let lit = &self.lit_colors;
            let vertex = |i: usize| ClipVertex::new(mvp.transform_point(positions[i]), lit[i]);
            let polygon = ClipPolygon::from_triangle(vertex(a), vertex(b), vertex(c)).clip();

            for [v0, v1, v2] in polygon.triangulate() {
                let triangle = Triangle::new([
                    to_screen(v0.position, width, height),
                    to_screen(v1.position, width, height),
                    to_screen(v2.position, width, height),
                ]);
                let shader = make_shader([v0.color, v1.color, v2.color]);
                self.rasterizer
                    .fill_triangle(&triangle, &mut self.framebuffer, &shader, coverage);
                stats.triangles += 1;
            }
        }
    }

    /// Draws the three edges of every face. `color` overrides the lit vertex
    /// colors when given.
    fn draw_edges(&mut self, mesh: &Mesh, mvp: Mat4, color: Option<u32>) {
        let positions = mesh.positions();
        for face in mesh.faces() {
            let [a, b, c] = face.indices();
            if ![a, b, c].iter().all(|&i| positions[i].is_finite()) {
                continue;
            }
            for (from, to) in [(a, b), (b, c), (c, a)] {
                let start =
                    ClipVertex::new(mvp.transform_point(positions[from]), self.lit_colors[from]);
                let end = ClipVertex::new(mvp.transform_point(positions[to]), self.lit_colors[to]);
                let line_color = color.unwrap_or_else(|| start.color.to_argb());
                self.draw_line(start, end, line_color);
            }
        }
    }

    /// Draws the x, y and z axes of plot space from the origin.
    fn draw_axes(&mut self, mvp: Mat4, length: f32) {
        let origin = Vec3::ZERO;
        let axes = [
            (Vec3::new(length, 0.0, 0.0), colors::AXIS_X),
            (Vec3::new(0.0, length, 0.0), colors::AXIS_Y),
            (Vec3::new(0.0, 0.0, length), colors::AXIS_Z),
        ];
        for (end, color) in axes {
            let rgb = Rgb::from_argb(color);
            self.draw_line(
                ClipVertex::new(mvp.transform_point(origin), rgb),
                ClipVertex::new(mvp.transform_point(end), rgb),
                color,
            );
        }
    }

    fn draw_line(&mut self, start: ClipVertex, end: ClipVertex, color: u32) {
        let Some((start, end)) = clip_line(start, end) else {
            return;
        };
        let (width, height) = (self.framebuffer.width(), self.framebuffer.height());
        let p0 = to_screen(start.position, width, height);
        let p1 = to_screen(end.position, width, height);
        self.framebuffer.draw_line(
            p0.x as i32,
            p0.y as i32,
            p0.z,
            p1.x as i32,
            p1.y as i32,
            p1.z,
            color,
        );
    }
}

/// Perspective divide and viewport mapping.
///
/// Returns pixel x/y (y down) with 1/w in z for depth testing.
#[inline]
fn to_screen(clip: Vec4, width: u32, height: u32) -> Vec3 {
    let inv_w = 1.0 / clip.w;
    let ndc_x = clip.x * inv_w;
    let ndc_y = clip.y * inv_w;
    Vec3::new(
        (ndc_x + 1.0) * 0.5 * width as f32,
        (1.0 - ndc_y) * 0.5 * height as f32,
        inv_w,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::grid_faces;
    use crate::scene::RenderMode;
    use approx::assert_relative_eq;

    const SIZE: u32 = 128;

    fn camera() -> OrbitCamera {
        OrbitCamera::for_half_width(1.0)
    }

    fn flat_square(z: f32, color: Rgb) -> Mesh {
        let positions = vec![
            Vec3::new(-1.0, -1.0, z),
            Vec3::new(1.0, -1.0, z),
            Vec3::new(-1.0, 1.0, z),
            Vec3::new(1.0, 1.0, z),
        ];
        Mesh::new("square", positions, vec![color; 4], grid_faces(1, 1))
    }

    fn scene_without_extras() -> Scene {
        let mut scene = Scene::new(1.0);
        scene.show_axes = false;
        // Move the ground far below so it stays out of the center pixels
        scene.ground_mut().set_offset(-1000.0);
        scene
    }

    fn render(scene: &Scene) -> (Renderer, FrameStats) {
        let mut renderer = Renderer::new(SIZE, SIZE);
        let projection = Projection::for_viewport(SIZE, SIZE);
        let stats = renderer.render(scene, &camera(), &projection);
        (renderer, stats)
    }

    fn center(renderer: &Renderer) -> u32 {
        let c = SIZE as i32 / 2;
        renderer.framebuffer().get_pixel(c, c).unwrap_or_default()
    }

    #[test]
    fn screen_mapping_centers_origin() {
        let p = to_screen(Vec4::new(0.0, 0.0, 0.5, 2.0), 100, 50);
        assert_relative_eq!(p.x, 50.0);
        assert_relative_eq!(p.y, 25.0);
        assert_relative_eq!(p.z, 0.5);
    }

    #[test]
    fn screen_mapping_flips_y() {
        let top = to_screen(Vec4::new(0.0, 1.0, 0.0, 1.0), 100, 100);
        assert_relative_eq!(top.y, 0.0);
    }

    #[test]
    fn surface_covers_center_of_view() {
        let mut scene = scene_without_extras();
        scene.replace_surface(flat_square(0.0, Rgb::new(1.0, 0.0, 0.0)));
        let (renderer, stats) = render(&scene);

        assert!(stats.triangles >= 2);
        let (r, g, b) = colors::unpack_color(center(&renderer));
        assert!(r > 0.0 && g == 0.0 && b == 0.0);
    }

    #[test]
    fn empty_scene_shows_background() {
        let scene = scene_without_extras();
        let (renderer, _) = render(&scene);
        assert_eq!(center(&renderer), colors::BACKGROUND);
    }

    #[test]
    fn wireframe_mode_leaves_face_interiors_empty() {
        let mut scene = scene_without_extras();
        scene.replace_surface(flat_square(0.0, Rgb::WHITE));
        scene.render_mode = RenderMode::Wireframe;
        let (renderer, stats) = render(&scene);

        assert_eq!(stats.triangles, 0);
        let lit = renderer
            .framebuffer()
            .pixels()
            .iter()
            .filter(|&&c| c != colors::BACKGROUND)
            .count();
        assert!(lit > 0);
        assert!(lit < (SIZE * SIZE / 2) as usize);
    }

    #[test]
    fn non_finite_faces_are_skipped() {
        let mut scene = scene_without_extras();
        let mut positions = flat_square(0.0, Rgb::WHITE).positions().to_vec();
        positions[3].z = f32::NAN;
        let mesh = Mesh::new("holey", positions, vec![Rgb::WHITE; 4], grid_faces(1, 1));
        scene.replace_surface(mesh);
        let (_, stats) = render(&scene);

        // Both faces of the single cell touch vertex 3
        assert_eq!(stats.skipped_faces, 2);
    }

    #[test]
    fn ground_blends_over_background() {
        let mut scene = Scene::new(1.0);
        scene.show_axes = false;
        let (renderer, _) = render(&scene);

        // The default ground fills the lower half of the view
        let bottom = renderer
            .framebuffer()
            .get_pixel(SIZE as i32 / 2, SIZE as i32 - 2)
            .unwrap_or_default();
        assert_ne!(bottom, colors::BACKGROUND);
    }
}
