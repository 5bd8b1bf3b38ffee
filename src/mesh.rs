//! Triangle meshes and the bookkeeping for their lifetime.
//!
//! A [`Mesh`] is plain geometry in plot space (z up). When it is handed to
//! the scene it becomes a [`MeshResource`], which is counted by a
//! [`ResourceTracker`] until it is dropped. Dropping is the release: a scene
//! that swaps its surface drops the old resource at the swap, so repeated
//! replots never accumulate geometry.

use std::cell::Cell;
use std::ops::Deref;
use std::rc::Rc;

use log::trace;

use crate::colors::Rgb;
use crate::math::Vec3;

/// A triangle as three indices into a mesh's vertex arrays (0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl Face {
    pub const fn new(a: usize, b: usize, c: usize) -> Self {
        Self { a, b, c }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }
}

/// The two triangles of cell `(i, j)` in a row-major lattice whose rows hold
/// `stride` vertices.
///
/// The cell has corners `a = (i, j)`, `b = (i, j+1)`, `c = (i+1, j+1)` and
/// `d = (i+1, j)` and is split into `(a, b, d)` and `(b, c, d)`.
pub fn cell_faces(stride: usize, i: usize, j: usize) -> [Face; 2] {
    let a = i * stride + j;
    let b = a + 1;
    let d = a + stride;
    let c = d + 1;
    [Face::new(a, b, d), Face::new(b, c, d)]
}

/// Faces for a row-major lattice of `(rows + 1) × (columns + 1)` vertices.
pub fn grid_faces(columns: usize, rows: usize) -> Vec<Face> {
    let stride = columns + 1;
    let mut faces = Vec::with_capacity(columns * rows * 2);
    for i in 0..rows {
        for j in 0..columns {
            faces.extend(cell_faces(stride, i, j));
        }
    }
    faces
}

/// Indexed triangle mesh with per-vertex colors and normals.
#[derive(Clone, Debug)]
pub struct Mesh {
    name: String,
    positions: Vec<Vec3>,
    colors: Vec<Rgb>,
    normals: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Builds a mesh and derives smooth vertex normals from its faces.
    ///
    /// # Panics
    /// Panics in debug builds if `colors` is not parallel to `positions`.
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        colors: Vec<Rgb>,
        faces: Vec<Face>,
    ) -> Self {
        debug_assert_eq!(positions.len(), colors.len(), "one color per vertex");
        let normals = vertex_normals(&positions, &faces);
        Self {
            name: name.into(),
            positions,
            colors,
            normals,
            faces,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// Area-weighted average of the normals of the faces around each vertex.
///
/// Faces touching a non-finite vertex contribute nothing, so a hole in the
/// surface does not poison the shading of its neighbours.
fn vertex_normals(positions: &[Vec3], faces: &[Face]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for face in faces {
        let [a, b, c] = face.indices();
        let (pa, pb, pc) = (positions[a], positions[b], positions[c]);
        if !(pa.is_finite() && pb.is_finite() && pc.is_finite()) {
            continue;
        }
        // Unnormalized: its length is twice the face area
        let n = (pb - pa).cross(pc - pa);
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }
    for n in &mut normals {
        *n = n.normalize();
    }
    normals
}

/// Counts mesh resources that are currently alive.
///
/// Clones share the same counters.
#[derive(Clone, Debug, Default)]
pub struct ResourceTracker {
    live: Rc<Cell<usize>>,
    created: Rc<Cell<usize>>,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `mesh` and counts it as live until dropped.
    pub fn track(&self, mesh: Mesh) -> MeshResource {
        self.live.set(self.live.get() + 1);
        self.created.set(self.created.get() + 1);
        trace!("allocated mesh '{}' ({} vertices)", mesh.name(), mesh.vertex_count());
        MeshResource {
            mesh,
            live: Rc::clone(&self.live),
        }
    }

    /// Resources created and not yet dropped.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    /// Resources created over the tracker's lifetime.
    pub fn created(&self) -> usize {
        self.created.get()
    }
}

/// A mesh owned by the scene. Dropping it releases it.
#[derive(Debug)]
pub struct MeshResource {
    mesh: Mesh,
    live: Rc<Cell<usize>>,
}

impl Deref for MeshResource {
    type Target = Mesh;

    fn deref(&self) -> &Mesh {
        &self.mesh
    }
}

impl Drop for MeshResource {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
        trace!(
            "released mesh '{}' ({} vertices)",
            self.mesh.name(),
            self.mesh.vertex_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_square() -> Mesh {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ];
        Mesh::new("square", positions, vec![Rgb::WHITE; 4], grid_faces(1, 1))
    }

    #[test]
    fn grid_faces_cover_every_cell_twice() {
        let faces = grid_faces(3, 2);
        assert_eq!(faces.len(), 3 * 2 * 2);
        let max = faces.iter().flat_map(|f| f.indices()).max().unwrap();
        assert_eq!(max, 4 * 3 - 1);
    }

    #[test]
    fn grid_faces_split_cells_consistently() {
        // 2x2 vertices: a=0, b=1, c=3, d=2
        assert_eq!(grid_faces(1, 1), vec![Face::new(0, 1, 2), Face::new(1, 3, 2)]);
    }

    #[test]
    fn cell_indices_do_not_wrap_on_huge_lattices() {
        // Past 65535 segments a row-major index no longer fits in 32 bits
        let stride = 70_001;
        let [first, second] = cell_faces(stride, 69_999, 5);
        let a = 69_999 * stride + 5;
        assert!(a > u32::MAX as usize);
        assert_eq!(first, Face::new(a, a + 1, a + stride));
        assert_eq!(second, Face::new(a + 1, a + stride + 1, a + stride));
    }

    #[test]
    fn flat_mesh_normals_point_along_z() {
        let mesh = flat_square();
        for n in mesh.normals() {
            assert_relative_eq!(n.z.abs(), 1.0);
        }
    }

    #[test]
    fn non_finite_vertices_do_not_poison_normals() {
        let mut positions = flat_square().positions().to_vec();
        positions[3].z = f32::NAN;
        let mesh = Mesh::new("holed", positions, vec![Rgb::WHITE; 4], grid_faces(1, 1));
        // Vertex 0 only touches the first, finite face
        assert!(mesh.normals()[0].is_finite());
        assert_relative_eq!(mesh.normals()[0].z.abs(), 1.0);
        // Vertex 3 only touches the second face, which is skipped
        assert_eq!(mesh.normals()[3], Vec3::ZERO);
    }

    #[test]
    fn tracker_counts_live_resources() {
        let tracker = ResourceTracker::new();
        let first = tracker.track(flat_square());
        let second = tracker.track(flat_square());
        assert_eq!(tracker.live(), 2);
        drop(first);
        assert_eq!(tracker.live(), 1);
        assert_eq!(tracker.created(), 2);
        assert_eq!(second.vertex_count(), 4);
    }
}
