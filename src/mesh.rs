//! Mesh buffers produced by triangulation.
//!
//! [`MeshData`] is a plain indexed triangle soup: positions, indices,
//! per-vertex colors and one UV channel. It carries no identity between
//! rebuilds — a triangulation pass clears it and regenerates everything.
//! Buffers are reused across passes to avoid allocation churn.

use bevy::color::LinearRgba;
use bevy::math::{Vec2, Vec3};

use crate::metrics;

/// Indexed triangle buffers for one chunk of terrain.
///
/// The UV channel is a water mask: `u` is 1 on stream-bed centerline
/// vertices and 0 everywhere else, for shaders that darken or wet the
/// carved channel. Winding is consistent so normals all face up out of
/// the surface.
#[derive(Debug, Default)]
pub struct MeshData {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
    colors: Vec<LinearRgba>,
    uvs: Vec<Vec2>,
}

impl MeshData {
    /// Empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all buffers, keeping their capacity.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.indices.clear();
        self.colors.clear();
        self.uvs.clear();
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Triangle indices, three per triangle.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Per-vertex colors, parallel to [`Self::positions`].
    pub fn colors(&self) -> &[LinearRgba] {
        &self.colors
    }

    /// Per-vertex water-mask UVs, parallel to [`Self::positions`].
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// Number of vertices emitted so far.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles emitted so far.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a triangle. Vertices arrive already perturbed (or
    /// deliberately exact); this only fills buffers.
    pub fn add_triangle(&mut self, v1: Vec3, v2: Vec3, v3: Vec3) {
        let index = self.positions.len() as u32;
        self.positions.extend([v1, v2, v3]);
        self.uvs.extend([Vec2::ZERO; 3]);
        self.indices.extend([index, index + 1, index + 2]);
    }

    /// Appends colors for the last triangle, one flat color.
    pub fn add_triangle_color(&mut self, color: LinearRgba) {
        self.colors.extend([color; 3]);
    }

    /// Appends colors for the last triangle, one per corner.
    pub fn add_triangle_colors(&mut self, c1: LinearRgba, c2: LinearRgba, c3: LinearRgba) {
        self.colors.extend([c1, c2, c3]);
    }

    /// Appends a quad as two triangles sharing the `v2`-`v3` diagonal.
    ///
    /// Index order keeps the winding of both triangles consistent with
    /// [`Self::add_triangle`].
    pub fn add_quad(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        let index = self.positions.len() as u32;
        self.positions.extend([v1, v2, v3, v4]);
        self.uvs.extend([Vec2::ZERO; 4]);
        self.indices.extend([
            index,
            index + 2,
            index + 1,
            index + 1,
            index + 2,
            index + 3,
        ]);
    }

    /// Appends colors for the last quad, blending two cell colors.
    pub fn add_quad_color(&mut self, c1: LinearRgba, c2: LinearRgba) {
        self.colors.extend([c1, c1, c2, c2]);
    }

    /// Appends colors for the last quad, one per corner.
    pub fn add_quad_colors(
        &mut self,
        c1: LinearRgba,
        c2: LinearRgba,
        c3: LinearRgba,
        c4: LinearRgba,
    ) {
        self.colors.extend([c1, c2, c3, c4]);
    }

    /// Overwrites the water mask of the last triangle's vertices.
    pub fn set_triangle_mask(&mut self, m1: f32, m2: f32, m3: f32) {
        let len = self.uvs.len();
        self.uvs[len - 3] = Vec2::new(m1, 0.0);
        self.uvs[len - 2] = Vec2::new(m2, 0.0);
        self.uvs[len - 1] = Vec2::new(m3, 0.0);
    }

    /// Overwrites the water mask of the last quad's vertices.
    pub fn set_quad_mask(&mut self, m1: f32, m2: f32, m3: f32, m4: f32) {
        let len = self.uvs.len();
        self.uvs[len - 4] = Vec2::new(m1, 0.0);
        self.uvs[len - 3] = Vec2::new(m2, 0.0);
        self.uvs[len - 2] = Vec2::new(m3, 0.0);
        self.uvs[len - 1] = Vec2::new(m4, 0.0);
    }
}

/// Five vertices along one solid edge of a cell, outer corner to outer
/// corner.
///
/// The middle vertex `v3` is the one rivers drop to stream-bed height;
/// the extra subdivisions keep the carved channel walls straight.
#[derive(Debug, Clone, Copy)]
pub struct EdgeVertices {
    /// First corner.
    pub v1: Vec3,
    /// Quarter point (or outer-step point).
    pub v2: Vec3,
    /// Edge middle; stream-bed vertex on river edges.
    pub v3: Vec3,
    /// Three-quarter point (or outer-step point).
    pub v4: Vec3,
    /// Second corner.
    pub v5: Vec3,
}

impl EdgeVertices {
    /// Evenly subdivided edge between two corners.
    pub fn new(corner1: Vec3, corner2: Vec3) -> Self {
        Self::with_outer_step(corner1, corner2, 0.25)
    }

    /// Edge whose v2/v4 sit `outer_step` of the way in from the corners.
    /// River channel mouths use a narrower step than plain edges.
    pub fn with_outer_step(corner1: Vec3, corner2: Vec3, outer_step: f32) -> Self {
        Self {
            v1: corner1,
            v2: corner1.lerp(corner2, outer_step),
            v3: corner1.lerp(corner2, 0.5),
            v4: corner1.lerp(corner2, 1.0 - outer_step),
            v5: corner2,
        }
    }

    /// Terrace interpolation between two whole edges.
    pub fn terrace_lerp(a: EdgeVertices, b: EdgeVertices, step: u32) -> Self {
        Self {
            v1: metrics::terrace_lerp(a.v1, b.v1, step),
            v2: metrics::terrace_lerp(a.v2, b.v2, step),
            v3: metrics::terrace_lerp(a.v3, b.v3, step),
            v4: metrics::terrace_lerp(a.v4, b.v4, step),
            v5: metrics::terrace_lerp(a.v5, b.v5, step),
        }
    }
}
