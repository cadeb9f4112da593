//! Cell-state to mesh-buffer triangulation.
//!
//! Each cell contributes six wedges of solid interior. Between cells,
//! the three "forward" directions (NE, E, SE) own the connection quads
//! and the two forward corners own the three-cell corner triangles, so
//! every shared edge and corner is emitted exactly once. Elevation
//! deltas turn connections into terrace staircases or cliff walls, and
//! river flags carve a stream-bed channel through the wedge fans.
//!
//! All emitted vertices run through the grid's noise perturbation except
//! cliff boundary points, which must stay exact on both sides of the
//! seam or cracks open.

use bevy::color::{LinearRgba, Mix};
use bevy::log::debug;
use bevy::math::Vec3;

use crate::cell::CellId;
use crate::direction::HexDirection;
use crate::grid::HexGrid;
use crate::mesh::{EdgeVertices, MeshData};
use crate::metrics::{self, HexEdgeType, INNER_TO_OUTER, TERRACE_STEPS};

/// How a three-cell corner gets filled, chosen from the pairwise edge
/// types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerStrategy {
    /// Terrace fan between two slopes (or a slope and a flat).
    TerraceFan,
    /// Terraces rising into a cliff; boundary-triangle fan below.
    TerracesThenCliff,
    /// Cliff below, terraces above; mirrored boundary fan.
    CliffThenTerraces,
    /// One flat triangle.
    FlatTriangle,
}

/// Reordering of the (bottom, left, right) corner triple before the
/// strategy runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerRotation {
    /// Keep (bottom, left, right).
    None,
    /// Start from the left cell: (left, right, bottom).
    Left,
    /// Start from the right cell: (right, bottom, left).
    Right,
}

/// Decision table for corner triangulation.
///
/// Keyed by the edge types bottom-left, bottom-right and left-right;
/// `left_is_lower` breaks the tie when only the left-right edge is a
/// slope and decides which cliff-terrace mirror applies.
pub fn corner_plan(
    left: HexEdgeType,
    right: HexEdgeType,
    left_right: HexEdgeType,
    left_is_lower: bool,
) -> (CornerStrategy, CornerRotation) {
    use HexEdgeType::{Cliff, Flat, Slope};
    match (left, right) {
        (Slope, Slope) => (CornerStrategy::TerraceFan, CornerRotation::None),
        (Slope, Flat) => (CornerStrategy::TerraceFan, CornerRotation::Left),
        (Slope, Cliff) => (CornerStrategy::TerracesThenCliff, CornerRotation::None),
        (Flat, Slope) => (CornerStrategy::TerraceFan, CornerRotation::Right),
        (Cliff, Slope) => (CornerStrategy::CliffThenTerraces, CornerRotation::None),
        _ => match left_right {
            Slope => {
                if left_is_lower {
                    (CornerStrategy::CliffThenTerraces, CornerRotation::Right)
                } else {
                    (CornerStrategy::TerracesThenCliff, CornerRotation::Left)
                }
            }
            _ => (CornerStrategy::FlatTriangle, CornerRotation::None),
        },
    }
}

/// Rebuilds mesh buffers from cell state.
///
/// Borrows the grid read-only; pair it with a reusable [`MeshData`] per
/// chunk and call [`Triangulator::triangulate_chunk`] for every index
/// the grid reports dirty.
pub struct Triangulator<'a> {
    grid: &'a HexGrid,
    mesh: &'a mut MeshData,
}

impl<'a> Triangulator<'a> {
    /// Pairs a grid with an output buffer.
    pub fn new(grid: &'a HexGrid, mesh: &'a mut MeshData) -> Self {
        Self { grid, mesh }
    }

    /// Clears the buffers and re-triangulates one chunk's cells.
    pub fn triangulate_chunk(&mut self, chunk: usize) {
        self.mesh.clear();
        for id in self.grid.chunk_cells(chunk) {
            self.triangulate_cell(id);
        }
        debug!(
            "triangulated chunk {}: {} vertices, {} triangles",
            chunk,
            self.mesh.vertex_count(),
            self.mesh.triangle_count()
        );
    }

    /// Clears the buffers and re-triangulates the whole grid into one
    /// buffer set.
    pub fn triangulate_all(&mut self) {
        self.mesh.clear();
        let grid = self.grid;
        for id in grid.cell_ids() {
            self.triangulate_cell(id);
        }
    }

    fn triangulate_cell(&mut self, id: CellId) {
        for direction in HexDirection::ALL {
            self.triangulate_wedge(direction, id);
        }
    }

    fn triangulate_wedge(&mut self, direction: HexDirection, id: CellId) {
        let grid = self.grid;
        let cell = grid.cell(id);
        let center = cell.position();
        let mut e = EdgeVertices::new(
            center + metrics::first_solid_corner(direction),
            center + metrics::second_solid_corner(direction),
        );

        if cell.has_river() {
            if cell.has_river_through_edge(direction) {
                e.v3.y = cell.stream_bed_y();
                if cell.has_river_begin_or_end() {
                    self.triangulate_with_river_begin_or_end(id, center, e);
                } else {
                    self.triangulate_with_river(direction, id, center, e);
                }
            } else {
                self.triangulate_adjacent_to_river(direction, id, center, e);
            }
        } else {
            self.triangulate_edge_fan(center, e, cell.color());
        }

        // Forward directions own the shared geometry between cells.
        if matches!(
            direction,
            HexDirection::NE | HexDirection::E | HexDirection::SE
        ) {
            self.triangulate_connection(direction, id, e);
        }
    }

    // ── rivers ──────────────────────────────────────────────────────

    /// Carves the channel through a cell the river crosses.
    ///
    /// The wedge center splits into a left and right bank point, pulled
    /// toward the river-free side of the cell depending on where else
    /// the river touches; the line between them drops to stream-bed
    /// height and the remaining area fills with bank triangles/quads.
    fn triangulate_with_river(
        &mut self,
        direction: HexDirection,
        id: CellId,
        center: Vec3,
        e: EdgeVertices,
    ) {
        let cell = self.grid.cell(id);
        let color = cell.color();

        let (center_l, center_r) = if cell.has_river_through_edge(direction.opposite()) {
            // Straight channel: widen both banks.
            (
                center + metrics::first_solid_corner(direction.previous()) * 0.25,
                center + metrics::second_solid_corner(direction.next()) * 0.25,
            )
        } else if cell.has_river_through_edge(direction.next()) {
            // Sharp turn toward the next edge.
            (center, center.lerp(e.v5, 2.0 / 3.0))
        } else if cell.has_river_through_edge(direction.previous()) {
            (center.lerp(e.v1, 2.0 / 3.0), center)
        } else if cell.has_river_through_edge(direction.next2()) {
            // Gentle turn, one edge between the two crossings.
            (
                center,
                center + metrics::solid_edge_middle(direction.next()) * (0.5 * INNER_TO_OUTER),
            )
        } else {
            (
                center + metrics::solid_edge_middle(direction.previous()) * (0.5 * INNER_TO_OUTER),
                center,
            )
        };
        let mut center = center_l.lerp(center_r, 0.5);

        let mut m = EdgeVertices::with_outer_step(
            center_l.lerp(e.v1, 0.5),
            center_r.lerp(e.v5, 0.5),
            1.0 / 6.0,
        );
        m.v3.y = e.v3.y;
        center.y = e.v3.y;

        self.triangulate_edge_strip(m, color, e, color, true);

        self.add_triangle(center_l, m.v1, m.v2);
        self.mesh.add_triangle_color(color);
        self.add_quad(center_l, center, m.v2, m.v3);
        self.mesh.add_quad_color(color, color);
        self.mesh.set_quad_mask(0.0, 1.0, 0.0, 1.0);
        self.add_quad(center, center_r, m.v3, m.v4);
        self.mesh.add_quad_color(color, color);
        self.mesh.set_quad_mask(1.0, 0.0, 1.0, 0.0);
        self.add_triangle(center_r, m.v4, m.v5);
        self.mesh.add_triangle_color(color);
    }

    /// A river mouth or spring: the channel fans out symmetrically
    /// around the single crossing instead of cutting through.
    fn triangulate_with_river_begin_or_end(&mut self, id: CellId, center: Vec3, e: EdgeVertices) {
        let color = self.grid.cell(id).color();
        let mut m = EdgeVertices::new(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5));
        m.v3.y = e.v3.y;

        self.triangulate_edge_strip(m, color, e, color, true);
        self.triangulate_edge_fan(center, m, color);
    }

    /// A wedge of a river cell the river does not cross: a plain fan,
    /// with the center nudged away from the channel so banks stay wide.
    fn triangulate_adjacent_to_river(
        &mut self,
        direction: HexDirection,
        id: CellId,
        center: Vec3,
        e: EdgeVertices,
    ) {
        let cell = self.grid.cell(id);
        let color = cell.color();

        let mut center = center;
        if cell.has_river_through_edge(direction.next()) {
            if cell.has_river_through_edge(direction.previous()) {
                center += metrics::solid_edge_middle(direction) * (INNER_TO_OUTER * 0.5);
            } else if cell.has_river_through_edge(direction.previous2()) {
                center += metrics::first_solid_corner(direction) * 0.25;
            }
        } else if cell.has_river_through_edge(direction.previous())
            && cell.has_river_through_edge(direction.next2())
        {
            center += metrics::second_solid_corner(direction) * 0.25;
        }

        let m = EdgeVertices::new(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5));
        self.triangulate_edge_strip(m, color, e, color, false);
        self.triangulate_edge_fan(center, m, color);
    }

    // ── connections ─────────────────────────────────────────────────

    fn triangulate_connection(&mut self, direction: HexDirection, id: CellId, e1: EdgeVertices) {
        let grid = self.grid;
        let cell = grid.cell(id);
        let Some(neighbor_id) = cell.neighbor(direction) else {
            return;
        };
        let neighbor = grid.cell(neighbor_id);

        let mut bridge = metrics::bridge(direction);
        bridge.y = neighbor.position().y - cell.position().y;
        let mut e2 = EdgeVertices::new(e1.v1 + bridge, e1.v5 + bridge);

        let river = cell.has_river_through_edge(direction);
        if river {
            e2.v3.y = neighbor.stream_bed_y();
        }

        if cell.edge_type_to(neighbor) == HexEdgeType::Slope {
            self.triangulate_edge_terraces(e1, cell.color(), e2, neighbor.color(), river);
        } else {
            self.triangulate_edge_strip(e1, cell.color(), e2, neighbor.color(), river);
        }

        // The first two forward directions own the corner triangles.
        if direction <= HexDirection::E {
            let Some(next_id) = cell.neighbor(direction.next()) else {
                return;
            };
            let next = grid.cell(next_id);
            let mut v5 = e1.v5 + metrics::bridge(direction.next());
            v5.y = next.position().y;

            // Hand the lowest cell to the corner as "bottom".
            if cell.elevation() <= neighbor.elevation() {
                if cell.elevation() <= next.elevation() {
                    self.triangulate_corner(e1.v5, id, e2.v5, neighbor_id, v5, next_id);
                } else {
                    self.triangulate_corner(v5, next_id, e1.v5, id, e2.v5, neighbor_id);
                }
            } else if neighbor.elevation() <= next.elevation() {
                self.triangulate_corner(e2.v5, neighbor_id, v5, next_id, e1.v5, id);
            } else {
                self.triangulate_corner(v5, next_id, e1.v5, id, e2.v5, neighbor_id);
            }
        }
    }

    /// Slope connection: a staircase of edge strips.
    fn triangulate_edge_terraces(
        &mut self,
        begin: EdgeVertices,
        begin_color: LinearRgba,
        end: EdgeVertices,
        end_color: LinearRgba,
        river: bool,
    ) {
        let mut e2 = EdgeVertices::terrace_lerp(begin, end, 1);
        let mut c2 = metrics::terrace_color_lerp(begin_color, end_color, 1);
        self.triangulate_edge_strip(begin, begin_color, e2, c2, river);

        for step in 2..TERRACE_STEPS {
            let e1 = e2;
            let c1 = c2;
            e2 = EdgeVertices::terrace_lerp(begin, end, step);
            c2 = metrics::terrace_color_lerp(begin_color, end_color, step);
            self.triangulate_edge_strip(e1, c1, e2, c2, river);
        }

        self.triangulate_edge_strip(e2, c2, end, end_color, river);
    }

    // ── corners ─────────────────────────────────────────────────────

    fn triangulate_corner(
        &mut self,
        bottom: Vec3,
        bottom_id: CellId,
        left: Vec3,
        left_id: CellId,
        right: Vec3,
        right_id: CellId,
    ) {
        let grid = self.grid;
        let bottom_cell = grid.cell(bottom_id);
        let left_cell = grid.cell(left_id);
        let right_cell = grid.cell(right_id);

        let (strategy, rotation) = corner_plan(
            bottom_cell.edge_type_to(left_cell),
            bottom_cell.edge_type_to(right_cell),
            left_cell.edge_type_to(right_cell),
            left_cell.elevation() < right_cell.elevation(),
        );

        let ((b, b_id), (l, l_id), (r, r_id)) = match rotation {
            CornerRotation::None => ((bottom, bottom_id), (left, left_id), (right, right_id)),
            CornerRotation::Left => ((left, left_id), (right, right_id), (bottom, bottom_id)),
            CornerRotation::Right => ((right, right_id), (bottom, bottom_id), (left, left_id)),
        };

        match strategy {
            CornerStrategy::TerraceFan => {
                self.triangulate_corner_terraces(b, b_id, l, l_id, r, r_id);
            }
            CornerStrategy::TerracesThenCliff => {
                self.triangulate_corner_terraces_cliff(b, b_id, l, l_id, r, r_id);
            }
            CornerStrategy::CliffThenTerraces => {
                self.triangulate_corner_cliff_terraces(b, b_id, l, l_id, r, r_id);
            }
            CornerStrategy::FlatTriangle => {
                self.add_triangle(bottom, left, right);
                self.mesh.add_triangle_colors(
                    bottom_cell.color(),
                    left_cell.color(),
                    right_cell.color(),
                );
            }
        }
    }

    /// Double terrace fan: both corner edges are slopes.
    fn triangulate_corner_terraces(
        &mut self,
        begin: Vec3,
        begin_id: CellId,
        left: Vec3,
        left_id: CellId,
        right: Vec3,
        right_id: CellId,
    ) {
        let grid = self.grid;
        let begin_color = grid.cell(begin_id).color();
        let left_color = grid.cell(left_id).color();
        let right_color = grid.cell(right_id).color();

        let mut v3 = metrics::terrace_lerp(begin, left, 1);
        let mut v4 = metrics::terrace_lerp(begin, right, 1);
        let mut c3 = metrics::terrace_color_lerp(begin_color, left_color, 1);
        let mut c4 = metrics::terrace_color_lerp(begin_color, right_color, 1);

        self.add_triangle(begin, v3, v4);
        self.mesh.add_triangle_colors(begin_color, c3, c4);

        for step in 2..TERRACE_STEPS {
            let v1 = v3;
            let v2 = v4;
            let c1 = c3;
            let c2 = c4;
            v3 = metrics::terrace_lerp(begin, left, step);
            v4 = metrics::terrace_lerp(begin, right, step);
            c3 = metrics::terrace_color_lerp(begin_color, left_color, step);
            c4 = metrics::terrace_color_lerp(begin_color, right_color, step);
            self.add_quad(v1, v2, v3, v4);
            self.mesh.add_quad_colors(c1, c2, c3, c4);
        }

        self.add_quad(v3, v4, left, right);
        self.mesh.add_quad_colors(c3, c4, left_color, right_color);
    }

    /// Terraces on the left edge running into a cliff on the right.
    ///
    /// The cliff meets the terraces at a boundary point placed one
    /// elevation level up the cliff face; both halves fan toward it.
    fn triangulate_corner_terraces_cliff(
        &mut self,
        begin: Vec3,
        begin_id: CellId,
        left: Vec3,
        left_id: CellId,
        right: Vec3,
        right_id: CellId,
    ) {
        let grid = self.grid;
        let begin_cell = grid.cell(begin_id);
        let left_cell = grid.cell(left_id);
        let right_cell = grid.cell(right_id);

        let mut b = 1.0 / (right_cell.elevation() - begin_cell.elevation()) as f32;
        if b < 0.0 {
            b = -b;
        }
        // Boundary interpolates between already-perturbed points and is
        // then left exact, so both cliff halves agree on it.
        let boundary = self.perturb(begin).lerp(self.perturb(right), b);
        let boundary_color = begin_cell.color().mix(&right_cell.color(), b);

        self.triangulate_boundary_triangle(
            begin,
            begin_cell.color(),
            left,
            left_cell.color(),
            boundary,
            boundary_color,
        );

        if left_cell.edge_type_to(right_cell) == HexEdgeType::Slope {
            self.triangulate_boundary_triangle(
                left,
                left_cell.color(),
                right,
                right_cell.color(),
                boundary,
                boundary_color,
            );
        } else {
            let (pl, pr) = (self.perturb(left), self.perturb(right));
            self.mesh.add_triangle(pl, pr, boundary);
            self.mesh
                .add_triangle_colors(left_cell.color(), right_cell.color(), boundary_color);
        }
    }

    /// Mirror of [`Self::triangulate_corner_terraces_cliff`] with the
    /// cliff on the left edge.
    fn triangulate_corner_cliff_terraces(
        &mut self,
        begin: Vec3,
        begin_id: CellId,
        left: Vec3,
        left_id: CellId,
        right: Vec3,
        right_id: CellId,
    ) {
        let grid = self.grid;
        let begin_cell = grid.cell(begin_id);
        let left_cell = grid.cell(left_id);
        let right_cell = grid.cell(right_id);

        let mut b = 1.0 / (left_cell.elevation() - begin_cell.elevation()) as f32;
        if b < 0.0 {
            b = -b;
        }
        let boundary = self.perturb(begin).lerp(self.perturb(left), b);
        let boundary_color = begin_cell.color().mix(&left_cell.color(), b);

        self.triangulate_boundary_triangle(
            right,
            right_cell.color(),
            begin,
            begin_cell.color(),
            boundary,
            boundary_color,
        );

        if left_cell.edge_type_to(right_cell) == HexEdgeType::Slope {
            self.triangulate_boundary_triangle(
                left,
                left_cell.color(),
                right,
                right_cell.color(),
                boundary,
                boundary_color,
            );
        } else {
            let (pl, pr) = (self.perturb(left), self.perturb(right));
            self.mesh.add_triangle(pl, pr, boundary);
            self.mesh
                .add_triangle_colors(left_cell.color(), right_cell.color(), boundary_color);
        }
    }

    /// Terrace fan collapsing onto the exact boundary point.
    fn triangulate_boundary_triangle(
        &mut self,
        begin: Vec3,
        begin_color: LinearRgba,
        left: Vec3,
        left_color: LinearRgba,
        boundary: Vec3,
        boundary_color: LinearRgba,
    ) {
        let mut v2 = self.perturb(metrics::terrace_lerp(begin, left, 1));
        let mut c2 = metrics::terrace_color_lerp(begin_color, left_color, 1);

        self.mesh.add_triangle(self.perturb(begin), v2, boundary);
        self.mesh
            .add_triangle_colors(begin_color, c2, boundary_color);

        for step in 2..TERRACE_STEPS {
            let v1 = v2;
            let c1 = c2;
            v2 = self.perturb(metrics::terrace_lerp(begin, left, step));
            c2 = metrics::terrace_color_lerp(begin_color, left_color, step);
            self.mesh.add_triangle(v1, v2, boundary);
            self.mesh.add_triangle_colors(c1, c2, boundary_color);
        }

        self.mesh.add_triangle(v2, self.perturb(left), boundary);
        self.mesh
            .add_triangle_colors(c2, left_color, boundary_color);
    }

    // ── primitives ──────────────────────────────────────────────────

    /// Four triangles from a center point to an edge.
    fn triangulate_edge_fan(&mut self, center: Vec3, e: EdgeVertices, color: LinearRgba) {
        self.add_triangle(center, e.v1, e.v2);
        self.mesh.add_triangle_color(color);
        self.add_triangle(center, e.v2, e.v3);
        self.mesh.add_triangle_color(color);
        self.add_triangle(center, e.v3, e.v4);
        self.mesh.add_triangle_color(color);
        self.add_triangle(center, e.v4, e.v5);
        self.mesh.add_triangle_color(color);
    }

    /// Four quads between two edges. `river` marks the two middle quads
    /// with the stream-bed water mask.
    fn triangulate_edge_strip(
        &mut self,
        e1: EdgeVertices,
        c1: LinearRgba,
        e2: EdgeVertices,
        c2: LinearRgba,
        river: bool,
    ) {
        self.add_quad(e1.v1, e1.v2, e2.v1, e2.v2);
        self.mesh.add_quad_color(c1, c2);
        self.add_quad(e1.v2, e1.v3, e2.v2, e2.v3);
        self.mesh.add_quad_color(c1, c2);
        if river {
            self.mesh.set_quad_mask(0.0, 1.0, 0.0, 1.0);
        }
        self.add_quad(e1.v3, e1.v4, e2.v3, e2.v4);
        self.mesh.add_quad_color(c1, c2);
        if river {
            self.mesh.set_quad_mask(1.0, 0.0, 1.0, 0.0);
        }
        self.add_quad(e1.v4, e1.v5, e2.v4, e2.v5);
        self.mesh.add_quad_color(c1, c2);
    }

    fn perturb(&self, position: Vec3) -> Vec3 {
        self.grid.noise().perturb(position)
    }

    fn add_triangle(&mut self, v1: Vec3, v2: Vec3, v3: Vec3) {
        self.mesh
            .add_triangle(self.perturb(v1), self.perturb(v2), self.perturb(v3));
    }

    fn add_quad(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        self.mesh.add_quad(
            self.perturb(v1),
            self.perturb(v2),
            self.perturb(v3),
            self.perturb(v4),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::coords::HexCoordinates;
    use crate::perturb::{HexHashGrid, NoiseField};

    use HexEdgeType::{Cliff, Flat, Slope};

    fn flat_grid() -> HexGrid {
        let config = MapConfig {
            chunk_count_x: 1,
            chunk_count_z: 1,
            ..Default::default()
        };
        HexGrid::new(&config, NoiseField::flat(), HexHashGrid::new(1)).unwrap()
    }

    fn at(grid: &HexGrid, x: i32, z: i32) -> CellId {
        grid.cell_at(HexCoordinates::from_offset(x, z)).unwrap()
    }

    fn triangulate(grid: &HexGrid) -> MeshData {
        let mut mesh = MeshData::new();
        Triangulator::new(grid, &mut mesh).triangulate_all();
        mesh
    }

    // ── corner decision table ───────────────────────────────────────

    #[test]
    fn slope_pairs_pick_the_terrace_fan() {
        assert_eq!(
            corner_plan(Slope, Slope, Flat, false),
            (CornerStrategy::TerraceFan, CornerRotation::None)
        );
        assert_eq!(
            corner_plan(Slope, Flat, Slope, false),
            (CornerStrategy::TerraceFan, CornerRotation::Left)
        );
        assert_eq!(
            corner_plan(Flat, Slope, Slope, true),
            (CornerStrategy::TerraceFan, CornerRotation::Right)
        );
    }

    #[test]
    fn slope_against_cliff_picks_a_boundary_fan() {
        assert_eq!(
            corner_plan(Slope, Cliff, Cliff, false),
            (CornerStrategy::TerracesThenCliff, CornerRotation::None)
        );
        assert_eq!(
            corner_plan(Cliff, Slope, Cliff, false),
            (CornerStrategy::CliffThenTerraces, CornerRotation::None)
        );
    }

    #[test]
    fn double_cliff_over_slope_tie_breaks_on_the_lower_cell() {
        assert_eq!(
            corner_plan(Cliff, Cliff, Slope, true),
            (CornerStrategy::CliffThenTerraces, CornerRotation::Right)
        );
        assert_eq!(
            corner_plan(Cliff, Cliff, Slope, false),
            (CornerStrategy::TerracesThenCliff, CornerRotation::Left)
        );
    }

    #[test]
    fn featureless_corners_are_one_triangle() {
        assert_eq!(
            corner_plan(Flat, Flat, Flat, false),
            (CornerStrategy::FlatTriangle, CornerRotation::None)
        );
        assert_eq!(
            corner_plan(Cliff, Cliff, Cliff, false),
            (CornerStrategy::FlatTriangle, CornerRotation::None)
        );
        assert_eq!(
            corner_plan(Flat, Cliff, Cliff, true),
            (CornerStrategy::FlatTriangle, CornerRotation::None)
        );
    }

    // ── mesh closure ────────────────────────────────────────────────

    #[test]
    fn flat_grid_matches_the_closed_form_counts() {
        let grid = flat_grid();
        let mesh = triangulate(&grid);

        // Count shared edges and corners the way the triangulator owns
        // them: forward directions only, so each is counted once.
        let mut connections = 0usize;
        let mut corners = 0usize;
        for id in grid.cell_ids() {
            let cell = grid.cell(id);
            for direction in [HexDirection::NE, HexDirection::E, HexDirection::SE] {
                if cell.neighbor(direction).is_some() {
                    connections += 1;
                    if direction <= HexDirection::E && cell.neighbor(direction.next()).is_some() {
                        corners += 1;
                    }
                }
            }
        }

        let cells = (grid.cell_count_x() * grid.cell_count_z()) as usize;
        // Interior: 6 fans of 4 triangles. Connection: 4 quads.
        // Flat corner: 1 triangle.
        let expected_triangles = cells * 24 + connections * 8 + corners;
        let expected_vertices = cells * 72 + connections * 16 + corners * 3;
        assert_eq!(mesh.triangle_count(), expected_triangles);
        assert_eq!(mesh.vertex_count(), expected_vertices);
        assert_eq!(mesh.colors().len(), expected_vertices);
        assert_eq!(mesh.uvs().len(), expected_vertices);
    }

    #[test]
    fn flat_grid_mesh_lies_at_ground_level() {
        let grid = flat_grid();
        let mesh = triangulate(&grid);
        assert!(mesh.positions().iter().all(|p| p.y == 0.0));
    }

    // ── elevation scenarios ─────────────────────────────────────────

    #[test]
    fn cliff_connections_stay_single_strips() {
        // Raising (2,2) three levels puts cliffs on every side; a cliff
        // connection is one strip, same as flat, so counts must match.
        let flat = triangulate(&flat_grid());

        let mut grid = flat_grid();
        let id = at(&grid, 2, 2);
        grid.set_elevation(id, 3);
        assert_eq!(
            metrics::edge_type(
                grid.cell(id).elevation(),
                grid.neighbor(id, HexDirection::E).unwrap().elevation()
            ),
            Cliff
        );
        let cliffs = triangulate(&grid);
        assert_eq!(cliffs.triangle_count(), flat.triangle_count());
    }

    #[test]
    fn slope_connections_terrace_into_more_geometry() {
        let flat = triangulate(&flat_grid());

        let mut grid = flat_grid();
        grid.set_elevation(at(&grid, 2, 2), 1);
        let slopes = triangulate(&grid);
        assert!(slopes.triangle_count() > flat.triangle_count());
    }

    #[test]
    fn elevated_cell_interior_sits_at_its_step_height() {
        let mut grid = flat_grid();
        grid.set_elevation(at(&grid, 2, 2), 2);
        let mesh = triangulate(&grid);
        let top = 2.0 * metrics::ELEVATION_STEP;
        assert!(mesh.positions().iter().any(|p| p.y == top));
        // Nothing pokes above the raised cell.
        assert!(mesh.positions().iter().all(|p| p.y <= top));
    }

    #[test]
    fn mixed_corner_configurations_triangulate_cleanly() {
        // Exercise every corner strategy at once: flats, slopes and
        // cliffs meeting around a ridge.
        let mut grid = flat_grid();
        grid.set_elevation(at(&grid, 1, 1), 1);
        grid.set_elevation(at(&grid, 2, 1), 3);
        grid.set_elevation(at(&grid, 2, 2), 2);
        grid.set_elevation(at(&grid, 3, 2), 4);
        grid.set_elevation(at(&grid, 1, 2), 1);
        let mesh = triangulate(&grid);
        assert_eq!(mesh.colors().len(), mesh.vertex_count());
        assert_eq!(mesh.uvs().len(), mesh.vertex_count());
        assert_eq!(mesh.indices().len(), mesh.triangle_count() * 3);
        assert!(
            mesh.indices()
                .iter()
                .all(|i| (*i as usize) < mesh.vertex_count())
        );
    }

    // ── rivers ──────────────────────────────────────────────────────

    #[test]
    fn river_channel_drops_to_stream_bed_height() {
        let mut grid = flat_grid();
        let a = at(&grid, 1, 2);
        let b = at(&grid, 2, 2);
        let c = at(&grid, 3, 2);
        grid.set_elevation(a, 2);
        grid.set_elevation(b, 1);
        grid.set_outgoing_river(a, HexDirection::E);
        grid.set_outgoing_river(b, HexDirection::E);

        let mesh = triangulate(&grid);
        for id in [a, b, c] {
            let bed = grid.cell(id).stream_bed_y();
            assert!(
                mesh.positions().iter().any(|p| (p.y - bed).abs() < 1e-4),
                "no stream-bed vertex for cell {:?}",
                grid.cell(id).coordinates()
            );
        }
    }

    #[test]
    fn river_vertices_carry_the_water_mask() {
        let mut grid = flat_grid();
        grid.set_outgoing_river(at(&grid, 2, 2), HexDirection::E);
        let mesh = triangulate(&grid);
        assert!(mesh.uvs().iter().any(|uv| uv.x == 1.0));
        assert_eq!(mesh.uvs().len(), mesh.vertex_count());
    }

    #[test]
    fn dry_grids_have_no_water_mask() {
        let mesh = triangulate(&flat_grid());
        assert!(mesh.uvs().iter().all(|uv| uv.x == 0.0));
    }

    #[test]
    fn bent_rivers_triangulate_every_turn_shape() {
        // Zigzag: straight, sharp and gentle turns all appear.
        let mut grid = flat_grid();
        let head = at(&grid, 1, 3);
        grid.set_outgoing_river(head, HexDirection::SE);
        let mid = grid.cell(head).neighbor(HexDirection::SE).unwrap();
        grid.set_outgoing_river(mid, HexDirection::E);
        let tail = grid.cell(mid).neighbor(HexDirection::E).unwrap();
        grid.set_outgoing_river(tail, HexDirection::SW);

        let mesh = triangulate(&grid);
        assert!(mesh.triangle_count() > 0);
        assert_eq!(mesh.colors().len(), mesh.vertex_count());
        assert!(mesh.uvs().iter().any(|uv| uv.x == 1.0));
    }

    // ── chunked triangulation ───────────────────────────────────────

    #[test]
    fn chunks_cover_the_grid_without_overlap() {
        let config = MapConfig {
            chunk_count_x: 2,
            chunk_count_z: 2,
            ..Default::default()
        };
        let grid = HexGrid::new(&config, NoiseField::flat(), HexHashGrid::new(1)).unwrap();

        let whole = triangulate(&grid);
        let mut chunked_triangles = 0;
        let mut mesh = MeshData::new();
        for chunk in 0..grid.chunk_count() {
            Triangulator::new(&grid, &mut mesh).triangulate_chunk(chunk);
            chunked_triangles += mesh.triangle_count();
        }
        assert_eq!(chunked_triangles, whole.triangle_count());
    }

    #[test]
    fn perturbed_noise_moves_vertices_but_keeps_counts() {
        let config = MapConfig {
            chunk_count_x: 1,
            chunk_count_z: 1,
            ..Default::default()
        };
        let noisy = HexGrid::new(&config, NoiseField::generate(7), HexHashGrid::new(7)).unwrap();
        let flat = flat_grid();

        let noisy_mesh = triangulate(&noisy);
        let flat_mesh = triangulate(&flat);
        assert_eq!(noisy_mesh.triangle_count(), flat_mesh.triangle_count());
        // Horizontal jitter actually applied somewhere.
        assert!(
            noisy_mesh
                .positions()
                .iter()
                .zip(flat_mesh.positions())
                .any(|(a, b)| a.x != b.x || a.z != b.z)
        );
    }
}
