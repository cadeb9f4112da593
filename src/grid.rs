//! The hex grid: cell arena, adjacency, chunk partition, dirty tracking.
//!
//! The grid owns every cell and is the only way to mutate one. Mutations
//! keep the topology invariants intact (symmetric neighbor links, no
//! uphill rivers, reciprocal river edges) and accumulate the set of
//! chunks whose geometry the edit invalidated; callers flush that set
//! with [`HexGrid::take_dirty_chunks`] and re-triangulate those chunks.

use bevy::color::LinearRgba;
use bevy::log::info;
use bevy::math::Vec3;
use bevy::platform::collections::HashSet;

use crate::cell::{CellId, HexCell};
use crate::config::{MapConfig, MapConfigError};
use crate::coords::HexCoordinates;
use crate::direction::HexDirection;
use crate::metrics::{
    CHUNK_SIZE_X, CHUNK_SIZE_Z, ELEVATION_PERTURB_STRENGTH, ELEVATION_STEP,
};
use crate::perturb::{HexHashGrid, NoiseField};

/// A full hexagonal terrain map.
pub struct HexGrid {
    cell_count_x: i32,
    cell_count_z: i32,
    chunk_count_x: i32,
    chunk_count_z: i32,
    cells: Vec<HexCell>,
    dirty: HashSet<usize>,
    noise: NoiseField,
    hash: HexHashGrid,
}

impl HexGrid {
    /// Builds the grid: cells in row-scan order, neighbor links wired as
    /// each cell is created, every cell starting at elevation 0.
    ///
    /// The noise field and hash grid are injected so identical seeds
    /// reproduce identical maps.
    pub fn new(
        config: &MapConfig,
        noise: NoiseField,
        hash: HexHashGrid,
    ) -> Result<Self, MapConfigError> {
        config.validate()?;

        let cell_count_x = config.cell_count_x();
        let cell_count_z = config.cell_count_z();
        let mut grid = Self {
            cell_count_x,
            cell_count_z,
            chunk_count_x: config.chunk_count_x,
            chunk_count_z: config.chunk_count_z,
            cells: Vec::with_capacity((cell_count_x * cell_count_z) as usize),
            dirty: HashSet::default(),
            noise,
            hash,
        };

        for z in 0..cell_count_z {
            for x in 0..cell_count_x {
                grid.create_cell(x, z, config.default_color);
            }
        }

        info!(
            "built hex grid: {}x{} cells in {}x{} chunks",
            cell_count_x, cell_count_z, config.chunk_count_x, config.chunk_count_z
        );
        Ok(grid)
    }

    fn create_cell(&mut self, x: i32, z: i32, color: LinearRgba) {
        let id = CellId(self.cells.len());
        self.cells
            .push(HexCell::new(HexCoordinates::from_offset(x, z), color));

        // Wire links back to already-created cells: west along the row,
        // then into the previous row, whose column offset flips with row
        // parity (brick layout).
        let row = self.cell_count_x as usize;
        if x > 0 {
            self.set_neighbor(id, HexDirection::W, CellId(id.0 - 1));
        }
        if z > 0 {
            if z & 1 == 0 {
                self.set_neighbor(id, HexDirection::SE, CellId(id.0 - row));
                if x > 0 {
                    self.set_neighbor(id, HexDirection::SW, CellId(id.0 - row - 1));
                }
            } else {
                self.set_neighbor(id, HexDirection::SW, CellId(id.0 - row));
                if x < self.cell_count_x - 1 {
                    self.set_neighbor(id, HexDirection::SE, CellId(id.0 - row + 1));
                }
            }
        }

        // Run the elevation through the setter so the vertical perturb
        // applies from the start.
        self.set_elevation(id, 0);
    }

    /// Cells along the x axis.
    pub fn cell_count_x(&self) -> i32 {
        self.cell_count_x
    }

    /// Cells along the z axis.
    pub fn cell_count_z(&self) -> i32 {
        self.cell_count_z
    }

    /// Total number of chunks.
    pub fn chunk_count(&self) -> usize {
        (self.chunk_count_x * self.chunk_count_z) as usize
    }

    /// Read access to a cell.
    pub fn cell(&self, id: CellId) -> &HexCell {
        &self.cells[id.0]
    }

    /// All cell ids in row-scan order.
    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> + use<> {
        (0..self.cells.len()).map(CellId)
    }

    /// The neighboring cell in a direction, absent at the grid edge.
    pub fn neighbor(&self, id: CellId, direction: HexDirection) -> Option<&HexCell> {
        self.cells[id.0]
            .neighbor(direction)
            .map(|n| &self.cells[n.0])
    }

    /// The injected perturbation noise field.
    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// The injected feature-placement hash grid.
    pub fn hash_grid(&self) -> &HexHashGrid {
        &self.hash
    }

    /// Looks up the cell holding a logical coordinate; absent when the
    /// coordinate falls outside the map.
    pub fn cell_at(&self, coordinates: HexCoordinates) -> Option<CellId> {
        let z = coordinates.z();
        if z < 0 || z >= self.cell_count_z {
            return None;
        }
        let x = coordinates.x() + z / 2;
        if x < 0 || x >= self.cell_count_x {
            return None;
        }
        Some(CellId((x + z * self.cell_count_x) as usize))
    }

    /// Looks up the cell under a world position.
    pub fn cell_at_position(&self, position: Vec3) -> Option<CellId> {
        self.cell_at(HexCoordinates::from_position(position))
    }

    /// Establishes a symmetric neighbor link between two cells.
    pub fn set_neighbor(&mut self, id: CellId, direction: HexDirection, other: CellId) {
        self.cells[id.0].neighbors[direction.index()] = Some(other);
        self.cells[other.0].neighbors[direction.opposite().index()] = Some(id);
    }

    /// Changes a cell's color. No-op when unchanged.
    pub fn set_color(&mut self, id: CellId, color: LinearRgba) {
        if self.cells[id.0].color == color {
            return;
        }
        self.cells[id.0].color = color;
        self.refresh(id);
    }

    /// Changes a cell's elevation.
    ///
    /// Recomputes the perturbed vertical position and removes any river
    /// the change would make flow uphill. No-op when unchanged.
    pub fn set_elevation(&mut self, id: CellId, elevation: i32) {
        if self.cells[id.0].elevation == elevation {
            return;
        }
        self.cells[id.0].elevation = elevation;
        let position = self.cells[id.0].position;
        let vertical = self.noise.sample(position).y;
        self.cells[id.0].position.y = elevation as f32 * ELEVATION_STEP
            + (vertical * 2.0 - 1.0) * ELEVATION_PERTURB_STRENGTH;

        let cell = &self.cells[id.0];
        if cell.has_outgoing_river {
            let target = cell.neighbors[cell.outgoing_river.index()];
            if target.is_some_and(|n| elevation < self.cells[n.0].elevation) {
                self.remove_outgoing_river(id);
            }
        }
        let cell = &self.cells[id.0];
        if cell.has_incoming_river {
            let source = cell.neighbors[cell.incoming_river.index()];
            if source.is_some_and(|n| elevation > self.cells[n.0].elevation) {
                self.remove_incoming_river(id);
            }
        }

        self.refresh(id);
    }

    /// Starts (or redirects) the river leaving a cell.
    ///
    /// No-op when the direction is unchanged, when there is no neighbor
    /// that way, or when the neighbor is higher — rivers only flow
    /// downhill or level. Clears whatever river state the edge replaces
    /// on both cells involved.
    pub fn set_outgoing_river(&mut self, id: CellId, direction: HexDirection) {
        let cell = &self.cells[id.0];
        if cell.has_outgoing_river && cell.outgoing_river == direction {
            return;
        }
        let Some(neighbor) = cell.neighbors[direction.index()] else {
            return;
        };
        if cell.elevation < self.cells[neighbor.0].elevation {
            return;
        }

        self.remove_outgoing_river(id);
        let cell = &self.cells[id.0];
        if cell.has_incoming_river && cell.incoming_river == direction {
            // One edge cannot carry the river in both ways.
            self.remove_incoming_river(id);
        }

        let cell = &mut self.cells[id.0];
        cell.has_outgoing_river = true;
        cell.outgoing_river = direction;
        self.refresh_self_only(id);

        self.remove_incoming_river(neighbor);
        let other = &mut self.cells[neighbor.0];
        other.has_incoming_river = true;
        other.incoming_river = direction.opposite();
        self.refresh_self_only(neighbor);
    }

    /// Clears the outgoing river and its reflection on the target cell.
    pub fn remove_outgoing_river(&mut self, id: CellId) {
        if !self.cells[id.0].has_outgoing_river {
            return;
        }
        self.cells[id.0].has_outgoing_river = false;
        self.refresh_self_only(id);

        let direction = self.cells[id.0].outgoing_river;
        if let Some(neighbor) = self.cells[id.0].neighbors[direction.index()] {
            self.cells[neighbor.0].has_incoming_river = false;
            self.refresh_self_only(neighbor);
        }
    }

    /// Clears the incoming river and its reflection on the source cell.
    pub fn remove_incoming_river(&mut self, id: CellId) {
        if !self.cells[id.0].has_incoming_river {
            return;
        }
        self.cells[id.0].has_incoming_river = false;
        self.refresh_self_only(id);

        let direction = self.cells[id.0].incoming_river;
        if let Some(neighbor) = self.cells[id.0].neighbors[direction.index()] {
            self.cells[neighbor.0].has_outgoing_river = false;
            self.refresh_self_only(neighbor);
        }
    }

    /// Clears both river sides of a cell.
    pub fn remove_river(&mut self, id: CellId) {
        self.remove_outgoing_river(id);
        self.remove_incoming_river(id);
    }

    /// Chunk index a cell belongs to.
    pub fn chunk_of(&self, id: CellId) -> usize {
        let coordinates = self.cells[id.0].coordinates;
        let chunk_x = coordinates.offset_x() / CHUNK_SIZE_X;
        let chunk_z = coordinates.offset_z() / CHUNK_SIZE_Z;
        (chunk_x + chunk_z * self.chunk_count_x) as usize
    }

    /// Cell ids of one chunk, row-scan order.
    pub fn chunk_cells(&self, chunk: usize) -> Vec<CellId> {
        let chunk_x = chunk as i32 % self.chunk_count_x;
        let chunk_z = chunk as i32 / self.chunk_count_x;
        let mut ids = Vec::with_capacity((CHUNK_SIZE_X * CHUNK_SIZE_Z) as usize);
        for z in chunk_z * CHUNK_SIZE_Z..(chunk_z + 1) * CHUNK_SIZE_Z {
            for x in chunk_x * CHUNK_SIZE_X..(chunk_x + 1) * CHUNK_SIZE_X {
                ids.push(CellId((x + z * self.cell_count_x) as usize));
            }
        }
        ids
    }

    /// Drains the accumulated dirty-chunk set, sorted for determinism.
    ///
    /// Callers re-triangulate exactly these chunks after a batch of
    /// edits; nothing else changed.
    pub fn take_dirty_chunks(&mut self) -> Vec<usize> {
        let mut chunks: Vec<usize> = self.dirty.drain().collect();
        chunks.sort_unstable();
        chunks
    }

    /// Marks the cell's chunk dirty, plus every neighboring chunk the
    /// cell borders — boundary geometry reaches into them.
    fn refresh(&mut self, id: CellId) {
        let chunk = self.chunk_of(id);
        self.dirty.insert(chunk);
        for direction in HexDirection::ALL {
            if let Some(neighbor) = self.cells[id.0].neighbor(direction) {
                let neighbor_chunk = self.chunk_of(neighbor);
                if neighbor_chunk != chunk {
                    self.dirty.insert(neighbor_chunk);
                }
            }
        }
    }

    /// Marks only the cell's own chunk dirty. Used for river flag edits,
    /// which carve geometry strictly inside the solid region.
    fn refresh_self_only(&mut self, id: CellId) {
        let chunk = self.chunk_of(id);
        self.dirty.insert(chunk);
    }
}
