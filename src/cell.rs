//! Per-cell terrain state.
//!
//! Cells live in a single arena owned by [`crate::grid::HexGrid`];
//! neighbor references are arena indices, never pointers, so the cyclic
//! adjacency graph has no ownership cycles. Queries that only read one
//! cell live here; mutations that must reach into neighbors (elevation,
//! rivers) live on the grid.

use bevy::color::LinearRgba;
use bevy::math::Vec3;

use crate::coords::HexCoordinates;
use crate::direction::HexDirection;
use crate::metrics::{
    self, ELEVATION_STEP, HexEdgeType, RIVER_SURFACE_ELEVATION_OFFSET,
    STREAM_BED_ELEVATION_OFFSET,
};

/// Index of a cell in the grid's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(pub(crate) usize);

impl CellId {
    /// The raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Elevation value of a cell whose height has never been set.
pub const ELEVATION_UNSET: i32 = i32::MIN;

/// One hexagonal terrain tile.
#[derive(Debug, Clone)]
pub struct HexCell {
    pub(crate) coordinates: HexCoordinates,
    pub(crate) position: Vec3,
    pub(crate) elevation: i32,
    pub(crate) color: LinearRgba,
    pub(crate) neighbors: [Option<CellId>; 6],
    pub(crate) has_incoming_river: bool,
    pub(crate) has_outgoing_river: bool,
    pub(crate) incoming_river: HexDirection,
    pub(crate) outgoing_river: HexDirection,
}

impl HexCell {
    pub(crate) fn new(coordinates: HexCoordinates, color: LinearRgba) -> Self {
        Self {
            coordinates,
            position: coordinates.to_position(),
            elevation: ELEVATION_UNSET,
            color,
            neighbors: [None; 6],
            has_incoming_river: false,
            has_outgoing_river: false,
            incoming_river: HexDirection::NE,
            outgoing_river: HexDirection::NE,
        }
    }

    /// Cube coordinate, fixed at creation.
    pub fn coordinates(&self) -> HexCoordinates {
        self.coordinates
    }

    /// World-space center, including vertical noise perturbation.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Elevation level, or [`ELEVATION_UNSET`].
    pub fn elevation(&self) -> i32 {
        self.elevation
    }

    /// Terrain blend color.
    pub fn color(&self) -> LinearRgba {
        self.color
    }

    /// Neighbor in a direction, absent at the grid edge.
    pub fn neighbor(&self, direction: HexDirection) -> Option<CellId> {
        self.neighbors[direction.index()]
    }

    /// Whether a river flows into this cell.
    pub fn has_incoming_river(&self) -> bool {
        self.has_incoming_river
    }

    /// Whether a river flows out of this cell.
    pub fn has_outgoing_river(&self) -> bool {
        self.has_outgoing_river
    }

    /// Direction the incoming river enters through. Only meaningful when
    /// [`Self::has_incoming_river`] is true.
    pub fn incoming_river(&self) -> HexDirection {
        self.incoming_river
    }

    /// Direction the outgoing river leaves through. Only meaningful when
    /// [`Self::has_outgoing_river`] is true.
    pub fn outgoing_river(&self) -> HexDirection {
        self.outgoing_river
    }

    /// Whether any river touches this cell.
    pub fn has_river(&self) -> bool {
        self.has_incoming_river || self.has_outgoing_river
    }

    /// Whether a river starts or ends here (exactly one of in/out set).
    pub fn has_river_begin_or_end(&self) -> bool {
        self.has_incoming_river != self.has_outgoing_river
    }

    /// Whether a river crosses the edge in a direction.
    pub fn has_river_through_edge(&self, direction: HexDirection) -> bool {
        self.has_incoming_river && self.incoming_river == direction
            || self.has_outgoing_river && self.outgoing_river == direction
    }

    /// World-space height of this cell's river bed.
    pub fn stream_bed_y(&self) -> f32 {
        (self.elevation as f32 + STREAM_BED_ELEVATION_OFFSET) * ELEVATION_STEP
    }

    /// World-space height of this cell's river surface.
    pub fn river_surface_y(&self) -> f32 {
        (self.elevation as f32 + RIVER_SURFACE_ELEVATION_OFFSET) * ELEVATION_STEP
    }

    /// Edge classification against another cell.
    pub fn edge_type_to(&self, other: &HexCell) -> HexEdgeType {
        metrics::edge_type(self.elevation, other.elevation)
    }
}
