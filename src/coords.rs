//! Cube coordinates for hex cells.
//!
//! Cells are addressed in a cube coordinate system where `x + y + z == 0`.
//! Only `x` and `z` are stored; `y` is derived. Offset (column, row)
//! coordinates are what the grid iterates in, cube coordinates are what
//! everything else reasons in.

use std::fmt;

use bevy::math::Vec3;

use crate::metrics::{INNER_RADIUS, OUTER_RADIUS};

/// Immutable cube coordinate of a hex cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexCoordinates {
    x: i32,
    z: i32,
}

impl HexCoordinates {
    /// Creates a coordinate from its `x` and `z` cube components.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts offset (column, row) grid coordinates to cube coordinates.
    ///
    /// Rows are shifted back every other row, so the cube `x` axis stays
    /// straight while offset columns zig-zag.
    pub const fn from_offset(x: i32, z: i32) -> Self {
        Self { x: x - z / 2, z }
    }

    /// The `x` cube component.
    pub const fn x(self) -> i32 {
        self.x
    }

    /// The derived `y` cube component (`-x - z`).
    pub const fn y(self) -> i32 {
        -self.x - self.z
    }

    /// The `z` cube component.
    pub const fn z(self) -> i32 {
        self.z
    }

    /// Offset column of this coordinate (inverse of [`Self::from_offset`]).
    pub const fn offset_x(self) -> i32 {
        self.x + self.z / 2
    }

    /// Offset row of this coordinate.
    pub const fn offset_z(self) -> i32 {
        self.z
    }

    /// Finds the coordinate of the cell containing a world-space position.
    ///
    /// Divides the plane into fractional hex coordinates and rounds each
    /// cube component to the nearest integer. Rounding can break the
    /// `x + y + z == 0` invariant near cell borders; the component with the
    /// largest rounding delta is then reconstructed from the other two.
    pub fn from_position(position: Vec3) -> Self {
        let x = position.x / (INNER_RADIUS * 2.0);
        let y = -x;
        let offset = position.z / (OUTER_RADIUS * 3.0);
        let x = x - offset;
        let y = y - offset;

        let mut ix = x.round() as i32;
        let iy = y.round() as i32;
        let mut iz = (-x - y).round() as i32;

        if ix + iy + iz != 0 {
            let dx = (x - ix as f32).abs();
            let dy = (y - iy as f32).abs();
            let dz = (-x - y - iz as f32).abs();
            if dx > dy && dx > dz {
                ix = -iy - iz;
            } else if dz > dy {
                iz = -ix - iy;
            }
        }

        Self::new(ix, iz)
    }

    /// World-space center position of this cell, before any perturbation.
    pub fn to_position(self) -> Vec3 {
        let (x, z) = (self.offset_x(), self.offset_z());
        Vec3::new(
            (x as f32 + z as f32 * 0.5 - (z / 2) as f32) * (INNER_RADIUS * 2.0),
            0.0,
            z as f32 * (OUTER_RADIUS * 1.5),
        )
    }

    /// Multi-line form, one cube component per line. Handy for map labels.
    pub fn to_string_on_separate_lines(self) -> String {
        format!("{}\n{}\n{}", self.x, self.y(), self.z)
    }
}

impl fmt::Display for HexCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y(), self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_sum_to_zero() {
        for z in -4..4 {
            for x in -4..4 {
                let c = HexCoordinates::from_offset(x, z);
                assert_eq!(c.x() + c.y() + c.z(), 0);
            }
        }
    }

    #[test]
    fn offset_round_trip() {
        for z in 0..10 {
            for x in 0..10 {
                let c = HexCoordinates::from_offset(x, z);
                assert_eq!((c.offset_x(), c.offset_z()), (x, z));
            }
        }
    }

    #[test]
    fn position_round_trip_at_cell_centers() {
        for z in 0..8 {
            for x in 0..8 {
                let c = HexCoordinates::from_offset(x, z);
                assert_eq!(HexCoordinates::from_position(c.to_position()), c);
            }
        }
    }

    #[test]
    fn position_rounding_handles_near_border_points() {
        let c = HexCoordinates::from_offset(3, 2);
        let center = c.to_position();
        // Just inside the solid region in every direction must stay in
        // the same cell.
        for (dx, dz) in [(0.4, 0.0), (-0.4, 0.0), (0.0, 0.4), (0.3, -0.3)] {
            let p = center + Vec3::new(dx * INNER_RADIUS, 0.0, dz * OUTER_RADIUS);
            assert_eq!(HexCoordinates::from_position(p), c);
        }
    }

    #[test]
    fn display_shows_cube_triple() {
        let c = HexCoordinates::from_offset(2, 3);
        assert_eq!(c.to_string(), "(1, -4, 3)");
        assert_eq!(c.to_string_on_separate_lines(), "1\n-4\n3");
    }
}
