//! Map construction configuration.

use bevy::color::LinearRgba;
use thiserror::Error;

use crate::metrics::{CHUNK_SIZE_X, CHUNK_SIZE_Z};

/// Sizing and defaults for a new map.
///
/// Grid dimensions are given in chunks; cell counts are always exact
/// multiples of the 5x5 chunk size.
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Chunks along the x axis.
    pub chunk_count_x: i32,
    /// Chunks along the z axis.
    pub chunk_count_z: i32,
    /// Color assigned to every cell at creation.
    pub default_color: LinearRgba,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            chunk_count_x: 4,
            chunk_count_z: 3,
            default_color: LinearRgba::WHITE,
        }
    }
}

/// A map configuration the grid cannot be built from.
///
/// Construction-time misconfiguration is fatal and surfaced immediately;
/// it is the one class of error in this crate that is not a silent no-op.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapConfigError {
    /// Zero or negative chunk counts.
    #[error("grid needs at least one chunk per axis, got {x}x{z}")]
    EmptyGrid {
        /// Requested chunk count along x.
        x: i32,
        /// Requested chunk count along z.
        z: i32,
    },
    /// Cell counts that do not partition into whole chunks.
    #[error(
        "cell counts {x}x{z} are not multiples of the {chunk_x}x{chunk_z} chunk size"
    )]
    UnalignedCellCounts {
        /// Requested cell count along x.
        x: i32,
        /// Requested cell count along z.
        z: i32,
        /// Cells per chunk along x.
        chunk_x: i32,
        /// Cells per chunk along z.
        chunk_z: i32,
    },
}

impl MapConfig {
    /// Builds a config from raw cell counts.
    ///
    /// Fails unless both counts are positive multiples of the chunk size.
    pub fn from_cell_counts(cell_count_x: i32, cell_count_z: i32) -> Result<Self, MapConfigError> {
        if cell_count_x <= 0
            || cell_count_z <= 0
            || cell_count_x % CHUNK_SIZE_X != 0
            || cell_count_z % CHUNK_SIZE_Z != 0
        {
            return Err(MapConfigError::UnalignedCellCounts {
                x: cell_count_x,
                z: cell_count_z,
                chunk_x: CHUNK_SIZE_X,
                chunk_z: CHUNK_SIZE_Z,
            });
        }
        Ok(Self {
            chunk_count_x: cell_count_x / CHUNK_SIZE_X,
            chunk_count_z: cell_count_z / CHUNK_SIZE_Z,
            ..Self::default()
        })
    }

    /// Rejects configurations the grid cannot be built from.
    pub fn validate(&self) -> Result<(), MapConfigError> {
        if self.chunk_count_x < 1 || self.chunk_count_z < 1 {
            return Err(MapConfigError::EmptyGrid {
                x: self.chunk_count_x,
                z: self.chunk_count_z,
            });
        }
        Ok(())
    }

    /// Total cells along the x axis.
    pub fn cell_count_x(&self) -> i32 {
        self.chunk_count_x * CHUNK_SIZE_X
    }

    /// Total cells along the z axis.
    pub fn cell_count_z(&self) -> i32 {
        self.chunk_count_z * CHUNK_SIZE_Z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert_eq!(MapConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_chunks_is_fatal() {
        let config = MapConfig {
            chunk_count_x: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(MapConfigError::EmptyGrid { x: 0, z: 3 })
        );
    }

    #[test]
    fn cell_counts_must_align_to_chunks() {
        assert!(MapConfig::from_cell_counts(10, 15).is_ok());
        assert!(MapConfig::from_cell_counts(12, 15).is_err());
        assert!(MapConfig::from_cell_counts(10, 0).is_err());
        assert!(MapConfig::from_cell_counts(-5, 5).is_err());
    }

    #[test]
    fn from_cell_counts_derives_chunk_counts() {
        let config = MapConfig::from_cell_counts(20, 15).unwrap();
        assert_eq!(config.chunk_count_x, 4);
        assert_eq!(config.chunk_count_z, 3);
        assert_eq!(config.cell_count_x(), 20);
        assert_eq!(config.cell_count_z(), 15);
    }
}
