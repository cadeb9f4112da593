#![warn(missing_docs)]
//! Hexagonal terrain-map geometry engine.
//!
//! Cells live on a pointy-top hex grid with cube coordinates, carry
//! elevation, color and river state, and triangulate into irregular,
//! crack-free mesh buffers: terraced slopes, sheer cliffs and carved
//! stream beds, all perturbed by a deterministic noise field.
//!
//! The editing surface is [`grid::HexGrid`]; it tracks which 5x5 chunks
//! an edit touched so a frontend only rebuilds the meshes that changed.
//! [`triangulate::Triangulator`] turns chunk state into [`mesh::MeshData`]
//! buffers ready for upload.

pub mod cell;
pub mod config;
pub mod coords;
pub mod direction;
pub mod grid;
pub mod mesh;
pub mod metrics;
pub mod perturb;
pub mod triangulate;

pub use cell::{CellId, HexCell};
pub use config::{MapConfig, MapConfigError};
pub use coords::HexCoordinates;
pub use direction::HexDirection;
pub use grid::HexGrid;
pub use mesh::{EdgeVertices, MeshData};
pub use metrics::HexEdgeType;
pub use perturb::{HexHashGrid, NoiseField};
pub use triangulate::Triangulator;
