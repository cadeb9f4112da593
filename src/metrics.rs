//! Geometry constants and pure helper functions for hex cells.
//!
//! Everything here is stateless: corner offsets, terrace interpolation,
//! edge-type classification. Noise-dependent perturbation lives in
//! [`crate::perturb`], which is injected state rather than a global.

use bevy::color::{LinearRgba, Mix};
use bevy::math::Vec3;

use crate::direction::HexDirection;

/// Ratio between a hexagon's outer (corner) and inner (edge) radius.
pub const OUTER_TO_INNER: f32 = 0.866_025_4;
/// Inverse of [`OUTER_TO_INNER`].
pub const INNER_TO_OUTER: f32 = 1.0 / OUTER_TO_INNER;

/// Distance from a cell center to its corners.
pub const OUTER_RADIUS: f32 = 10.0;
/// Distance from a cell center to the middle of its edges.
pub const INNER_RADIUS: f32 = OUTER_RADIUS * OUTER_TO_INNER;

/// Fraction of the hex rendered in the cell's own color before blending
/// into neighbor connections.
pub const SOLID_FACTOR: f32 = 0.8;
/// Remainder of the hex taken up by connection blending.
pub const BLEND_FACTOR: f32 = 1.0 - SOLID_FACTOR;

/// World-space height of one elevation level.
pub const ELEVATION_STEP: f32 = 3.0;

/// Terraces on a slope connection.
pub const TERRACES_PER_SLOPE: u32 = 2;
/// Interpolation steps along a terraced slope (flat + sloped faces).
pub const TERRACE_STEPS: u32 = TERRACES_PER_SLOPE * 2 + 1;
const HORIZONTAL_TERRACE_STEP_SIZE: f32 = 1.0 / TERRACE_STEPS as f32;
const VERTICAL_TERRACE_STEP_SIZE: f32 = 1.0 / (TERRACES_PER_SLOPE + 1) as f32;

/// Maximum horizontal displacement applied by noise perturbation.
pub const CELL_PERTURB_STRENGTH: f32 = 4.0;
/// Scale applied to world coordinates before sampling the noise field.
pub const NOISE_SCALE: f32 = 0.003;
/// Maximum vertical displacement applied to a cell when its height is set.
pub const ELEVATION_PERTURB_STRENGTH: f32 = 1.5;

/// Cells per chunk along the x axis.
pub const CHUNK_SIZE_X: i32 = 5;
/// Cells per chunk along the z axis.
pub const CHUNK_SIZE_Z: i32 = 5;

/// Vertical offset of a river bed, in elevation levels.
pub const STREAM_BED_ELEVATION_OFFSET: f32 = -1.75;
/// Vertical offset of a river's water surface, in elevation levels.
pub const RIVER_SURFACE_ELEVATION_OFFSET: f32 = -0.5;

/// Side length of the square feature-placement hash grid.
pub const HASH_GRID_SIZE: i32 = 256;
/// World-to-hash-grid coordinate scale.
pub const HASH_GRID_SCALE: f32 = 0.25;

/// Cumulative spawn thresholds per feature level, low to high density.
const FEATURE_THRESHOLDS: [[f32; 3]; 3] = [
    [0.0, 0.0, 0.4],
    [0.0, 0.4, 0.6],
    [0.4, 0.6, 0.8],
];

// Seventh entry repeats the first so `direction + 1` never wraps.
const CORNERS: [Vec3; 7] = [
    Vec3::new(0.0, 0.0, OUTER_RADIUS),
    Vec3::new(INNER_RADIUS, 0.0, 0.5 * OUTER_RADIUS),
    Vec3::new(INNER_RADIUS, 0.0, -0.5 * OUTER_RADIUS),
    Vec3::new(0.0, 0.0, -OUTER_RADIUS),
    Vec3::new(-INNER_RADIUS, 0.0, -0.5 * OUTER_RADIUS),
    Vec3::new(-INNER_RADIUS, 0.0, 0.5 * OUTER_RADIUS),
    Vec3::new(0.0, 0.0, OUTER_RADIUS),
];

/// Elevation relationship between two adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HexEdgeType {
    /// Same elevation.
    Flat,
    /// One level apart; rendered as terraces.
    Slope,
    /// Two or more levels apart; rendered as a sheer wall.
    Cliff,
}

/// Classifies the edge between two elevations.
pub fn edge_type(elevation1: i32, elevation2: i32) -> HexEdgeType {
    match (elevation2 - elevation1).abs() {
        0 => HexEdgeType::Flat,
        1 => HexEdgeType::Slope,
        _ => HexEdgeType::Cliff,
    }
}

/// First (counter-clockwise) corner offset of a direction's wedge.
pub fn first_corner(direction: HexDirection) -> Vec3 {
    CORNERS[direction.index()]
}

/// Second (clockwise) corner offset of a direction's wedge.
pub fn second_corner(direction: HexDirection) -> Vec3 {
    CORNERS[direction.index() + 1]
}

/// First corner scaled down to the solid-color region.
pub fn first_solid_corner(direction: HexDirection) -> Vec3 {
    CORNERS[direction.index()] * SOLID_FACTOR
}

/// Second corner scaled down to the solid-color region.
pub fn second_solid_corner(direction: HexDirection) -> Vec3 {
    CORNERS[direction.index() + 1] * SOLID_FACTOR
}

/// Midpoint of a direction's solid edge.
pub fn solid_edge_middle(direction: HexDirection) -> Vec3 {
    (CORNERS[direction.index()] + CORNERS[direction.index() + 1]) * (0.5 * SOLID_FACTOR)
}

/// Offset spanning the gap between a cell's solid edge and its
/// neighbor's, in the given direction.
pub fn bridge(direction: HexDirection) -> Vec3 {
    (CORNERS[direction.index()] + CORNERS[direction.index() + 1]) * BLEND_FACTOR
}

/// Interpolates along a terraced slope.
///
/// The horizontal components advance linearly with `step`, but the
/// vertical component only advances on every other step, producing the
/// staircase profile. `step` 0 returns `a` exactly, [`TERRACE_STEPS`]
/// returns `b` exactly.
pub fn terrace_lerp(a: Vec3, b: Vec3, step: u32) -> Vec3 {
    let h = step as f32 * HORIZONTAL_TERRACE_STEP_SIZE;
    let v = ((step + 1) / 2) as f32 * VERTICAL_TERRACE_STEP_SIZE;
    Vec3::new(
        a.x + (b.x - a.x) * h,
        a.y + (b.y - a.y) * v,
        a.z + (b.z - a.z) * h,
    )
}

/// Color companion of [`terrace_lerp`]: plain horizontal interpolation,
/// no staircase.
pub fn terrace_color_lerp(a: LinearRgba, b: LinearRgba, step: u32) -> LinearRgba {
    a.mix(&b, step as f32 * HORIZONTAL_TERRACE_STEP_SIZE)
}

/// Spawn thresholds for a feature density level.
///
/// Levels past the end of the table saturate at the densest row.
pub fn feature_thresholds(level: usize) -> [f32; 3] {
    FEATURE_THRESHOLDS[level.min(FEATURE_THRESHOLDS.len() - 1)]
}
