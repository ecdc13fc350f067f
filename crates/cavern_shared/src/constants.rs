//! # Level Design Constants
//!
//! Defaults baked into the generator. Every one of them can be overridden
//! through the generator config; these are the values levels were tuned
//! against.

// =============================================================================
// GRID GENERATION
// =============================================================================

/// Cellular-automata smoothing passes applied after the random fill.
pub const DEFAULT_SMOOTHING_PASSES: u32 = 5;

/// Radius (in cells) of the disk brush used to carve passages.
pub const DEFAULT_PASSAGE_RADIUS: u32 = 3;

/// Largest accepted passage radius. A brush this wide already clears a
/// 129-cell corridor.
pub const MAX_PASSAGE_RADIUS: u32 = 64;

/// Solid wall border (in cells) added around the map before meshing.
///
/// Guarantees no open cell touches the edge of the meshed array.
pub const DEFAULT_BORDER_SIZE: usize = 5;

/// Largest accepted border.
pub const MAX_BORDER_SIZE: usize = 256;

// =============================================================================
// MESH GENERATION
// =============================================================================

/// World-space size of one grid cell.
pub const DEFAULT_CELL_SIZE: f32 = 1.0;

/// How far the extruded walls reach below the cave floor.
pub const DEFAULT_WALL_HEIGHT: f32 = 5.0;
