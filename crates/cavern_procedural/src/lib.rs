//! # CAVERN Procedural Generation
//!
//! Seeded 2D cave levels: cellular-automata caverns, connected rooms and a
//! marching-squares mesh with outlines, colliders and walls.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed string always produces the same level
//! 2. **Connected**: Every surviving room is reachable from the largest one
//! 3. **Pass-scoped**: Each generate call owns every buffer it produces
//!
//! ## Core Components
//!
//! - `CaveGenerator`: Random fill plus weighted smoothing
//! - `RegionAnalyzer`: Flood fill and small-region culling
//! - `RoomConnector`: Corridors until the room graph is connected
//! - `MeshTriangulator`: Marching squares with vertex dedup
//! - `OutlineTracer`: Boundary loops, edge colliders, extruded walls
//! - `LevelBuilder`: The whole pipeline for one `GeneratorConfig`
//!
//! ## Example
//!
//! ```rust,ignore
//! use cavern_procedural::{generate_level, GeneratorConfig};
//!
//! let config = GeneratorConfig {
//!     width: 64,
//!     height: 48,
//!     seed: "test".into(),
//!     ..GeneratorConfig::default()
//! };
//! let level = generate_level(&config)?;
//!
//! assert!(level.is_fully_connected());
//! upload(level.mesh.vertex_bytes(), level.mesh.index_bytes());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod level;
pub mod marching;
pub mod outline;
pub mod region;
pub mod room;
pub mod seed;

pub use config::{GeneratorConfig, GeometryMode};
pub use error::{CaveError, CaveResult};
pub use generator::CaveGenerator;
pub use grid::{Cell, Coord, Grid};
pub use level::{generate_level, CaveLevel, LevelBuilder};
pub use marching::{CaveMesh, MeshBuild, MeshTriangulator, Square, SquarePoint, TriangleAdjacency};
pub use outline::{
    edge_colliders, extrude_walls, trace_outlines, EdgeCollider, Outline, OutlineSettings,
    OutlineTracer, WallMesh,
};
pub use region::{Region, RegionAnalyzer};
pub use room::{
    carve_passage, line_tiles, rooms_are_linked, Passage, Room, RoomConnector, RoomGraph,
};
pub use seed::LevelSeed;
