//! # Level Pipeline
//!
//! Runs every stage for one config and hands back a [`CaveLevel`] that owns
//! all produced buffers:
//!
//! ```text
//! fill + smooth → cull walls → seal border → cull pockets → connect rooms
//!     → pad border → marching squares → outlines → colliders / walls
//! ```
//!
//! One generation at a time; nothing persists between calls.

use crate::config::GeneratorConfig;
use crate::error::CaveResult;
use crate::generator::CaveGenerator;
use crate::grid::{Cell, Grid};
use crate::marching::{CaveMesh, MeshTriangulator};
use crate::outline::{edge_colliders, extrude_walls, EdgeCollider, Outline, OutlineTracer, WallMesh};
use crate::region::RegionAnalyzer;
use crate::room::{rooms_are_linked, Passage, Room, RoomConnector, RoomGraph};
use crate::seed::LevelSeed;

/// Everything one generate call produced.
#[derive(Clone, Debug, PartialEq)]
pub struct CaveLevel {
    /// Seed string that was hashed (the clock string in random-seed mode).
    pub seed_text: String,
    /// Final grid after culling and carving, before padding.
    pub grid: Grid,
    /// Surviving rooms, largest first, with connection state.
    pub rooms: Vec<Room>,
    /// Passages in carving order.
    pub passages: Vec<Passage>,
    /// Cave mesh over the padded grid.
    pub mesh: CaveMesh,
    /// Closed outline loops into `mesh.vertices`.
    pub outlines: Vec<Outline>,
    /// 2D colliders, when the geometry mode asks for them.
    pub colliders: Option<Vec<EdgeCollider>>,
    /// Extruded walls, when the geometry mode asks for them.
    pub walls: Option<WallMesh>,
    /// Squares per marching configuration.
    pub case_histogram: [usize; 16],
}

impl CaveLevel {
    /// Whether every room is reachable from the largest one, following
    /// the recorded connections rather than the cached flags.
    #[must_use]
    pub fn is_fully_connected(&self) -> bool {
        rooms_are_linked(&self.rooms)
    }
}

/// Runs the generation pipeline for a validated config.
#[derive(Clone, Debug, Default)]
pub struct LevelBuilder {
    config: GeneratorConfig,
}

impl LevelBuilder {
    /// Validates `config` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CaveError::InvalidConfig`] if any parameter is out
    /// of range.
    pub fn new(config: GeneratorConfig) -> CaveResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The wrapped config.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates a level with the seed from the config.
    ///
    /// # Errors
    ///
    /// Propagates corridor and invariant errors from the stages.
    pub fn generate(&self) -> CaveResult<CaveLevel> {
        self.generate_with_seed(&self.config.effective_seed_text())
    }

    /// Generates a level from an explicit seed string.
    ///
    /// # Errors
    ///
    /// Propagates corridor and invariant errors from the stages.
    pub fn generate_with_seed(&self, seed_text: &str) -> CaveResult<CaveLevel> {
        let config = &self.config;
        let seed = LevelSeed::from_text(seed_text);

        let mut grid = CaveGenerator::from_config(config).generate(seed);
        RegionAnalyzer::cull(&mut grid, Cell::Wall, config.minimum_pillar_size, Cell::Open);
        // The wall cull can open border cells on small maps; rooms must be
        // built from interior tiles only.
        grid.seal_border();
        let rooms = RegionAnalyzer::cull(&mut grid, Cell::Open, config.minimum_cave_size, Cell::Wall);

        let mut graph = RoomGraph::new(rooms);
        let passages = RoomConnector::new(config.passage_radius).connect(&mut grid, &mut graph)?;
        // Wide brushes near the edge can open border cells.
        grid.seal_border();

        let padded = grid.padded(config.border_size);
        let build = MeshTriangulator::new(config.cell_size).triangulate(&padded);
        let outlines = OutlineTracer::new(&build, config.outline).trace()?;

        let colliders = if config.geometry.wants_colliders() {
            Some(edge_colliders(&build.mesh, &outlines)?)
        } else {
            None
        };
        let walls = if config.geometry.wants_walls() {
            Some(extrude_walls(&build.mesh, &outlines, config.wall_height)?)
        } else {
            None
        };

        tracing::info!(
            seed = seed_text,
            width = config.width,
            height = config.height,
            rooms = graph.len(),
            passages = passages.len(),
            vertices = build.mesh.vertices.len(),
            triangles = build.mesh.triangle_count(),
            outlines = outlines.len(),
            "level generated"
        );

        Ok(CaveLevel {
            seed_text: seed_text.to_owned(),
            grid,
            rooms: graph.into_rooms(),
            passages,
            mesh: build.mesh,
            outlines,
            colliders,
            walls,
            case_histogram: build.case_histogram,
        })
    }
}

/// Validates `config` and generates one level.
///
/// # Errors
///
/// Returns [`crate::CaveError::InvalidConfig`] for bad parameters and
/// propagates stage errors.
pub fn generate_level(config: &GeneratorConfig) -> CaveResult<CaveLevel> {
    LevelBuilder::new(config.clone())?.generate()
}
