//! # Level Export
//!
//! Flat, serde-friendly copy of a [`CaveLevel`]. Positions are plain arrays
//! and outlines are resolved to point lists, so readers never need the
//! vertex buffer to draw them.

use std::io::Write;

use cavern_procedural::{CaveError, CaveLevel, CaveResult, Coord, Passage, Room};
use serde::{Deserialize, Serialize};

/// One room, without its tile list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    /// Number of open tiles.
    pub size: usize,
    /// Number of tiles touching wall.
    pub edge_tiles: usize,
    /// Largest room, the reachability root.
    pub is_root: bool,
    /// Indices of directly linked rooms.
    pub connected: Vec<usize>,
}

impl From<&Room> for RoomSummary {
    fn from(room: &Room) -> Self {
        Self {
            size: room.size(),
            edge_tiles: room.edge_tiles().len(),
            is_root: room.is_root(),
            connected: room.connected_rooms().to_vec(),
        }
    }
}

/// A carved passage in grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageRecord {
    /// Starting room.
    pub from_room: usize,
    /// Ending room.
    pub to_room: usize,
    /// Start tile `[x, y]`.
    pub from: [i32; 2],
    /// End tile `[x, y]`.
    pub to: [i32; 2],
}

impl From<&Passage> for PassageRecord {
    fn from(passage: &Passage) -> Self {
        let tile = |c: Coord| [c.x, c.y];
        Self {
            from_room: passage.from_room,
            to_room: passage.to_room,
            from: tile(passage.from),
            to: tile(passage.to),
        }
    }
}

/// Extruded wall buffers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WallExport {
    /// Vertex positions.
    pub vertices: Vec<[f32; 3]>,
    /// Triangle indices.
    pub triangles: Vec<u32>,
}

/// Serialized level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelExport {
    /// Seed string the level was generated from.
    pub seed: String,
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Cave mesh vertices.
    pub vertices: Vec<[f32; 3]>,
    /// Cave mesh triangle indices.
    pub triangles: Vec<u32>,
    /// Closed outlines as point lists.
    pub outlines: Vec<Vec<[f32; 3]>>,
    /// 2D colliders, `(x, z)` per point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colliders: Option<Vec<Vec<[f32; 2]>>>,
    /// Extruded walls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walls: Option<WallExport>,
    /// Rooms, largest first.
    pub rooms: Vec<RoomSummary>,
    /// Passages in carving order.
    pub passages: Vec<PassageRecord>,
}

impl LevelExport {
    /// Copies everything out of `level`.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::BrokenInvariant`] if an outline refers to a
    /// vertex the mesh does not have.
    pub fn from_level(level: &CaveLevel) -> CaveResult<Self> {
        let vertices: Vec<[f32; 3]> = level.mesh.vertices.iter().map(|v| v.to_array()).collect();
        let outlines = level
            .outlines
            .iter()
            .map(|outline| {
                outline
                    .iter()
                    .map(|&i| {
                        vertices.get(i as usize).copied().ok_or_else(|| {
                            CaveError::BrokenInvariant(format!(
                                "outline vertex {i} outside mesh of {}",
                                vertices.len()
                            ))
                        })
                    })
                    .collect::<CaveResult<Vec<_>>>()
            })
            .collect::<CaveResult<Vec<_>>>()?;
        let colliders = level.colliders.as_ref().map(|colliders| {
            colliders
                .iter()
                .map(|c| c.points.iter().map(|p| p.to_array()).collect())
                .collect()
        });
        let walls = level.walls.as_ref().map(|walls| WallExport {
            vertices: walls.vertices.iter().map(|v| v.to_array()).collect(),
            triangles: walls.triangles.clone(),
        });

        Ok(Self {
            seed: level.seed_text.clone(),
            width: level.grid.width(),
            height: level.grid.height(),
            triangles: level.mesh.triangles.clone(),
            vertices,
            outlines,
            colliders,
            walls,
            rooms: level.rooms.iter().map(RoomSummary::from).collect(),
            passages: level.passages.iter().map(PassageRecord::from).collect(),
        })
    }

    /// Writes pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer or writer error.
    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}
