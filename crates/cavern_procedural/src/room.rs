//! # Rooms & Passages
//!
//! Open regions that survive culling become [`Room`]s. The [`RoomConnector`]
//! carves passages until every room is reachable from the largest one.
//!
//! ## Connection Phases
//!
//! 1. **Local**: every room without a connection is joined to its nearest
//!    neighbour. Distance is measured between edge tiles, not centres, so
//!    passages stay short.
//! 2. **Repair**: while any room is unreachable from the root, the closest
//!    (reachable, unreachable) pair is joined. Each iteration makes at least
//!    one more room reachable, so the loop terminates.
//!
//! Rooms live in an arena ([`RoomGraph`]) and refer to each other by index.
//! Reachability is pushed through the graph with an explicit worklist.
//!
//! Nearest-pair ties go to the first pair found. Room order is a stable
//! size sort of scan-ordered regions, so a seed always yields the same
//! passages.

use crate::error::{CaveError, CaveResult};
use crate::grid::{Cell, Coord, Grid};

/// An open region plus its connection state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    tiles: Vec<Coord>,
    edge_tiles: Vec<Coord>,
    connected: Vec<usize>,
    is_root: bool,
    reachable: bool,
}

impl Room {
    /// Builds a room from region tiles.
    ///
    /// A tile is an edge tile when any orthogonal neighbour is wall (or off
    /// the map) in `grid`.
    #[must_use]
    pub fn new(tiles: Vec<Coord>, grid: &Grid) -> Self {
        let edge_tiles = tiles
            .iter()
            .copied()
            .filter(|tile| {
                tile.orthogonal()
                    .iter()
                    .any(|n| grid.is_wall_or_outside(n.x, n.y))
            })
            .collect();

        Self {
            tiles,
            edge_tiles,
            connected: Vec::new(),
            is_root: false,
            reachable: false,
        }
    }

    /// Number of tiles.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    /// All tiles.
    #[must_use]
    pub fn tiles(&self) -> &[Coord] {
        &self.tiles
    }

    /// Tiles touching a wall.
    #[must_use]
    pub fn edge_tiles(&self) -> &[Coord] {
        &self.edge_tiles
    }

    /// Indices of directly connected rooms.
    #[must_use]
    pub fn connected_rooms(&self) -> &[usize] {
        &self.connected
    }

    /// Whether `other` is directly connected.
    #[must_use]
    pub fn is_connected(&self, other: usize) -> bool {
        self.connected.contains(&other)
    }

    /// Whether this is the largest room.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.is_root
    }

    /// Whether the root can be reached through carved passages.
    #[must_use]
    pub const fn is_reachable(&self) -> bool {
        self.reachable
    }
}

/// A carved corridor between two rooms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Passage {
    /// Room the passage starts in.
    pub from_room: usize,
    /// Room the passage ends in.
    pub to_room: usize,
    /// Edge tile in `from_room`.
    pub from: Coord,
    /// Edge tile in `to_room`.
    pub to: Coord,
}

/// Arena of rooms, largest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomGraph {
    rooms: Vec<Room>,
}

impl RoomGraph {
    /// Sorts rooms by size (largest first, stable) and makes the first one
    /// the root.
    #[must_use]
    pub fn new(mut rooms: Vec<Room>) -> Self {
        rooms.sort_by(|a, b| b.size().cmp(&a.size()));
        if let Some(root) = rooms.first_mut() {
            root.is_root = true;
            root.reachable = true;
        }
        Self { rooms }
    }

    /// Rooms, largest first.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Number of rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// True when no room survived culling.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Consumes the graph, returning the rooms.
    #[must_use]
    pub fn into_rooms(self) -> Vec<Room> {
        self.rooms
    }

    /// Connects `a` and `b` both ways and spreads reachability.
    pub fn link(&mut self, a: usize, b: usize) {
        if !self.rooms[a].is_connected(b) {
            self.rooms[a].connected.push(b);
        }
        if !self.rooms[b].is_connected(a) {
            self.rooms[b].connected.push(a);
        }
        self.spread_reachability(a);
        self.spread_reachability(b);
    }

    fn spread_reachability(&mut self, start: usize) {
        if !self.rooms[start].reachable {
            return;
        }
        let mut worklist = vec![start];
        while let Some(room) = worklist.pop() {
            for i in 0..self.rooms[room].connected.len() {
                let next = self.rooms[room].connected[i];
                if !self.rooms[next].reachable {
                    self.rooms[next].reachable = true;
                    worklist.push(next);
                }
            }
        }
    }

    /// True when a walk over connections from the root visits every room.
    ///
    /// Ignores the cached reachability flags.
    #[must_use]
    pub fn is_fully_connected(&self) -> bool {
        rooms_are_linked(&self.rooms)
    }

    /// Closest pair of edge tiles between two rooms.
    fn closest_tiles(&self, a: usize, b: usize) -> Option<(Coord, Coord, i64)> {
        let mut best: Option<(Coord, Coord, i64)> = None;
        for &tile_a in &self.rooms[a].edge_tiles {
            for &tile_b in &self.rooms[b].edge_tiles {
                let dist = tile_a.squared_distance(tile_b);
                if best.map_or(true, |(_, _, d)| dist < d) {
                    best = Some((tile_a, tile_b, dist));
                }
            }
        }
        best
    }
}

/// Carves passages until every room is reachable from the root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomConnector {
    radius: i32,
}

impl Default for RoomConnector {
    fn default() -> Self {
        Self::new(cavern_shared::DEFAULT_PASSAGE_RADIUS)
    }
}

impl RoomConnector {
    /// Creates a connector with the given brush radius, saturating at
    /// `i32::MAX`.
    #[must_use]
    pub fn new(radius: u32) -> Self {
        Self {
            radius: i32::try_from(radius).unwrap_or(i32::MAX),
        }
    }

    /// Runs both connection phases, carving into `grid`.
    ///
    /// Returns the passages in carving order. Zero or one rooms carve
    /// nothing.
    ///
    /// # Errors
    ///
    /// [`CaveError::CorridorOutOfBounds`] if a room tile lies off the grid,
    /// [`CaveError::BrokenInvariant`] if an unreachable room has no
    /// candidate partner.
    pub fn connect(&self, grid: &mut Grid, graph: &mut RoomGraph) -> CaveResult<Vec<Passage>> {
        let mut passages = Vec::new();
        if graph.len() < 2 {
            return Ok(passages);
        }

        self.connect_nearest(grid, graph, &mut passages)?;
        let local = passages.len();
        self.repair_reachability(grid, graph, &mut passages)?;

        tracing::debug!(
            rooms = graph.len(),
            local,
            repair = passages.len() - local,
            "rooms connected"
        );
        Ok(passages)
    }

    fn connect_nearest(
        &self,
        grid: &mut Grid,
        graph: &mut RoomGraph,
        passages: &mut Vec<Passage>,
    ) -> CaveResult<()> {
        for a in 0..graph.len() {
            if !graph.rooms[a].connected.is_empty() {
                continue;
            }
            let mut best: Option<(usize, Coord, Coord, i64)> = None;
            for b in 0..graph.len() {
                if a == b || graph.rooms[a].is_connected(b) {
                    continue;
                }
                if let Some((tile_a, tile_b, dist)) = graph.closest_tiles(a, b) {
                    if best.map_or(true, |(.., d)| dist < d) {
                        best = Some((b, tile_a, tile_b, dist));
                    }
                }
            }
            if let Some((b, tile_a, tile_b, _)) = best {
                passages.push(self.join(grid, graph, a, b, tile_a, tile_b)?);
            }
        }
        Ok(())
    }

    fn repair_reachability(
        &self,
        grid: &mut Grid,
        graph: &mut RoomGraph,
        passages: &mut Vec<Passage>,
    ) -> CaveResult<()> {
        loop {
            let (reachable, unreachable): (Vec<usize>, Vec<usize>) =
                (0..graph.len()).partition(|&i| graph.rooms[i].reachable);
            if unreachable.is_empty() {
                return Ok(());
            }

            let mut best: Option<(usize, usize, Coord, Coord, i64)> = None;
            for &a in &reachable {
                for &b in &unreachable {
                    if let Some((tile_a, tile_b, dist)) = graph.closest_tiles(a, b) {
                        if best.map_or(true, |(.., d)| dist < d) {
                            best = Some((a, b, tile_a, tile_b, dist));
                        }
                    }
                }
            }

            let Some((a, b, tile_a, tile_b, _)) = best else {
                return Err(CaveError::BrokenInvariant(format!(
                    "{} rooms unreachable with no edge tiles to connect",
                    unreachable.len()
                )));
            };
            passages.push(self.join(grid, graph, a, b, tile_a, tile_b)?);
        }
    }

    fn join(
        &self,
        grid: &mut Grid,
        graph: &mut RoomGraph,
        a: usize,
        b: usize,
        from: Coord,
        to: Coord,
    ) -> CaveResult<Passage> {
        carve_passage(grid, from, to, self.radius)?;
        graph.link(a, b);
        tracing::trace!(from_room = a, to_room = b, %from, %to, "passage carved");
        Ok(Passage {
            from_room: a,
            to_room: b,
            from,
            to,
        })
    }
}

/// True when following connections from `rooms[0]` visits every room.
///
/// Only the links are walked; the cached reachability flags are not
/// consulted. Links to indices outside `rooms` are ignored. An empty slice
/// counts as connected.
#[must_use]
pub fn rooms_are_linked(rooms: &[Room]) -> bool {
    if rooms.is_empty() {
        return true;
    }
    let mut seen = vec![false; rooms.len()];
    seen[0] = true;
    let mut stack = vec![0];
    while let Some(room) = stack.pop() {
        for &next in &rooms[room].connected {
            if seen.get(next) == Some(&false) {
                seen[next] = true;
                stack.push(next);
            }
        }
    }
    seen.into_iter().all(|s| s)
}

/// Opens a disk of `radius` around every tile on the line `from` → `to`.
///
/// # Errors
///
/// Returns [`CaveError::CorridorOutOfBounds`] if either endpoint is off the
/// grid.
pub fn carve_passage(grid: &mut Grid, from: Coord, to: Coord, radius: i32) -> CaveResult<()> {
    for end in [from, to] {
        if !grid.contains(end) {
            return Err(CaveError::CorridorOutOfBounds {
                x: end.x,
                y: end.y,
                width: grid.width(),
                height: grid.height(),
            });
        }
    }
    for tile in line_tiles(from, to) {
        grid.stamp_disk(tile, radius, Cell::Open);
    }
    Ok(())
}

/// Rasterises the line `from` → `to`, both endpoints included.
///
/// Steps one tile per iteration along the dominant axis; an error
/// accumulator starting at half the axial distance decides when to also
/// step along the minor axis.
#[must_use]
pub fn line_tiles(from: Coord, to: Coord) -> Vec<Coord> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    let (step, minor_step, longest, shortest) = if dx.abs() >= dy.abs() {
        ((dx.signum(), 0), (0, dy.signum()), dx.abs(), dy.abs())
    } else {
        ((0, dy.signum()), (dx.signum(), 0), dy.abs(), dx.abs())
    };

    let mut line = Vec::with_capacity(longest as usize + 1);
    let mut current = from;
    let mut accumulated = longest / 2;
    for _ in 0..longest {
        line.push(current);
        current = current.offset(step.0, step.1);
        accumulated += shortest;
        if accumulated >= longest {
            accumulated -= longest;
            current = current.offset(minor_step.0, minor_step.1);
        }
    }
    line.push(current);
    line
}
