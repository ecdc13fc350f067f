//! # Region Analysis
//!
//! Flood fills 4-connected components of one cell state and culls the ones
//! that are too small to matter: thin wall pillars become floor, tiny
//! pockets become rock.

use std::collections::VecDeque;

use crate::grid::{Cell, Coord, Grid};
use crate::room::Room;

/// One 4-connected component, in BFS discovery order.
pub type Region = Vec<Coord>;

/// Stateless flood-fill helpers over a [`Grid`].
pub struct RegionAnalyzer;

impl RegionAnalyzer {
    /// Finds every region of `target` cells.
    ///
    /// Regions are discovered in row-major scan order, so the output is
    /// fully determined by the grid.
    #[must_use]
    pub fn find_regions(grid: &Grid, target: Cell) -> Vec<Region> {
        let mut visited = vec![false; grid.len()];
        let mut regions = Vec::new();

        for start in grid.coords() {
            let index = Self::flat(grid, start);
            if !visited[index] && grid.cell(start) == Some(target) {
                regions.push(Self::flood(grid, start, target, &mut visited));
            }
        }
        regions
    }

    /// Rewrites every `target` region smaller than `min_size` to
    /// `replacement` and returns the survivors.
    ///
    /// Survivors are only promoted to rooms for [`Cell::Open`]; culling walls
    /// always returns an empty list.
    pub fn cull(grid: &mut Grid, target: Cell, min_size: usize, replacement: Cell) -> Vec<Room> {
        let regions = Self::find_regions(grid, target);
        let found = regions.len();

        let mut survivors = Vec::new();
        for region in regions {
            if region.len() < min_size {
                for &tile in &region {
                    grid.set(tile, replacement);
                }
            } else {
                survivors.push(region);
            }
        }

        tracing::debug!(
            ?target,
            found,
            culled = found - survivors.len(),
            min_size,
            "regions culled"
        );

        if target == Cell::Open {
            survivors
                .into_iter()
                .map(|tiles| Room::new(tiles, grid))
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Breadth-first fill from `start` over orthogonal neighbours.
    fn flood(grid: &Grid, start: Coord, target: Cell, visited: &mut [bool]) -> Region {
        let mut tiles = Vec::new();
        let mut queue = VecDeque::from([start]);
        visited[Self::flat(grid, start)] = true;

        while let Some(tile) = queue.pop_front() {
            tiles.push(tile);
            for next in tile.orthogonal() {
                if grid.cell(next) != Some(target) {
                    continue;
                }
                let index = Self::flat(grid, next);
                if !visited[index] {
                    visited[index] = true;
                    queue.push_back(next);
                }
            }
        }
        tiles
    }

    #[inline]
    fn flat(grid: &Grid, coord: Coord) -> usize {
        coord.y as usize * grid.width() + coord.x as usize
    }
}
