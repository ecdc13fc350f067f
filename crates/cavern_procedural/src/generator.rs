//! # Cellular-Automata Cave Generator
//!
//! Random fill followed by weighted smoothing passes.
//!
//! ## Smoothing Kernel
//!
//! Each pass sums wall weights over a 5x5 diamond around the cell:
//!
//! ```text
//! 0 0 1 0 0
//! 0 1 2 1 0
//! 1 2 0 2 1
//! 0 1 2 1 0
//! 0 0 1 0 0
//! ```
//!
//! Off-map cells count as wall. A sum above 9 makes the cell wall, below 7
//! makes it open, and the band in between keeps it as it was. The dead band
//! stops cells flickering between passes.
//!
//! Passes update the grid in place, so later cells in a pass already see the
//! new state of earlier ones. Levels only depend on this through the seed.

use rand::Rng;

use crate::config::GeneratorConfig;
use crate::grid::{Cell, Coord, Grid};
use crate::seed::LevelSeed;

/// Produces the raw cave grid for a seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaveGenerator {
    width: usize,
    height: usize,
    fill_percent: u32,
    smoothing_passes: u32,
}

impl CaveGenerator {
    /// Smoothing kernel weights, indexed `[dy + 2][dx + 2]`.
    pub const WEIGHTS: [[u32; 5]; 5] = [
        [0, 0, 1, 0, 0],
        [0, 1, 2, 1, 0],
        [1, 2, 0, 2, 1],
        [0, 1, 2, 1, 0],
        [0, 0, 1, 0, 0],
    ];

    /// Weighted sums above this become wall.
    pub const WALL_ABOVE: u32 = 9;

    /// Weighted sums below this become open.
    pub const OPEN_BELOW: u32 = 7;

    /// Creates a generator with the default pass count.
    #[must_use]
    pub const fn new(width: usize, height: usize, fill_percent: u32) -> Self {
        Self {
            width,
            height,
            fill_percent,
            smoothing_passes: cavern_shared::DEFAULT_SMOOTHING_PASSES,
        }
    }

    /// Sets the number of smoothing passes.
    #[must_use]
    pub const fn with_smoothing_passes(mut self, passes: u32) -> Self {
        self.smoothing_passes = passes;
        self
    }

    /// Creates a generator from a config.
    #[must_use]
    pub const fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.width, config.height, config.random_fill_percent)
            .with_smoothing_passes(config.smoothing_passes)
    }

    /// Generates a smoothed grid. Border cells are always wall.
    #[must_use]
    pub fn generate(&self, seed: LevelSeed) -> Grid {
        let mut rng = seed.rng();
        let mut grid = self.random_fill(&mut rng);
        for _ in 0..self.smoothing_passes {
            Self::smooth(&mut grid);
        }

        tracing::debug!(
            seed = seed.value(),
            width = self.width,
            height = self.height,
            passes = self.smoothing_passes,
            wall_ratio = grid.wall_ratio(),
            "cave grid smoothed"
        );
        grid
    }

    /// Fills interior cells with wall at `fill_percent` chance; border is wall.
    pub fn random_fill<R: Rng + ?Sized>(&self, rng: &mut R) -> Grid {
        let mut grid = Grid::new(self.width, self.height, Cell::Open);
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = if grid.is_border(x, y) || rng.gen_range(0..100) < self.fill_percent {
                    Cell::Wall
                } else {
                    Cell::Open
                };
                grid.set(Coord::new(x as i32, y as i32), cell);
            }
        }
        grid
    }

    /// Runs one in-place smoothing pass over the interior.
    pub fn smooth(grid: &mut Grid) {
        let (width, height) = (grid.width() as i32, grid.height() as i32);
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let coord = Coord::new(x, y);
                if let Some(cell) = grid.cell(coord) {
                    let weight = Self::weighted_wall_sum(grid, x, y);
                    grid.set(coord, Self::next_state(cell, weight));
                }
            }
        }
    }

    /// State of a cell after smoothing, given its weighted wall sum.
    #[inline]
    #[must_use]
    pub const fn next_state(cell: Cell, weight: u32) -> Cell {
        if weight > Self::WALL_ABOVE {
            Cell::Wall
        } else if weight < Self::OPEN_BELOW {
            Cell::Open
        } else {
            cell
        }
    }

    /// Kernel-weighted wall count around `(x, y)`. Off-map counts as wall.
    #[must_use]
    pub fn weighted_wall_sum(grid: &Grid, x: i32, y: i32) -> u32 {
        let mut weight = 0;
        for (row, dy) in Self::WEIGHTS.iter().zip(-2..=2) {
            for (&w, dx) in row.iter().zip(-2..=2) {
                if grid.is_wall_or_outside(x + dx, y + dy) {
                    weight += w;
                }
            }
        }
        weight
    }
}
