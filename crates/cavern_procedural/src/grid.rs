//! # Occupancy Grid
//!
//! The 2D wall/open field every stage of the pipeline reads and writes.
//!
//! Cells are stored row-major (`y * width + x`). Coordinates are signed so
//! neighbour math can step off the map; every accessor bounds-checks.

use std::fmt;

use crate::error::{CaveError, CaveResult};

/// State of one grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Walkable cave floor.
    #[default]
    Open,
    /// Solid rock.
    Wall,
}

impl Cell {
    /// Returns true for [`Cell::Wall`].
    #[inline]
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Preview glyph: `#` for wall, `.` for open.
    #[inline]
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Open => '.',
            Self::Wall => '#',
        }
    }
}

/// Integer tile coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Coord {
    /// North, east, south, west offsets.
    pub const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

    /// Creates a new coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate shifted by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbours (N, E, S, W).
    #[inline]
    #[must_use]
    pub fn orthogonal(self) -> [Self; 4] {
        Self::ORTHOGONAL.map(|(dx, dy)| self.offset(dx, dy))
    }

    /// Squared Euclidean distance.
    #[inline]
    #[must_use]
    pub const fn squared_distance(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Fixed-size occupancy grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid with every cell set to `fill`.
    #[must_use]
    pub fn new(width: usize, height: usize, fill: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Parses rows of `#` (wall) and `.` (open). Row 0 is `y = 0`.
    ///
    /// Blank lines and surrounding whitespace are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidConfig`] on ragged rows, unknown glyphs or
    /// an empty picture.
    pub fn from_ascii(picture: &str) -> CaveResult<Self> {
        let rows: Vec<&str> = picture
            .lines()
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();
        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 {
            return Err(CaveError::InvalidConfig("empty grid picture".into()));
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(CaveError::InvalidConfig(format!(
                    "row {y} has {} cells, expected {width}",
                    row.chars().count()
                )));
            }
            for glyph in row.chars() {
                cells.push(match glyph {
                    '#' => Cell::Wall,
                    '.' => Cell::Open,
                    other => {
                        return Err(CaveError::InvalidConfig(format!(
                            "unknown glyph {other:?} in row {y}"
                        )))
                    }
                });
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// Width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for a 0-sized grid.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `(x, y)` lies on the map.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Whether `coord` lies on the map.
    #[inline]
    #[must_use]
    pub const fn contains(&self, coord: Coord) -> bool {
        self.in_bounds(coord.x, coord.y)
    }

    #[inline]
    const fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Cell at `(x, y)`, `None` off the map.
    #[inline]
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if self.in_bounds(x, y) {
            Some(self.cells[self.index(x as usize, y as usize)])
        } else {
            None
        }
    }

    /// Cell at `coord`, `None` off the map.
    #[inline]
    #[must_use]
    pub fn cell(&self, coord: Coord) -> Option<Cell> {
        self.get(coord.x, coord.y)
    }

    /// Wall test that treats everything off the map as wall.
    #[inline]
    #[must_use]
    pub fn is_wall_or_outside(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map_or(true, Cell::is_wall)
    }

    /// Sets the cell at `coord`. Off-map writes are ignored.
    #[inline]
    pub fn set(&mut self, coord: Coord, cell: Cell) {
        if self.contains(coord) {
            let index = self.index(coord.x as usize, coord.y as usize);
            self.cells[index] = cell;
        }
    }

    /// Whether `(x, y)` is on the outermost ring of the map.
    #[inline]
    #[must_use]
    pub const fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// Forces every border cell to wall.
    pub fn seal_border(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                if self.is_border(x, y) {
                    let index = self.index(x, y);
                    self.cells[index] = Cell::Wall;
                }
            }
        }
    }

    /// True when every border cell is wall.
    #[must_use]
    pub fn border_is_sealed(&self) -> bool {
        self.coords()
            .filter(|c| self.is_border(c.x as usize, c.y as usize))
            .all(|c| self.cell(c) == Some(Cell::Wall))
    }

    /// Number of cells in `state`.
    #[must_use]
    pub fn count(&self, state: Cell) -> usize {
        self.cells.iter().filter(|&&cell| cell == state).count()
    }

    /// Fraction of cells that are wall, `0.0` for an empty grid.
    #[must_use]
    pub fn wall_ratio(&self) -> f32 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.count(Cell::Wall) as f32 / self.cells.len() as f32
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord::new(x as i32, y as i32)))
    }

    /// Copy of this grid surrounded by `border` rings of wall.
    #[must_use]
    pub fn padded(&self, border: usize) -> Self {
        let mut out = Self::new(self.width + border * 2, self.height + border * 2, Cell::Wall);
        for y in 0..self.height {
            for x in 0..self.width {
                let dst = out.index(x + border, y + border);
                out.cells[dst] = self.cells[self.index(x, y)];
            }
        }
        out
    }

    /// Sets every cell within `radius` of `center` (inclusive) to `cell`,
    /// clipped to the map.
    ///
    /// Only the part of the bounding box that overlaps the map is visited,
    /// and distances are measured in `i64`, so any radius is safe.
    pub fn stamp_disk(&mut self, center: Coord, radius: i32, cell: Cell) {
        if radius < 0 || self.cells.is_empty() {
            return;
        }
        let (cx, cy, r) = (i64::from(center.x), i64::from(center.y), i64::from(radius));
        let r2 = r * r;
        let x_lo = (cx - r).max(0);
        let x_hi = (cx + r).min(self.width as i64 - 1);
        let y_lo = (cy - r).max(0);
        let y_hi = (cy + r).min(self.height as i64 - 1);

        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy <= r2 {
                    let index = self.index(x as usize, y as usize);
                    self.cells[index] = cell;
                }
            }
        }
    }

    /// Renders the grid as `#`/`.` rows, `y = 0` first.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            out.extend(row.iter().map(|cell| cell.glyph()));
            out.push('\n');
        }
        out
    }
}
