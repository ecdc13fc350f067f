//! # Marching Squares
//!
//! Turns the padded occupancy grid into an indexed cave mesh.
//!
//! Every grid cell becomes a control node, active when the cell is wall.
//! Each control node owns two mid-edge nodes, one half a cell above it (+Z)
//! and one half a cell to its right (+X). Overlapping 2x2 blocks of control
//! nodes form squares:
//!
//! ```text
//!   NW ---- N ---- NE        bit weights
//!   |              |         NW = 8, NE = 4
//!   W              E         SE = 2, SW = 1
//!   |              |
//!   SW ---- S ---- SE
//! ```
//!
//! The 4-bit configuration picks a convex polygon from [`CASE_TABLE`] which
//! is emitted as a triangle fan rooted at its first point. The saddle cases
//! 5 and 10 always use the 6-point fan through all four mid-edge nodes.
//!
//! Every polygon is listed so that each fan triangle `(a, b, c)` has a
//! right-handed normal `(b - a) x (c - a)` pointing up (+Y).

use bytemuck::cast_slice;
use cavern_shared::math::Vec3;

use crate::grid::Grid;

/// Named point of a marching square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SquarePoint {
    /// Top-left control node.
    NorthWest,
    /// Top-right control node.
    NorthEast,
    /// Bottom-right control node.
    SouthEast,
    /// Bottom-left control node.
    SouthWest,
    /// Middle of the top side.
    North,
    /// Middle of the right side.
    East,
    /// Middle of the bottom side.
    South,
    /// Middle of the left side.
    West,
}

use SquarePoint::{East, North, NorthEast, NorthWest, South, SouthEast, SouthWest, West};

/// Polygon for each configuration, in fan order.
pub const CASE_TABLE: [&[SquarePoint]; 16] = [
    &[],
    &[West, South, SouthWest],
    &[SouthEast, South, East],
    &[East, SouthEast, SouthWest, West],
    &[NorthEast, East, North],
    &[NorthEast, East, South, SouthWest, West, North],
    &[North, NorthEast, SouthEast, South],
    &[SouthEast, SouthWest, West, North, NorthEast],
    &[West, NorthWest, North],
    &[NorthWest, North, South, SouthWest],
    &[NorthWest, North, East, SouthEast, South, West],
    &[SouthWest, NorthWest, North, East, SouthEast],
    &[NorthWest, NorthEast, East, West],
    &[NorthWest, NorthEast, East, South, SouthWest],
    &[NorthEast, SouthEast, South, West, NorthWest],
    &[NorthWest, NorthEast, SouthEast, SouthWest],
];

/// Which of a control node's three vertex slots a point uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Corner = 0,
    Above = 1,
    Right = 2,
}

/// One 2x2 block of control nodes, identified by its south-west node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    /// Column of the south-west control node.
    pub x: usize,
    /// Row of the south-west control node.
    pub y: usize,
    /// 4-bit corner configuration.
    pub configuration: u8,
}

impl Square {
    /// Reads the corner states of the square at `(x, y)`.
    #[must_use]
    pub fn from_grid(grid: &Grid, x: usize, y: usize) -> Self {
        let active = |cx: usize, cy: usize| grid.is_wall_or_outside(cx as i32, cy as i32);
        let mut configuration = 0;
        if active(x, y + 1) {
            configuration |= 8;
        }
        if active(x + 1, y + 1) {
            configuration |= 4;
        }
        if active(x + 1, y) {
            configuration |= 2;
        }
        if active(x, y) {
            configuration |= 1;
        }
        Self { x, y, configuration }
    }

    /// Polygon for this square's configuration.
    #[must_use]
    pub fn points(&self) -> &'static [SquarePoint] {
        CASE_TABLE[usize::from(self.configuration & 0xF)]
    }

    /// Control node and slot that back `point`.
    const fn node(&self, point: SquarePoint) -> (usize, usize, Slot) {
        let (x, y) = (self.x, self.y);
        match point {
            NorthWest => (x, y + 1, Slot::Corner),
            NorthEast => (x + 1, y + 1, Slot::Corner),
            SouthEast => (x + 1, y, Slot::Corner),
            SouthWest => (x, y, Slot::Corner),
            North => (x, y + 1, Slot::Right),
            East => (x + 1, y, Slot::Above),
            South => (x, y, Slot::Right),
            West => (x, y, Slot::Above),
        }
    }
}

/// Indexed cave floor mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaveMesh {
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Triangle list, three indices per triangle.
    pub triangles: Vec<u32>,
}

impl CaveMesh {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Vertex indices of triangle `i`.
    #[must_use]
    pub fn triangle(&self, i: usize) -> Option<[u32; 3]> {
        let tri = self.triangles.get(i * 3..i * 3 + 3)?;
        Some([tri[0], tri[1], tri[2]])
    }

    /// Vertex buffer as raw bytes, ready for upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        cast_slice(&self.triangles)
    }
}

/// Vertex → incident triangles index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriangleAdjacency {
    triangles: Vec<[u32; 3]>,
    incident: Vec<Vec<u32>>,
}

impl TriangleAdjacency {
    fn add_vertex(&mut self) {
        self.incident.push(Vec::new());
    }

    fn add_triangle(&mut self, tri: [u32; 3]) {
        let id = self.triangles.len() as u32;
        self.triangles.push(tri);
        for v in tri {
            self.incident[v as usize].push(id);
        }
    }

    /// Number of indexed vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.incident.len()
    }

    /// Triangle by id.
    #[must_use]
    pub fn triangle(&self, id: u32) -> Option<[u32; 3]> {
        self.triangles.get(id as usize).copied()
    }

    /// Ids of the triangles touching `vertex`, `None` for unknown vertices.
    #[must_use]
    pub fn incident(&self, vertex: u32) -> Option<&[u32]> {
        self.incident.get(vertex as usize).map(Vec::as_slice)
    }
}

/// Everything one triangulation pass produces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuild {
    /// The cave floor mesh.
    pub mesh: CaveMesh,
    /// Vertex → triangle index for outline tracing.
    pub adjacency: TriangleAdjacency,
    /// Vertices at the corners of fully solid (configuration 15) squares.
    pub solid_corners: Vec<u32>,
    /// How many squares hit each configuration.
    pub case_histogram: [usize; 16],
}

/// Marching-squares mesher.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshTriangulator {
    cell_size: f32,
}

impl Default for MeshTriangulator {
    fn default() -> Self {
        Self::new(cavern_shared::DEFAULT_CELL_SIZE)
    }
}

impl MeshTriangulator {
    /// Creates a mesher with the given world-space cell size.
    #[must_use]
    pub const fn new(cell_size: f32) -> Self {
        Self { cell_size }
    }

    /// Triangulates `grid`. Pass the padded grid so no open cell touches
    /// the array edge.
    #[must_use]
    pub fn triangulate(&self, grid: &Grid) -> MeshBuild {
        let mut pass = Pass::new(grid, self.cell_size);
        let squares_x = grid.width().saturating_sub(1);
        let squares_y = grid.height().saturating_sub(1);

        for x in 0..squares_x {
            for y in 0..squares_y {
                pass.emit(Square::from_grid(grid, x, y));
            }
        }

        tracing::debug!(
            vertices = pass.build.mesh.vertices.len(),
            triangles = pass.build.mesh.triangle_count(),
            solid = pass.build.case_histogram[15],
            "cave mesh triangulated"
        );
        pass.build
    }
}

/// Per-call state: the dedup table and the buffers being filled.
struct Pass {
    nodes_x: usize,
    origin_x: f32,
    origin_z: f32,
    cell_size: f32,
    /// `(y * nodes_x + x) * 3 + slot` → vertex index.
    vertex_ids: Vec<Option<u32>>,
    build: MeshBuild,
}

impl Pass {
    fn new(grid: &Grid, cell_size: f32) -> Self {
        let (nodes_x, nodes_y) = (grid.width(), grid.height());
        Self {
            nodes_x,
            origin_x: -(nodes_x as f32 * cell_size) * 0.5 + cell_size * 0.5,
            origin_z: -(nodes_y as f32 * cell_size) * 0.5 + cell_size * 0.5,
            cell_size,
            vertex_ids: vec![None; nodes_x * nodes_y * 3],
            build: MeshBuild::default(),
        }
    }

    fn emit(&mut self, square: Square) {
        self.build.case_histogram[usize::from(square.configuration)] += 1;
        let points = square.points();
        if points.is_empty() {
            return;
        }

        let ids: Vec<u32> = points.iter().map(|&p| self.vertex(square.node(p))).collect();
        for i in 2..ids.len() {
            let tri = [ids[0], ids[i - 1], ids[i]];
            self.build.mesh.triangles.extend_from_slice(&tri);
            self.build.adjacency.add_triangle(tri);
        }
        if square.configuration == 15 {
            self.build.solid_corners.extend_from_slice(&ids);
        }
    }

    /// Index of the vertex at `(x, y, slot)`, allocated on first use.
    fn vertex(&mut self, (x, y, slot): (usize, usize, Slot)) -> u32 {
        let key = (y * self.nodes_x + x) * 3 + slot as usize;
        if let Some(id) = self.vertex_ids[key] {
            return id;
        }

        let half = self.cell_size * 0.5;
        let corner = Vec3::new(
            self.origin_x + x as f32 * self.cell_size,
            0.0,
            self.origin_z + y as f32 * self.cell_size,
        );
        let position = match slot {
            Slot::Corner => corner,
            Slot::Above => corner + Vec3::Z * half,
            Slot::Right => corner + Vec3::X * half,
        };

        let id = self.build.mesh.vertices.len() as u32;
        self.build.mesh.vertices.push(position);
        self.build.adjacency.add_vertex();
        self.vertex_ids[key] = Some(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    fn normal_y(mesh: &CaveMesh, tri: [u32; 3]) -> f32 {
        let [a, b, c] = tri.map(|v| mesh.vertices[v as usize]);
        (b - a).cross(c - a).y
    }

    #[test]
    fn test_solid_2x2_is_one_quad() {
        let grid = Grid::new(2, 2, Cell::Wall);
        let build = MeshTriangulator::default().triangulate(&grid);

        assert_eq!(build.mesh.vertices.len(), 4);
        assert_eq!(build.mesh.triangle_count(), 2);
        assert_eq!(build.case_histogram[15], 1);
        assert_eq!(build.solid_corners.len(), 4);
    }

    #[test]
    fn test_open_grid_is_empty() {
        let grid = Grid::new(4, 4, Cell::Open);
        let build = MeshTriangulator::default().triangulate(&grid);

        assert!(build.mesh.vertices.is_empty());
        assert!(build.mesh.triangles.is_empty());
        assert_eq!(build.case_histogram[0], 9);
    }

    #[test]
    fn test_tiny_grids_have_no_squares() {
        for (w, h) in [(0, 0), (1, 1), (1, 5), (5, 1)] {
            let build = MeshTriangulator::default().triangulate(&Grid::new(w, h, Cell::Wall));
            assert!(build.mesh.vertices.is_empty(), "{w}x{h}");
        }
    }

    #[test]
    fn test_shared_vertices_are_deduplicated() {
        let grid = Grid::new(3, 2, Cell::Wall);
        let build = MeshTriangulator::default().triangulate(&grid);
        // Two quads share their middle edge: 6 corners, not 8.
        assert_eq!(build.mesh.vertices.len(), 6);
        assert_eq!(build.mesh.triangle_count(), 4);
    }

    #[test]
    fn test_every_configuration_faces_up() {
        for configuration in 0u8..16 {
            let mut grid = Grid::new(2, 2, Cell::Open);
            let corners = [(0, 1, 8), (1, 1, 4), (1, 0, 2), (0, 0, 1)];
            for (x, y, bit) in corners {
                if configuration & bit != 0 {
                    grid.set(crate::grid::Coord::new(x, y), Cell::Wall);
                }
            }
            let build = MeshTriangulator::default().triangulate(&grid);
            assert_eq!(build.case_histogram[usize::from(configuration)], 1);

            let expected = CASE_TABLE[usize::from(configuration)].len().saturating_sub(2);
            assert_eq!(build.mesh.triangle_count(), expected, "case {configuration}");
            for i in 0..build.mesh.triangle_count() {
                let tri = build.mesh.triangle(i).unwrap();
                assert!(normal_y(&build.mesh, tri) > 0.0, "case {configuration} tri {i}");
            }
        }
    }

    #[test]
    fn test_saddles_use_six_point_fans() {
        assert_eq!(CASE_TABLE[5].len(), 6);
        assert_eq!(CASE_TABLE[10].len(), 6);
        for case in [5, 10] {
            for mid in [North, East, South, West] {
                assert!(CASE_TABLE[case].contains(&mid));
            }
        }
    }

    #[test]
    fn test_node_positions_are_centred() {
        let grid = Grid::new(2, 2, Cell::Wall);
        let build = MeshTriangulator::new(2.0).triangulate(&grid);
        let mut xs: Vec<f32> = build.mesh.vertices.iter().map(|v| v.x).collect();
        xs.sort_by(f32::total_cmp);
        assert_eq!(xs, vec![-1.0, -1.0, 1.0, 1.0]);
        assert!(build.mesh.vertices.iter().all(|v| v.y == 0.0));
    }

    #[test]
    fn test_vertex_count_bound() {
        let grid = Grid::from_ascii(
            "
            ########
            #..#...#
            #.##.#.#
            #....#.#
            ########
            ",
        )
        .unwrap();
        let build = MeshTriangulator::default().triangulate(&grid);
        assert!(build.mesh.vertices.len() <= grid.len() * 3);
        assert_eq!(build.adjacency.vertex_count(), build.mesh.vertices.len());
        assert_eq!(build.mesh.triangles.len() % 3, 0);
    }

    #[test]
    fn test_adjacency_matches_triangles() {
        let grid = Grid::from_ascii(
            "
            ###
            #.#
            ###
            ",
        )
        .unwrap();
        let build = MeshTriangulator::default().triangulate(&grid);
        // 8 wall corners + 4 mid-edge nodes around the hole.
        assert_eq!(build.mesh.vertices.len(), 12);
        assert_eq!(build.mesh.triangle_count(), 12);

        for v in 0..build.mesh.vertices.len() as u32 {
            let incident = build.adjacency.incident(v).unwrap();
            assert!(!incident.is_empty());
            for &t in incident {
                assert!(build.adjacency.triangle(t).unwrap().contains(&v));
            }
        }
        assert!(build.adjacency.incident(99).is_none());
    }

    #[test]
    fn test_byte_views() {
        let build = MeshTriangulator::default().triangulate(&Grid::new(2, 2, Cell::Wall));
        assert_eq!(build.mesh.vertex_bytes().len(), 4 * 12);
        assert_eq!(build.mesh.index_bytes().len(), 6 * 4);
    }
}
