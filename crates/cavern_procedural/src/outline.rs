//! # Outline Tracing
//!
//! Walks the boundary of the cave mesh into closed vertex loops and derives
//! the geometry hosts consume: 2D edge colliders and extruded wall strips.
//!
//! An edge is on the boundary when exactly one triangle contains it. Loops
//! start from the lowest unvisited vertex index and are closed by repeating
//! their first vertex at the end.

use cavern_shared::math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{CaveError, CaveResult};
use crate::marching::{CaveMesh, MeshBuild, TriangleAdjacency};

/// Closed loop of mesh vertex indices; the last entry repeats the first.
pub type Outline = Vec<u32>;

/// Outline tracing options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineSettings {
    /// Trace the loop around the solid outer rim of the map.
    ///
    /// With this off, corners of fully solid squares are skipped, which drops
    /// the rim and keeps only the cave contours. That assumes a wall border.
    pub trace_outer_rim: bool,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            trace_outer_rim: true,
        }
    }
}

/// Traces every outline of a triangulated mesh.
pub struct OutlineTracer<'a> {
    adjacency: &'a TriangleAdjacency,
    visited: Vec<bool>,
}

impl<'a> OutlineTracer<'a> {
    /// Prepares a tracer over `build`.
    #[must_use]
    pub fn new(build: &'a MeshBuild, settings: OutlineSettings) -> Self {
        let mut visited = vec![false; build.adjacency.vertex_count()];
        if !settings.trace_outer_rim {
            for &v in &build.solid_corners {
                visited[v as usize] = true;
            }
        }
        Self {
            adjacency: &build.adjacency,
            visited,
        }
    }

    /// Consumes the tracer and returns the loops in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::BrokenInvariant`] if the adjacency index refers
    /// to a triangle or vertex it does not hold.
    pub fn trace(mut self) -> CaveResult<Vec<Outline>> {
        let mut outlines = Vec::new();

        for start in 0..self.visited.len() as u32 {
            if self.visited[start as usize] {
                continue;
            }
            let Some(mut current) = self.next_boundary_vertex(start)? else {
                continue;
            };

            self.visited[start as usize] = true;
            let mut outline = vec![start];
            loop {
                outline.push(current);
                self.visited[current as usize] = true;
                match self.next_boundary_vertex(current)? {
                    Some(next) => current = next,
                    None => break,
                }
            }
            outline.push(start);
            outlines.push(outline);
        }

        tracing::debug!(outlines = outlines.len(), "outlines traced");
        Ok(outlines)
    }

    /// First unvisited neighbour of `vertex` across a boundary edge.
    fn next_boundary_vertex(&self, vertex: u32) -> CaveResult<Option<u32>> {
        for &t in self.incident(vertex)? {
            for other in self.triangle(t)? {
                if other != vertex
                    && !self.visited[other as usize]
                    && self.is_boundary_edge(vertex, other)?
                {
                    return Ok(Some(other));
                }
            }
        }
        Ok(None)
    }

    fn is_boundary_edge(&self, a: u32, b: u32) -> CaveResult<bool> {
        let mut shared = 0;
        for &t in self.incident(a)? {
            if self.triangle(t)?.contains(&b) {
                shared += 1;
                if shared > 1 {
                    return Ok(false);
                }
            }
        }
        Ok(shared == 1)
    }

    fn incident(&self, vertex: u32) -> CaveResult<&'a [u32]> {
        self.adjacency
            .incident(vertex)
            .ok_or_else(|| CaveError::BrokenInvariant(format!("vertex {vertex} not indexed")))
    }

    fn triangle(&self, id: u32) -> CaveResult<[u32; 3]> {
        self.adjacency
            .triangle(id)
            .ok_or_else(|| CaveError::BrokenInvariant(format!("triangle {id} not indexed")))
    }
}

/// Convenience wrapper around [`OutlineTracer`].
///
/// # Errors
///
/// See [`OutlineTracer::trace`].
pub fn trace_outlines(build: &MeshBuild, settings: OutlineSettings) -> CaveResult<Vec<Outline>> {
    OutlineTracer::new(build, settings).trace()
}

/// Polyline collider on the ground plane.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeCollider {
    /// Points in `(x, z)` order, closed like the outline it came from.
    pub points: Vec<Vec2>,
}

/// Builds one collider per outline.
///
/// # Errors
///
/// Returns [`CaveError::BrokenInvariant`] if an outline indexes past the
/// mesh vertices.
pub fn edge_colliders(mesh: &CaveMesh, outlines: &[Outline]) -> CaveResult<Vec<EdgeCollider>> {
    outlines
        .iter()
        .map(|outline| {
            let points = outline
                .iter()
                .map(|&v| vertex(mesh, v).map(Vec3::ground))
                .collect::<CaveResult<Vec<_>>>()?;
            Ok(EdgeCollider { points })
        })
        .collect()
}

/// Vertical wall strips hanging below the outlines.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WallMesh {
    /// Vertex positions, four per outline edge.
    pub vertices: Vec<Vec3>,
    /// Triangle list, two triangles per outline edge.
    pub triangles: Vec<u32>,
}

impl WallMesh {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}

/// Extrudes every outline edge `height` units downward.
///
/// Each edge `(a, b)` gets its own quad `a, b, b - h, a - h`, split as
/// `(0, 2, 1)` and `(0, 3, 2)`.
///
/// # Errors
///
/// Returns [`CaveError::BrokenInvariant`] if an outline indexes past the
/// mesh vertices.
pub fn extrude_walls(mesh: &CaveMesh, outlines: &[Outline], height: f32) -> CaveResult<WallMesh> {
    let drop = Vec3::Y * height;
    let mut walls = WallMesh::default();

    for outline in outlines {
        for edge in outline.windows(2) {
            let (a, b) = (vertex(mesh, edge[0])?, vertex(mesh, edge[1])?);
            let base = walls.vertices.len() as u32;
            walls.vertices.extend_from_slice(&[a, b, b - drop, a - drop]);
            walls
                .triangles
                .extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
        }
    }

    tracing::debug!(triangles = walls.triangle_count(), height, "walls extruded");
    Ok(walls)
}

fn vertex(mesh: &CaveMesh, index: u32) -> CaveResult<Vec3> {
    mesh.vertices.get(index as usize).copied().ok_or_else(|| {
        CaveError::BrokenInvariant(format!(
            "outline vertex {index} outside mesh of {}",
            mesh.vertices.len()
        ))
    })
}
