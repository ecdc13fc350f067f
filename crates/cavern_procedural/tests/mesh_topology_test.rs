//! # Mesh Topology Tests
//!
//! Structural checks on meshes of generated levels: winding, vertex bounds,
//! closed outlines and boundary coverage.

use std::collections::{HashMap, HashSet};

use cavern_procedural::{
    extrude_walls, generate_level, trace_outlines, CaveMesh, GeneratorConfig, GeometryMode,
    MeshTriangulator, OutlineSettings,
};

fn config(seed: &str) -> GeneratorConfig {
    GeneratorConfig {
        width: 64,
        height: 48,
        seed: seed.into(),
        geometry: GeometryMode::Both,
        ..GeneratorConfig::default()
    }
}

fn boundary_edges(mesh: &CaveMesh) -> HashSet<(u32, u32)> {
    let mut counts: HashMap<(u32, u32), u32> = HashMap::new();
    for tri in mesh.triangles.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            *counts.entry((a.min(b), a.max(b))).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .filter_map(|(edge, n)| (n == 1).then_some(edge))
        .collect()
}

/// Test: Every triangle faces up.
#[test]
fn test_triangles_face_up() {
    let level = generate_level(&config("winding")).unwrap();
    let mesh = &level.mesh;

    for tri in mesh.triangles.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
        let normal = (b - a).cross(c - a);
        assert!(normal.y > 0.0, "triangle {tri:?} faces down");
    }
}

/// Test: Vertex count stays within three slots per control node.
#[test]
fn test_vertex_count_bound() {
    let config = config("bound");
    let level = generate_level(&config).unwrap();
    let nodes = (config.width + 2 * config.border_size) * (config.height + 2 * config.border_size);

    assert!(level.mesh.vertices.len() <= 3 * nodes);
    assert_eq!(level.mesh.triangles.len() % 3, 0);
    assert!(level
        .mesh
        .triangles
        .iter()
        .all(|&i| (i as usize) < level.mesh.vertices.len()));
}

/// Test: Outlines are closed and cover every boundary edge exactly once.
#[test]
fn test_outlines_cover_boundary_once() {
    for seed in ["outline-a", "outline-b", "outline-c"] {
        let level = generate_level(&config(seed)).unwrap();
        let mut traced = HashSet::new();

        for outline in &level.outlines {
            assert!(outline.len() >= 4, "seed {seed}: degenerate loop");
            assert_eq!(outline.first(), outline.last(), "seed {seed}: open loop");
            for pair in outline.windows(2) {
                let edge = (pair[0].min(pair[1]), pair[0].max(pair[1]));
                assert!(traced.insert(edge), "seed {seed}: edge {edge:?} traced twice");
            }
        }
        assert_eq!(traced, boundary_edges(&level.mesh), "seed {seed}");
    }
}

/// Test: Dropping the rim removes exactly one loop.
#[test]
fn test_rim_toggle_removes_one_loop() {
    let level = generate_level(&config("rim")).unwrap();
    let padded = level.grid.padded(cavern_shared::DEFAULT_BORDER_SIZE);
    let build = MeshTriangulator::default().triangulate(&padded);

    let with_rim = trace_outlines(&build, OutlineSettings::default()).unwrap();
    let without_rim = trace_outlines(
        &build,
        OutlineSettings {
            trace_outer_rim: false,
        },
    )
    .unwrap();

    assert_eq!(with_rim.len(), level.outlines.len());
    assert_eq!(without_rim.len() + 1, with_rim.len());
}

/// Test: Colliders and walls line up with the outlines.
#[test]
fn test_geometry_matches_outlines() {
    let level = generate_level(&config("geometry")).unwrap();
    let colliders = level.colliders.as_ref().unwrap();
    let walls = level.walls.as_ref().unwrap();

    assert_eq!(colliders.len(), level.outlines.len());
    let edges: usize = level.outlines.iter().map(|o| o.len() - 1).sum();
    assert_eq!(walls.vertices.len(), 4 * edges);
    assert_eq!(walls.triangles.len(), 6 * edges);

    let taller = extrude_walls(&level.mesh, &level.outlines, 12.0).unwrap();
    let lowest = taller.vertices.iter().map(|v| v.y).fold(0.0_f32, f32::min);
    assert!((lowest + 12.0).abs() < f32::EPSILON);
}
