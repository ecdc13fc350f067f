//! # Level Generation Tests
//!
//! End-to-end checks of the pipeline: determinism, sealed borders,
//! room connectivity and the degenerate all-wall map.

use std::collections::HashSet;

use cavern_procedural::{
    generate_level, CaveGenerator, Cell, GeneratorConfig, LevelBuilder, LevelSeed, RegionAnalyzer,
};

fn reference_config() -> GeneratorConfig {
    GeneratorConfig {
        width: 20,
        height: 20,
        seed: "test".into(),
        random_fill_percent: 45,
        minimum_pillar_size: 5,
        minimum_cave_size: 5,
        ..GeneratorConfig::default()
    }
}

/// Test: Same config twice gives identical levels.
#[test]
fn test_reference_level_is_deterministic() {
    let config = reference_config();
    let a = generate_level(&config).unwrap();
    let b = generate_level(&config).unwrap();

    assert_eq!(a.grid, b.grid);
    assert_eq!(a.passages, b.passages);
    assert_eq!(a.mesh, b.mesh);
    assert_eq!(a.outlines, b.outlines);
}

/// Test: Reference level has a sealed border and connected rooms.
#[test]
fn test_reference_level_shape() {
    let level = generate_level(&reference_config()).unwrap();

    assert!(level.grid.border_is_sealed());
    assert!(!level.rooms.is_empty(), "reference seed should leave a cave");
    assert!(level.rooms[0].is_root());
    assert!(level.is_fully_connected());
    for pair in level.rooms.windows(2) {
        assert!(pair[0].size() >= pair[1].size(), "rooms sorted largest first");
    }
    println!("{}", level.grid.to_ascii());
}

/// Test: After connection the open cells form one component.
#[test]
fn test_connected_rooms_share_one_region() {
    for seed in ["test", "alpha", "beta", "gamma", "delta"] {
        let config = GeneratorConfig {
            width: 60,
            height: 40,
            seed: seed.into(),
            ..GeneratorConfig::default()
        };
        let level = generate_level(&config).unwrap();
        let open = RegionAnalyzer::find_regions(&level.grid, Cell::Open);

        assert!(level.is_fully_connected(), "seed {seed}");
        assert!(open.len() <= 1, "seed {seed}: {} open regions", open.len());
        if let Some(room) = level.rooms.first() {
            assert!(room.is_reachable());
        }
    }
}

/// Test: Room symmetry - if A lists B then B lists A.
#[test]
fn test_room_links_are_symmetric() {
    let config = GeneratorConfig {
        width: 80,
        height: 50,
        seed: "symmetry".into(),
        ..GeneratorConfig::default()
    };
    let level = generate_level(&config).unwrap();

    for (i, room) in level.rooms.iter().enumerate() {
        for &other in room.connected_rooms() {
            assert!(level.rooms[other].is_connected(i), "{i} -> {other} one-way");
        }
        for tile in room.edge_tiles() {
            assert!(room.tiles().contains(tile));
        }
    }
    for passage in &level.passages {
        assert_ne!(passage.from_room, passage.to_room);
    }
}

/// Test: A solid map needs no carving and meshes to a single rim loop.
#[test]
fn test_full_fill_is_one_solid_block() {
    let config = GeneratorConfig {
        random_fill_percent: 100,
        ..reference_config()
    };
    let level = generate_level(&config).unwrap();

    assert_eq!(RegionAnalyzer::find_regions(&level.grid, Cell::Wall).len(), 1);
    assert!(level.rooms.is_empty());
    assert!(level.passages.is_empty());

    let squares: usize = level.case_histogram.iter().sum();
    assert_eq!(level.case_histogram[15], squares);

    let nodes = config.width + 2 * config.border_size;
    assert_eq!(level.outlines.len(), 1);
    assert_eq!(level.outlines[0].len(), 4 * nodes - 4 + 1);
}

/// Test: Regions of both states partition a generated grid.
#[test]
fn test_regions_partition_generated_grid() {
    let grid = CaveGenerator::new(48, 36, 45).generate(LevelSeed::from_text("partition"));
    let mut seen = HashSet::new();

    for state in [Cell::Open, Cell::Wall] {
        for region in RegionAnalyzer::find_regions(&grid, state) {
            for tile in region {
                assert_eq!(grid.cell(tile), Some(state));
                assert!(seen.insert(tile));
            }
        }
    }
    assert_eq!(seen.len(), grid.len());
}

/// Test: Culling twice with the same threshold changes nothing.
#[test]
fn test_culling_is_idempotent() {
    let mut grid = CaveGenerator::new(48, 36, 45).generate(LevelSeed::from_text("cull"));
    RegionAnalyzer::cull(&mut grid, Cell::Wall, 20, Cell::Open);
    RegionAnalyzer::cull(&mut grid, Cell::Open, 40, Cell::Wall);
    let once = grid.clone();

    RegionAnalyzer::cull(&mut grid, Cell::Wall, 20, Cell::Open);
    RegionAnalyzer::cull(&mut grid, Cell::Open, 40, Cell::Wall);
    assert_eq!(grid, once);
}

/// Test: Config loaded from TOML drives the builder.
#[test]
fn test_toml_config_round_trip() {
    let config = GeneratorConfig::from_toml_str(
        r#"
        width = 30
        height = 24
        seed = "toml"
        minimum_pillar_size = 5
        minimum_cave_size = 5
        geometry = "colliders"
        "#,
    )
    .unwrap();
    let level = LevelBuilder::new(config).unwrap().generate().unwrap();

    assert_eq!(level.seed_text, "toml");
    assert_eq!(level.grid.width(), 30);
    assert!(level.colliders.is_some());
    assert!(level.walls.is_none());
}
