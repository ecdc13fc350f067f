//! # Generator Configuration
//!
//! Every knob of the pipeline in one serde struct, loadable from TOML:
//!
//! ```toml
//! width = 96
//! height = 64
//! seed = "test"
//! random_fill_percent = 45
//! minimum_pillar_size = 20
//! minimum_cave_size = 40
//! geometry = "both"
//!
//! [outline]
//! trace_outer_rim = false
//! ```
//!
//! Missing keys fall back to [`GeneratorConfig::default`]. Parameters only
//! take effect on the next generate call.

use std::path::Path;

use cavern_shared::constants::{
    DEFAULT_BORDER_SIZE, DEFAULT_CELL_SIZE, DEFAULT_PASSAGE_RADIUS, DEFAULT_SMOOTHING_PASSES,
    DEFAULT_WALL_HEIGHT, MAX_BORDER_SIZE, MAX_PASSAGE_RADIUS,
};
use serde::{Deserialize, Serialize};

use crate::error::{CaveError, CaveResult};
use crate::outline::OutlineSettings;
use crate::seed::clock_seed_text;

/// Which outline-derived geometry the level carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryMode {
    /// 2D edge colliders only (top-down games).
    Colliders,
    /// Extruded 3D wall mesh only.
    #[default]
    Walls,
    /// Both colliders and walls.
    Both,
}

impl GeometryMode {
    /// Whether edge colliders are built.
    #[must_use]
    pub const fn wants_colliders(self) -> bool {
        matches!(self, Self::Colliders | Self::Both)
    }

    /// Whether the wall mesh is built.
    #[must_use]
    pub const fn wants_walls(self) -> bool {
        matches!(self, Self::Walls | Self::Both)
    }
}

/// Parameters for one level generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Map width in cells.
    pub width: usize,
    /// Map height in cells.
    pub height: usize,
    /// Seed string. Hashed; any value is valid.
    pub seed: String,
    /// Replace `seed` with a clock-derived string on every generate.
    pub use_random_seed: bool,
    /// Chance (0-100) that an interior cell starts as wall.
    pub random_fill_percent: u32,
    /// Wall regions smaller than this become open.
    pub minimum_pillar_size: usize,
    /// Open regions smaller than this become wall.
    pub minimum_cave_size: usize,
    /// Cellular-automata smoothing passes.
    pub smoothing_passes: u32,
    /// Disk brush radius for carved passages, `1..=MAX_PASSAGE_RADIUS`.
    pub passage_radius: u32,
    /// Solid border added around the map before meshing, at most
    /// `MAX_BORDER_SIZE`.
    pub border_size: usize,
    /// World-space size of one cell.
    pub cell_size: f32,
    /// Depth of the extruded walls.
    pub wall_height: f32,
    /// Outline-derived geometry to build.
    pub geometry: GeometryMode,
    /// Outline tracing options.
    pub outline: OutlineSettings,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 96,
            height: 64,
            seed: String::from("cavern"),
            use_random_seed: false,
            random_fill_percent: 45,
            minimum_pillar_size: 20,
            minimum_cave_size: 40,
            smoothing_passes: DEFAULT_SMOOTHING_PASSES,
            passage_radius: DEFAULT_PASSAGE_RADIUS,
            border_size: DEFAULT_BORDER_SIZE,
            cell_size: DEFAULT_CELL_SIZE,
            wall_height: DEFAULT_WALL_HEIGHT,
            geometry: GeometryMode::default(),
            outline: OutlineSettings::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::ConfigParse`] on malformed TOML.
    pub fn from_toml_str(text: &str) -> CaveResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a config from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::Io`] if the file cannot be read and
    /// [`CaveError::ConfigParse`] on malformed TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> CaveResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks every precondition. Nothing is clamped.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidConfig`] naming the first bad parameter.
    pub fn validate(&self) -> CaveResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CaveError::InvalidConfig(format!(
                "map must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.random_fill_percent > 100 {
            return Err(CaveError::InvalidConfig(format!(
                "random_fill_percent must be within 0..=100, got {}",
                self.random_fill_percent
            )));
        }
        if self.minimum_pillar_size == 0 {
            return Err(CaveError::InvalidConfig(
                "minimum_pillar_size must be positive".into(),
            ));
        }
        if self.minimum_cave_size == 0 {
            return Err(CaveError::InvalidConfig(
                "minimum_cave_size must be positive".into(),
            ));
        }
        if self.passage_radius == 0 || self.passage_radius > MAX_PASSAGE_RADIUS {
            return Err(CaveError::InvalidConfig(format!(
                "passage_radius must be within 1..={MAX_PASSAGE_RADIUS}, got {}",
                self.passage_radius
            )));
        }
        if self.border_size > MAX_BORDER_SIZE {
            return Err(CaveError::InvalidConfig(format!(
                "border_size must be at most {MAX_BORDER_SIZE}, got {}",
                self.border_size
            )));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(CaveError::InvalidConfig(format!(
                "cell_size must be a positive number, got {}",
                self.cell_size
            )));
        }
        if !(self.wall_height.is_finite() && self.wall_height > 0.0) {
            return Err(CaveError::InvalidConfig(format!(
                "wall_height must be a positive number, got {}",
                self.wall_height
            )));
        }
        Ok(())
    }

    /// The seed string the next generate call will hash.
    #[must_use]
    pub fn effective_seed_text(&self) -> String {
        if self.use_random_seed {
            clock_seed_text()
        } else {
            self.seed.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            width = 20
            height = 30
            seed = "test"
            geometry = "colliders"

            [outline]
            trace_outer_rim = false
            "#,
        )
        .unwrap();

        assert_eq!(config.width, 20);
        assert_eq!(config.height, 30);
        assert_eq!(config.seed, "test");
        assert_eq!(config.geometry, GeometryMode::Colliders);
        assert!(!config.outline.trace_outer_rim);
        assert_eq!(config.border_size, DEFAULT_BORDER_SIZE);
        assert_eq!(config.passage_radius, DEFAULT_PASSAGE_RADIUS);
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = GeneratorConfig::from_toml_str("width = \"wide\"").unwrap_err();
        assert!(matches!(err, CaveError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("cavern_no_such_config.toml");
        let err = GeneratorConfig::from_toml_file(&path).unwrap_err();
        assert!(matches!(err, CaveError::Io(_)));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join("cavern_config_test.toml");
        std::fs::write(&path, "width = 12\nrandom_fill_percent = 60\n").unwrap();

        let config = GeneratorConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.width, 12);
        assert_eq!(config.random_fill_percent, 60);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let bad = [
            GeneratorConfig { width: 0, ..GeneratorConfig::default() },
            GeneratorConfig { height: 0, ..GeneratorConfig::default() },
            GeneratorConfig { random_fill_percent: 101, ..GeneratorConfig::default() },
            GeneratorConfig { minimum_pillar_size: 0, ..GeneratorConfig::default() },
            GeneratorConfig { minimum_cave_size: 0, ..GeneratorConfig::default() },
            GeneratorConfig { passage_radius: 0, ..GeneratorConfig::default() },
            GeneratorConfig { passage_radius: 50_000, ..GeneratorConfig::default() },
            GeneratorConfig { passage_radius: u32::MAX, ..GeneratorConfig::default() },
            GeneratorConfig { border_size: usize::MAX, ..GeneratorConfig::default() },
            GeneratorConfig { cell_size: 0.0, ..GeneratorConfig::default() },
            GeneratorConfig { cell_size: f32::NAN, ..GeneratorConfig::default() },
            GeneratorConfig { wall_height: -1.0, ..GeneratorConfig::default() },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(CaveError::InvalidConfig(_))),
                "accepted {config:?}"
            );
        }
    }

    #[test]
    fn test_size_limits_are_inclusive() {
        let config = GeneratorConfig {
            passage_radius: MAX_PASSAGE_RADIUS,
            border_size: MAX_BORDER_SIZE,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_ok());

        let over = GeneratorConfig { border_size: MAX_BORDER_SIZE + 1, ..config };
        assert!(matches!(over.validate(), Err(CaveError::InvalidConfig(_))));
    }

    #[test]
    fn test_fixed_seed_is_used_verbatim() {
        let config = GeneratorConfig { seed: "abc".into(), ..GeneratorConfig::default() };
        assert_eq!(config.effective_seed_text(), "abc");
    }
}
