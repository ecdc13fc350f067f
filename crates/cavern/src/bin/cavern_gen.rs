//! # cavern_gen
//!
//! Generates one cave level and writes it as JSON.
//!
//! ```bash
//! # Defaults, summary only
//! cavern_gen --preview
//!
//! # TOML config with overrides, export to a file
//! cavern_gen --config cave.toml --seed test --fill 48 --output level.json
//!
//! # More detail
//! RUST_LOG=cavern_procedural=debug cavern_gen --random-seed
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cavern::procedural::{GeneratorConfig, GeometryMode, LevelBuilder};
use cavern::LevelExport;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Geometry built from the outlines.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// 2D edge colliders only
    Colliders,
    /// Extruded wall mesh only
    Walls,
    /// Colliders and walls
    Both,
}

impl From<Mode> for GeometryMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Colliders => Self::Colliders,
            Mode::Walls => Self::Walls,
            Mode::Both => Self::Both,
        }
    }
}

/// CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML generator config; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map width in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Map height in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Seed string
    #[arg(short, long)]
    seed: Option<String>,

    /// Derive the seed from the clock
    #[arg(long)]
    random_seed: bool,

    /// Initial wall percentage (0-100)
    #[arg(short, long)]
    fill: Option<u32>,

    /// Wall regions smaller than this are removed
    #[arg(long)]
    min_pillar: Option<usize>,

    /// Open regions smaller than this are filled
    #[arg(long)]
    min_cave: Option<usize>,

    /// Outline geometry to build
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// JSON output path; use "-" for stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the final grid as #/. rows
    #[arg(short, long)]
    preview: bool,
}

impl Args {
    /// Loads the base config and applies command-line overrides.
    fn generator_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(seed) = &self.seed {
            config.seed.clone_from(seed);
        }
        if self.random_seed {
            config.use_random_seed = true;
        }
        if let Some(fill) = self.fill {
            config.random_fill_percent = fill;
        }
        if let Some(min_pillar) = self.min_pillar {
            config.minimum_pillar_size = min_pillar;
        }
        if let Some(min_cave) = self.min_cave {
            config.minimum_cave_size = min_cave;
        }
        if let Some(mode) = self.mode {
            config.geometry = mode.into();
        }
        Ok(config)
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn write_export(export: &LevelExport, path: &Path) -> Result<()> {
    if path.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        export.write_json(&mut out).context("writing JSON to stdout")?;
        writeln!(out)?;
        return Ok(());
    }

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    export
        .write_json(&mut writer)
        .with_context(|| format!("writing {}", path.display()))?;
    writer.flush()?;
    tracing::info!(path = %path.display(), "level exported");
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = args.generator_config()?;
    let builder = LevelBuilder::new(config).context("invalid generator config")?;
    let level = builder.generate().context("level generation failed")?;

    if args.preview {
        print!("{}", level.grid.to_ascii());
    }
    if let Some(path) = &args.output {
        let export = LevelExport::from_level(&level).context("building level export")?;
        write_export(&export, path)?;
    }
    Ok(())
}
