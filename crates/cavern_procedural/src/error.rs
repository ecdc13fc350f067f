//! # Generation Error Types
//!
//! All errors that can occur while generating a level.

use thiserror::Error;

/// Errors that can occur in the generation pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaveError {
    /// A generator parameter violates its precondition.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The TOML config could not be parsed.
    #[error("failed to parse config: {0}")]
    ConfigParse(String),

    /// Reading a config file failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// A passage endpoint lies outside the grid.
    #[error("passage endpoint ({x}, {y}) outside {width}x{height} grid")]
    CorridorOutOfBounds {
        /// Endpoint X.
        x: i32,
        /// Endpoint Y.
        y: i32,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// Mesh or room bookkeeping reached a state that should be impossible.
    #[error("broken invariant: {0}")]
    BrokenInvariant(String),
}

impl From<std::io::Error> for CaveError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<toml::de::Error> for CaveError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}

/// Result type for generation operations.
pub type CaveResult<T> = Result<T, CaveError>;
