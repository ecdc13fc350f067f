//! # CAVERN Shared
//!
//! Plain data handed from the level generator to the host renderer and
//! physics engine.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - a GPU or windowing crate
//! - a physics engine
//!
//! The host turns these buffers into drawable and collidable objects.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{
    DEFAULT_BORDER_SIZE, DEFAULT_CELL_SIZE, DEFAULT_PASSAGE_RADIUS, DEFAULT_SMOOTHING_PASSES,
    DEFAULT_WALL_HEIGHT, MAX_BORDER_SIZE, MAX_PASSAGE_RADIUS,
};
pub use math::{Vec2, Vec3};
