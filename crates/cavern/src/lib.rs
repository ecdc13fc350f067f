//! # CAVERN
//!
//! Front-end crate: re-exports the generator and turns finished levels into
//! a serde document for hosts and tools.
//!
//! ## Modules
//!
//! - `export`: [`LevelExport`] JSON document
//!
//! The `cavern_gen` binary wires these to the command line.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod export;

// Re-export the generator crates
pub use cavern_procedural as procedural;
pub use cavern_shared as shared;

pub use export::{LevelExport, PassageRecord, RoomSummary, WallExport};
