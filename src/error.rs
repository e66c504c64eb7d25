//! Error types
//!
//! Fatal generation errors and level-data loading errors. Soft conditions
//! (degraded routes, doorless rooms) are reported through
//! `GenerationStats` instead.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors surfaced by the dungeon builder
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Contradictory configuration, rejected before any work is done
    #[error("invalid dungeon configuration: {0}")]
    Configuration(String),

    /// Partitioning kept producing too few rooms, even after re-seeded
    /// retries and widened split depth
    #[error("generated only {found} rooms after {attempts} attempts, need at least {required}")]
    InsufficientRooms {
        found: usize,
        required: usize,
        attempts: u32,
    },
}

/// Errors from loading a level library document
#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unsupported level file extension: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid level definition `{id}`: {message}")]
    Invalid { id: String, message: String },

    #[error("unknown level id `{0}`")]
    UnknownLevel(String),
}
