//! Emberdelve - deterministic dungeon level generator
//!
//! Builds playable dungeon levels from a configuration and a seed:
//! BSP space partitioning, room placement and roles, minimum-spanning-tree
//! connectivity, A* corridor carving, doors and wall normalization.

pub mod config;
pub mod error;
pub mod generation;
pub mod world;

// Re-export commonly used types
pub use config::{DungeonConfig, LevelDef, LevelKind, LevelLibrary};
pub use error::{GenerationError, LevelLoadError};
pub use generation::{Dungeon, DungeonBuilder, GenerationStats};
pub use world::{Room, RoomRole, Tile, TileGrid};
