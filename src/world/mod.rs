//! World module
//!
//! Tile symbols, the shared tile grid and placed rooms.

pub mod grid;
pub mod room;
pub mod tile;

pub use grid::TileGrid;
pub use room::{Connection, ConnectionKind, Room, RoomRole};
pub use tile::{SpawnKind, Tile, WallKind};
