//! Generation pipeline
//!
//! One module per stage, orchestrated by the builder: space
//! partitioning, room placement, role assignment, connectivity,
//! corridor routing, door placement and wall normalization.

pub mod bsp;
pub mod builder;
pub mod corridors;
pub mod doors;
pub mod graph;
pub mod pathfinding;
pub mod placer;
pub mod roles;
pub mod walls;

pub use bsp::{PartitionNode, SpacePartitioner};
pub use builder::{BuildState, Dungeon, DungeonBuilder, GenerationStats};
pub use corridors::CorridorRouter;
pub use doors::DoorPlacer;
pub use graph::{Edge, UnionFind};
pub use pathfinding::AStar;
pub use placer::RoomPlacer;
pub use roles::RoleAssigner;
pub use walls::WallNormalizer;
