//! Configuration
//!
//! Generation parameters, validation, and the external level-definition
//! documents consumed by the builder.

pub mod levels;

use serde::{Deserialize, Serialize};

pub use levels::{LevelDef, LevelKind, LevelLibrary, MonsterEntry, MonsterPool};

/// Heuristic used by the corridor router's A* search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathHeuristic {
    Manhattan,
    Euclidean,
}

/// All parameters steering one dungeon generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Grid width in tiles
    pub grid_width: i32,
    /// Grid height in tiles
    pub grid_height: i32,

    /// Smallest allowed room side
    pub min_room_size: i32,
    /// Largest allowed room side
    pub max_room_size: i32,
    /// Empty ring kept around every room
    pub padding: i32,

    /// Maximum recursion depth of the space partitioner
    pub max_depth: u32,
    /// Smallest side of a partition leaf
    pub min_leaf_size: i32,

    /// Fewest rooms an accepted layout may have
    pub min_rooms: usize,
    /// Most rooms kept from a layout; extra leaves stay empty
    pub max_rooms: usize,

    /// Corridor width in tiles
    pub corridor_width: i32,
    /// Fraction of non-tree edges added back as loops
    pub extra_edge_ratio: f64,

    /// Weight of the Monster role in the random pool
    pub monster_ratio: f64,
    /// Weight of the Trap role in the random pool
    pub trap_ratio: f64,
    /// Weight of the Reward role in the random pool
    pub reward_ratio: f64,

    /// Make the farthest room a Boss room instead of a plain End room
    pub boss_end: bool,

    /// Lobby room dimensions for the lobby build variant
    pub lobby_width: i32,
    pub lobby_height: i32,

    pub heuristic: PathHeuristic,
    /// Allow 8-directional corridor routing
    pub diagonal_corridors: bool,

    /// Re-partition attempts before giving up
    pub max_retries: u32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            grid_width: 120,
            grid_height: 100,
            min_room_size: 8,
            max_room_size: 20,
            padding: 2,
            max_depth: 6,
            min_leaf_size: 12,
            min_rooms: 5,
            max_rooms: 40,
            corridor_width: 2,
            extra_edge_ratio: 0.1,
            monster_ratio: 0.8,
            trap_ratio: 0.1,
            reward_ratio: 0.1,
            boss_end: false,
            lobby_width: 30,
            lobby_height: 20,
            heuristic: PathHeuristic::Manhattan,
            diagonal_corridors: false,
            max_retries: 8,
        }
    }
}

impl DungeonConfig {
    /// Check the configuration for contradictions.
    ///
    /// Returns the first problem found; a failing config is a fatal
    /// error and is never retried.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width <= 0 || self.grid_height <= 0 {
            return Err("grid dimensions must be positive".into());
        }
        if self.min_room_size <= 0 {
            return Err("min_room_size must be positive".into());
        }
        if self.max_room_size < self.min_room_size {
            return Err(format!(
                "max_room_size {} is smaller than min_room_size {}",
                self.max_room_size, self.min_room_size
            ));
        }
        if self.padding < 0 {
            return Err("padding cannot be negative".into());
        }
        if self.min_room_size + 2 * self.padding > self.min_leaf_size {
            return Err(format!(
                "min_room_size {} + 2*padding {} exceeds min_leaf_size {}; no leaf can host a room",
                self.min_room_size, self.padding, self.min_leaf_size
            ));
        }
        if self.grid_width < self.min_leaf_size || self.grid_height < self.min_leaf_size {
            return Err("grid is smaller than a single partition leaf".into());
        }
        if self.corridor_width < 1 {
            return Err("corridor_width must be at least 1".into());
        }
        if self.min_rooms == 0 || self.max_rooms < self.min_rooms {
            return Err("room count range is empty".into());
        }
        if !(0.0..=1.0).contains(&self.extra_edge_ratio) {
            return Err("extra_edge_ratio must lie in [0, 1]".into());
        }
        let ratio_sum = self.monster_ratio + self.trap_ratio + self.reward_ratio;
        if !(0.99..=1.01).contains(&ratio_sum) {
            return Err(format!("role ratios must sum to 1.0, got {:.2}", ratio_sum));
        }
        if [self.monster_ratio, self.trap_ratio, self.reward_ratio]
            .iter()
            .any(|r| !(0.0..=1.0).contains(r))
        {
            return Err("role ratios must lie in [0, 1]".into());
        }
        if self.lobby_width <= 0 || self.lobby_height <= 0 {
            return Err("lobby dimensions must be positive".into());
        }
        Ok(())
    }

    /// Small grid, shallow partition
    pub fn small() -> Self {
        Self {
            grid_width: 60,
            grid_height: 60,
            min_room_size: 6,
            max_room_size: 12,
            max_depth: 4,
            min_leaf_size: 10,
            padding: 1,
            max_rooms: 16,
            ..Self::default()
        }
    }

    /// Large grid, deep partition
    pub fn large() -> Self {
        Self {
            grid_width: 200,
            grid_height: 150,
            max_depth: 8,
            max_rooms: 64,
            ..Self::default()
        }
    }

    /// Extra loop edges for a more connected layout
    pub fn dense() -> Self {
        Self {
            extra_edge_ratio: 0.3,
            max_depth: 7,
            ..Self::default()
        }
    }
}
