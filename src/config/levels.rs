//! Level definitions
//!
//! External level-configuration documents: a library of level entries
//! keyed by dungeon id, each carrying the generation parameters and the
//! monster pool downstream spawning draws from. Loads JSON or RON, with
//! hardcoded defaults as fallback.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::DungeonConfig;
use crate::error::LevelLoadError;

/// Which build variant a level uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    /// Full BSP pipeline
    Standard,
    /// Single centered lobby room, no partitioning
    Lobby,
    /// Full pipeline with a Boss room at the far end
    Boss,
}

/// One monster type in a level's spawn pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterEntry {
    pub name: String,
    /// Fewest spawned per monster room
    #[serde(default = "default_min_count")]
    pub min_count: u32,
    /// Most spawned per monster room
    #[serde(default = "default_max_count")]
    pub max_count: u32,
    #[serde(default = "default_multiplier")]
    pub health_multiplier: f64,
    #[serde(default = "default_multiplier")]
    pub damage_multiplier: f64,
    /// Relative pick weight within the pool
    #[serde(default = "default_multiplier")]
    pub spawn_weight: f64,
}

fn default_min_count() -> u32 {
    1
}

fn default_max_count() -> u32 {
    3
}

fn default_multiplier() -> f64 {
    1.0
}

impl MonsterEntry {
    fn validate(&self) -> Result<(), String> {
        if self.max_count < self.min_count {
            return Err(format!("monster {}: max_count < min_count", self.name));
        }
        if self.health_multiplier <= 0.0 || self.damage_multiplier <= 0.0 {
            return Err(format!("monster {}: multipliers must be positive", self.name));
        }
        if self.spawn_weight < 0.0 {
            return Err(format!("monster {}: spawn_weight cannot be negative", self.name));
        }
        Ok(())
    }
}

/// All monsters a level can spawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterPool {
    pub monsters: Vec<MonsterEntry>,
    /// Scales the monster count of every monster room
    #[serde(default = "default_multiplier")]
    pub total_multiplier: f64,
}

impl MonsterPool {
    fn validate(&self) -> Result<(), String> {
        if self.monsters.is_empty() {
            return Err("monster pool is empty".into());
        }
        if self.total_multiplier <= 0.0 {
            return Err("total_multiplier must be positive".into());
        }
        for monster in &self.monsters {
            monster.validate()?;
        }
        if self.monsters.iter().map(|m| m.spawn_weight).sum::<f64>() <= 0.0 {
            return Err("monster spawn weights sum to zero".into());
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&MonsterEntry> {
        self.monsters.iter().find(|m| m.name == name)
    }
}

/// One level entry in the library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: LevelKind,
    #[serde(default)]
    pub dungeon: DungeonConfig,
    pub monsters: MonsterPool,
}

fn default_kind() -> LevelKind {
    LevelKind::Standard
}

impl LevelDef {
    pub fn validate(&self) -> Result<(), String> {
        self.dungeon.validate()?;
        self.monsters.validate()
    }
}

/// The set of level definitions keyed by dungeon id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelLibrary {
    pub levels: BTreeMap<String, LevelDef>,
}

impl LevelLibrary {
    /// Load and validate a library from a `.json` or `.ron` document
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelLoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| LevelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let library: LevelLibrary = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content).map_err(|e| LevelLoadError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
            Some("ron") => ron::from_str(&content).map_err(|e| LevelLoadError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
            _ => {
                return Err(LevelLoadError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        library.validate()?;
        Ok(library)
    }

    /// Load from disk, or fall back to the built-in defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(library) => library,
            Err(e) => {
                log::warn!("falling back to default levels: {}", e);
                Self::default_library()
            }
        }
    }

    pub fn validate(&self) -> Result<(), LevelLoadError> {
        for (id, level) in &self.levels {
            level.validate().map_err(|message| LevelLoadError::Invalid {
                id: id.clone(),
                message,
            })?;
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&LevelDef, LevelLoadError> {
        self.levels
            .get(id)
            .ok_or_else(|| LevelLoadError::UnknownLevel(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }

    /// Built-in library used when no document is available
    pub fn default_library() -> Self {
        let mut levels = BTreeMap::new();

        levels.insert(
            "catacombs".to_string(),
            LevelDef {
                name: "Catacombs".to_string(),
                kind: LevelKind::Standard,
                dungeon: DungeonConfig::default(),
                monsters: MonsterPool {
                    monsters: vec![
                        MonsterEntry {
                            name: "slime".to_string(),
                            min_count: 1,
                            max_count: 4,
                            health_multiplier: 1.0,
                            damage_multiplier: 1.0,
                            spawn_weight: 3.0,
                        },
                        MonsterEntry {
                            name: "skeleton".to_string(),
                            min_count: 1,
                            max_count: 2,
                            health_multiplier: 1.2,
                            damage_multiplier: 1.1,
                            spawn_weight: 1.0,
                        },
                    ],
                    total_multiplier: 1.0,
                },
            },
        );

        levels.insert(
            "sanctum".to_string(),
            LevelDef {
                name: "Sanctum".to_string(),
                kind: LevelKind::Boss,
                dungeon: DungeonConfig {
                    boss_end: true,
                    ..DungeonConfig::default()
                },
                monsters: MonsterPool {
                    monsters: vec![MonsterEntry {
                        name: "cultist".to_string(),
                        min_count: 2,
                        max_count: 5,
                        health_multiplier: 1.5,
                        damage_multiplier: 1.3,
                        spawn_weight: 1.0,
                    }],
                    total_multiplier: 1.2,
                },
            },
        );

        levels.insert(
            "lobby".to_string(),
            LevelDef {
                name: "Lobby".to_string(),
                kind: LevelKind::Lobby,
                dungeon: DungeonConfig::default(),
                monsters: MonsterPool {
                    monsters: vec![MonsterEntry {
                        name: "dummy".to_string(),
                        min_count: 1,
                        max_count: 1,
                        health_multiplier: 1.0,
                        damage_multiplier: 0.0,
                        spawn_weight: 1.0,
                    }],
                    total_multiplier: 1.0,
                },
            },
        );

        Self { levels }
    }

    /// Write the built-in defaults out for hand editing
    pub fn export_defaults(path: impl AsRef<Path>) -> Result<(), LevelLoadError> {
        let path = path.as_ref();
        let library = Self::default_library();
        let content = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => {
                serde_json::to_string_pretty(&library).map_err(|e| LevelLoadError::Parse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?
            }
            Some("ron") => ron::ser::to_string_pretty(&library, ron::ser::PrettyConfig::default())
                .map_err(|e| LevelLoadError::Parse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?,
            _ => {
                return Err(LevelLoadError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        fs::write(path, content).map_err(|source| LevelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
