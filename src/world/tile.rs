//! Tile definitions
//!
//! The closed set of tile symbols a generated level is made of.

use serde::{Deserialize, Serialize};

/// One cell of the level grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Unused space outside rooms and corridors
    Void,
    /// Room interior floor
    Floor,
    /// Carved corridor floor
    Corridor,
    /// Boundary crossing between a room and a corridor
    Door,
    /// Level exit, placed at the center of the End room
    Portal,
    /// Floor carrying an entity spawn marker
    Spawn(SpawnKind),
    /// Wall, with a directional variant for rendering
    Wall(WallKind),
}

/// What gets spawned on a marked floor tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnKind {
    Player,
    Monster,
    Trap,
    Treasure,
    Npc,
    Boss,
}

/// Directional wall variants assigned by the wall normalizer
///
/// Straight variants are named after the side the adjacent floor is on.
/// `Outer*` corners touch floor only on the named diagonal; `Inner*`
/// corners touch floor on the two named cardinal sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallKind {
    Solid,
    North,
    South,
    East,
    West,
    OuterNorthWest,
    OuterNorthEast,
    OuterSouthWest,
    OuterSouthEast,
    InnerNorthWest,
    InnerNorthEast,
    InnerSouthWest,
    InnerSouthEast,
}

impl Tile {
    /// Can an entity stand on this tile?
    pub fn is_walkable(&self) -> bool {
        matches!(
            self,
            Tile::Floor | Tile::Corridor | Tile::Door | Tile::Portal | Tile::Spawn(_)
        )
    }

    /// Does this tile block line of sight?
    pub fn is_opaque(&self) -> bool {
        matches!(self, Tile::Wall(_) | Tile::Door)
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Tile::Wall(_))
    }

    /// Display glyph for the terminal preview
    pub fn glyph(&self) -> char {
        match self {
            Tile::Void => ' ',
            Tile::Floor => '.',
            Tile::Corridor => ',',
            Tile::Door => '+',
            Tile::Portal => '>',
            Tile::Spawn(SpawnKind::Player) => '@',
            Tile::Spawn(SpawnKind::Monster) => 'm',
            Tile::Spawn(SpawnKind::Trap) => '^',
            Tile::Spawn(SpawnKind::Treasure) => '$',
            Tile::Spawn(SpawnKind::Npc) => 'n',
            Tile::Spawn(SpawnKind::Boss) => 'B',
            Tile::Wall(_) => '#',
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Void
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walkability() {
        assert!(Tile::Floor.is_walkable());
        assert!(Tile::Corridor.is_walkable());
        assert!(Tile::Door.is_walkable());
        assert!(Tile::Spawn(SpawnKind::Monster).is_walkable());
        assert!(!Tile::Void.is_walkable());
        assert!(!Tile::Wall(WallKind::Solid).is_walkable());
    }

    #[test]
    fn test_opacity() {
        assert!(Tile::Wall(WallKind::North).is_opaque());
        assert!(!Tile::Floor.is_opaque());
    }
}
