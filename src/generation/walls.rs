//! Wall normalization
//!
//! Final pass over the grid: grow a wall shell around everything
//! walkable, then assign each wall a directional variant from its
//! 8-neighborhood. Pure function of the tile layout and idempotent.

use crate::world::{Tile, TileGrid, WallKind};

pub struct WallNormalizer;

impl WallNormalizer {
    /// Seal and classify walls in place
    pub fn normalize(grid: &mut TileGrid) {
        Self::seal(grid);
        Self::classify_all(grid);
    }

    /// Void tiles touching anything walkable (8-connected) become walls
    fn seal(grid: &mut TileGrid) {
        let to_wall = grid.positions_where(|t| t == Tile::Void);
        for (x, y) in to_wall {
            if grid.any_neighbor8(x, y, |t| t.is_walkable()) {
                grid.set(x, y, Tile::Wall(WallKind::Solid));
            }
        }
    }

    fn classify_all(grid: &mut TileGrid) {
        let walls = grid.positions_where(|t| t.is_wall());
        for (x, y) in walls {
            let kind = Self::classify(grid, x, y);
            grid.set(x, y, Tile::Wall(kind));
        }
    }

    /// Variant lookup from the walkability of the 8 neighbors.
    ///
    /// - one open cardinal side: straight wall named after that side
    /// - two adjacent open cardinal sides: concave inner corner
    /// - two opposite open sides (one-tile partition): straight wall,
    ///   north/east taking precedence
    /// - no open cardinal but an open diagonal: convex outer corner,
    ///   first match in SE, SW, NE, NW order
    /// - three or more open sides, or nothing open: solid block
    fn classify(grid: &TileGrid, x: i32, y: i32) -> WallKind {
        let open = |dx: i32, dy: i32| grid.get(x + dx, y + dy).is_walkable();
        let [n, e, s, w] = [open(0, -1), open(1, 0), open(0, 1), open(-1, 0)];

        match (n, e, s, w) {
            (true, false, false, false) => WallKind::North,
            (false, true, false, false) => WallKind::East,
            (false, false, true, false) => WallKind::South,
            (false, false, false, true) => WallKind::West,
            (true, true, false, false) => WallKind::InnerNorthEast,
            (false, true, true, false) => WallKind::InnerSouthEast,
            (false, false, true, true) => WallKind::InnerSouthWest,
            (true, false, false, true) => WallKind::InnerNorthWest,
            (true, false, true, false) => WallKind::North,
            (false, true, false, true) => WallKind::East,
            (false, false, false, false) => {
                let [ne, se, sw, nw] = [open(1, -1), open(1, 1), open(-1, 1), open(-1, -1)];
                if se {
                    WallKind::OuterSouthEast
                } else if sw {
                    WallKind::OuterSouthWest
                } else if ne {
                    WallKind::OuterNorthEast
                } else if nw {
                    WallKind::OuterNorthWest
                } else {
                    WallKind::Solid
                }
            }
            _ => WallKind::Solid,
        }
    }
}

/// Number of wall tiles currently on the grid
pub fn wall_count(grid: &TileGrid) -> usize {
    grid.count_where(|t| t.is_wall())
}
