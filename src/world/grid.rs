//! Tile grid
//!
//! The 2D array of tile symbols shared by every generation stage; the
//! single source of truth for passability.

use serde::{Deserialize, Serialize};

use super::tile::Tile;

/// Cardinal neighbor offsets
pub const CARDINAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Diagonal neighbor offsets
pub const DIAGONAL: [(i32, i32); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];

/// Fixed-size 2D grid of tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Create a grid filled with `Tile::Void`
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Void; (width * height).max(0) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    #[inline]
    fn idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Tile at position; `Void` outside the grid
    pub fn get(&self, x: i32, y: i32) -> Tile {
        if self.in_bounds(x, y) {
            self.tiles[self.idx(x, y)]
        } else {
            Tile::Void
        }
    }

    /// Set a tile; writes outside the grid are ignored
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            let idx = self.idx(x, y);
            self.tiles[idx] = tile;
        }
    }

    /// Passability query used by movement and collision logic
    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_walkable()
    }

    /// Iterate over all `(x, y, tile)` cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, Tile)> + '_ {
        self.tiles.iter().enumerate().map(|(i, &t)| {
            let i = i as i32;
            (i % self.width, i / self.width, t)
        })
    }

    /// Count tiles matching a predicate
    pub fn count_where(&self, pred: impl Fn(Tile) -> bool) -> usize {
        self.tiles.iter().filter(|&&t| pred(t)).count()
    }

    /// Positions of all tiles matching a predicate, row-major order
    pub fn positions_where(&self, pred: impl Fn(Tile) -> bool) -> Vec<(i32, i32)> {
        self.iter()
            .filter(|&(_, _, t)| pred(t))
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    /// Does any of the 8 neighbors match the predicate?
    pub fn any_neighbor8(&self, x: i32, y: i32, pred: impl Fn(Tile) -> bool) -> bool {
        CARDINAL
            .iter()
            .chain(DIAGONAL.iter())
            .any(|&(dx, dy)| pred(self.get(x + dx, y + dy)))
    }

    /// Flood fill over walkable tiles, 4-connected, starting at `start`.
    ///
    /// Returns every reachable walkable position. Used for the global
    /// connectivity audit after generation.
    pub fn flood_fill(&self, start: (i32, i32)) -> Vec<(i32, i32)> {
        let mut reached = Vec::new();
        if !self.is_passable(start.0, start.1) {
            return reached;
        }

        let mut visited = vec![false; self.tiles.len()];
        let mut queue = std::collections::VecDeque::new();
        visited[self.idx(start.0, start.1)] = true;
        queue.push_back(start);

        while let Some((x, y)) = queue.pop_front() {
            reached.push((x, y));
            for (dx, dy) in CARDINAL {
                let (nx, ny) = (x + dx, y + dy);
                if self.in_bounds(nx, ny)
                    && !visited[self.idx(nx, ny)]
                    && self.is_passable(nx, ny)
                {
                    visited[self.idx(nx, ny)] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
        reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tile::WallKind;

    #[test]
    fn test_new_grid_is_void() {
        let grid = TileGrid::new(10, 8);
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 8);
        assert!(grid.iter().all(|(_, _, t)| t == Tile::Void));
    }

    #[test]
    fn test_out_of_bounds_reads_void() {
        let grid = TileGrid::new(4, 4);
        assert_eq!(grid.get(-1, 0), Tile::Void);
        assert_eq!(grid.get(4, 4), Tile::Void);
    }

    #[test]
    fn test_out_of_bounds_writes_ignored() {
        let mut grid = TileGrid::new(4, 4);
        grid.set(10, 10, Tile::Floor);
        assert_eq!(grid.count_where(|t| t == Tile::Floor), 0);
    }

    #[test]
    fn test_flood_fill_stops_at_walls() {
        let mut grid = TileGrid::new(7, 3);
        for x in 0..7 {
            grid.set(x, 1, Tile::Floor);
        }
        grid.set(3, 1, Tile::Wall(WallKind::Solid));

        let reached = grid.flood_fill((0, 1));
        assert_eq!(reached.len(), 3);
        assert!(!reached.contains(&(4, 1)));
    }

    #[test]
    fn test_flood_fill_passes_doors() {
        let mut grid = TileGrid::new(5, 1);
        grid.set(0, 0, Tile::Floor);
        grid.set(1, 0, Tile::Door);
        grid.set(2, 0, Tile::Corridor);

        let reached = grid.flood_fill((0, 0));
        assert_eq!(reached.len(), 3);
    }
}
