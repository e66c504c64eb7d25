//! Grid pathfinding
//!
//! A* search used by the corridor router. Costs are per-tile carve
//! costs rather than passability: open space is cheap, existing
//! corridors cheaper, room interiors expensive and walls close to
//! prohibitive, so routes prefer open ground but can always complete.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::config::PathHeuristic;
use crate::world::grid::{CARDINAL, DIAGONAL};
use crate::world::{Tile, TileGrid};

/// Carve cost of stepping onto a tile
pub fn carve_cost(tile: Tile) -> f64 {
    match tile {
        Tile::Void => 1.0,
        Tile::Corridor | Tile::Door => 0.5,
        Tile::Floor | Tile::Portal | Tile::Spawn(_) => 8.0,
        Tile::Wall(_) => 1000.0,
    }
}

/// Open-set entry; ordered so the heap pops the lowest f-score first,
/// ties resolved by insertion order.
struct OpenNode {
    f: f64,
    seq: u64,
    pos: (i32, i32),
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        other
            .f
            .total_cmp(&self.f)
            .then(other.seq.cmp(&self.seq))
    }
}

/// A* search over the level grid
pub struct AStar<'g> {
    grid: &'g TileGrid,
    heuristic: PathHeuristic,
    diagonal: bool,
}

impl<'g> AStar<'g> {
    pub fn new(grid: &'g TileGrid, heuristic: PathHeuristic, diagonal: bool) -> Self {
        Self {
            grid,
            heuristic,
            diagonal,
        }
    }

    fn h(&self, a: (i32, i32), b: (i32, i32)) -> f64 {
        let (dx, dy) = ((a.0 - b.0).abs() as f64, (a.1 - b.1).abs() as f64);
        match self.heuristic {
            PathHeuristic::Manhattan => dx + dy,
            PathHeuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
        }
    }

    /// Shortest path from `start` to `end`, both inclusive.
    ///
    /// `None` only when an endpoint lies outside the grid.
    pub fn find_path(&self, start: (i32, i32), end: (i32, i32)) -> Option<Vec<(i32, i32)>> {
        if !self.grid.in_bounds(start.0, start.1) || !self.grid.in_bounds(end.0, end.1) {
            return None;
        }

        let width = self.grid.width();
        let cells = (width * self.grid.height()) as usize;
        let idx = |(x, y): (i32, i32)| (y * width + x) as usize;

        let mut g = vec![f64::INFINITY; cells];
        let mut came_from: Vec<Option<(i32, i32)>> = vec![None; cells];
        let mut open = BinaryHeap::new();
        let mut seq = 0u64;

        g[idx(start)] = 0.0;
        open.push(OpenNode {
            f: self.h(start, end),
            seq,
            pos: start,
        });

        let all_steps = [
            CARDINAL[0], CARDINAL[1], CARDINAL[2], CARDINAL[3],
            DIAGONAL[0], DIAGONAL[1], DIAGONAL[2], DIAGONAL[3],
        ];
        let steps = if self.diagonal {
            &all_steps[..]
        } else {
            &all_steps[..4]
        };

        while let Some(OpenNode { pos, .. }) = open.pop() {
            if pos == end {
                return Some(self.reconstruct(&came_from, idx, pos));
            }

            for &(dx, dy) in steps {
                let next = (pos.0 + dx, pos.1 + dy);
                if !self.grid.in_bounds(next.0, next.1) {
                    continue;
                }
                let tentative = g[idx(pos)] + carve_cost(self.grid.get(next.0, next.1));
                if tentative < g[idx(next)] {
                    g[idx(next)] = tentative;
                    came_from[idx(next)] = Some(pos);
                    seq += 1;
                    open.push(OpenNode {
                        f: tentative + self.h(next, end),
                        seq,
                        pos: next,
                    });
                }
            }
        }
        None
    }

    fn reconstruct(
        &self,
        came_from: &[Option<(i32, i32)>],
        idx: impl Fn((i32, i32)) -> usize,
        end: (i32, i32),
    ) -> Vec<(i32, i32)> {
        let mut path = vec![end];
        let mut current = end;
        while let Some(prev) = came_from[idx(current)] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WallKind;

    fn astar(grid: &TileGrid) -> AStar<'_> {
        AStar::new(grid, PathHeuristic::Manhattan, false)
    }

    #[test]
    fn test_straight_path_over_void() {
        let grid = TileGrid::new(10, 10);
        let path = astar(&grid).find_path((1, 1), (8, 1)).unwrap();
        assert_eq!(path.first(), Some(&(1, 1)));
        assert_eq!(path.last(), Some(&(8, 1)));
        assert_eq!(path.len(), 8);
    }

    #[test]
    fn test_path_steps_are_adjacent() {
        let grid = TileGrid::new(12, 12);
        let path = astar(&grid).find_path((2, 3), (9, 10)).unwrap();
        for pair in path.windows(2) {
            let d = (pair[0].0 - pair[1].0).abs() + (pair[0].1 - pair[1].1).abs();
            assert_eq!(d, 1);
        }
    }

    #[test]
    fn test_avoids_expensive_room_floor() {
        let mut grid = TileGrid::new(9, 5);
        // Floor stripe across the middle, with open rows above and below
        for x in 3..6 {
            for y in 0..5 {
                grid.set(x, y, Tile::Floor);
            }
        }
        grid.set(3, 2, Tile::Void);
        grid.set(4, 2, Tile::Void);
        grid.set(5, 2, Tile::Void);

        let path = astar(&grid).find_path((0, 0), (8, 0)).unwrap();
        // The detour through the void gap beats crossing the floor rows
        assert!(path.contains(&(4, 2)));
    }

    #[test]
    fn test_walls_crossed_only_as_last_resort() {
        let mut grid = TileGrid::new(7, 3);
        for y in 0..3 {
            grid.set(3, y, Tile::Wall(WallKind::Solid));
        }
        let path = astar(&grid).find_path((0, 1), (6, 1)).unwrap();
        // No way around, so exactly one wall tile is on the path
        let walls = path.iter().filter(|&&(x, _)| x == 3).count();
        assert_eq!(walls, 1);
    }

    #[test]
    fn test_out_of_bounds_endpoint() {
        let grid = TileGrid::new(5, 5);
        assert!(astar(&grid).find_path((0, 0), (5, 5)).is_none());
        assert!(astar(&grid).find_path((-1, 0), (2, 2)).is_none());
    }

    #[test]
    fn test_deterministic_path() {
        let grid = TileGrid::new(20, 20);
        let a = astar(&grid).find_path((1, 1), (18, 17)).unwrap();
        let b = astar(&grid).find_path((1, 1), (18, 17)).unwrap();
        assert_eq!(a, b);
    }
}
