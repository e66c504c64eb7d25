//! Corridor routing
//!
//! Carves a passable connection for every selected graph edge: A* from
//! a boundary point of one room to the other, widened to the configured
//! corridor width. A failed search falls back to a straight L-shaped
//! carve between the room centers and is reported as degraded.

use crate::config::DungeonConfig;
use crate::world::{ConnectionKind, Room, Tile, TileGrid};

use super::graph::Edge;
use super::pathfinding::AStar;

/// What routing did to the grid, folded into the generation stats
#[derive(Debug, Default, Clone, Copy)]
pub struct RoutingReport {
    /// Tiles converted from Void to Corridor
    pub corridor_tiles: usize,
    /// Edges routed by pathfinding
    pub routed: usize,
    /// Edges that needed the straight fallback carve
    pub degraded: usize,
}

pub struct CorridorRouter<'a> {
    config: &'a DungeonConfig,
}

impl<'a> CorridorRouter<'a> {
    pub fn new(config: &'a DungeonConfig) -> Self {
        Self { config }
    }

    /// Route every edge, recording connections on both rooms
    pub fn route_all(
        &self,
        rooms: &mut [Room],
        edges: &[(Edge, ConnectionKind)],
        grid: &mut TileGrid,
    ) -> RoutingReport {
        let mut report = RoutingReport::default();
        for (edge, kind) in edges {
            let (carved, degraded) = self.route(rooms, edge, grid);
            report.corridor_tiles += carved;
            if degraded {
                report.degraded += 1;
                rooms[edge.a].connect(edge.b, ConnectionKind::Fallback);
                rooms[edge.b].connect(edge.a, ConnectionKind::Fallback);
            } else {
                report.routed += 1;
                rooms[edge.a].connect(edge.b, *kind);
                rooms[edge.b].connect(edge.a, *kind);
            }
        }
        report
    }

    /// Carve one connection; returns (tiles carved, used fallback)
    fn route(&self, rooms: &[Room], edge: &Edge, grid: &mut TileGrid) -> (usize, bool) {
        let (room_a, room_b) = (&rooms[edge.a], &rooms[edge.b]);
        let start = boundary_point(room_a, room_b);
        let end = boundary_point(room_b, room_a);

        let astar = AStar::new(grid, self.config.heuristic, self.config.diagonal_corridors);
        match astar.find_path(start, end) {
            Some(path) => {
                let carved = self.carve_path(&path, grid);
                (carved, false)
            }
            None => {
                log::warn!(
                    "no route between rooms {} and {}, falling back to straight carve",
                    edge.a,
                    edge.b
                );
                let carved = self.carve_l(room_a.center(), room_b.center(), grid);
                (carved, true)
            }
        }
    }

    /// Widen the path to `corridor_width` and stamp it over Void
    fn carve_path(&self, path: &[(i32, i32)], grid: &mut TileGrid) -> usize {
        let mut carved = 0;
        for &(x, y) in path {
            carved += self.carve_brush(x, y, grid);
        }
        carved
    }

    fn carve_brush(&self, x: i32, y: i32, grid: &mut TileGrid) -> usize {
        let w = self.config.corridor_width;
        let off = (w - 1) / 2;
        let mut carved = 0;
        for dy in 0..w {
            for dx in 0..w {
                let (nx, ny) = (x + dx - off, y + dy - off);
                if grid.get(nx, ny) == Tile::Void {
                    grid.set(nx, ny, Tile::Corridor);
                    carved += 1;
                }
            }
        }
        carved
    }

    /// Straight horizontal-then-vertical carve between two centers
    fn carve_l(&self, a: (i32, i32), b: (i32, i32), grid: &mut TileGrid) -> usize {
        let mut carved = 0;
        let (ax, ay) = a;
        let (bx, by) = b;
        for x in ax.min(bx)..=ax.max(bx) {
            carved += self.carve_brush(x, ay, grid);
        }
        for y in ay.min(by)..=ay.max(by) {
            carved += self.carve_brush(bx, y, grid);
        }
        carved
    }
}

/// Point just inside `room`'s edge facing `target`
fn boundary_point(room: &Room, target: &Room) -> (i32, i32) {
    let (cx, cy) = room.center();
    let (tx, ty) = target.center();
    if (tx - cx).abs() > (ty - cy).abs() {
        let x = if tx > cx {
            room.x + room.width - 2
        } else {
            room.x + 1
        };
        (x, cy)
    } else {
        let y = if ty > cy {
            room.y + room.height - 2
        } else {
            room.y + 1
        };
        (cx, y)
    }
}
