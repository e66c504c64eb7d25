//! Door placement
//!
//! After routing, every corridor that crosses a room boundary leaves a
//! corridor tile on the ring just outside the room rectangle. Those
//! crossing tiles become doors. A room with no detected crossing is
//! counted, not treated as an error.

use crate::world::grid::CARDINAL;
use crate::world::{Room, Tile, TileGrid};

/// Door placement outcome for the generation stats
#[derive(Debug, Default, Clone, Copy)]
pub struct DoorReport {
    pub doors: usize,
    pub doorless_rooms: usize,
}

pub struct DoorPlacer;

impl DoorPlacer {
    /// Convert boundary-crossing corridor tiles to doors, per room
    pub fn place_doors(rooms: &[Room], grid: &mut TileGrid) -> DoorReport {
        let mut report = DoorReport::default();
        for room in rooms {
            let placed = Self::place_for_room(room, grid);
            report.doors += placed;
            if placed == 0 {
                log::warn!("room {} ({}) has no door", room.id, room.role.name());
                report.doorless_rooms += 1;
            }
        }
        report
    }

    fn place_for_room(room: &Room, grid: &mut TileGrid) -> usize {
        let mut placed = 0;
        for (x, y) in perimeter_ring(room) {
            if grid.get(x, y) != Tile::Corridor {
                continue;
            }
            // A crossing touches the room's own floor cardinally
            let touches_room = CARDINAL.iter().any(|&(dx, dy)| {
                room.contains(x + dx, y + dy) && grid.is_passable(x + dx, y + dy)
            });
            if touches_room {
                grid.set(x, y, Tile::Door);
                placed += 1;
            }
        }
        placed
    }
}

/// The one-tile ring just outside a room rectangle
fn perimeter_ring(room: &Room) -> Vec<(i32, i32)> {
    let mut ring = Vec::with_capacity(2 * (room.width + room.height) as usize + 4);
    let (x0, y0) = (room.x - 1, room.y - 1);
    let (x1, y1) = (room.x + room.width, room.y + room.height);
    for x in x0..=x1 {
        ring.push((x, y0));
        ring.push((x, y1));
    }
    for y in y0 + 1..y1 {
        ring.push((x0, y));
        ring.push((x1, y));
    }
    ring
}
