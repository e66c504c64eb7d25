//! Room placement
//!
//! Turns partition leaves into room rectangles: shrink the leaf by the
//! configured padding, sample a size inside the room bounds, jitter the
//! position within the remaining slack.

use rand::rngs::StdRng;
use rand::Rng;

use super::bsp::PartitionNode;
use crate::config::DungeonConfig;
use crate::world::Room;

pub struct RoomPlacer<'a> {
    config: &'a DungeonConfig,
}

impl<'a> RoomPlacer<'a> {
    pub fn new(config: &'a DungeonConfig) -> Self {
        Self { config }
    }

    /// Place one room per leaf, in leaf order, up to `max_rooms`.
    ///
    /// Leaves whose padded interior cannot hold a minimum-size room are
    /// skipped; the builder checks the global minimum afterwards.
    pub fn place_all(&self, leaves: &[&PartitionNode], rng: &mut StdRng) -> Vec<Room> {
        let mut rooms = Vec::new();
        for leaf in leaves {
            if rooms.len() >= self.config.max_rooms {
                break;
            }
            if let Some(room) = self.place(leaf, rooms.len(), rng) {
                rooms.push(room);
            }
        }
        rooms
    }

    /// Place a room strictly inside one leaf, or `None` if it cannot fit
    pub fn place(&self, leaf: &PartitionNode, id: usize, rng: &mut StdRng) -> Option<Room> {
        let pad = self.config.padding;
        let interior_w = leaf.width - 2 * pad;
        let interior_h = leaf.height - 2 * pad;
        if interior_w < self.config.min_room_size || interior_h < self.config.min_room_size {
            return None;
        }

        let width = rng.gen_range(
            self.config.min_room_size..=interior_w.min(self.config.max_room_size),
        );
        let height = rng.gen_range(
            self.config.min_room_size..=interior_h.min(self.config.max_room_size),
        );
        let x = leaf.x + pad + rng.gen_range(0..=interior_w - width);
        let y = leaf.y + pad + rng.gen_range(0..=interior_h - height);

        Some(Room::new(id, x, y, width, height))
    }
}
