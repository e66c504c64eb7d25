//! Rooms
//!
//! A placed room: rectangle, gameplay role, owned sub-grid of tiles and
//! the connections routed to neighboring rooms.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::tile::{SpawnKind, Tile};

/// Gameplay purpose of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoomRole {
    Start,
    End,
    Lobby,
    Monster,
    Trap,
    Reward,
    Boss,
    Npc,
    Empty,
}

impl RoomRole {
    pub fn name(&self) -> &'static str {
        match self {
            RoomRole::Start => "start",
            RoomRole::End => "end",
            RoomRole::Lobby => "lobby",
            RoomRole::Monster => "monster",
            RoomRole::Trap => "trap",
            RoomRole::Reward => "reward",
            RoomRole::Boss => "boss",
            RoomRole::Npc => "npc",
            RoomRole::Empty => "empty",
        }
    }
}

/// How two rooms ended up connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// Spanning-tree edge, required for reachability
    Tree,
    /// Extra edge added for loops
    Loop,
    /// Straight fallback carve after a routing failure
    Fallback,
}

/// A routed connection to another room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub room: usize,
    pub kind: ConnectionKind,
}

/// A single placed room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: usize,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub role: RoomRole,
    /// Row-major `width * height` sub-grid, stamped onto the level grid
    pub tiles: Vec<Tile>,
    pub connections: Vec<Connection>,
}

impl Room {
    pub fn new(id: usize, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            role: RoomRole::Empty,
            tiles: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Room center in tile coordinates
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Room center as a float, for edge weights
    pub fn center_f(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Euclidean distance between room centers
    pub fn distance_to(&self, other: &Room) -> f64 {
        let (ax, ay) = self.center_f();
        let (bx, by) = other.center_f();
        ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt()
    }

    /// Is a grid position inside the room rectangle?
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Do the two rooms, each expanded by `padding`, intersect?
    pub fn intersects_padded(&self, other: &Room, padding: i32) -> bool {
        let (ax0, ay0) = (self.x - padding, self.y - padding);
        let (ax1, ay1) = (self.x + self.width + padding, self.y + self.height + padding);
        let (bx0, by0) = (other.x - padding, other.y - padding);
        let (bx1, by1) = (
            other.x + other.width + padding,
            other.y + other.height + padding,
        );
        ax0 < bx1 && ax1 > bx0 && ay0 < by1 && ay1 > by0
    }

    /// Record a connection to another room, once per neighbor
    pub fn connect(&mut self, room: usize, kind: ConnectionKind) {
        if !self.connections.iter().any(|c| c.room == room) {
            self.connections.push(Connection { room, kind });
        }
    }

    fn tile_at(&self, lx: i32, ly: i32) -> Tile {
        self.tiles[(ly * self.width + lx) as usize]
    }

    fn set_tile(&mut self, lx: i32, ly: i32, tile: Tile) {
        if lx >= 0 && lx < self.width && ly >= 0 && ly < self.height {
            let idx = (ly * self.width + lx) as usize;
            self.tiles[idx] = tile;
        }
    }

    /// Build the sub-grid for the current role.
    ///
    /// Every room starts as plain floor; roles stamp their markers on
    /// top. Marker placement draws from `rng`, so the result is fully
    /// determined by the seed.
    pub fn generate_tiles(&mut self, rng: &mut StdRng) {
        self.tiles = vec![Tile::Floor; (self.width * self.height) as usize];

        let cx = self.width / 2;
        let cy = self.height / 2;
        // Area available once the normalizer grows walls around the rect
        let floor_area = ((self.width - 2).max(0) * (self.height - 2).max(0)) as usize;

        match self.role {
            RoomRole::Start => {
                self.set_tile(cx, cy, Tile::Spawn(SpawnKind::Player));
            }
            RoomRole::End => {
                self.set_tile(cx, cy, Tile::Portal);
            }
            RoomRole::Boss => {
                self.set_tile(cx, cy, Tile::Spawn(SpawnKind::Boss));
            }
            RoomRole::Monster => {
                // Roughly one monster per 72 tiles of floor
                let count = (floor_area / 72).clamp(1, 15);
                self.scatter(rng, count, Tile::Spawn(SpawnKind::Monster));
            }
            RoomRole::Trap => {
                self.set_tile(cx, cy, Tile::Spawn(SpawnKind::Npc));
                // Denser than monsters, one trap per 16 tiles
                let count = (floor_area / 16).clamp(1, 50);
                self.scatter(rng, count, Tile::Spawn(SpawnKind::Trap));
            }
            RoomRole::Reward => {
                self.set_tile(cx, cy, Tile::Spawn(SpawnKind::Treasure));
            }
            RoomRole::Npc => {
                self.set_tile(cx, cy, Tile::Spawn(SpawnKind::Npc));
            }
            RoomRole::Lobby => {
                self.set_tile(4, 3, Tile::Spawn(SpawnKind::Npc));
                self.set_tile(self.width - 4, 3, Tile::Spawn(SpawnKind::Npc));
                self.set_tile(4, self.height - 3, Tile::Spawn(SpawnKind::Npc));
                self.set_tile(self.width - 4, self.height - 3, Tile::Spawn(SpawnKind::Npc));
                self.set_tile(cx, cy - 3, Tile::Spawn(SpawnKind::Npc));
                self.set_tile(cx, cy + 3, Tile::Spawn(SpawnKind::Player));
            }
            RoomRole::Empty => {}
        }
    }

    /// Stamp `count` markers on shuffled interior floor tiles
    fn scatter(&mut self, rng: &mut StdRng, count: usize, marker: Tile) {
        let mut spots: Vec<(i32, i32)> = (1..self.height - 1)
            .flat_map(|ly| (1..self.width - 1).map(move |lx| (lx, ly)))
            .filter(|&(lx, ly)| self.tile_at(lx, ly) == Tile::Floor)
            .collect();
        spots.shuffle(rng);
        for &(lx, ly) in spots.iter().take(count) {
            self.set_tile(lx, ly, marker);
        }
    }

    /// Grid positions of spawn markers of the given kind
    pub fn spawn_positions(&self, kind: SpawnKind) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for ly in 0..self.height {
            for lx in 0..self.width {
                if self.tile_at(lx, ly) == Tile::Spawn(kind) {
                    out.push((self.x + lx, self.y + ly));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_center() {
        let room = Room::new(0, 2, 4, 6, 8);
        assert_eq!(room.center(), (5, 8));
    }

    #[test]
    fn test_padded_intersection() {
        let a = Room::new(0, 0, 0, 5, 5);
        let b = Room::new(1, 6, 0, 5, 5);
        assert!(!a.intersects_padded(&b, 0));
        // Padding of 1 makes them touch
        assert!(a.intersects_padded(&b, 1));
    }

    #[test]
    fn test_start_room_has_player_spawn() {
        let mut room = Room::new(0, 0, 0, 9, 9);
        room.role = RoomRole::Start;
        room.generate_tiles(&mut rng());
        assert_eq!(room.spawn_positions(SpawnKind::Player), vec![(4, 4)]);
    }

    #[test]
    fn test_end_room_has_centered_portal() {
        let mut room = Room::new(0, 10, 10, 8, 6);
        room.role = RoomRole::End;
        room.generate_tiles(&mut rng());
        assert_eq!(room.tile_at(4, 3), Tile::Portal);
    }

    #[test]
    fn test_monster_count_scales_with_area() {
        let mut small = Room::new(0, 0, 0, 6, 6);
        small.role = RoomRole::Monster;
        small.generate_tiles(&mut rng());
        assert_eq!(small.spawn_positions(SpawnKind::Monster).len(), 1);

        let mut large = Room::new(1, 0, 0, 20, 20);
        large.role = RoomRole::Monster;
        large.generate_tiles(&mut rng());
        let count = large.spawn_positions(SpawnKind::Monster).len();
        assert_eq!(count, (18 * 18) / 72);
    }

    #[test]
    fn test_trap_room_keeps_npc_center() {
        let mut room = Room::new(0, 0, 0, 10, 10);
        room.role = RoomRole::Trap;
        room.generate_tiles(&mut rng());
        assert_eq!(room.tile_at(5, 5), Tile::Spawn(SpawnKind::Npc));
        assert!(!room.spawn_positions(SpawnKind::Trap).is_empty());
    }

    #[test]
    fn test_connect_is_idempotent() {
        let mut room = Room::new(0, 0, 0, 5, 5);
        room.connect(3, ConnectionKind::Tree);
        room.connect(3, ConnectionKind::Loop);
        assert_eq!(room.connections.len(), 1);
        assert_eq!(room.connections[0].kind, ConnectionKind::Tree);
    }
}
