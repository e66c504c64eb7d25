//! Dungeon builder
//!
//! Orchestrates the pipeline: partition, place, assign roles, connect,
//! route, place doors, normalize walls. The only component that knows
//! about more than one stage. Insufficient layouts are retried with
//! derived seeds and, later, a widened partition depth; everything else
//! runs exactly once per successful build.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::config::DungeonConfig;
use crate::error::GenerationError;
use crate::world::{ConnectionKind, Room, RoomRole, SpawnKind, Tile, TileGrid};

use super::corridors::CorridorRouter;
use super::doors::DoorPlacer;
use super::graph::{self, Edge};
use super::placer::RoomPlacer;
use super::roles::RoleAssigner;
use super::walls::WallNormalizer;
use super::SpacePartitioner;

/// Pipeline states, advanced in order; `Retrying` loops back into
/// partitioning, `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    Partitioning,
    Placing,
    AssigningRoles,
    Connecting,
    Routing,
    PlacingDoors,
    Normalizing,
    Retrying,
    Done,
    Failed,
}

/// Read-only diagnostics for one generation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    pub rooms: usize,
    pub rooms_by_role: BTreeMap<RoomRole, usize>,
    /// Tiles carved as corridor floor
    pub corridor_tiles: usize,
    /// Edges carved by pathfinding
    pub routed_edges: usize,
    /// Edges that fell back to the straight carve
    pub degraded_routes: usize,
    pub doors: usize,
    pub doorless_rooms: usize,
    /// Partition attempts beyond the first
    pub retries: u32,
    /// Walkable tiles the start room cannot reach; nonzero signals a bug
    pub unreachable_tiles: usize,
}

/// A finished, immutable level
#[derive(Debug, Clone)]
pub struct Dungeon {
    pub seed: u64,
    pub rooms: Vec<Room>,
    pub grid: TileGrid,
    pub stats: GenerationStats,
}

impl Dungeon {
    /// Passability query for movement and collision logic
    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        self.grid.is_passable(x, y)
    }

    pub fn rooms_with_role(&self, role: RoomRole) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(move |r| r.role == role)
    }

    pub fn start_room(&self) -> Option<&Room> {
        self.rooms_with_role(RoomRole::Start).next().or_else(|| {
            self.rooms_with_role(RoomRole::Lobby).next()
        })
    }

    pub fn end_room(&self) -> Option<&Room> {
        self.rooms_with_role(RoomRole::End)
            .next()
            .or_else(|| self.rooms_with_role(RoomRole::Boss).next())
    }

    /// Plain floor tiles inside rooms of the given role, for entity
    /// placement; door, wall and marker cells are excluded
    pub fn spawn_tiles(&self, role: RoomRole) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for room in self.rooms_with_role(role) {
            for y in room.y..room.y + room.height {
                for x in room.x..room.x + room.width {
                    if self.grid.get(x, y) == Tile::Floor {
                        out.push((x, y));
                    }
                }
            }
        }
        out
    }

    /// The player spawn marker, if a start or lobby room placed one
    pub fn player_spawn(&self) -> Option<(i32, i32)> {
        self.rooms
            .iter()
            .flat_map(|r| r.spawn_positions(SpawnKind::Player))
            .next()
    }
}

/// Builds dungeons from a config and a seed
pub struct DungeonBuilder {
    config: DungeonConfig,
    seed: u64,
    state: BuildState,
}

impl DungeonBuilder {
    pub fn new(config: DungeonConfig) -> Self {
        Self {
            config,
            seed: 0,
            state: BuildState::Idle,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Run the full pipeline.
    ///
    /// Returns the finished level, or a fatal error. Nothing is
    /// published on failure.
    pub fn build(&mut self) -> Result<Dungeon, GenerationError> {
        self.config
            .validate()
            .map_err(GenerationError::Configuration)?;

        let attempts = self.config.max_retries + 1;
        let mut last_found = 0;
        for attempt in 0..attempts {
            if attempt > 0 {
                self.state = BuildState::Retrying;
                log::debug!("retrying partition, attempt {}", attempt + 1);
            }
            match self.try_build(attempt) {
                Ok(mut dungeon) => {
                    dungeon.stats.retries = attempt;
                    self.state = BuildState::Done;
                    log::info!(
                        "generated dungeon: {} rooms, {} doors, {} corridor tiles, seed {}",
                        dungeon.stats.rooms,
                        dungeon.stats.doors,
                        dungeon.stats.corridor_tiles,
                        dungeon.seed
                    );
                    return Ok(dungeon);
                }
                Err(found) => last_found = found,
            }
        }

        self.state = BuildState::Failed;
        Err(GenerationError::InsufficientRooms {
            found: last_found,
            required: self.config.min_rooms,
            attempts,
        })
    }

    /// One pipeline pass; `Err(room_count)` asks for a retry
    fn try_build(&mut self, attempt: u32) -> Result<Dungeon, usize> {
        let config = &self.config;
        let mut rng = StdRng::seed_from_u64(derive_seed(self.seed, attempt));

        // Widen the partition depth once plain re-seeding has had its
        // share of the retry budget
        let widen = attempt.saturating_sub(config.max_retries / 2);
        let max_depth = config.max_depth + widen;

        self.state = BuildState::Partitioning;
        let root = SpacePartitioner::new(config).partition(max_depth, &mut rng);
        let leaves = root.leaves();
        log::debug!("partitioned into {} leaves, depth {}", leaves.len(), root.depth());

        self.state = BuildState::Placing;
        let mut rooms = RoomPlacer::new(config).place_all(&leaves, &mut rng);
        if rooms.len() < config.min_rooms {
            log::debug!(
                "only {} rooms placed, need {}",
                rooms.len(),
                config.min_rooms
            );
            return Err(rooms.len());
        }

        self.state = BuildState::AssigningRoles;
        let assigner = RoleAssigner::new(config);
        assigner.assign(&mut rooms, &mut rng);

        self.state = BuildState::Connecting;
        let all_edges = graph::complete_graph(&rooms);
        let tree = graph::kruskal(&all_edges, rooms.len());
        let adjacency = graph::adjacency(&tree, rooms.len());
        assigner.revalidate(&mut rooms, &adjacency);

        let end_id = rooms
            .iter()
            .find(|r| matches!(r.role, RoomRole::End | RoomRole::Boss))
            .map(|r| r.id);
        let loops = graph::add_loop_edges(
            &tree,
            &all_edges,
            config.extra_edge_ratio,
            end_id,
            rooms.len(),
        );
        log::debug!("{} tree edges, {} loop edges", tree.len(), loops.len());

        self.state = BuildState::Routing;
        let mut grid = TileGrid::new(config.grid_width, config.grid_height);
        for room in &mut rooms {
            room.generate_tiles(&mut rng);
        }
        for room in &rooms {
            stamp_room(room, &mut grid);
        }

        let edges: Vec<(Edge, ConnectionKind)> = tree
            .iter()
            .map(|e| (*e, ConnectionKind::Tree))
            .chain(loops.iter().map(|e| (*e, ConnectionKind::Loop)))
            .collect();
        let routing = CorridorRouter::new(config).route_all(&mut rooms, &edges, &mut grid);

        self.state = BuildState::PlacingDoors;
        let doors = DoorPlacer::place_doors(&rooms, &mut grid);

        self.state = BuildState::Normalizing;
        WallNormalizer::normalize(&mut grid);

        let stats = self.finish_stats(&rooms, &grid, routing, doors);
        Ok(Dungeon {
            seed: self.seed,
            rooms,
            grid,
            stats,
        })
    }

    /// Lobby variant: a single centered room, no partitioning
    pub fn build_lobby(&mut self) -> Result<Dungeon, GenerationError> {
        let config = &self.config;
        config
            .validate()
            .map_err(GenerationError::Configuration)?;
        if config.lobby_width + 2 > config.grid_width
            || config.lobby_height + 2 > config.grid_height
        {
            self.state = BuildState::Failed;
            return Err(GenerationError::Configuration(
                "lobby does not fit the grid".into(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut room = Room::new(
            0,
            (config.grid_width - config.lobby_width) / 2,
            (config.grid_height - config.lobby_height) / 2,
            config.lobby_width,
            config.lobby_height,
        );
        room.role = RoomRole::Lobby;
        room.generate_tiles(&mut rng);

        self.state = BuildState::Normalizing;
        let mut grid = TileGrid::new(config.grid_width, config.grid_height);
        stamp_room(&room, &mut grid);
        WallNormalizer::normalize(&mut grid);

        let rooms = vec![room];
        let stats = self.finish_stats(
            &rooms,
            &grid,
            Default::default(),
            Default::default(),
        );
        self.state = BuildState::Done;
        Ok(Dungeon {
            seed: self.seed,
            rooms,
            grid,
            stats,
        })
    }

    fn finish_stats(
        &self,
        rooms: &[Room],
        grid: &TileGrid,
        routing: super::corridors::RoutingReport,
        doors: super::doors::DoorReport,
    ) -> GenerationStats {
        let mut rooms_by_role = BTreeMap::new();
        for room in rooms {
            *rooms_by_role.entry(room.role).or_insert(0) += 1;
        }

        // Connectivity audit: everything walkable must be reachable
        // from the start room
        let start = rooms
            .iter()
            .find(|r| matches!(r.role, RoomRole::Start | RoomRole::Lobby))
            .map(|r| r.center());
        let unreachable_tiles = match start {
            Some(center) => {
                let walkable = grid.count_where(|t| t.is_walkable());
                let reached = grid.flood_fill(center).len();
                walkable - reached
            }
            None => 0,
        };
        if unreachable_tiles > 0 {
            log::warn!("{} walkable tiles unreachable from start", unreachable_tiles);
        }

        GenerationStats {
            rooms: rooms.len(),
            rooms_by_role,
            corridor_tiles: routing.corridor_tiles,
            routed_edges: routing.routed,
            degraded_routes: routing.degraded,
            doors: doors.doors,
            doorless_rooms: doors.doorless_rooms,
            retries: 0,
            unreachable_tiles,
        }
    }
}

/// Copy a room's sub-grid onto the level grid
fn stamp_room(room: &Room, grid: &mut TileGrid) {
    for ly in 0..room.height {
        for lx in 0..room.width {
            let tile = room.tiles[(ly * room.width + lx) as usize];
            grid.set(room.x + lx, room.y + ly, tile);
        }
    }
}

/// Per-attempt seed, decorrelated from the base seed
fn derive_seed(seed: u64, attempt: u32) -> u64 {
    seed.wrapping_add((attempt as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_config() -> DungeonConfig {
        DungeonConfig {
            grid_width: 60,
            grid_height: 60,
            min_room_size: 6,
            max_room_size: 12,
            max_depth: 4,
            padding: 1,
            corridor_width: 2,
            min_leaf_size: 10,
            min_rooms: 5,
            max_rooms: 20,
            ..DungeonConfig::default()
        }
    }

    #[test]
    fn test_example_scenario_seed_42() {
        let dungeon = DungeonBuilder::new(example_config())
            .with_seed(42)
            .build()
            .unwrap();

        assert!(dungeon.stats.rooms >= 5);
        assert_eq!(
            dungeon.rooms_with_role(RoomRole::Start).count(),
            1,
            "exactly one start room"
        );
        assert_eq!(dungeon.rooms_with_role(RoomRole::End).count(), 1);
        assert_eq!(dungeon.stats.unreachable_tiles, 0);
    }

    #[test]
    fn test_full_connectivity() {
        let dungeon = DungeonBuilder::new(example_config())
            .with_seed(42)
            .build()
            .unwrap();

        let start = dungeon.start_room().unwrap().center();
        let reached = dungeon.grid.flood_fill(start).len();
        let walkable = dungeon.grid.count_where(|t| t.is_walkable());
        assert_eq!(reached, walkable, "flood fill must cover every walkable tile");
    }

    #[test]
    fn test_rooms_in_bounds_and_sized() {
        let config = example_config();
        let dungeon = DungeonBuilder::new(config.clone()).with_seed(7).build().unwrap();

        for room in &dungeon.rooms {
            assert!(room.x >= 0 && room.y >= 0);
            assert!(room.x + room.width <= config.grid_width);
            assert!(room.y + room.height <= config.grid_height);
            assert!(room.width >= config.min_room_size && room.width <= config.max_room_size);
            assert!(room.height >= config.min_room_size && room.height <= config.max_room_size);
        }
    }

    #[test]
    fn test_no_padded_room_overlap() {
        let config = example_config();
        let dungeon = DungeonBuilder::new(config.clone()).with_seed(99).build().unwrap();

        for a in &dungeon.rooms {
            for b in &dungeon.rooms {
                if a.id < b.id {
                    assert!(!a.intersects_padded(b, config.padding));
                }
            }
        }
    }

    #[test]
    fn test_determinism() {
        let a = DungeonBuilder::new(example_config()).with_seed(1234).build().unwrap();
        let b = DungeonBuilder::new(example_config()).with_seed(1234).build().unwrap();

        let tiles = |d: &Dungeon| d.grid.iter().collect::<Vec<_>>();
        assert_eq!(tiles(&a), tiles(&b));
        assert_eq!(a.rooms.len(), b.rooms.len());
        for (ra, rb) in a.rooms.iter().zip(&b.rooms) {
            assert_eq!((ra.x, ra.y, ra.width, ra.height, ra.role), (rb.x, rb.y, rb.width, rb.height, rb.role));
            assert_eq!(ra.connections, rb.connections);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = DungeonBuilder::new(example_config()).with_seed(1).build().unwrap();
        let b = DungeonBuilder::new(example_config()).with_seed(2).build().unwrap();
        let tiles = |d: &Dungeon| d.grid.iter().collect::<Vec<_>>();
        assert_ne!(tiles(&a), tiles(&b));
    }

    #[test]
    fn test_insufficient_rooms_fails_bounded() {
        // Leaves can never host min_rooms rooms of this size
        let config = DungeonConfig {
            grid_width: 40,
            grid_height: 40,
            min_room_size: 30,
            max_room_size: 34,
            min_leaf_size: 34,
            padding: 2,
            max_depth: 6,
            min_rooms: 5,
            ..DungeonConfig::default()
        };
        let mut builder = DungeonBuilder::new(config).with_seed(5);
        let result = builder.build();
        assert!(matches!(
            result,
            Err(GenerationError::InsufficientRooms { .. })
        ));
        assert_eq!(builder.state(), BuildState::Failed);
    }

    #[test]
    fn test_contradictory_config_fails_fast() {
        let config = DungeonConfig {
            min_room_size: 20,
            max_room_size: 10,
            ..DungeonConfig::default()
        };
        let result = DungeonBuilder::new(config).build();
        assert!(matches!(result, Err(GenerationError::Configuration(_))));
    }

    #[test]
    fn test_every_room_connected_and_doored() {
        let dungeon = DungeonBuilder::new(example_config()).with_seed(42).build().unwrap();

        for room in &dungeon.rooms {
            assert!(
                !room.connections.is_empty(),
                "room {} has no connections",
                room.id
            );
        }
        assert_eq!(dungeon.stats.doorless_rooms, 0);
        assert!(dungeon.stats.doors >= dungeon.rooms.len());
    }

    #[test]
    fn test_spawn_tiles_exclude_markers_and_doors() {
        let dungeon = DungeonBuilder::new(example_config()).with_seed(42).build().unwrap();

        // The start room always exists and keeps plain floor around its
        // player marker
        assert!(!dungeon.spawn_tiles(RoomRole::Start).is_empty());
        for role in dungeon.stats.rooms_by_role.keys() {
            for (x, y) in dungeon.spawn_tiles(*role) {
                assert_eq!(dungeon.grid.get(x, y), Tile::Floor);
            }
        }
    }

    #[test]
    fn test_lobby_variant() {
        let config = DungeonConfig::default();
        let dungeon = DungeonBuilder::new(config.clone()).with_seed(3).build_lobby().unwrap();

        assert_eq!(dungeon.rooms.len(), 1);
        assert_eq!(dungeon.rooms[0].role, RoomRole::Lobby);
        assert_eq!(dungeon.rooms[0].width, config.lobby_width);
        assert!(dungeon.player_spawn().is_some());

        // Lobby floor is fully reachable from its center
        assert_eq!(dungeon.stats.unreachable_tiles, 0);
    }

    #[test]
    fn test_disconnected_room_surfaces_in_stats() {
        // Hand-built layout: two rooms connected, a third left out
        let mut rooms = vec![
            Room::new(0, 2, 2, 6, 6),
            Room::new(1, 20, 2, 6, 6),
            Room::new(2, 2, 20, 6, 6),
        ];
        let mut grid = TileGrid::new(30, 30);
        let mut rng = StdRng::seed_from_u64(0);
        for room in &mut rooms {
            room.generate_tiles(&mut rng);
            stamp_room(room, &mut grid);
        }
        // Carve only the 0-1 corridor
        for x in 8..20 {
            grid.set(x, 5, Tile::Corridor);
        }

        let report = DoorPlacer::place_doors(&rooms, &mut grid);
        assert_eq!(report.doorless_rooms, 1);

        let reached = grid.flood_fill(rooms[0].center()).len();
        let walkable = grid.count_where(|t| t.is_walkable());
        assert!(reached < walkable, "disconnected floor must stay unreachable");
    }

    #[test]
    fn test_degraded_routes_counted_not_fatal() {
        // A config whose corridor carve cannot fail still reports zero
        let dungeon = DungeonBuilder::new(example_config()).with_seed(11).build().unwrap();
        assert_eq!(dungeon.stats.degraded_routes, 0);
        assert!(dungeon.stats.routed_edges >= dungeon.rooms.len() - 1);
    }

    #[test]
    fn test_normalizer_idempotent_on_generated_level() {
        let dungeon = DungeonBuilder::new(example_config()).with_seed(42).build().unwrap();
        let mut grid = dungeon.grid.clone();
        WallNormalizer::normalize(&mut grid);
        assert_eq!(
            grid.iter().collect::<Vec<_>>(),
            dungeon.grid.iter().collect::<Vec<_>>()
        );
    }
}
