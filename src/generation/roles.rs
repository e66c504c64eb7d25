//! Room role assignment
//!
//! Two-pass policy. The provisional pass picks Start (nearest the spawn
//! anchor) and End (Euclidean-farthest from Start) before any corridors
//! exist, then fills the rest from the weighted Monster/Trap/Reward
//! pool. Once the connectivity graph is built, `revalidate` replaces
//! the End pick with the room farthest from Start by graph hops.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::config::DungeonConfig;
use crate::world::{Room, RoomRole};

use super::graph::bfs_hops;

pub struct RoleAssigner<'a> {
    config: &'a DungeonConfig,
}

impl<'a> RoleAssigner<'a> {
    pub fn new(config: &'a DungeonConfig) -> Self {
        Self { config }
    }

    fn end_role(&self) -> RoomRole {
        if self.config.boss_end {
            RoomRole::Boss
        } else {
            RoomRole::End
        }
    }

    /// Provisional assignment, before connectivity exists
    pub fn assign(&self, rooms: &mut [Room], rng: &mut StdRng) {
        if rooms.is_empty() {
            return;
        }

        // Spawn anchor is the grid center
        let anchor = (
            self.config.grid_width as f64 / 2.0,
            self.config.grid_height as f64 / 2.0,
        );
        let start_id = rooms
            .iter()
            .min_by(|a, b| {
                dist2(a.center_f(), anchor)
                    .total_cmp(&dist2(b.center_f(), anchor))
                    .then(a.id.cmp(&b.id))
            })
            .map(|r| r.id)
            .unwrap_or(0);
        rooms[start_id].role = RoomRole::Start;

        if rooms.len() < 2 {
            return;
        }

        let start_center = rooms[start_id].center_f();
        let end_id = rooms
            .iter()
            .filter(|r| r.id != start_id)
            .max_by(|a, b| {
                dist2(a.center_f(), start_center)
                    .total_cmp(&dist2(b.center_f(), start_center))
                    .then(b.id.cmp(&a.id))
            })
            .map(|r| r.id)
            .unwrap_or(0);
        rooms[end_id].role = self.end_role();

        // One NPC room when the layout is big enough to spare one
        let mut unassigned: Vec<usize> = rooms
            .iter()
            .filter(|r| r.role == RoomRole::Empty)
            .map(|r| r.id)
            .collect();
        if unassigned.len() >= 3 {
            if let Some(&npc_id) = unassigned.choose(rng) {
                rooms[npc_id].role = RoomRole::Npc;
                unassigned.retain(|&id| id != npc_id);
            }
        }

        // Weighted pool for everything left, in id order
        let weights = [
            self.config.monster_ratio,
            self.config.trap_ratio,
            self.config.reward_ratio,
        ];
        if let Ok(pool) = WeightedIndex::new(weights) {
            const POOL_ROLES: [RoomRole; 3] = [RoomRole::Monster, RoomRole::Trap, RoomRole::Reward];
            for id in unassigned {
                rooms[id].role = POOL_ROLES[pool.sample(rng)];
            }
        }
    }

    /// Re-pick End by BFS hop distance over the built graph.
    ///
    /// When the graph-farthest room differs from the provisional pick,
    /// the two rooms swap roles so role counts stay unchanged. Returns
    /// whether a swap happened.
    pub fn revalidate(&self, rooms: &mut [Room], adjacency: &[Vec<usize>]) -> bool {
        let Some(start_id) = rooms.iter().find(|r| r.role == RoomRole::Start).map(|r| r.id)
        else {
            return false;
        };
        let Some(end_id) = rooms.iter().find(|r| r.role == self.end_role()).map(|r| r.id) else {
            return false;
        };

        let hops = bfs_hops(adjacency, start_id);
        let farthest = rooms
            .iter()
            .filter(|r| r.id != start_id)
            .filter_map(|r| hops[r.id].map(|h| (h, r.id)))
            .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
            .map(|(_, id)| id);

        match farthest {
            Some(new_end) if new_end != end_id => {
                log::debug!(
                    "end room moved from {} to {} after connectivity pass",
                    end_id,
                    new_end
                );
                rooms[end_id].role = rooms[new_end].role;
                rooms[new_end].role = self.end_role();
                true
            }
            _ => false,
        }
    }
}

fn dist2(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn line_rooms(n: usize) -> Vec<Room> {
        (0..n).map(|i| Room::new(i, i as i32 * 12, 40, 8, 8)).collect()
    }

    #[test]
    fn test_exactly_one_start_and_end() {
        let config = DungeonConfig::default();
        let mut rooms = line_rooms(8);
        RoleAssigner::new(&config).assign(&mut rooms, &mut StdRng::seed_from_u64(4));

        let starts = rooms.iter().filter(|r| r.role == RoomRole::Start).count();
        let ends = rooms.iter().filter(|r| r.role == RoomRole::End).count();
        assert_eq!(starts, 1);
        assert_eq!(ends, 1);
        assert!(rooms.iter().all(|r| r.role != RoomRole::Empty));
    }

    #[test]
    fn test_boss_variant_replaces_end() {
        let config = DungeonConfig {
            boss_end: true,
            ..DungeonConfig::default()
        };
        let mut rooms = line_rooms(6);
        RoleAssigner::new(&config).assign(&mut rooms, &mut StdRng::seed_from_u64(4));

        assert_eq!(rooms.iter().filter(|r| r.role == RoomRole::Boss).count(), 1);
        assert_eq!(rooms.iter().filter(|r| r.role == RoomRole::End).count(), 0);
    }

    #[test]
    fn test_start_is_nearest_grid_center() {
        let config = DungeonConfig {
            grid_width: 120,
            grid_height: 100,
            ..DungeonConfig::default()
        };
        let mut rooms = line_rooms(9);
        RoleAssigner::new(&config).assign(&mut rooms, &mut StdRng::seed_from_u64(4));

        // Centers sit at x = 12*id + 4, so room 5 (x=64) is nearest (60, 50)
        assert_eq!(rooms[5].role, RoomRole::Start);
    }

    #[test]
    fn test_npc_room_present_in_large_layouts() {
        let config = DungeonConfig::default();
        let mut rooms = line_rooms(10);
        RoleAssigner::new(&config).assign(&mut rooms, &mut StdRng::seed_from_u64(4));
        assert_eq!(rooms.iter().filter(|r| r.role == RoomRole::Npc).count(), 1);
    }

    #[test]
    fn test_revalidate_moves_end_to_graph_farthest() {
        let config = DungeonConfig {
            grid_width: 60,
            grid_height: 90,
            ..DungeonConfig::default()
        };
        // Start near the center; room 3 is Euclidean-far but one hop
        // away, room 2 is close in space but three hops away.
        let mut rooms = vec![
            Room::new(0, 26, 41, 8, 8),
            Room::new(1, 40, 41, 8, 8),
            Room::new(2, 40, 55, 8, 8),
            Room::new(3, 26, 2, 8, 8),
        ];
        let assigner = RoleAssigner::new(&config);
        assigner.assign(&mut rooms, &mut StdRng::seed_from_u64(4));
        assert_eq!(rooms[0].role, RoomRole::Start);
        assert_eq!(rooms[3].role, RoomRole::End);

        let adjacency = vec![vec![1, 3], vec![0, 2], vec![1], vec![0]];
        let swapped = assigner.revalidate(&mut rooms, &adjacency);
        assert!(swapped);
        assert_eq!(rooms[2].role, RoomRole::End);
        assert_ne!(rooms[3].role, RoomRole::End);

        // Counts preserved by the swap
        assert_eq!(rooms.iter().filter(|r| r.role == RoomRole::End).count(), 1);
        assert_eq!(rooms.iter().filter(|r| r.role == RoomRole::Start).count(), 1);
    }

    #[test]
    fn test_single_room_is_start() {
        let config = DungeonConfig::default();
        let mut rooms = line_rooms(1);
        RoleAssigner::new(&config).assign(&mut rooms, &mut StdRng::seed_from_u64(4));
        assert_eq!(rooms[0].role, RoomRole::Start);
    }
}
