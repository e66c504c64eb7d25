//! Room connectivity graph
//!
//! Complete weighted graph over room centers, reduced to a minimum
//! spanning tree with Kruskal's algorithm, plus a bounded set of extra
//! loop edges. All tie-breaks go through room ids so the edge set is
//! identical for identical room lists.

use crate::world::Room;

/// Weighted, unordered room pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub weight: f64,
}

/// Union-find with path compression and union by rank
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            let root = self.find(self.parent[x]);
            self.parent[x] = root;
        }
        self.parent[x]
    }

    /// Merge the sets holding `x` and `y`; false if already joined
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let (rx, ry) = (self.find(x), self.find(y));
        if rx == ry {
            return false;
        }
        match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => self.parent[rx] = ry,
            std::cmp::Ordering::Greater => self.parent[ry] = rx,
            std::cmp::Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] += 1;
            }
        }
        true
    }
}

/// All edges of the complete graph over room centers
pub fn complete_graph(rooms: &[Room]) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(rooms.len() * rooms.len().saturating_sub(1) / 2);
    for i in 0..rooms.len() {
        for j in i + 1..rooms.len() {
            edges.push(Edge {
                a: rooms[i].id,
                b: rooms[j].id,
                weight: rooms[i].distance_to(&rooms[j]),
            });
        }
    }
    edges
}

/// Kruskal's minimum spanning tree.
///
/// `node_count` is the number of rooms; room ids are assumed dense in
/// `0..node_count`.
pub fn kruskal(edges: &[Edge], node_count: usize) -> Vec<Edge> {
    let mut sorted: Vec<Edge> = edges.to_vec();
    sorted.sort_by(|l, r| {
        l.weight
            .total_cmp(&r.weight)
            .then(l.a.cmp(&r.a))
            .then(l.b.cmp(&r.b))
    });

    let mut uf = UnionFind::new(node_count);
    let mut tree = Vec::with_capacity(node_count.saturating_sub(1));
    for edge in sorted {
        if uf.union(edge.a, edge.b) {
            tree.push(edge);
            if tree.len() + 1 == node_count {
                break;
            }
        }
    }
    tree
}

/// Add loop edges on top of the tree: the shortest non-tree candidates,
/// bounded by `ratio` of the non-tree edge count.
///
/// The End room keeps its single tree connection so it stays a dead
/// end, and no room takes more than `MAX_DEGREE` total connections.
pub fn add_loop_edges(
    tree: &[Edge],
    all: &[Edge],
    ratio: f64,
    excluded: Option<usize>,
    node_count: usize,
) -> Vec<Edge> {
    const MAX_DEGREE: usize = 3;

    if ratio <= 0.0 {
        return Vec::new();
    }

    let in_tree = |e: &Edge| {
        tree.iter()
            .any(|t| (t.a, t.b) == (e.a, e.b) || (t.a, t.b) == (e.b, e.a))
    };
    let mut candidates: Vec<Edge> = all
        .iter()
        .filter(|e| !in_tree(e))
        .filter(|e| excluded != Some(e.a) && excluded != Some(e.b))
        .copied()
        .collect();
    candidates.sort_by(|l, r| {
        l.weight
            .total_cmp(&r.weight)
            .then(l.a.cmp(&r.a))
            .then(l.b.cmp(&r.b))
    });

    let budget = (candidates.len() as f64 * ratio) as usize;
    let mut degree = vec![0usize; node_count];
    for edge in tree {
        degree[edge.a] += 1;
        degree[edge.b] += 1;
    }

    let mut extra = Vec::new();
    for edge in candidates {
        if extra.len() >= budget {
            break;
        }
        if degree[edge.a] < MAX_DEGREE && degree[edge.b] < MAX_DEGREE {
            degree[edge.a] += 1;
            degree[edge.b] += 1;
            extra.push(edge);
        }
    }
    extra
}

/// Adjacency lists for an edge set
pub fn adjacency(edges: &[Edge], node_count: usize) -> Vec<Vec<usize>> {
    let mut adj = vec![Vec::new(); node_count];
    for edge in edges {
        adj[edge.a].push(edge.b);
        adj[edge.b].push(edge.a);
    }
    for list in &mut adj {
        list.sort_unstable();
    }
    adj
}

/// BFS hop count from `start` to every node; `None` for unreachable
pub fn bfs_hops(adj: &[Vec<usize>], start: usize) -> Vec<Option<u32>> {
    let mut hops = vec![None; adj.len()];
    if start >= adj.len() {
        return hops;
    }
    hops[start] = Some(0);
    let mut queue = std::collections::VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        let d = hops[node].unwrap_or(0);
        for &next in &adj[node] {
            if hops[next].is_none() {
                hops[next] = Some(d + 1);
                queue.push_back(next);
            }
        }
    }
    hops
}
