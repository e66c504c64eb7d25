//! Space partitioning
//!
//! Recursive binary splitting of the grid rectangle into a tree of leaf
//! regions, one candidate area per room. The tree is transient; the
//! builder harvests the leaves and drops it.

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::DungeonConfig;

/// A node of the partition tree
#[derive(Debug)]
pub struct PartitionNode {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    left: Option<Box<PartitionNode>>,
    right: Option<Box<PartitionNode>>,
}

impl PartitionNode {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Leaves in in-order traversal order
    pub fn leaves(&self) -> Vec<&PartitionNode> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a PartitionNode>) {
        if self.is_leaf() {
            out.push(self);
            return;
        }
        if let Some(left) = &self.left {
            left.collect_leaves(out);
        }
        if let Some(right) = &self.right {
            right.collect_leaves(out);
        }
    }

    /// Depth of the tree below this node
    pub fn depth(&self) -> u32 {
        match (&self.left, &self.right) {
            (None, None) => 0,
            (left, right) => {
                let l = left.as_ref().map_or(0, |n| n.depth());
                let r = right.as_ref().map_or(0, |n| n.depth());
                1 + l.max(r)
            }
        }
    }
}

/// Recursive splitter over the grid rectangle
pub struct SpacePartitioner<'a> {
    config: &'a DungeonConfig,
}

impl<'a> SpacePartitioner<'a> {
    pub fn new(config: &'a DungeonConfig) -> Self {
        Self { config }
    }

    /// Partition the whole grid, splitting no deeper than `max_depth`.
    ///
    /// `max_depth` is a parameter rather than read from the config so
    /// the builder can widen it on retries.
    pub fn partition(&self, max_depth: u32, rng: &mut StdRng) -> PartitionNode {
        let mut root = PartitionNode::new(0, 0, self.config.grid_width, self.config.grid_height);
        self.split(&mut root, 0, max_depth, rng);
        root
    }

    fn split(&self, node: &mut PartitionNode, depth: u32, max_depth: u32, rng: &mut StdRng) {
        let min_leaf = self.config.min_leaf_size;
        if depth >= max_depth {
            return;
        }
        let can_split_x = node.width >= 2 * min_leaf;
        let can_split_y = node.height >= 2 * min_leaf;
        if !can_split_x && !can_split_y {
            return;
        }

        // Split across the longer side; ties prefer a horizontal cut
        let split_x = if can_split_x && can_split_y {
            node.width > node.height
        } else {
            can_split_x
        };

        if split_x {
            let offset = rng.gen_range(min_leaf..=node.width - min_leaf);
            node.left = Some(Box::new(PartitionNode::new(
                node.x,
                node.y,
                offset,
                node.height,
            )));
            node.right = Some(Box::new(PartitionNode::new(
                node.x + offset,
                node.y,
                node.width - offset,
                node.height,
            )));
        } else {
            let offset = rng.gen_range(min_leaf..=node.height - min_leaf);
            node.left = Some(Box::new(PartitionNode::new(
                node.x,
                node.y,
                node.width,
                offset,
            )));
            node.right = Some(Box::new(PartitionNode::new(
                node.x,
                node.y + offset,
                node.width,
                node.height - offset,
            )));
        }

        if let Some(left) = node.left.as_deref_mut() {
            self.split(left, depth + 1, max_depth, rng);
        }
        if let Some(right) = node.right.as_deref_mut() {
            self.split(right, depth + 1, max_depth, rng);
        }
    }
}
