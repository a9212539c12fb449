//! Binary space partitioning of the level grid
//!
//! The tree is stored as an arena: nodes refer to their children by index, so
//! building and walking it never recurses.

use serde::{Deserialize, Serialize};

use crate::config::BspConfig;
use crate::rng::LevelRng;

use super::rect::Region;

/// Index of a node in its [`PartitionTree`]
pub type NodeId = usize;

/// A region and its (optional) pair of children
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionNode {
    pub region: Region,
    pub depth: u32,
    pub children: Option<(NodeId, NodeId)>,
}

impl PartitionNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Axis along which a node was cut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitAxis {
    /// Cut across the width: children sit side by side
    Width,
    /// Cut across the height: children are stacked
    Height,
}

/// Arena-backed partition tree; node 0 is the root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
}

impl PartitionTree {
    /// Recursively split `root` until every node is a leaf
    pub fn build(root: Region, config: &BspConfig, rng: &mut LevelRng) -> Self {
        let mut tree = Self {
            nodes: vec![PartitionNode {
                region: root,
                depth: 0,
                children: None,
            }],
        };

        let mut pending = vec![0];
        while let Some(id) = pending.pop() {
            if let Some((first, second)) = tree.try_split(id, config, rng) {
                // Second child pushed first so the first child is split first
                pending.push(second);
                pending.push(first);
            }
        }

        tracing::debug!(nodes = tree.nodes.len(), leaves = tree.leaf_count(), "partitioned level");
        tree
    }

    /// Attempt to split one node, returning its new children
    fn try_split(
        &mut self,
        id: NodeId,
        config: &BspConfig,
        rng: &mut LevelRng,
    ) -> Option<(NodeId, NodeId)> {
        let node = &self.nodes[id];
        let region = node.region;
        let depth = node.depth;

        let min = config.min_leaf_size;
        let twice_min = 2 * i64::from(min);
        let can_split_width = i64::from(region.width) > twice_min;
        let can_split_height = i64::from(region.height) > twice_min;
        if !can_split_width && !can_split_height {
            return None;
        }
        if config.max_depth.is_some_and(|max| depth >= max) {
            return None;
        }

        // One draw decides both whether and (when free to choose) which way to cut
        let r = rng.unit();
        if r >= config.split_chance {
            return None;
        }

        let axis = if can_split_width && (!can_split_height || r > 0.5) {
            SplitAxis::Width
        } else {
            SplitAxis::Height
        };

        let (first, second) = match axis {
            SplitAxis::Width => {
                let lo = region.x + min;
                let hi = region.right() - min;
                if lo >= hi {
                    return None;
                }
                let cut = rng.offset(lo, hi - lo);
                (
                    Region::new(region.x, region.z, cut - region.x, region.height),
                    Region::new(cut, region.z, region.right() - cut, region.height),
                )
            }
            SplitAxis::Height => {
                let lo = region.z + min;
                let hi = region.bottom() - min;
                if lo >= hi {
                    return None;
                }
                let cut = rng.offset(lo, hi - lo);
                (
                    Region::new(region.x, region.z, region.width, cut - region.z),
                    Region::new(region.x, cut, region.width, region.bottom() - cut),
                )
            }
        };

        let first_id = self.push(first, depth + 1);
        let second_id = self.push(second, depth + 1);
        self.nodes[id].children = Some((first_id, second_id));
        Some((first_id, second_id))
    }

    fn push(&mut self, region: Region, depth: u32) -> NodeId {
        self.nodes.push(PartitionNode {
            region,
            depth,
            children: None,
        });
        self.nodes.len() - 1
    }

    pub fn root(&self) -> &PartitionNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> Option<&PartitionNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[PartitionNode] {
        &self.nodes
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Leaf regions in depth-first order, first child before second
    pub fn leaves(&self) -> Vec<Region> {
        let mut out = Vec::new();
        let mut stack = vec![0];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            match node.children {
                Some((first, second)) => {
                    stack.push(second);
                    stack.push(first);
                }
                None => out.push(node.region),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bsp(min_leaf_size: i32, split_chance: f64) -> BspConfig {
        BspConfig {
            min_leaf_size,
            split_chance,
            max_depth: None,
            ..BspConfig::default()
        }
    }

    fn assert_exact_tiling(root: Region, leaves: &[Region]) {
        let total: i64 = leaves.iter().map(Region::area).sum();
        assert_eq!(total, root.area(), "leaf areas must sum to the root area");
        for (i, a) in leaves.iter().enumerate() {
            assert!(a.is_valid(), "leaf {:?} is degenerate", a);
            assert!(root.contains(a), "leaf {:?} escapes the root", a);
            for b in &leaves[i + 1..] {
                assert!(!a.overlaps(b), "leaves {:?} and {:?} overlap", a, b);
            }
        }
    }

    #[test]
    fn test_small_region_is_single_leaf() {
        let mut rng = LevelRng::new(42);
        let root = Region::new(1, 1, 16, 16);
        let tree = PartitionTree::build(root, &bsp(8, 1.0), &mut rng);
        assert_eq!(tree.leaves(), vec![root]);
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn test_huge_min_leaf_size_is_single_leaf() {
        let mut rng = LevelRng::new(1);
        let root = Region::new(1, 1, 38, 38);
        let tree = PartitionTree::build(root, &bsp(1_500_000_000, 1.0), &mut rng);
        assert_eq!(tree.leaves(), vec![root]);
    }

    #[test]
    fn test_zero_split_chance_never_splits() {
        let mut rng = LevelRng::new(7);
        let root = Region::new(0, 0, 100, 100);
        let tree = PartitionTree::build(root, &bsp(4, 0.0), &mut rng);
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn test_children_tile_parent() {
        let mut rng = LevelRng::new(42);
        let root = Region::new(1, 1, 38, 38);
        let tree = PartitionTree::build(root, &bsp(8, 0.8), &mut rng);
        for node in tree.nodes() {
            if let Some((a, b)) = node.children {
                let a = tree.node(a).unwrap().region;
                let b = tree.node(b).unwrap().region;
                assert_eq!(a.area() + b.area(), node.region.area());
                assert!(!a.overlaps(&b));
                assert_eq!(a.union(&b), node.region);
            }
        }
        assert_exact_tiling(root, &tree.leaves());
    }

    #[test]
    fn test_leaves_respect_min_size() {
        let mut rng = LevelRng::new(3);
        let root = Region::new(0, 0, 60, 40);
        let tree = PartitionTree::build(root, &bsp(5, 1.0), &mut rng);
        for leaf in tree.leaves() {
            assert!(leaf.width >= 5 && leaf.height >= 5, "{:?}", leaf);
        }
        assert!(tree.leaf_count() > 1);
    }

    #[test]
    fn test_max_depth_limits_tree() {
        let mut rng = LevelRng::new(11);
        let config = BspConfig {
            max_depth: Some(1),
            ..bsp(2, 1.0)
        };
        let tree = PartitionTree::build(Region::new(0, 0, 50, 50), &config, &mut rng);
        assert!(tree.leaf_count() <= 2);
        assert!(tree.nodes().iter().all(|n| n.depth <= 1));
    }

    #[test]
    fn test_same_seed_same_tree() {
        let root = Region::new(1, 1, 48, 48);
        let a = PartitionTree::build(root, &bsp(6, 0.8), &mut LevelRng::new(99)).leaves();
        let b = PartitionTree::build(root, &bsp(6, 0.8), &mut LevelRng::new(99)).leaves();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_leaves_partition_root(
            seed in any::<u64>(),
            x in -20i32..20,
            z in -20i32..20,
            width in 1i32..80,
            height in 1i32..80,
            min_leaf in 1i32..10,
            split_chance in 0.0f64..=1.0,
        ) {
            let root = Region::new(x, z, width, height);
            let mut rng = LevelRng::new(seed);
            let tree = PartitionTree::build(root, &bsp(min_leaf, split_chance), &mut rng);
            assert_exact_tiling(root, &tree.leaves());
        }
    }
}
