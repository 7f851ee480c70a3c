use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{ClaimTreeError, ClaimTreeResult, GiveawayHasher};

/// One node of the tree arena. Children and parent are indices into the
/// arena, never pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleNode {
    pub hash: B256,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub parent: Option<usize>,
}

impl MerkleNode {
    fn leaf(hash: B256) -> Self {
        Self {
            hash,
            left: None,
            right: None,
            parent: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Binary merkle tree over claim leaves, stored as a flat arena.
///
/// Leaves occupy the first `leaf_count` slots in ascending hash order, so the
/// same leaf set always yields the same arena whatever order it arrived in.
/// Internal nodes follow level by level. A node left without a partner at
/// some level is not copied: the same arena slot takes part in the next
/// level, so its parent pointer is set where it finally pairs up.
///
/// Promoting the odd node unchanged (rather than hashing it with itself) is
/// the convention the verifier has to share; `rs_merkle` follows it too.
#[derive(Debug, Clone)]
pub struct ClaimMerkleTree {
    nodes: Vec<MerkleNode>,
    leaf_count: usize,
    root: usize,
    leaf_positions: HashMap<B256, usize>,
}

impl ClaimMerkleTree {
    /// Build a tree from leaf hashes given in any order.
    pub fn from_leaves(mut leaves: Vec<B256>) -> ClaimTreeResult<Self> {
        if leaves.is_empty() {
            return Err(ClaimTreeError::EmptyClaimSet);
        }

        sort_leaves(&mut leaves);
        if let Some(pair) = leaves.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(ClaimTreeError::DuplicateLeaf { leaf: pair[0] });
        }

        let leaf_count = leaves.len();
        let leaf_positions: HashMap<B256, usize> = leaves
            .iter()
            .enumerate()
            .map(|(position, leaf)| (*leaf, position))
            .collect();

        // A full binary tree over n leaves has 2n - 1 nodes.
        let mut nodes: Vec<MerkleNode> = Vec::with_capacity(2 * leaf_count - 1);
        nodes.extend(leaves.into_iter().map(MerkleNode::leaf));

        let mut level: Vec<usize> = (0..leaf_count).collect();
        let mut depth = 0;

        while level.len() > 1 {
            let parent_hashes = hash_level(&nodes, &level);
            let mut next_level = Vec::with_capacity(level.len().div_ceil(2));

            for (pair, hash) in level.chunks_exact(2).zip(parent_hashes) {
                let parent = nodes.len();
                nodes.push(MerkleNode {
                    hash,
                    left: Some(pair[0]),
                    right: Some(pair[1]),
                    parent: None,
                });
                nodes[pair[0]].parent = Some(parent);
                nodes[pair[1]].parent = Some(parent);
                next_level.push(parent);
            }

            if let [promoted] = level.chunks_exact(2).remainder() {
                next_level.push(*promoted);
            }

            level = next_level;
            depth += 1;
        }

        let root = level[0];
        debug!(
            "Built claim tree: {} leaves, {} nodes, depth {}",
            leaf_count,
            nodes.len(),
            depth
        );

        Ok(Self {
            nodes,
            leaf_count,
            root,
            leaf_positions,
        })
    }

    /// Root hash to register with the verifier.
    pub fn root(&self) -> B256 {
        self.nodes[self.root].hash
    }

    pub fn root_index(&self) -> usize {
        self.root
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// The whole arena: leaves first, then internal nodes level by level.
    pub fn nodes(&self) -> &[MerkleNode] {
        &self.nodes
    }

    /// Leaf hashes in tree order (ascending).
    pub fn leaves(&self) -> impl Iterator<Item = B256> + '_ {
        self.nodes[..self.leaf_count].iter().map(|node| node.hash)
    }

    pub fn contains(&self, leaf: &B256) -> bool {
        self.leaf_positions.contains_key(leaf)
    }

    /// Arena index of a leaf.
    pub fn leaf_position(&self, leaf: &B256) -> ClaimTreeResult<usize> {
        self.leaf_positions
            .get(leaf)
            .copied()
            .ok_or(ClaimTreeError::LeafNotFound { leaf: *leaf })
    }
}

#[cfg(not(feature = "parallel"))]
fn sort_leaves(leaves: &mut [B256]) {
    leaves.sort_unstable();
}

#[cfg(feature = "parallel")]
fn sort_leaves(leaves: &mut [B256]) {
    leaves.par_sort_unstable();
}

/// Parent hashes for every complete pair of `level`, in order.
#[cfg(not(feature = "parallel"))]
fn hash_level(nodes: &[MerkleNode], level: &[usize]) -> Vec<B256> {
    level
        .chunks_exact(2)
        .map(|pair| GiveawayHasher::hash_pair(&nodes[pair[0]].hash, &nodes[pair[1]].hash))
        .collect()
}

#[cfg(feature = "parallel")]
fn hash_level(nodes: &[MerkleNode], level: &[usize]) -> Vec<B256> {
    level
        .par_chunks_exact(2)
        .map(|pair| GiveawayHasher::hash_pair(&nodes[pair[0]].hash, &nodes[pair[1]].hash))
        .collect()
}
