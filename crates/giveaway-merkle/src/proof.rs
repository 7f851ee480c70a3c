use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use crate::{ClaimMerkleTree, ClaimTreeError, ClaimTreeResult, GiveawayHasher};

/// Shape of the proofs handed to the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofFormat {
    /// Sibling hashes only; the verifier sorts each pair itself.
    #[default]
    SortedPair,
    /// Sibling hashes plus one bit per sibling, for verifiers that want
    /// explicit left/right order.
    Positional,
}

/// Membership proof for one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub leaf: B256,

    /// Sibling hashes from the leaf up to (excluding) the root.
    pub siblings: Vec<B256>,

    /// `positions[i]` is true when `siblings[i]` is the right-hand operand.
    /// Only present for [`ProofFormat::Positional`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<bool>>,
}

impl Proof {
    /// Root obtained by folding the siblings into the leaf.
    ///
    /// With positions present the fold follows them literally, otherwise each
    /// step uses the sorted-pair rule.
    pub fn compute_root(&self) -> B256 {
        match &self.positions {
            Some(positions) => compute_root_positional(&self.leaf, &self.siblings, positions),
            None => compute_root(&self.leaf, &self.siblings),
        }
    }

    pub fn verify(&self, root: &B256) -> bool {
        if let Some(positions) = &self.positions {
            if positions.len() != self.siblings.len() {
                return false;
            }
        }
        self.compute_root() == *root
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }
}

/// Fold `siblings` into `leaf` with the sorted-pair rule, the same way the
/// on-chain verifier does.
pub fn compute_root(leaf: &B256, siblings: &[B256]) -> B256 {
    siblings.iter().fold(*leaf, |node, sibling| {
        GiveawayHasher::hash_pair(&node, sibling)
    })
}

fn compute_root_positional(leaf: &B256, siblings: &[B256], positions: &[bool]) -> B256 {
    siblings
        .iter()
        .zip(positions)
        .fold(*leaf, |node, (sibling, &sibling_is_right)| {
            if sibling_is_right {
                GiveawayHasher::hash_ordered(&node, sibling)
            } else {
                GiveawayHasher::hash_ordered(sibling, &node)
            }
        })
}

/// Check a sorted-pair proof against a root.
pub fn verify_proof(leaf: &B256, siblings: &[B256], root: &B256) -> bool {
    compute_root(leaf, siblings) == *root
}

impl ClaimMerkleTree {
    /// Sibling path from `leaf` to the root.
    ///
    /// Levels where the node was promoted without a partner contribute no
    /// sibling, so proofs in an unbalanced tree may be shorter than its depth.
    pub fn proof_for_leaf(&self, leaf: &B256, format: ProofFormat) -> ClaimTreeResult<Proof> {
        let nodes = self.nodes();
        let mut current = self.leaf_position(leaf)?;
        let mut siblings = Vec::new();
        let mut positions = Vec::new();

        while let Some(parent) = nodes[current].parent {
            let parent_node = &nodes[parent];
            let sibling = if parent_node.left == Some(current) {
                parent_node.right
            } else {
                parent_node.left
            };

            if let Some(sibling) = sibling {
                let sibling_hash = nodes[sibling].hash;
                // hash_pair puts the smaller hash on the left
                positions.push(nodes[current].hash <= sibling_hash);
                siblings.push(sibling_hash);
            }

            current = parent;
        }

        Ok(Proof {
            leaf: *leaf,
            siblings,
            positions: match format {
                ProofFormat::SortedPair => None,
                ProofFormat::Positional => Some(positions),
            },
        })
    }

    /// Like [`Self::proof_for_leaf`], but folds the proof before returning
    /// it. A proof that does not reproduce the root is never handed out.
    pub fn checked_proof(&self, leaf: &B256, format: ProofFormat) -> ClaimTreeResult<Proof> {
        let proof = self.proof_for_leaf(leaf, format)?;
        if !proof.verify(&self.root()) {
            return Err(ClaimTreeError::EncodingMismatch { leaf: *leaf });
        }
        Ok(proof)
    }
}
