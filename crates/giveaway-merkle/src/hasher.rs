use alloy_primitives::{keccak256, B256};
use rs_merkle::Hasher;

/// Merkle hasher matching the giveaway verifier's node hashing.
///
/// ## Hashing Scheme
///
/// - **Leaf nodes**: `keccak256(abi_encoded_claim)`, see [`crate::leaf`]
/// - **Internal nodes**: `keccak256(min(a, b) || max(a, b))`
/// - **Odd node**: promoted to the next level unchanged
///
/// Sorting each pair before hashing means a proof is just the list of sibling
/// hashes. The verifier never needs to know whether a sibling sat on the left
/// or the right.
///
/// There is no leaf/internal prefix. Leaves are keccak digests of encodings
/// that are always at least 7 words long, so a 64-byte internal preimage can
/// never be mistaken for a leaf preimage.
#[derive(Clone, Debug)]
pub struct GiveawayHasher;

impl GiveawayHasher {
    /// Combine two child hashes with the sorted-pair rule.
    pub fn hash_pair(a: &B256, b: &B256) -> B256 {
        if a <= b {
            Self::hash_ordered(a, b)
        } else {
            Self::hash_ordered(b, a)
        }
    }

    /// `keccak256(left || right)` without reordering.
    pub fn hash_ordered(left: &B256, right: &B256) -> B256 {
        let mut preimage = [0u8; 64];
        preimage[..32].copy_from_slice(left.as_slice());
        preimage[32..].copy_from_slice(right.as_slice());
        keccak256(preimage)
    }
}

impl Hasher for GiveawayHasher {
    type Hash = [u8; 32];

    fn hash(data: &[u8]) -> [u8; 32] {
        keccak256(data).0
    }

    fn concat_and_hash(left: &Self::Hash, right: Option<&Self::Hash>) -> Self::Hash {
        match right {
            Some(right_hash) => {
                Self::hash_pair(&B256::from(*left), &B256::from(*right_hash)).0
            }
            // No right sibling: the node is promoted as-is
            None => *left,
        }
    }
}
