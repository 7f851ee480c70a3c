use alloy_primitives::B256;
use thiserror::Error;

pub type ClaimTreeResult<T> = Result<T, ClaimTreeError>;

/// Errors raised while compiling a claim set into a tree.
///
/// Every variant aborts the whole build. A root is only ever produced for a
/// claim set in which every claim was accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimTreeError {
    #[error("Invalid claim data at index {index}: {reason}")]
    ClaimData { index: u64, reason: String },

    #[error("Salt collision for claim {index}")]
    SaltCollision { index: u64 },

    #[error("Duplicate leaf {leaf}")]
    DuplicateLeaf { leaf: B256 },

    #[error("Claim set is empty")]
    EmptyClaimSet,

    #[error("Leaf {leaf} not found in tree")]
    LeafNotFound { leaf: B256 },

    #[error("Proof for leaf {leaf} does not fold to the tree root")]
    EncodingMismatch { leaf: B256 },

    #[error("Claim set too large: {count} claims (max: {max})")]
    ClaimSetTooLarge { count: usize, max: usize },
}

impl ClaimTreeError {
    pub(crate) fn claim_data(index: u64, reason: impl Into<String>) -> Self {
        Self::ClaimData {
            index,
            reason: reason.into(),
        }
    }
}
