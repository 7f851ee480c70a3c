use serde::{Deserialize, Serialize};

use crate::ProofFormat;

/// Upper bound on claims per build unless configured otherwise.
pub const DEFAULT_MAX_CLAIMS: usize = 1 << 22;

/// How repeated recipient/token-type combinations are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Any repeated recipient + token type is a claim data error.
    #[default]
    Reject,
    /// Repeats inside one claim are summed; repeats across claims are kept
    /// as separate claims (their salts still keep the leaves distinct).
    Allow,
}

/// Configuration for compiling a claim set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Treatment of duplicate recipient/token-type entries
    pub duplicate_policy: DuplicatePolicy,

    /// Whether proofs carry left/right bits in addition to sibling hashes
    pub proof_format: ProofFormat,

    /// Maximum number of claims accepted in a single build
    pub max_claims: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            proof_format: ProofFormat::SortedPair,
            max_claims: DEFAULT_MAX_CLAIMS,
        }
    }
}
