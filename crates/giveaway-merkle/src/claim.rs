use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A claim record as it appears in a claim-set file, before normalization.
///
/// Fields are deliberately loose: amounts and token ids may be JSON numbers,
/// decimal strings or `0x` hex strings, and missing fields are reported by
/// the normalizer rather than by serde.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClaim {
    /// Recipient address, accepted as `to` or `recipient`.
    #[serde(default, alias = "recipient")]
    pub to: Option<String>,

    #[serde(default)]
    pub entitlements: Vec<RawEntitlement>,

    /// Explicit claim index. Defaults to the position in the claim set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,

    /// Pre-assigned salt (32 bytes of hex). Generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntitlement {
    #[serde(default, alias = "contract")]
    pub contract_address: Option<String>,

    /// Token id within the contract; absent means 0 (fungible tokens).
    #[serde(default, alias = "tokenId", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default, alias = "value")]
    pub amount: Option<Value>,
}

/// Token-type identifier: a token contract plus a token id inside it.
///
/// Field order defines the canonical ordering of a claim's entitlements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenType {
    pub contract: Address,
    pub token_id: U256,
}

impl TokenType {
    pub fn new(contract: Address, token_id: U256) -> Self {
        Self { contract, token_id }
    }

    /// A fungible token, identified by its contract alone.
    pub fn fungible(contract: Address) -> Self {
        Self::new(contract, U256::ZERO)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entitlement {
    pub token: TokenType,
    pub amount: U256,
}

/// A normalized claim: checked recipient, entitlements sorted by token type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub index: u64,
    pub recipient: Address,
    pub entitlements: Vec<Entitlement>,
    /// Salt supplied with the input record, kept as-is by the salt generator.
    pub salt: Option<B256>,
}

/// A claim with its final salt. This is exactly what gets encoded into a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaltedClaim {
    pub claim: Claim,
    pub salt: B256,
}

impl SaltedClaim {
    pub fn new(claim: Claim, salt: B256) -> Self {
        Self { claim, salt }
    }

    pub fn index(&self) -> u64 {
        self.claim.index
    }

    /// Leaf hash of this claim as the verifier recomputes it.
    pub fn leaf(&self) -> B256 {
        crate::leaf::hash_claim(self)
    }
}
