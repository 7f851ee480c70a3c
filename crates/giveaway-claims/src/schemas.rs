/*!
# Claim File Schemas

Record layouts shared by the `build`, `verify` and `generate-fixtures`
commands:
- the flat claims CSV (input)
- the per-claim proof records (output, JSON)

Amounts and token ids are written as decimal strings so that values above
2^53 survive JSON tooling unchanged.
*/

use giveaway_merkle::{
    parse_address, parse_salt, parse_uint, Claim, ClaimWithProof, Entitlement, Proof,
    SaltedClaim, TokenType, B256,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ClaimsIoError, ClaimsIoResult};

// ================================================================================================
// Claims CSV Schema
// ================================================================================================

/// Expected headers for a claims CSV in exact order
pub const CLAIMS_CSV_HEADERS: &[&str] = &["recipient", "contract", "token_id", "amount"];

/// One entitlement row of a claims CSV.
///
/// Rows sharing a recipient are merged into a single claim. `token_id` may be
/// left empty for fungible tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimsCsvRow {
    pub recipient: String,
    pub contract: String,
    #[serde(default)]
    pub token_id: String,
    pub amount: String,
}

// ================================================================================================
// Proof File Schema
// ================================================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementRecord {
    pub contract_address: String,
    pub id: String,
    pub amount: String,
}

/// Everything a recipient needs to redeem: the claim exactly as it was
/// hashed, its salt and its proof.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimProofRecord {
    pub index: u64,

    /// EIP-55 checksummed recipient
    pub to: String,

    pub entitlements: Vec<EntitlementRecord>,

    /// 32-byte salt, `0x`-prefixed hex
    pub salt: String,

    /// Sibling hashes, `0x`-prefixed hex, leaf level first
    pub proof: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<bool>>,
}

impl From<&ClaimWithProof> for ClaimProofRecord {
    fn from(entry: &ClaimWithProof) -> Self {
        let claim = &entry.claim.claim;
        Self {
            index: claim.index,
            to: claim.recipient.to_checksum(None),
            entitlements: claim
                .entitlements
                .iter()
                .map(|entitlement| EntitlementRecord {
                    contract_address: entitlement.token.contract.to_checksum(None),
                    id: entitlement.token.token_id.to_string(),
                    amount: entitlement.amount.to_string(),
                })
                .collect(),
            salt: format_b256(&entry.claim.salt),
            proof: entry.proof.siblings.iter().map(format_b256).collect(),
            positions: entry.proof.positions.clone(),
        }
    }
}

impl ClaimProofRecord {
    /// Rebuild the salted claim this record was written from.
    ///
    /// Entitlements are taken in file order; a record whose entitlements were
    /// reordered by hand hashes to a different leaf.
    pub fn to_salted_claim(&self) -> ClaimsIoResult<SaltedClaim> {
        let recipient = parse_address(&self.to).map_err(|e| self.invalid("to", e))?;
        let salt = parse_salt(&self.salt).map_err(|e| self.invalid("salt", e))?;

        let entitlements = self
            .entitlements
            .iter()
            .map(|record| {
                let contract = parse_address(&record.contract_address)
                    .map_err(|e| self.invalid("contractAddress", e))?;
                let token_id = parse_uint(&Value::String(record.id.clone()))
                    .map_err(|e| self.invalid("id", e))?;
                let amount = parse_uint(&Value::String(record.amount.clone()))
                    .map_err(|e| self.invalid("amount", e))?;
                Ok(Entitlement {
                    token: TokenType::new(contract, token_id),
                    amount,
                })
            })
            .collect::<ClaimsIoResult<Vec<_>>>()?;

        let claim = Claim {
            index: self.index,
            recipient,
            entitlements,
            salt: Some(salt),
        };
        Ok(SaltedClaim::new(claim, salt))
    }

    /// Proof for the leaf this record hashes to.
    pub fn to_proof(&self) -> ClaimsIoResult<Proof> {
        let siblings = self
            .proof
            .iter()
            .map(|hash| parse_salt(hash).map_err(|e| self.invalid("proof", e)))
            .collect::<ClaimsIoResult<Vec<_>>>()?;

        Ok(Proof {
            leaf: self.to_salted_claim()?.leaf(),
            siblings,
            positions: self.positions.clone(),
        })
    }

    fn invalid(&self, field: &str, reason: String) -> ClaimsIoError {
        ClaimsIoError::InvalidFormat(format!(
            "Proof record {}: field `{}`: {}",
            self.index, field, reason
        ))
    }
}

/// Re-hash a proof record and check that its proof folds to `root`.
pub fn verify_record(record: &ClaimProofRecord, root: &B256) -> ClaimsIoResult<bool> {
    Ok(record.to_proof()?.verify(root))
}

// ================================================================================================
// Hex helpers
// ================================================================================================

pub fn format_b256(hash: &B256) -> String {
    format!("0x{}", hex::encode(hash))
}
