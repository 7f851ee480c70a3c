/*!
# Giveaway Compiler

Turns a raw claim set into the two artifacts the verifier consumes: the
root to register, and one proof per claim.

## Steps
- Bound and normalize the raw records
- Attach salts from the caller's [`SaltSource`]
- Hash every salted claim into a leaf
- Build the tree and emit a self-checked proof for each claim

Any failure aborts the whole build; a root is never returned for a subset of
the input.
*/

use alloy_primitives::{B256, U256};
use tracing::info;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    assign_salts, hash_claim, normalize_claims, BuildConfig, ClaimMerkleTree, ClaimTreeError,
    ClaimTreeResult, Proof, ProofFormat, RawClaim, SaltSource, SaltedClaim,
};

/// Expiry passed alongside the root when registering a giveaway that never
/// expires.
pub const NO_EXPIRY: U256 = U256::MAX;

/// A salted claim together with its proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimWithProof {
    pub claim: SaltedClaim,
    pub proof: Proof,
}

/// Complete compilation result
#[derive(Debug, Clone)]
pub struct CompiledGiveaway {
    pub root: B256,
    pub tree: ClaimMerkleTree,
    /// Claims in input order
    pub claims: Vec<ClaimWithProof>,
}

impl CompiledGiveaway {
    pub fn claim_by_index(&self, index: u64) -> Option<&ClaimWithProof> {
        self.claims.iter().find(|entry| entry.claim.index() == index)
    }
}

/// Compile raw claim records into a root and per-claim proofs.
pub fn compile_giveaway<S>(
    raw_claims: &[RawClaim],
    config: &BuildConfig,
    salts: &mut S,
) -> ClaimTreeResult<CompiledGiveaway>
where
    S: SaltSource + ?Sized,
{
    if raw_claims.is_empty() {
        return Err(ClaimTreeError::EmptyClaimSet);
    }
    if raw_claims.len() > config.max_claims {
        return Err(ClaimTreeError::ClaimSetTooLarge {
            count: raw_claims.len(),
            max: config.max_claims,
        });
    }

    let claims = normalize_claims(raw_claims, config.duplicate_policy)?;
    let salted = assign_salts(claims, salts)?;

    compile_salted_claims(salted, config.proof_format)
}

/// Build the tree and proofs for claims whose salts are already fixed.
///
/// Rebuilding from the same salted claims in any order yields the same root.
pub fn compile_salted_claims(
    salted: Vec<SaltedClaim>,
    format: ProofFormat,
) -> ClaimTreeResult<CompiledGiveaway> {
    let leaves = hash_leaves(&salted);
    let tree = ClaimMerkleTree::from_leaves(leaves.clone())?;

    let claims = salted
        .into_iter()
        .zip(leaves)
        .map(|(claim, leaf)| {
            let proof = tree.checked_proof(&leaf, format)?;
            Ok(ClaimWithProof { claim, proof })
        })
        .collect::<ClaimTreeResult<Vec<_>>>()?;

    let root = tree.root();
    info!(
        "Compiled giveaway: {} claims, root 0x{}",
        claims.len(),
        hex::encode(root)
    );

    Ok(CompiledGiveaway { root, tree, claims })
}

#[cfg(not(feature = "parallel"))]
fn hash_leaves(salted: &[SaltedClaim]) -> Vec<B256> {
    salted.iter().map(hash_claim).collect()
}

// Collected in input order; the tree sorts them afterwards.
#[cfg(feature = "parallel")]
fn hash_leaves(salted: &[SaltedClaim]) -> Vec<B256> {
    salted.par_iter().map(hash_claim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DerivedSalts, RawEntitlement};
    use serde_json::json;

    fn raw(to_byte: u8, amount: u64) -> RawClaim {
        RawClaim {
            to: Some(format!("0x{}", hex::encode([to_byte; 20]))),
            entitlements: vec![RawEntitlement {
                contract_address: Some(format!("0x{}", hex::encode([0xc1u8; 20]))),
                id: None,
                amount: Some(json!(amount)),
            }],
            index: None,
            salt: None,
        }
    }

    #[test]
    fn test_compile_basic() {
        let raw_claims: Vec<RawClaim> = (1..=5).map(|i| raw(i, i as u64 * 100)).collect();
        let compiled =
            compile_giveaway(&raw_claims, &BuildConfig::default(), &mut DerivedSalts::default())
                .unwrap();

        assert_eq!(compiled.claims.len(), 5);
        assert_eq!(compiled.root, compiled.tree.root());

        for (position, entry) in compiled.claims.iter().enumerate() {
            assert_eq!(entry.claim.index(), position as u64, "Claims stay in input order");
            assert_eq!(entry.proof.leaf, entry.claim.leaf());
            assert!(entry.proof.verify(&compiled.root));
        }
    }

    #[test]
    fn test_empty_claim_set() {
        let err = compile_giveaway(&[], &BuildConfig::default(), &mut DerivedSalts::default())
            .unwrap_err();
        assert_eq!(err, ClaimTreeError::EmptyClaimSet);
    }

    #[test]
    fn test_claim_set_bound() {
        let config = BuildConfig {
            max_claims: 2,
            ..Default::default()
        };
        let raw_claims: Vec<RawClaim> = (1..=3).map(|i| raw(i, 1)).collect();

        let err = compile_giveaway(&raw_claims, &config, &mut DerivedSalts::default()).unwrap_err();
        assert_eq!(err, ClaimTreeError::ClaimSetTooLarge { count: 3, max: 2 });
    }

    #[test]
    fn test_claim_error_aborts_whole_build() {
        let mut raw_claims: Vec<RawClaim> = (1..=3).map(|i| raw(i, 1)).collect();
        raw_claims[1].entitlements[0].amount = Some(json!(-3));

        let err = compile_giveaway(&raw_claims, &BuildConfig::default(), &mut DerivedSalts::default())
            .unwrap_err();
        assert!(matches!(err, ClaimTreeError::ClaimData { index: 1, .. }));
    }

    #[test]
    fn test_identical_salted_claims_are_duplicate_leaves() {
        let claim = crate::normalize_claim(&raw(1, 1), 0, Default::default()).unwrap();
        let salted = vec![
            SaltedClaim::new(claim.clone(), B256::repeat_byte(1)),
            SaltedClaim::new(claim, B256::repeat_byte(1)),
        ];

        let err = compile_salted_claims(salted, ProofFormat::SortedPair).unwrap_err();
        assert!(matches!(err, ClaimTreeError::DuplicateLeaf { .. }));
    }

    #[test]
    fn test_positional_format_flows_through() {
        let raw_claims: Vec<RawClaim> = (1..=3).map(|i| raw(i, 1)).collect();
        let config = BuildConfig {
            proof_format: ProofFormat::Positional,
            ..Default::default()
        };

        let compiled = compile_giveaway(&raw_claims, &config, &mut DerivedSalts::default()).unwrap();
        assert!(compiled.claims.iter().all(|c| c.proof.positions.is_some()));
    }

    #[test]
    fn test_claim_by_index() {
        let mut raw_claims: Vec<RawClaim> = (1..=2).map(|i| raw(i, 1)).collect();
        raw_claims[1].index = Some(77);

        let compiled =
            compile_giveaway(&raw_claims, &BuildConfig::default(), &mut DerivedSalts::default())
                .unwrap();
        assert!(compiled.claim_by_index(77).is_some());
        assert!(compiled.claim_by_index(1).is_none());
    }
}
