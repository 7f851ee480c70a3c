/*!
# Giveaway Merkle

Salted claim trees for multi-token giveaways.

A giveaway contract stores a single root. Each recipient later redeems by
presenting their claim (recipient, entitlements, salt) and a proof; the
contract re-encodes the claim, hashes it, folds the proof and compares the
result with the stored root. This crate produces those roots and proofs,
byte-compatible with that verifier.

## Pipeline

```text
RawClaim --normalize--> Claim --salt--> SaltedClaim --keccak--> leaf
                                                                  |
                                   root + proofs <--tree----------+
```

## Usage

```rust
use giveaway_merkle::{compile_giveaway, BuildConfig, DerivedSalts, RawClaim};

fn example(raw_claims: &[RawClaim]) -> giveaway_merkle::ClaimTreeResult<()> {
    // Reproducible salts for a test network
    let mut salts = DerivedSalts::default();
    let compiled = compile_giveaway(raw_claims, &BuildConfig::default(), &mut salts)?;

    for entry in &compiled.claims {
        assert!(entry.proof.verify(&compiled.root));
    }
    Ok(())
}
```
*/

pub mod claim;
pub mod compiler;
pub mod config;
pub mod error;
pub mod hasher;
pub mod leaf;
pub mod normalizer;
pub mod proof;
pub mod salt;
pub mod tree;

pub use claim::{Claim, Entitlement, RawClaim, RawEntitlement, SaltedClaim, TokenType};
pub use compiler::{
    compile_giveaway, compile_salted_claims, ClaimWithProof, CompiledGiveaway, NO_EXPIRY,
};
pub use config::{BuildConfig, DuplicatePolicy, DEFAULT_MAX_CLAIMS};
pub use error::{ClaimTreeError, ClaimTreeResult};
pub use hasher::GiveawayHasher;
pub use leaf::{encode_claim, hash_claim};
pub use normalizer::{normalize_claim, normalize_claims, parse_address, parse_salt, parse_uint};
pub use proof::{compute_root, verify_proof, Proof, ProofFormat};
pub use salt::{
    assign_salts, DerivedSalts, RandomSalts, SaltSource, DEFAULT_TEST_SEED, MAX_SALT_ATTEMPTS,
};
pub use tree::{ClaimMerkleTree, MerkleNode};

// Re-export the primitive types used throughout the public API
pub use alloy_primitives::{Address, B256, U256};
