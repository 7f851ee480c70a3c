use giveaway_merkle::{
    compile_giveaway, BuildConfig, ClaimTreeError, DerivedSalts, ProofFormat, RandomSalts, RawClaim,
    RawEntitlement, B256,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::collections::HashSet;

fn raw_claims(count: u64) -> Vec<RawClaim> {
    (1..=count)
        .map(|n| RawClaim {
            to: Some(format!("0xbb{:038x}", n)),
            entitlements: vec![RawEntitlement {
                contract_address: Some("0x00000000000000000000000000000000000000c1".to_string()),
                id: Some(json!(n % 3)),
                amount: Some(json!(n.to_string())),
            }],
            index: None,
            salt: None,
        })
        .collect()
}

#[test]
fn test_entropy_salts_verify() {
    let raw = raw_claims(25);
    let compiled = compile_giveaway(
        &raw,
        &BuildConfig::default(),
        &mut RandomSalts::from_entropy(),
    )
    .unwrap();

    let salts: HashSet<B256> = compiled.claims.iter().map(|c| c.claim.salt).collect();
    assert_eq!(salts.len(), 25, "Every claim should get its own salt");

    for entry in &compiled.claims {
        assert!(entry.proof.verify(&compiled.root));
    }
}

#[test]
fn test_entropy_salts_are_not_reused_across_builds() {
    let raw = raw_claims(10);
    let config = BuildConfig::default();

    let first = compile_giveaway(&raw, &config, &mut RandomSalts::from_entropy()).unwrap();
    let second = compile_giveaway(&raw, &config, &mut RandomSalts::from_entropy()).unwrap();

    assert_ne!(first.root, second.root);
    let first_salts: HashSet<B256> = first.claims.iter().map(|c| c.claim.salt).collect();
    assert!(second
        .claims
        .iter()
        .all(|c| !first_salts.contains(&c.claim.salt)));
}

#[test]
fn test_seeded_rng_substitutes_for_entropy() {
    let raw = raw_claims(6);
    let config = BuildConfig {
        proof_format: ProofFormat::Positional,
        ..Default::default()
    };

    let a = compile_giveaway(&raw, &config, &mut RandomSalts::new(StdRng::seed_from_u64(1))).unwrap();
    let b = compile_giveaway(&raw, &config, &mut RandomSalts::new(StdRng::seed_from_u64(1))).unwrap();
    assert_eq!(a.root, b.root);
    assert_eq!(a.claims, b.claims);

    let derived = compile_giveaway(&raw, &config, &mut DerivedSalts::default()).unwrap();
    assert_ne!(a.root, derived.root);
}

#[test]
fn test_supplied_salts_survive_compilation() {
    let mut raw = raw_claims(3);
    let supplied = B256::repeat_byte(0x5a);
    raw[1].salt = Some(format!("0x{}", hex::encode(supplied)));

    let compiled = compile_giveaway(
        &raw,
        &BuildConfig::default(),
        &mut RandomSalts::from_entropy(),
    )
    .unwrap();

    assert_eq!(compiled.claims[1].claim.salt, supplied);
    assert!(compiled.claims[1].proof.verify(&compiled.root));
}

#[test]
fn test_clashing_claim_index_is_rejected_before_salting() {
    let mut raw = raw_claims(2);
    raw[1].index = Some(0);

    let err = compile_giveaway(
        &raw,
        &BuildConfig::default(),
        &mut RandomSalts::from_entropy(),
    )
    .unwrap_err();
    assert!(matches!(err, ClaimTreeError::ClaimData { index: 0, .. }));

    let err = compile_giveaway(&raw, &BuildConfig::default(), &mut DerivedSalts::default())
        .unwrap_err();
    assert!(matches!(err, ClaimTreeError::ClaimData { index: 0, .. }));
}
