use crate::error::{CliError, CliResult};
use csv::Writer;
use giveaway_claims::ClaimsCsvRow;
use giveaway_merkle::Address;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tracing::info;

/// Token contracts used by the fixtures. The first is fungible (token id 0),
/// the others hand out ids.
const FIXTURE_CONTRACTS: usize = 4;

/// Maximum token id drawn for non-fungible fixture entitlements
const MAX_FIXTURE_TOKEN_ID: u64 = 1_000;

/// Generate a deterministic claims CSV for testing
pub fn execute(count: u64, seed: u64, output: PathBuf) -> CliResult<()> {
    if count == 0 {
        return Err(CliError::InvalidConfig(
            "Fixture count must be at least 1".to_string(),
        ));
    }

    println!("Generating {} fixture claims with seed {}", count, seed);

    let mut rng = StdRng::seed_from_u64(seed);
    let contracts: Vec<Address> = (0..FIXTURE_CONTRACTS)
        .map(|_| random_address(&mut rng))
        .collect();

    let mut writer = Writer::from_path(&output)?;
    let mut rows = 0usize;

    for i in 0..count {
        let recipient = random_address(&mut rng).to_checksum(None);

        // Distinct contracts per claim keep the fixtures free of duplicates
        let entitlement_count = rng.gen_range(1..=FIXTURE_CONTRACTS);
        for (slot, contract) in contracts.iter().take(entitlement_count).enumerate() {
            let (token_id, amount) = if slot == 0 {
                (String::new(), rng.gen_range(1..=1_000_000u64) * 1_000_000_000_000)
            } else {
                (
                    rng.gen_range(1..=MAX_FIXTURE_TOKEN_ID).to_string(),
                    rng.gen_range(1..=5u64),
                )
            };

            writer.serialize(ClaimsCsvRow {
                recipient: recipient.clone(),
                contract: contract.to_checksum(None),
                token_id,
                amount: amount.to_string(),
            })?;
            rows += 1;
        }

        // Progress indicator for large datasets
        if count > 10_000 && i % 10_000 == 0 {
            info!("Generated {} / {} fixture claims", i, count);
        }
    }

    writer.flush()?;

    println!("✅ Generated {} claims ({} rows): {}", count, rows, output.display());
    Ok(())
}

fn random_address(rng: &mut StdRng) -> Address {
    let mut bytes: [u8; 20] = rng.gen();
    if bytes.iter().all(|&b| b == 0) {
        bytes[19] = 1;
    }
    Address::from(bytes)
}
