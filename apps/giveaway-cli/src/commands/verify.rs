use crate::error::{CliError, CliResult};
use giveaway_claims::{format_b256, read_proofs_json, read_root_hash, verify_record};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Re-derive every leaf in a proof file and fold its proof against the root.
pub fn execute(proofs: PathBuf, root: PathBuf) -> CliResult<usize> {
    let root = read_root_hash(&root)?;
    let records = read_proofs_json(&proofs)?;

    println!("Verifying {} proofs against root {}", records.len(), format_b256(&root));

    let mut failed = Vec::new();
    let mut repeated = Vec::new();
    let mut seen_indexes = HashSet::new();
    for record in &records {
        if !seen_indexes.insert(record.index) {
            warn!("Claim index {} appears more than once", record.index);
            repeated.push(record.index);
        }

        if verify_record(record, &root)? {
            debug!("Claim {} verified", record.index);
        } else {
            warn!("Claim {} does not verify", record.index);
            failed.push(record.index);
        }
    }

    if !failed.is_empty() {
        return Err(CliError::Verification(format!(
            "{} of {} proofs do not fold to the root (claims {:?})",
            failed.len(),
            records.len(),
            failed
        )));
    }

    if !repeated.is_empty() {
        return Err(CliError::Verification(format!(
            "Claim indexes repeated in proof file: {:?}",
            repeated
        )));
    }

    println!("✅ All {} proofs verify", records.len());
    Ok(records.len())
}
