/*!
# Claim File Validation & I/O

Readers for claim-set files and writers for the two build artifacts. The
artifact names match the ones the deployment scripts look for, so a root
written here can be picked up by the registration step unchanged.
*/

use crate::{
    errors::{ClaimsIoError, ClaimsIoResult},
    schemas::{format_b256, ClaimProofRecord, ClaimsCsvRow, CLAIMS_CSV_HEADERS},
};
use csv::Reader;
use giveaway_merkle::{parse_salt, RawClaim, RawEntitlement, B256};
use serde_json::Value;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ================================================================================================
// Artifact Paths
// ================================================================================================

/// Locations of the artifacts for one giveaway on one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub proofs: PathBuf,
    pub root_hash: PathBuf,
}

impl ArtifactPaths {
    pub fn new<P: AsRef<Path>>(out_dir: P, network: &str, giveaway: &str, chain_id: u64) -> Self {
        let dir = out_dir.as_ref().join(network);
        Self {
            proofs: dir.join(format!(
                ".multi_claims_proofs_{}_{}.json",
                giveaway, chain_id
            )),
            root_hash: dir.join(format!(
                ".multi_claims_root_hash_{}_{}.json",
                giveaway, chain_id
            )),
        }
    }
}

// ================================================================================================
// Claim-set Reading with Validation
// ================================================================================================

/// Read a JSON claim-set file (an array of claim records).
pub fn read_claims_json<P: AsRef<Path>>(path: P) -> ClaimsIoResult<Vec<RawClaim>> {
    let file = File::open(path.as_ref())?;
    let claims: Vec<RawClaim> = serde_json::from_reader(BufReader::new(file))?;

    if claims.is_empty() {
        return Err(ClaimsIoError::SchemaValidation(
            "Claims JSON file is empty".to_string(),
        ));
    }

    debug!(
        "Read {} claims from {}",
        claims.len(),
        path.as_ref().display()
    );
    Ok(claims)
}

/// Read a flat claims CSV, merging rows that share a recipient.
///
/// Claims come out in the order their recipient first appears.
pub fn read_claims_csv<P: AsRef<Path>>(path: P) -> ClaimsIoResult<Vec<RawClaim>> {
    let file = File::open(path.as_ref())?;
    let mut rdr = Reader::from_reader(file);

    // Validate headers
    let headers = rdr.headers()?;
    validate_headers(headers.iter(), CLAIMS_CSV_HEADERS, "claims.csv")?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: ClaimsCsvRow = result?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ClaimsIoError::SchemaValidation(
            "Claims CSV file is empty".to_string(),
        ));
    }

    let claims = group_rows(rows);
    debug!(
        "Read {} claims from {}",
        claims.len(),
        path.as_ref().display()
    );
    Ok(claims)
}

/// Read either format, picked by file extension (`.csv`, anything else is
/// JSON).
pub fn read_claims<P: AsRef<Path>>(path: P) -> ClaimsIoResult<Vec<RawClaim>> {
    let is_csv = path
        .as_ref()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        read_claims_csv(path)
    } else {
        read_claims_json(path)
    }
}

fn group_rows(rows: Vec<ClaimsCsvRow>) -> Vec<RawClaim> {
    let mut claims: Vec<RawClaim> = Vec::new();
    let mut by_recipient: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let key = row.recipient.trim().to_ascii_lowercase();
        let position = *by_recipient.entry(key).or_insert_with(|| {
            claims.push(RawClaim {
                to: Some(row.recipient.trim().to_string()),
                ..Default::default()
            });
            claims.len() - 1
        });

        let token_id = row.token_id.trim();
        claims[position].entitlements.push(RawEntitlement {
            contract_address: Some(row.contract.trim().to_string()),
            id: (!token_id.is_empty()).then(|| Value::String(token_id.to_string())),
            amount: Some(Value::String(row.amount.trim().to_string())),
        });
    }

    claims
}

// ================================================================================================
// Artifact Writing
// ================================================================================================

/// Write the proof records as a pretty-printed JSON array.
pub fn write_proofs_json<P: AsRef<Path>>(path: P, records: &[ClaimProofRecord]) -> ClaimsIoResult<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let staging = staging_path(path);
    stage_proofs(&staging, records)?;
    fs::rename(&staging, path)?;

    info!("Wrote {} proofs to {}", records.len(), path.display());
    Ok(())
}

/// Write the proof file and the root file of one build.
///
/// Both files are fully written to staging paths before either is renamed
/// into place, so a failed write leaves the previous build's pair untouched.
pub fn write_artifacts(
    paths: &ArtifactPaths,
    records: &[ClaimProofRecord],
    root: &B256,
) -> ClaimsIoResult<()> {
    ensure_parent_dir(&paths.proofs)?;
    ensure_parent_dir(&paths.root_hash)?;

    let proofs_staging = staging_path(&paths.proofs);
    let root_staging = staging_path(&paths.root_hash);

    let staged = stage_proofs(&proofs_staging, records).and_then(|()| {
        fs::write(&root_staging, format_b256(root)).map_err(ClaimsIoError::from)
    });
    if let Err(e) = staged {
        discard_staged(&[&proofs_staging, &root_staging]);
        return Err(e);
    }

    fs::rename(&proofs_staging, &paths.proofs)?;
    fs::rename(&root_staging, &paths.root_hash)?;

    info!(
        "Wrote {} proofs to {} and root {} to {}",
        records.len(),
        paths.proofs.display(),
        format_b256(root),
        paths.root_hash.display()
    );
    Ok(())
}

pub fn read_proofs_json<P: AsRef<Path>>(path: P) -> ClaimsIoResult<Vec<ClaimProofRecord>> {
    let file = File::open(path)?;
    let records: Vec<ClaimProofRecord> = serde_json::from_reader(BufReader::new(file))?;

    if records.is_empty() {
        return Err(ClaimsIoError::SchemaValidation(
            "Proof file is empty".to_string(),
        ));
    }
    Ok(records)
}

/// Write the root as `0x`-prefixed hex with no trailing newline.
///
/// The file is written next to its destination and renamed into place, so a
/// reader never sees a partial root.
pub fn write_root_hash<P: AsRef<Path>>(path: P, root: &B256) -> ClaimsIoResult<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let staging = staging_path(path);
    fs::write(&staging, format_b256(root))?;
    fs::rename(&staging, path)?;

    info!("Wrote root {} to {}", format_b256(root), path.display());
    Ok(())
}

pub fn read_root_hash<P: AsRef<Path>>(path: P) -> ClaimsIoResult<B256> {
    let contents = fs::read_to_string(path)?;
    let contents = contents.trim();
    // Tolerate a JSON-quoted root
    let contents = contents.trim_matches('"');

    parse_salt(contents)
        .map_err(|e| ClaimsIoError::InvalidFormat(format!("Root hash file: {}", e)))
}

fn stage_proofs(staging: &Path, records: &[ClaimProofRecord]) -> ClaimsIoResult<()> {
    let mut writer = BufWriter::new(File::create(staging)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// `<name>.tmp` next to the destination, on the same filesystem.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn discard_staged(staged: &[&Path]) {
    for path in staged {
        if path.is_file() {
            if let Err(e) = fs::remove_file(path) {
                warn!("Could not remove staged file {}: {}", path.display(), e);
            }
        }
    }
}

fn ensure_parent_dir(path: &Path) -> ClaimsIoResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

// ================================================================================================
// Validation Helpers
// ================================================================================================

/// Validate that CSV headers match expected schema exactly
fn validate_headers<'a, I>(actual: I, expected: &[&str], file_type: &str) -> ClaimsIoResult<()>
where
    I: Iterator<Item = &'a str>,
{
    let actual_headers: Vec<&str> = actual.collect();

    if actual_headers.len() != expected.len() {
        return Err(ClaimsIoError::SchemaValidation(format!(
            "{}: expected {} headers, found {}",
            file_type,
            expected.len(),
            actual_headers.len()
        )));
    }

    for (i, (actual, expected)) in actual_headers.iter().zip(expected.iter()).enumerate() {
        if actual != expected {
            return Err(ClaimsIoError::SchemaValidation(format!(
                "{}: header {} should be '{}', found '{}'",
                file_type, i, expected, actual
            )));
        }
    }

    Ok(())
}
