/*!
# Giveaway Claim Files

File formats around a giveaway build.

## Inputs

- **JSON claim set**: an array of claim records
  (`to`, `entitlements[{contractAddress, id, amount}]`, optional `index`/`salt`)
- **CSV claim set**: `recipient,contract,token_id,amount`, one row per
  entitlement; rows for the same recipient form one claim

## Outputs

- **Root hash file**: the root as `0x`-prefixed hex, no trailing newline
- **Proof file**: a JSON array of [`ClaimProofRecord`], one per claim

Both outputs live under `<out_dir>/<network>/`, see [`ArtifactPaths`].

## Usage

```rust,no_run
use giveaway_claims::{read_claims, read_proofs_json, read_root_hash, verify_record, ClaimsIoResult};

fn example() -> ClaimsIoResult<()> {
    let claims = read_claims("claims.csv")?;
    println!("{} claims", claims.len());

    let root = read_root_hash("root.json")?;
    for record in read_proofs_json("proofs.json")? {
        assert!(verify_record(&record, &root)?);
    }
    Ok(())
}
```
*/

pub mod errors;
pub mod schemas;
pub mod validation;

// Re-export main types for convenience
pub use errors::{ClaimsIoError, ClaimsIoResult};
pub use schemas::{
    format_b256, verify_record, ClaimProofRecord, ClaimsCsvRow, EntitlementRecord,
    CLAIMS_CSV_HEADERS,
};
pub use validation::{
    read_claims, read_claims_csv, read_claims_json, read_proofs_json, read_root_hash,
    write_artifacts, write_proofs_json, write_root_hash, ArtifactPaths,
};
