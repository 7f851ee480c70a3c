use crate::config::{GiveawayConfig, DEFAULT_OUT_DIR};
use crate::error::{CliError, CliResult};
use giveaway_claims::{format_b256, read_claims, write_artifacts, ArtifactPaths, ClaimProofRecord};
use giveaway_merkle::{
    compile_giveaway, parse_salt, DerivedSalts, DuplicatePolicy, ProofFormat, RandomSalts,
    SaltSource, B256, NO_EXPIRY,
};
use std::path::PathBuf;
use tracing::{info, warn};

/// Flags of the `build` command, before merging with the config file
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub claims: PathBuf,
    pub giveaway: Option<String>,
    pub network: Option<String>,
    pub chain_id: Option<u64>,
    pub live: bool,
    pub seed: Option<String>,
    pub config: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub allow_duplicates: bool,
    pub positional: bool,
}

#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub root: B256,
    pub claim_count: usize,
    pub paths: ArtifactPaths,
}

pub fn execute(options: BuildOptions) -> CliResult<BuildSummary> {
    let config = match &options.config {
        Some(path) => GiveawayConfig::load(path)?,
        None => GiveawayConfig::default(),
    };

    let giveaway = options
        .giveaway
        .or(config.name)
        .ok_or_else(|| missing("giveaway name", "--giveaway", "name"))?;
    let network = options
        .network
        .or(config.network)
        .ok_or_else(|| missing("network", "--network", "network"))?;
    let chain_id = options
        .chain_id
        .or(config.chain_id)
        .ok_or_else(|| missing("chain id", "--chain-id", "chain_id"))?;
    let out_dir = options
        .out_dir
        .or(config.out_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
    let live = options.live || config.live;
    let seed = options.seed.or(config.seed);

    let mut build_config = config.build;
    if options.allow_duplicates {
        build_config.duplicate_policy = DuplicatePolicy::Allow;
    }
    if options.positional {
        build_config.proof_format = ProofFormat::Positional;
    }

    println!("Building giveaway '{}' on {} ({})", giveaway, network, chain_id);
    println!("Claims: {}", options.claims.display());

    let mut salts = salt_source(live, seed.as_deref())?;

    let raw_claims = read_claims(&options.claims)?;
    let compiled = compile_giveaway(&raw_claims, &build_config, salts.as_mut())?;

    let paths = ArtifactPaths::new(&out_dir, &network, &giveaway, chain_id);
    let records: Vec<ClaimProofRecord> = compiled.claims.iter().map(Into::into).collect();
    write_artifacts(&paths, &records, &compiled.root)?;

    info!(
        "Register with addNewGiveaway({}, {})",
        format_b256(&compiled.root),
        format_b256(&B256::from(NO_EXPIRY.to_be_bytes::<32>()))
    );

    let summary = BuildSummary {
        root: compiled.root,
        claim_count: compiled.claims.len(),
        paths,
    };

    println!("\n✅ Giveaway built");
    println!("  - Claims: {}", summary.claim_count);
    println!("  - Root: {}", format_b256(&summary.root));
    println!("  - Proofs: {}", summary.paths.proofs.display());
    println!("  - Root hash: {}", summary.paths.root_hash.display());

    Ok(summary)
}

fn salt_source(live: bool, seed: Option<&str>) -> CliResult<Box<dyn SaltSource>> {
    if live {
        if seed.is_some() {
            return Err(CliError::InvalidConfig(
                "A salt seed cannot be used on a live network".to_string(),
            ));
        }
        info!("Live network: drawing salts from the OS random number generator");
        return Ok(Box::new(RandomSalts::from_entropy()));
    }

    let salts = match seed {
        Some(seed) => DerivedSalts::new(
            parse_salt(seed).map_err(|e| CliError::InvalidHex(format!("seed: {}", e)))?,
        ),
        None => DerivedSalts::default(),
    };
    warn!(
        "Test network: salts are derived from seed {} and are predictable",
        format_b256(&salts.seed())
    );
    Ok(Box::new(salts))
}

fn missing(what: &str, flag: &str, key: &str) -> CliError {
    CliError::InvalidConfig(format!(
        "Missing {}: pass {} or set `{}` in the config file",
        what, flag, key
    ))
}
