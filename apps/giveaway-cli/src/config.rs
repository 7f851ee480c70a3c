use giveaway_merkle::BuildConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CliResult;

/// Default artifact directory, relative to the working directory
pub const DEFAULT_OUT_DIR: &str = "./secret/multi-giveaway";

/// Giveaway configuration file structure (YAML).
///
/// Every field is optional; command-line flags take precedence.
///
/// ```yaml
/// name: summer_drop
/// network: sepolia
/// chain_id: 11155111
/// live: false
/// build:
///   duplicate_policy: allow
///   proof_format: positional
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GiveawayConfig {
    /// Giveaway name, used in artifact file names
    pub name: Option<String>,

    /// Network name, used as the artifact subdirectory
    pub network: Option<String>,

    pub chain_id: Option<u64>,

    /// Production network: salts come from the OS random number generator
    pub live: bool,

    /// Seed for derived salts on test networks (32 bytes of hex)
    pub seed: Option<String>,

    pub out_dir: Option<PathBuf>,

    pub build: BuildConfig,
}

impl GiveawayConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> CliResult<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }
}
