use giveaway_claims::ClaimsIoError;
use giveaway_merkle::ClaimTreeError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Claim file error: {0}")]
    ClaimsIo(#[from] ClaimsIoError),

    #[error("Claim tree error: {0}")]
    ClaimTree(#[from] ClaimTreeError),

    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Verification failed: {0}")]
    Verification(String),
}
