use giveaway_merkle::ClaimTreeError;
use thiserror::Error;

pub type ClaimsIoResult<T> = Result<T, ClaimsIoError>;

#[derive(Error, Debug)]
pub enum ClaimsIoError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema validation error: {0}")]
    SchemaValidation(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Claim tree error: {0}")]
    ClaimTree(#[from] ClaimTreeError),
}
