use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Missing file: {0}")]
    MissingFile(String),
    #[error("Invalid format on file: {0}")]
    InvalidFormat(String),
    #[error("Could not read lap data: {0}")]
    Csv(#[from] csv::Error),
}
