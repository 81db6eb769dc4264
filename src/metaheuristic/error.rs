use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Returns `InvalidConfiguration(message)` unless `condition` holds.
pub(crate) fn ensure(condition: bool, message: impl Into<String>) -> Result<(), SearchError> {
    if condition {
        Ok(())
    } else {
        Err(SearchError::InvalidConfiguration(message.into()))
    }
}
