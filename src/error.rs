use thiserror::Error;

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(format!("JSON serialization error: {}", err))
    }
}

impl From<::config::ConfigError> for LedgerError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Concurrency conflict: expected tail {expected:?}, found {actual:?}")]
    ConcurrencyConflict {
        expected: Option<String>,
        actual: Option<String>,
    },

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Chain verification failed: {0}")]
    ChainBroken(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl LedgerError {
    pub fn missing_field(field: &str) -> Self {
        Self::InvalidArgument(format!("missing required field: {}", field))
    }

    pub fn chain_broken_at(index: usize, reason: impl std::fmt::Display) -> Self {
        Self::ChainBroken(format!("block {}: {}", index, reason))
    }
}

/// Reject empty or whitespace-only identifiers.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::missing_field(field));
    }
    Ok(())
}
