use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the domain, store and storage layers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Transaction not found: {0}")]
    NotFound(String),
    #[error("Failed to read `{collection}`: {message}")]
    PersistenceRead { collection: String, message: String },
    #[error("Failed to write `{collection}`: {message}")]
    PersistenceWrite { collection: String, message: String },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, LedgerError>;

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    /// True for the two persistence variants the store recovers from locally.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            LedgerError::PersistenceRead { .. } | LedgerError::PersistenceWrite { .. }
        )
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

/// Result of a mutating store call: the in-memory outcome plus any write that failed to
/// reach the persistence backend.
#[derive(Debug, Clone)]
#[must_use]
pub struct Committed<T> {
    pub value: T,
    pub write_failures: Vec<LedgerError>,
}

impl<T> Committed<T> {
    pub fn new(value: T, write_failures: Vec<LedgerError>) -> Self {
        Self {
            value,
            write_failures,
        }
    }

    pub fn is_durable(&self) -> bool {
        self.write_failures.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Surfaces the first write failure as an error for callers that require durability.
    pub fn durable(self) -> Result<T> {
        match self.write_failures.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }

    pub fn map<U, F>(self, f: F) -> Committed<U>
    where
        F: FnOnce(T) -> U,
    {
        Committed {
            value: f(self.value),
            write_failures: self.write_failures,
        }
    }
}
