use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the ledger, session, storage, and config layers.
#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Position {index} is out of range for a ledger of {len} transactions")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = StdResult<T, BudgetError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}
