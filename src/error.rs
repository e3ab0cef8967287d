use crate::domain::loan::{LoanId, LoanState, Party};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("loan {0} not found")]
    NotFound(LoanId),
    #[error("{caller} is not allowed to {action} this loan")]
    Unauthorized {
        caller: Party,
        action: &'static str,
    },
    #[error("loan is {state}, action not allowed")]
    InvalidState { state: LoanState },
    #[error("amount must be positive, got {0}")]
    InvalidAmount(Decimal),
    #[error("malformed action: {0}")]
    MalformedAction(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for LoanError {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for LoanError {
    fn from(e: rocksdb::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
