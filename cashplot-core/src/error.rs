//! Error types for the categorize/balance/aggregate pipeline.
//!
//! Every variant is fatal for the batch being processed: there is no retry or
//! partial-result mode. Callers fix the configuration or input and re-run.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CashplotError {
    /// Malformed or inconsistent configuration, surfaced at load time.
    #[error("invalid configuration: {0}")]
    ConfigValidation(String),

    /// No match rule accepted the transaction.
    #[error("no rule matching transaction with date {date} ({description:?})")]
    UnmatchedTransaction {
        date: NaiveDate,
        description: String,
    },

    /// A transaction could not be constructed from its raw fields.
    #[error("malformed transaction: {0}")]
    MalformedInput(String),
}

impl CashplotError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::ConfigValidation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CashplotError>;
