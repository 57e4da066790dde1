//! cashplot-core: transaction records, calendar periods, configuration and errors
//! shared by the ingest, finance and cli crates.

pub mod config;
pub mod error;
pub mod period;
pub mod transaction;

pub use config::{Config, MatchField, MatchPredicate, MatchRule, RawAmount, RawConfig, RawMatchRule};
pub use error::{CashplotError, Result};
pub use period::{Period, PeriodBucket};
pub use transaction::{
    AccountAmounts, BalanceSnapshot, CategorizedTransaction, MAIN_ACCOUNT, NET_ACCOUNT,
    NormalizedTransaction, UNCATEGORIZED, parse_amount,
};
