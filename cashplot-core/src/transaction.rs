//! Transaction records as they move through the pipeline.
//!
//! Each stage wraps the previous stage's record and adds its own fields:
//! [`NormalizedTransaction`] → [`CategorizedTransaction`] → [`BalanceSnapshot`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CashplotError, Result};

/// The primary cash account every transaction applies to.
pub const MAIN_ACCOUNT: &str = "main";
/// Derived pseudo-account summing all accounts not ignored for net worth.
pub const NET_ACCOUNT: &str = "net";
/// Label assigned by the implicit catch-all rule.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Per-account amounts keyed by account name.
pub type AccountAmounts = BTreeMap<String, Decimal>;

/// Bank-agnostic transaction produced by a source adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    pub date: NaiveDate,
    pub counter_name: String,
    pub counter_account: String,
    pub description: String,
    /// Positive = inflow to the main account, negative = outflow.
    pub change: Decimal,
}

impl NormalizedTransaction {
    pub fn new(
        date: NaiveDate,
        counter_name: impl Into<String>,
        counter_account: impl Into<String>,
        description: impl Into<String>,
        change: Decimal,
    ) -> Self {
        Self {
            date,
            counter_name: counter_name.into(),
            counter_account: counter_account.into(),
            description: description.into(),
            change,
        }
    }

    /// Build a transaction from textual fields, rejecting anything that is not
    /// an ISO date or an exact decimal amount.
    pub fn parse(
        date: &str,
        counter_name: impl Into<String>,
        counter_account: impl Into<String>,
        description: impl Into<String>,
        change: &str,
    ) -> Result<Self> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|e| CashplotError::MalformedInput(format!("invalid date '{date}': {e}")))?;
        Ok(Self::new(
            date,
            counter_name,
            counter_account,
            description,
            parse_amount(change)?,
        ))
    }
}

/// Parse an exact decimal amount such as `-12.50`.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    Decimal::from_str_exact(raw.trim())
        .map_err(|e| CashplotError::MalformedInput(format!("invalid amount '{raw}': {e}")))
}

/// A transaction with exactly one category assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategorizedTransaction {
    #[serde(flatten)]
    pub transaction: NormalizedTransaction,
    pub category: String,
}

impl CategorizedTransaction {
    pub fn new(transaction: NormalizedTransaction, category: impl Into<String>) -> Self {
        Self {
            transaction,
            category: category.into(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.transaction.date
    }

    pub fn change(&self) -> Decimal {
        self.transaction.change
    }
}

/// A categorized transaction plus the ledger state right after it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    #[serde(flatten)]
    pub transaction: CategorizedTransaction,
    /// Delta this transaction caused per account, including [`NET_ACCOUNT`].
    pub changes: AccountAmounts,
    /// Running totals immediately after this transaction, including [`NET_ACCOUNT`].
    pub balances: AccountAmounts,
}

impl BalanceSnapshot {
    pub fn date(&self) -> NaiveDate {
        self.transaction.date()
    }

    pub fn change(&self) -> Decimal {
        self.transaction.change()
    }

    pub fn category(&self) -> &str {
        &self.transaction.category
    }

    pub fn balance(&self, account: &str) -> Decimal {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn account_change(&self, account: &str) -> Decimal {
        self.changes.get(account).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    #[test]
    fn test_parse_transaction() {
        let txn = NormalizedTransaction::parse(
            "2020-06-28",
            "Company Inc.",
            "NL01WORK0987654321",
            "Salary for June 2020",
            "2000.00",
        )
        .unwrap();
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2020, 6, 28).unwrap());
        assert_eq!(txn.change, dec!(2000));
    }

    #[test]
    fn test_parse_rejects_non_numeric_change() {
        let err = NormalizedTransaction::parse("2020-06-28", "A", "B", "C", "12,3x").unwrap_err();
        assert!(matches!(err, CashplotError::MalformedInput(_)));
        assert!(parse_amount("1e5").is_err());
    }

    #[test]
    fn test_structural_equality_and_hash() {
        let date = NaiveDate::from_ymd_opt(2020, 6, 29).unwrap();
        let a = NormalizedTransaction::new(date, "Mr. G", "NL00", "Savings", dec!(-100));
        let b = NormalizedTransaction::new(date, "Mr. G", "NL00", "Savings", dec!(-100.00));
        assert_eq!(a, b);

        let set: HashSet<_> = [
            CategorizedTransaction::new(a.clone(), "Emergency"),
            CategorizedTransaction::new(b, "Emergency"),
            CategorizedTransaction::new(a, "Loan"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
    }
}
