//! Rule-ordered categorization of normalized transactions.
//!
//! Rules are tried in declaration order and the first full match wins. A
//! validated [`Config`] always ends in a catch-all rule, so only hand-built
//! rule lists can leave a transaction unmatched.

use cashplot_core::{
    CashplotError, CategorizedTransaction, Config, MatchRule, NormalizedTransaction, Result,
};

/// Categorize every transaction with the configured rules, preserving order.
pub fn categorize(
    transactions: &[NormalizedTransaction],
    config: &Config,
) -> Result<Vec<CategorizedTransaction>> {
    categorize_with_rules(transactions, config.match_rules())
}

/// Categorize with an explicit rule list. Fails on the first transaction no
/// rule accepts.
pub fn categorize_with_rules(
    transactions: &[NormalizedTransaction],
    rules: &[MatchRule],
) -> Result<Vec<CategorizedTransaction>> {
    log::debug!(
        "categorizing {} transactions with {} rules",
        transactions.len(),
        rules.len()
    );
    transactions
        .iter()
        .map(|txn| categorize_one(txn, rules))
        .collect()
}

pub fn categorize_one(
    txn: &NormalizedTransaction,
    rules: &[MatchRule],
) -> Result<CategorizedTransaction> {
    rules
        .iter()
        .find(|rule| rule.matches(txn))
        .map(|rule| CategorizedTransaction::new(txn.clone(), rule.category.as_str()))
        .ok_or_else(|| CashplotError::UnmatchedTransaction {
            date: txn.date,
            description: txn.description.clone(),
        })
}
