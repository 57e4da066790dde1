//! cashplot-finance: categorization, running balances and period totals

pub mod chart;
pub mod classify;
pub mod ledger;
pub mod totals;

pub use chart::ChartData;
pub use classify::{categorize, categorize_one, categorize_with_rules};
pub use ledger::{accumulate_balances, net_total};
pub use totals::{
    CashFlow, CategoryTotals, aggregate, account_names, cash_flow, categories, last_year_range,
    tick_halves, tick_thirds,
};

use cashplot_core::{BalanceSnapshot, Config, NormalizedTransaction, Result};

/// Categorize and balance a chronologically ordered batch of transactions.
pub fn process(
    transactions: &[NormalizedTransaction],
    config: &Config,
) -> Result<Vec<BalanceSnapshot>> {
    let categorized = categorize(transactions, config)?;
    Ok(accumulate_balances(&categorized, config))
}
