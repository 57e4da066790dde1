//! Running balances across the main account, the savings accounts and the
//! derived net account.
//!
//! Every transaction hits the main account. When its category names a savings
//! account, the same amount is mirrored into that account, so a transfer from
//! main to savings leaves net worth unchanged.

use cashplot_core::{
    AccountAmounts, BalanceSnapshot, CategorizedTransaction, Config, MAIN_ACCOUNT, NET_ACCOUNT,
};
use rust_decimal::Decimal;

/// One snapshot per transaction, in input order. Input must already be in
/// chronological order; nothing is reordered or skipped.
pub fn accumulate_balances(
    transactions: &[CategorizedTransaction],
    config: &Config,
) -> Vec<BalanceSnapshot> {
    let mut ledger = Ledger::new(config);
    let snapshots: Vec<_> = transactions.iter().map(|txn| ledger.record(txn)).collect();
    log::debug!("accumulated {} balance snapshots", snapshots.len());
    snapshots
}

/// Sum of every account in `amounts` that counts towards net worth.
pub fn net_total(amounts: &AccountAmounts, config: &Config) -> Decimal {
    amounts
        .iter()
        .filter(|(name, _)| name.as_str() != NET_ACCOUNT && !config.is_net_ignored(name))
        .map(|(_, amount)| *amount)
        .sum()
}

struct Ledger<'a> {
    config: &'a Config,
    previous: AccountAmounts,
}

impl<'a> Ledger<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            previous: config.starting_balances().clone(),
        }
    }

    fn record(&mut self, txn: &CategorizedTransaction) -> BalanceSnapshot {
        let mut changes: AccountAmounts = self
            .previous
            .keys()
            .map(|name| (name.clone(), Decimal::ZERO))
            .collect();
        changes.insert(MAIN_ACCOUNT.to_string(), txn.change());
        if self.config.is_savings_account(&txn.category) {
            changes.insert(txn.category.clone(), -txn.change());
        }

        let balances: AccountAmounts = self
            .previous
            .iter()
            .map(|(name, previous)| (name.clone(), *previous + changes[name]))
            .collect();

        let snapshot = BalanceSnapshot {
            transaction: txn.clone(),
            changes: self.with_net(changes),
            balances: self.with_net(balances.clone()),
        };
        self.previous = balances;
        snapshot
    }

    fn with_net(&self, mut amounts: AccountAmounts) -> AccountAmounts {
        let net = net_total(&amounts, self.config);
        amounts.insert(NET_ACCOUNT.to_string(), net);
        amounts
    }
}
