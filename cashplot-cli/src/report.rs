//! Plain-text tables for the terminal.

use cashplot_core::{BalanceSnapshot, CategorizedTransaction};
use cashplot_finance::CategoryTotals;
use rust_decimal::Decimal;

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

pub fn categorized_table(transactions: &[CategorizedTransaction]) -> String {
    let width = transactions
        .iter()
        .map(|t| t.category.len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for t in transactions {
        let txn = &t.transaction;
        out.push_str(&format!(
            "{}  {:<width$}  {:>12}  {} | {}\n",
            txn.date,
            t.category,
            money(txn.change),
            txn.counter_name,
            txn.description,
        ));
    }
    out
}

pub fn balances_table(snapshots: &[BalanceSnapshot], accounts: &[&str]) -> String {
    let mut out = format!("{:<10}  {:<16}", "date", "category");
    for account in accounts {
        out.push_str(&format!("  {:>14}", account));
    }
    out.push('\n');

    for s in snapshots {
        out.push_str(&format!("{:<10}  {:<16}", s.date(), s.category()));
        for account in accounts {
            out.push_str(&format!("  {:>14}", money(s.balance(account))));
        }
        out.push('\n');
    }
    out
}

pub fn totals_table(totals: &CategoryTotals) -> String {
    let mut out = String::new();
    for (i, start) in totals.periods.iter().enumerate() {
        out.push_str(&format!("{} {}\n", totals.period, start));
        for (category, income) in &totals.income {
            let expenses = totals.expenses.get(category).map_or(Decimal::ZERO, |e| e[i]);
            if income[i].is_zero() && expenses.is_zero() {
                continue;
            }
            out.push_str(&format!(
                "  {:<20} +{:>12}  -{:>12}\n",
                category,
                money(income[i]),
                money(expenses)
            ));
        }
    }
    out
}
