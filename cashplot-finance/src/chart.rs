//! Everything a renderer needs to draw the balance and income/expense charts.

use cashplot_core::{BalanceSnapshot, Period};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::totals::{account_names, aggregate, last_year_range, tick_halves, tick_thirds};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub accounts: Vec<String>,
    pub snapshots: Vec<BalanceSnapshot>,
    pub period: Period,
    pub periods: Vec<NaiveDate>,
    pub one_thirds: Vec<NaiveDateTime>,
    pub two_thirds: Vec<NaiveDateTime>,
    pub halves: Vec<NaiveDateTime>,
    pub income: BTreeMap<String, Vec<Decimal>>,
    pub expenses: BTreeMap<String, Vec<Decimal>>,
    pub default_range: Option<(NaiveDate, NaiveDate)>,
}

impl ChartData {
    pub fn build(snapshots: Vec<BalanceSnapshot>, period: Period) -> Self {
        let totals = aggregate(&snapshots, period);
        let (one_thirds, two_thirds) = tick_thirds(&totals.periods, period);
        let halves = tick_halves(&totals.periods, period);
        Self {
            accounts: account_names(&snapshots),
            default_range: last_year_range(&snapshots),
            snapshots,
            period,
            periods: totals.periods,
            one_thirds,
            two_thirds,
            halves,
            income: totals.income,
            expenses: totals.expenses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_empty() {
        let chart = ChartData::build(Vec::new(), Period::Month);
        assert!(chart.accounts.is_empty());
        assert!(chart.periods.is_empty());
        assert_eq!(chart.default_range, None);
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["period"], "month");
    }
}
