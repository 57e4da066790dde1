//! Period-bucketed income and expense totals per category.

use cashplot_core::{BalanceSnapshot, Period, PeriodBucket};
use chrono::{Months, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Income and expenses per category, one entry per period in `periods`.
///
/// Expenses are positive magnitudes. The split is per transaction sign, so a
/// bucket can hold both income and expenses for the same category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub period: Period,
    pub periods: Vec<NaiveDate>,
    pub income: BTreeMap<String, Vec<Decimal>>,
    pub expenses: BTreeMap<String, Vec<Decimal>>,
}

impl CategoryTotals {
    fn empty(period: Period) -> Self {
        Self {
            period,
            periods: Vec::new(),
            income: BTreeMap::new(),
            expenses: BTreeMap::new(),
        }
    }

    pub fn buckets(&self) -> impl Iterator<Item = PeriodBucket> + '_ {
        self.periods
            .iter()
            .map(|start| PeriodBucket::containing(*start, self.period))
    }

    /// Income minus expenses of `category` in the bucket at `index`.
    pub fn net(&self, category: &str, index: usize) -> Decimal {
        let at = |series: &BTreeMap<String, Vec<Decimal>>| {
            series
                .get(category)
                .and_then(|values| values.get(index))
                .copied()
                .unwrap_or_default()
        };
        at(&self.income) - at(&self.expenses)
    }
}

/// Names of the accounts carried by the snapshots (main, savings and net).
pub fn account_names(snapshots: &[BalanceSnapshot]) -> Vec<String> {
    snapshots
        .first()
        .map(|s| s.balances.keys().cloned().collect())
        .unwrap_or_default()
}

/// Distinct categories, sorted, leaving out any that coincide with an account
/// name: those are transfers between accounts, not income or spending.
pub fn categories(snapshots: &[BalanceSnapshot]) -> Vec<String> {
    let accounts: BTreeSet<String> = account_names(snapshots).into_iter().collect();
    snapshots
        .iter()
        .map(|s| s.category())
        .filter(|category| !accounts.contains(*category))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Bucket the snapshots from the period of the first transaction through the
/// period of the last one, inclusive. Buckets without transactions hold zeros.
pub fn aggregate(snapshots: &[BalanceSnapshot], period: Period) -> CategoryTotals {
    let (Some(first), Some(last)) = (snapshots.first(), snapshots.last()) else {
        return CategoryTotals::empty(period);
    };

    let mut periods = Vec::new();
    let mut index = BTreeMap::new();
    let last_bucket = PeriodBucket::containing(last.date(), period);
    let mut bucket = Some(PeriodBucket::containing(first.date(), period));
    while let Some(current) = bucket.filter(|b| *b <= last_bucket) {
        index.insert(current.start(), periods.len());
        periods.push(current.start());
        bucket = current.next();
    }

    let zeros = vec![Decimal::ZERO; periods.len()];
    let mut income: BTreeMap<String, Vec<Decimal>> = categories(snapshots)
        .into_iter()
        .map(|category| (category, zeros.clone()))
        .collect();
    let mut expenses = income.clone();

    for snapshot in snapshots {
        let Some(&i) = index.get(&period.floor(snapshot.date())) else {
            continue;
        };
        let change = snapshot.change();
        let (series, amount) = if change < Decimal::ZERO {
            (&mut expenses, -change)
        } else {
            (&mut income, change)
        };
        if let Some(values) = series.get_mut(snapshot.category()) {
            values[i] += amount;
        }
    }

    log::debug!(
        "aggregated {} snapshots into {} {} buckets",
        snapshots.len(),
        periods.len(),
        period
    );

    CategoryTotals {
        period,
        periods,
        income,
        expenses,
    }
}

/// From one calendar year before the last transaction up to it, for the
/// default chart zoom. Feb 29 maps to Feb 28 of the previous year.
pub fn last_year_range(snapshots: &[BalanceSnapshot]) -> Option<(NaiveDate, NaiveDate)> {
    let last = snapshots.last()?.date();
    let year_before = last.checked_sub_months(Months::new(12))?;
    Some((year_before, last))
}

/// Shift period starts to the one-third and two-thirds tick positions.
pub fn tick_thirds(
    dates: &[NaiveDate],
    period: Period,
) -> (Vec<NaiveDateTime>, Vec<NaiveDateTime>) {
    dates.iter().map(|date| period.thirds(*date)).unzip()
}

/// Shift period starts to their midpoints.
pub fn tick_halves(dates: &[NaiveDate], period: Period) -> Vec<NaiveDateTime> {
    dates.iter().map(|date| period.halves(*date)).collect()
}

/// Total income and expenses over a date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CashFlow {
    pub income: Decimal,
    pub expenses: Decimal,
}

impl CashFlow {
    pub fn net(&self) -> Decimal {
        self.income - self.expenses
    }
}

/// Cash flow of all transactions dated within `from..=to`, excluding transfers
/// between accounts.
pub fn cash_flow(snapshots: &[BalanceSnapshot], from: NaiveDate, to: NaiveDate) -> CashFlow {
    let accounts: BTreeSet<String> = account_names(snapshots).into_iter().collect();
    snapshots
        .iter()
        .filter(|s| (from..=to).contains(&s.date()) && !accounts.contains(s.category()))
        .fold(CashFlow::default(), |mut flow, s| {
            if s.change() < Decimal::ZERO {
                flow.expenses -= s.change();
            } else {
                flow.income += s.change();
            }
            flow
        })
}
