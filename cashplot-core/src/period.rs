//! Calendar periods used for bucketing: floor, successor and the interior
//! tick positions (thirds, midpoint) of a year/quarter/month/week/day.
//!
//! All functions normalize their input through [`Period::floor`] first, so any
//! date inside a period yields the same result.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity used for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Year,
    Quarter,
    Month,
    Week,
    Day,
}

impl Period {
    /// Coarse to fine.
    pub const ALL: [Period; 5] = [
        Period::Year,
        Period::Quarter,
        Period::Month,
        Period::Week,
        Period::Day,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Period::Year => "year",
            Period::Quarter => "quarter",
            Period::Month => "month",
            Period::Week => "week",
            Period::Day => "day",
        }
    }

    /// First day of the period containing `date`.
    ///
    /// Quarters start in January, April, July and October. Weeks are ISO weeks
    /// and start on Monday.
    pub fn floor(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Year => first_of_month(date.year(), 1),
            Period::Quarter => first_of_month(date.year(), date.month() - (date.month() - 1) % 3),
            Period::Month => first_of_month(date.year(), date.month()),
            Period::Week => date
                .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
                .unwrap_or(NaiveDate::MIN),
            Period::Day => date,
        }
    }

    /// First day of the period following the one containing `date`, or `None`
    /// when that lies past [`NaiveDate::MAX`].
    pub fn next(&self, date: NaiveDate) -> Option<NaiveDate> {
        let start = self.floor(date);
        match self {
            Period::Year => start.checked_add_months(Months::new(12)),
            Period::Quarter => start.checked_add_months(Months::new(3)),
            Period::Month => start.checked_add_months(Months::new(1)),
            Period::Week => start.checked_add_days(Days::new(7)),
            Period::Day => start.checked_add_days(Days::new(1)),
        }
    }

    /// The moments one third and two thirds through the period containing `date`.
    ///
    /// Only [`Period::Day`] yields a time of day (08:00 and 16:00); every other
    /// period truncates the offset to whole days, so the result is midnight.
    pub fn thirds(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let (start, duration) = self.span(date);
        let third = duration / 3;
        (self.offset(start, third), self.offset(start, third * 2))
    }

    /// The moment halfway through the period containing `date`.
    pub fn halves(&self, date: NaiveDate) -> NaiveDateTime {
        let (start, duration) = self.span(date);
        self.offset(start, duration / 2)
    }

    fn span(&self, date: NaiveDate) -> (NaiveDateTime, TimeDelta) {
        let start = self.floor(date);
        // the last representable period is cut off at the end of the calendar
        let end = self.next(start).unwrap_or(NaiveDate::MAX);
        (start.and_time(NaiveTime::MIN), end - start)
    }

    fn offset(&self, start: NaiveDateTime, delta: TimeDelta) -> NaiveDateTime {
        match self {
            Period::Day => start + delta,
            _ => start + TimeDelta::days(delta.num_days()),
        }
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // year and month come from an existing date, so day 1 always exists
    NaiveDate::from_ymd_opt(year, month, 1).expect("first day of an existing month")
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Period::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| {
                let names: Vec<_> = Period::ALL.iter().map(|p| p.name()).collect();
                format!("unknown period '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// One concrete instance of a period, identified by its floor date.
///
/// Buckets order by their start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeriodBucket {
    start: NaiveDate,
    period: Period,
}

impl PeriodBucket {
    pub fn containing(date: NaiveDate, period: Period) -> Self {
        Self {
            start: period.floor(date),
            period,
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive end: the start of the following bucket. `None` for the last
    /// bucket chrono can represent.
    pub fn end(&self) -> Option<NaiveDate> {
        self.period.next(self.start)
    }

    pub fn next(&self) -> Option<Self> {
        self.end().map(|start| Self {
            start,
            period: self.period,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && self.end().is_none_or(|end| date < end)
    }

    pub fn thirds(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.period.thirds(self.start)
    }

    pub fn midpoint(&self) -> NaiveDateTime {
        self.period.halves(self.start)
    }
}
