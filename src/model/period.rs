use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A calendar month. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub const MIN_YEAR: i32 = 1900;
    pub const MAX_YEAR: i32 = 9999;

    pub fn new(year: i32, month: u32) -> CoreResult<Self> {
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return Err(CoreError::validation(format!("year out of range: {}", year)));
        }
        if !(1..=12).contains(&month) {
            return Err(CoreError::validation(format!("month out of range: {}", month)));
        }
        Ok(YearMonth { year, month })
    }

    pub fn of<D: Datelike>(date: &D) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    fn index(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    fn from_index(index: i64) -> Self {
        YearMonth {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// The month `months` before this one, crossing year boundaries.
    pub fn months_before(self, months: u32) -> Self {
        Self::from_index(self.index() - i64::from(months))
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        YearMonth::of(&date) == self
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// `year`/`month` query parameters as callers send them.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PeriodQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl PeriodQuery {
    pub fn new(year: i32, month: u32) -> Self {
        PeriodQuery {
            year: Some(year),
            month: Some(month),
        }
    }

    /// Both fields must be present.
    pub fn require(self) -> CoreResult<YearMonth> {
        match (self.year, self.month) {
            (Some(year), Some(month)) => YearMonth::new(year, month),
            _ => Err(CoreError::validation("year and month are required")),
        }
    }

    /// Missing fields fall back to `today`'s year and month.
    pub fn or_current(self, today: NaiveDate) -> CoreResult<YearMonth> {
        let current = YearMonth::of(&today);
        YearMonth::new(
            self.year.unwrap_or(current.year),
            self.month.unwrap_or(current.month),
        )
    }
}
