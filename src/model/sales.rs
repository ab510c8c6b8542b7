use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::model::money::Money;
use crate::model::period::YearMonth;

/// Monthly sales and profit. Also the cached `monthly_sales` row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesTotals {
    pub amount: Money,
    pub profit: Money,
}

/// One itemized sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesEntry {
    pub id: u64,
    pub year: i32,
    pub month: u32,
    pub amount: Money,
    pub profit: Money,
    pub description: Option<String>,
    pub entry_date: Option<NaiveDate>,
}

impl SalesEntry {
    pub fn period(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSalesEntry {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub amount: Option<Money>,
    #[serde(default)]
    pub profit: Money,
    pub description: Option<String>,
    pub entry_date: Option<NaiveDate>,
}

/// A `NewSalesEntry` that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSalesEntry {
    pub period: YearMonth,
    pub amount: Money,
    pub profit: Money,
    pub description: Option<String>,
    pub entry_date: Option<NaiveDate>,
}

impl NewSalesEntry {
    /// The month comes from `year`/`month`, or from `entry_date` when those are absent.
    pub fn validate(self) -> CoreResult<ValidSalesEntry> {
        let period = match (self.year, self.month, self.entry_date) {
            (Some(year), Some(month), _) => YearMonth::new(year, month)?,
            (None, None, Some(date)) => {
                let period = YearMonth::of(&date);
                YearMonth::new(period.year, period.month)?
            }
            _ => return Err(CoreError::validation("year and month are required")),
        };
        if let Some(date) = self.entry_date {
            if !period.contains(date) {
                return Err(CoreError::validation(format!(
                    "entry_date {} is outside {}",
                    date, period
                )));
            }
        }
        let amount = self
            .amount
            .ok_or_else(|| CoreError::validation("amount is required"))?;

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(ValidSalesEntry {
            period,
            amount,
            profit: self.profit,
            description,
            entry_date: self.entry_date,
        })
    }
}

impl ValidSalesEntry {
    pub fn into_entry(self, id: u64) -> SalesEntry {
        SalesEntry {
            id,
            year: self.period.year,
            month: self.period.month,
            amount: self.amount,
            profit: self.profit,
            description: self.description,
            entry_date: self.entry_date,
        }
    }
}

/// A month's cached aggregate alongside its entries.
#[derive(Debug, Clone, Serialize)]
pub struct SalesMonth {
    pub year: i32,
    pub month: u32,
    pub aggregate: Option<SalesTotals>,
    pub entries: Vec<SalesEntry>,
}
