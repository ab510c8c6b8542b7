use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display};

use crate::error::{CoreError, CoreResult};
use crate::model::money::Money;
use crate::model::period::{PeriodQuery, YearMonth};

/// Per-user monthly amounts: salary totals and assigned incentives share a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AllocationKind {
    Salary,
    Incentive,
}

impl AllocationKind {
    pub fn table(self) -> &'static str {
        match self {
            AllocationKind::Salary => "monthly_salary",
            AllocationKind::Incentive => "monthly_incentive",
        }
    }

    /// Key of the item array in a submission payload.
    pub fn payload_key(self) -> &'static str {
        match self {
            AllocationKind::Salary => "salaries",
            AllocationKind::Incentive => "incentives",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub user_id: u64,
    pub amount: Money,
}

/// A validated bulk submission for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationBatch {
    pub kind: AllocationKind,
    pub period: YearMonth,
    pub lines: Vec<AllocationLine>,
}

impl AllocationBatch {
    /// Parses `{year, month, salaries|incentives: [{user_id, amount}]}`.
    /// A missing, non-array or empty item list is rejected.
    pub fn from_json(kind: AllocationKind, payload: &Value) -> CoreResult<Self> {
        let period = PeriodQuery::deserialize(payload)
            .map_err(|e| CoreError::validation(e.to_string()))?
            .require()?;

        let key = kind.payload_key();
        let items = payload
            .get(key)
            .and_then(Value::as_array)
            .ok_or_else(|| CoreError::validation(format!("{} must be an array", key)))?;
        if items.is_empty() {
            return Err(CoreError::validation(format!("{} must not be empty", key)));
        }

        let lines = items
            .iter()
            .map(AllocationLine::deserialize)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CoreError::validation(format!("invalid {} item: {}", key, e)))?;

        Ok(AllocationBatch {
            kind,
            period,
            lines,
        })
    }
}

/// A stored allocation joined with its user, as listed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationRow {
    pub user_id: u64,
    pub year: i32,
    pub month: u32,
    pub amount: Money,
    pub user_name: String,
    pub user_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn parses_salary_submission() {
        let batch = AllocationBatch::from_json(
            AllocationKind::Salary,
            &json!({
                "year": 2025,
                "month": 6,
                "salaries": [
                    { "user_id": 1, "amount": 3000000 },
                    { "user_id": 2, "amount": 2500000.5 }
                ]
            }),
        )
        .unwrap();
        assert_eq!(batch.period, YearMonth::new(2025, 6).unwrap());
        assert_eq!(batch.lines.len(), 2);
        assert_eq!(batch.lines[1].amount, Money::new(dec!(2500000.50)));
    }

    #[test]
    fn rejects_non_array_items() {
        let err = AllocationBatch::from_json(
            AllocationKind::Incentive,
            &json!({ "year": 2025, "month": 6, "incentives": { "user_id": 1, "amount": 5 } }),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn rejects_empty_items_and_missing_month() {
        let empty = json!({ "year": 2025, "month": 6, "salaries": [] });
        assert!(AllocationBatch::from_json(AllocationKind::Salary, &empty).is_err());

        let no_month = json!({ "year": 2025, "salaries": [{ "user_id": 1, "amount": 1 }] });
        assert!(AllocationBatch::from_json(AllocationKind::Salary, &no_month).is_err());
    }

    #[test]
    fn items_are_read_from_the_kind_key() {
        let payload = json!({ "year": 2025, "month": 6, "salaries": [{ "user_id": 1, "amount": 1 }] });
        assert!(AllocationBatch::from_json(AllocationKind::Incentive, &payload).is_err());
    }
}
