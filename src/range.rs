use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::calc::{CalculationModel, formula};
use crate::model::money::Money;
use crate::model::period::YearMonth;
use crate::model::sales::SalesTotals;
use crate::model::settings::RatioSettings;

/// Months shown on the trailing chart, current month included.
pub const CHART_WINDOW_MONTHS: u32 = 12;

/// The `months` calendar months ending with `current`, oldest first.
pub fn trailing_window(current: YearMonth, months: u32) -> Vec<YearMonth> {
    (0..months)
        .rev()
        .map(|offset| current.months_before(offset))
        .collect()
}

/// Company-wide labor cost and sales for one month of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyFigures {
    pub period: YearMonth,
    pub labor_cost: Money,
    pub sales: SalesTotals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPoint {
    pub period: YearMonth,
    pub model: CalculationModel,
    pub labor_cost: Money,
    pub target: Money,
    pub actual: Money,
}

impl ChartPoint {
    /// Each month is evaluated on its own; nothing carries over between months.
    pub fn evaluate(model: CalculationModel, ratios: &RatioSettings, month: &MonthlyFigures) -> Self {
        ChartPoint {
            period: month.period,
            model,
            labor_cost: month.labor_cost,
            target: formula::target(month.labor_cost, ratios.labor_cost_ratio),
            actual: model.actual(&month.sales),
        }
    }
}

pub fn chart_points(
    model: CalculationModel,
    ratios: &RatioSettings,
    months: &[MonthlyFigures],
) -> Vec<ChartPoint> {
    months
        .iter()
        .map(|month| ChartPoint::evaluate(model, ratios, month))
        .collect()
}

impl Serialize for ChartPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let basis = self.model.basis_suffix();
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry("year", &self.period.year)?;
        map.serialize_entry("month", &self.period.month)?;
        map.serialize_entry("totalLaborCost", &self.labor_cost)?;
        map.serialize_entry(&format!("target{}", basis), &self.target)?;
        map.serialize_entry(&format!("actual{}", basis), &self.actual)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use crate::model::money::Percent;
    use serde_json::json;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn january_window_reaches_back_to_february() {
        let window = trailing_window(ym(2026, 1), CHART_WINDOW_MONTHS);
        let mut expected: Vec<YearMonth> = (2..=12).map(|month| ym(2025, month)).collect();
        expected.push(ym(2026, 1));
        assert_eq!(window, expected);
    }

    #[test]
    fn november_window_starts_in_previous_december() {
        let window = trailing_window(ym(2025, 11), CHART_WINDOW_MONTHS);
        assert_eq!(window.first(), Some(&ym(2024, 12)));
        assert_eq!(window.last(), Some(&ym(2025, 11)));
        assert!(window.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn december_window_is_one_calendar_year() {
        let window = trailing_window(ym(2025, 12), CHART_WINDOW_MONTHS);
        assert_eq!(window, (1..=12).map(|month| ym(2025, month)).collect::<Vec<_>>());
    }

    #[test]
    fn chart_point_fields_follow_the_model() {
        let ratios = RatioSettings::uniform(Percent::whole(25), Percent::whole(10));
        let month = MonthlyFigures {
            period: ym(2025, 3),
            labor_cost: Money::new(dec!(1000)),
            sales: SalesTotals {
                amount: Money::new(dec!(9000)),
                profit: Money::new(dec!(3000)),
            },
        };

        let sales = ChartPoint::evaluate(CalculationModel::SalesBased, &ratios, &month);
        assert_eq!(
            serde_json::to_value(sales).unwrap(),
            json!({
                "year": 2025,
                "month": 3,
                "totalLaborCost": 1000.0,
                "targetSales": 4000.0,
                "actualSales": 9000.0
            })
        );

        let profit = ChartPoint::evaluate(CalculationModel::ProfitBased, &ratios, &month);
        assert_eq!(profit.actual, Money::new(dec!(3000)));
        assert!(serde_json::to_value(profit).unwrap().get("targetProfit").is_some());
    }
}
