//! Incentive calculator.
//!
//! Two models exist. The sales-based model compares sales to the target and
//! prorates the company pool across teams by their labor-cost ratio share.
//! The profit-based model compares profit to the target and evaluates every
//! team on its own labor cost against the same company-wide profit, so team
//! incentives do not have to add up to the company pool.

pub mod formula;
mod profit_based;
pub mod result;
mod sales_based;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::model::money::Money;
use crate::model::period::YearMonth;
use crate::model::sales::SalesTotals;
use crate::model::settings::RatioSettings;
use crate::model::team::PerTeam;

pub use result::{CompanyFigures, IncentiveComputationResult, TeamFigures};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CalculationModel {
    /// Dashboard model: sales against target, team pools prorated.
    SalesBased,
    /// Team model: profit against target, teams evaluated independently.
    #[default]
    ProfitBased,
}

/// Aggregated figures for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationInputs {
    pub period: YearMonth,
    pub labor_cost: Money,
    pub team_labor_cost: PerTeam<Money>,
    pub sales: SalesTotals,
}

impl CalculationModel {
    pub fn compute(self, ratios: &RatioSettings, inputs: &CalculationInputs) -> IncentiveComputationResult {
        match self {
            CalculationModel::SalesBased => sales_based::compute(ratios, inputs),
            CalculationModel::ProfitBased => profit_based::compute(ratios, inputs),
        }
    }

    pub fn actual(self, sales: &SalesTotals) -> Money {
        match self {
            CalculationModel::SalesBased => sales.amount,
            CalculationModel::ProfitBased => sales.profit,
        }
    }

    /// Suffix of the target/excess/actual field names.
    pub fn basis_suffix(self) -> &'static str {
        match self {
            CalculationModel::SalesBased => "Sales",
            CalculationModel::ProfitBased => "Profit",
        }
    }
}
