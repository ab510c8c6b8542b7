use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::calc::CalculationModel;
use crate::model::money::{Money, Percent};
use crate::model::period::YearMonth;
use crate::model::sales::SalesTotals;
use crate::model::team::PerTeam;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyFigures {
    pub labor_cost: Money,
    pub labor_cost_ratio: Percent,
    pub incentive_ratio: Percent,
    pub target: Money,
    pub excess: Money,
    pub incentive_total: Money,
}

/// Per-team figures. The sales-based model only prorates the company pool,
/// so it leaves `target`/`excess` empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamFigures {
    pub labor_cost: Money,
    pub labor_cost_ratio: Percent,
    pub incentive_ratio: Percent,
    pub target: Option<Money>,
    pub excess: Option<Money>,
    pub incentive: Money,
}

/// Output of one calculator run. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncentiveComputationResult {
    pub period: YearMonth,
    pub model: CalculationModel,
    pub sales: SalesTotals,
    pub company: CompanyFigures,
    pub teams: PerTeam<TeamFigures>,
}

/// Serialized as one flat record with the field names existing consumers
/// read (`targetSales`, `designTeamTargetProfit`, `salesTeamIncentive`, ...).
impl Serialize for IncentiveComputationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let basis = self.model.basis_suffix();
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("year", &self.period.year)?;
        map.serialize_entry("month", &self.period.month)?;
        map.serialize_entry("model", &self.model)?;
        map.serialize_entry("totalLaborCost", &self.company.labor_cost)?;
        map.serialize_entry("actualSales", &self.sales.amount)?;
        map.serialize_entry("actualProfit", &self.sales.profit)?;
        map.serialize_entry(&format!("target{}", basis), &self.company.target)?;
        map.serialize_entry(&format!("excess{}", basis), &self.company.excess)?;
        map.serialize_entry("incentiveTotal", &self.company.incentive_total)?;
        map.serialize_entry("laborCostRatio", &self.company.labor_cost_ratio)?;
        map.serialize_entry("incentiveRatio", &self.company.incentive_ratio)?;

        for (team, figures) in self.teams.iter() {
            let prefix = team.field_prefix();
            map.serialize_entry(&format!("{}LaborCost", prefix), &figures.labor_cost)?;
            map.serialize_entry(&format!("{}LaborCostRatio", prefix), &figures.labor_cost_ratio)?;
            map.serialize_entry(&format!("{}IncentiveRatio", prefix), &figures.incentive_ratio)?;
            if let Some(target) = figures.target {
                map.serialize_entry(&format!("{}Target{}", prefix, basis), &target)?;
            }
            if let Some(excess) = figures.excess {
                map.serialize_entry(&format!("{}Excess{}", prefix, basis), &excess)?;
            }
            map.serialize_entry(&format!("{}Incentive", prefix), &figures.incentive)?;
        }
        map.end()
    }
}
