use crate::calc::formula::{evaluate, prorate};
use crate::calc::{CalculationInputs, CalculationModel, CompanyFigures, IncentiveComputationResult, TeamFigures};
use crate::model::settings::RatioSettings;
use crate::model::team::PerTeam;

pub(super) fn compute(ratios: &RatioSettings, inputs: &CalculationInputs) -> IncentiveComputationResult {
    let company = evaluate(
        inputs.labor_cost,
        ratios.labor_cost_ratio,
        ratios.incentive_ratio,
        inputs.sales.amount,
    );

    // team share = pool * teamLaborCostRatio / laborCostRatio
    let weights = PerTeam::from_fn(|team| ratios.team(team).labor_cost_ratio);
    let shares = prorate(company.incentive, weights, ratios.labor_cost_ratio);

    let teams = PerTeam::from_fn(|team| {
        let team_ratios = ratios.team(team);
        TeamFigures {
            labor_cost: inputs.team_labor_cost[team],
            labor_cost_ratio: team_ratios.labor_cost_ratio,
            incentive_ratio: team_ratios.incentive_ratio,
            target: None,
            excess: None,
            incentive: shares[team],
        }
    });

    IncentiveComputationResult {
        period: inputs.period,
        model: CalculationModel::SalesBased,
        sales: inputs.sales,
        company: CompanyFigures {
            labor_cost: inputs.labor_cost,
            labor_cost_ratio: ratios.labor_cost_ratio,
            incentive_ratio: ratios.incentive_ratio,
            target: company.target,
            excess: company.excess,
            incentive_total: company.incentive,
        },
        teams,
    }
}
