use crate::calc::formula::evaluate;
use crate::calc::{CalculationInputs, CalculationModel, CompanyFigures, IncentiveComputationResult, TeamFigures};
use crate::model::settings::RatioSettings;
use crate::model::team::PerTeam;

pub(super) fn compute(ratios: &RatioSettings, inputs: &CalculationInputs) -> IncentiveComputationResult {
    let profit = inputs.sales.profit;
    let company = evaluate(
        inputs.labor_cost,
        ratios.labor_cost_ratio,
        ratios.incentive_ratio,
        profit,
    );

    // Teams have no attributed profit of their own: each is measured against
    // the company-wide figure. Results are not renormalized to the company pool.
    let teams = PerTeam::from_fn(|team| {
        let team_ratios = ratios.team(team);
        let labor_cost = inputs.team_labor_cost[team];
        let evaluation = evaluate(
            labor_cost,
            team_ratios.labor_cost_ratio,
            team_ratios.incentive_ratio,
            profit,
        );
        TeamFigures {
            labor_cost,
            labor_cost_ratio: team_ratios.labor_cost_ratio,
            incentive_ratio: team_ratios.incentive_ratio,
            target: Some(evaluation.target),
            excess: Some(evaluation.excess),
            incentive: evaluation.incentive,
        }
    });

    IncentiveComputationResult {
        period: inputs.period,
        model: CalculationModel::ProfitBased,
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
