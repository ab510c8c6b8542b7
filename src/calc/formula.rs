//! Target/excess/incentive arithmetic shared by both calculation models.
//!
//! Ratios are percentages, so dividing by a ratio `r` is `x * 100 / r` and
//! applying it is `x * r / 100`.

use rust_decimal::Decimal;

use crate::model::money::{Money, Percent};
use crate::model::team::PerTeam;

/// Target, excess and incentive for one scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub target: Money,
    pub excess: Money,
    pub incentive: Money,
}

/// `labor_cost / (ratio / 100)`; zero when the ratio is zero.
pub fn target(labor_cost: Money, labor_cost_ratio: Percent) -> Money {
    if labor_cost_ratio.is_zero() {
        return Money::ZERO;
    }
    labor_cost.scale(Decimal::ONE_HUNDRED, labor_cost_ratio.value())
}

/// `amount * (ratio / 100)`.
pub fn apply_ratio(amount: Money, ratio: Percent) -> Money {
    amount.scale(ratio.value(), Decimal::ONE_HUNDRED)
}

pub fn evaluate(
    labor_cost: Money,
    labor_cost_ratio: Percent,
    incentive_ratio: Percent,
    actual: Money,
) -> Evaluation {
    let target = target(labor_cost, labor_cost_ratio);
    let excess = actual.excess_over(target);
    Evaluation {
        target,
        excess,
        incentive: apply_ratio(excess, incentive_ratio),
    }
}

/// Each team's share of `pool`: `pool * weight / basis`, rounded on its own.
///
/// Equal weights always get equal shares. When the weights add up to `basis`
/// the shares add up to `pool` give or take one cent of rounding. Zero basis
/// yields zero shares.
pub fn prorate(pool: Money, weights: PerTeam<Percent>, basis: Percent) -> PerTeam<Money> {
    if basis.is_zero() || !pool.is_positive() {
        return PerTeam::default();
    }
    weights.map(|_, weight| pool.scale(weight.value(), basis.value()))
}
