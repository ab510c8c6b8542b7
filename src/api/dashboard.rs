use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::aggregate::Aggregator;
use crate::calc::{CalculationModel, IncentiveComputationResult};
use crate::error::{CoreError, CoreResult};
use crate::model::money::Money;
use crate::model::period::{PeriodQuery, YearMonth};
use crate::range::{self, CHART_WINDOW_MONTHS, ChartPoint};
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(flatten)]
    pub result: IncentiveComputationResult,
    /// Incentives already assigned for the month.
    pub distributed_incentive: Money,
}

/// Model result for one month. Missing `year`/`month` fall back to `today`.
#[instrument(skip(store))]
pub async fn summary<S: Store>(
    store: &S,
    model: CalculationModel,
    query: PeriodQuery,
    today: NaiveDate,
) -> CoreResult<DashboardSummary> {
    let period = query.or_current(today)?;
    let ratios = store.load_settings().await?.ok_or(CoreError::NotConfigured)?;

    let aggregator = Aggregator::new(store);
    let inputs = aggregator.inputs(period).await?;
    let distributed_incentive = aggregator.incentive_distributed(period, None).await?;

    let result = model.compute(&ratios, &inputs);
    debug!(
        %period,
        target = %result.company.target,
        incentive_total = %result.company.incentive_total,
        "Computed incentive summary"
    );

    Ok(DashboardSummary {
        result,
        distributed_incentive,
    })
}

/// The trailing twelve months ending with `today`'s month, oldest first.
#[instrument(skip(store))]
pub async fn chart<S: Store>(
    store: &S,
    model: CalculationModel,
    today: NaiveDate,
) -> CoreResult<Vec<ChartPoint>> {
    let ratios = store.load_settings().await?.ok_or(CoreError::NotConfigured)?;
    let window = range::trailing_window(YearMonth::of(&today), CHART_WINDOW_MONTHS);
    let months = Aggregator::new(store).monthly_series(&window).await?;
    Ok(range::chart_points(model, &ratios, &months))
}
