//! Rolls stored records up into the monthly figures the calculator consumes.
//!
//! Team totals join against the roster as it is at read time: moving an
//! employee to another team also moves their past salaries in every
//! historical team total.

use futures::try_join;
use tracing::debug;

use crate::calc::CalculationInputs;
use crate::error::{CoreError, CoreResult};
use crate::model::allocation::AllocationKind;
use crate::model::money::Money;
use crate::model::period::YearMonth;
use crate::model::sales::{SalesEntry, SalesTotals};
use crate::model::team::{PerTeam, Team};
use crate::range::MonthlyFigures;
use crate::store::Store;

/// Sums entries into `{amount, profit}`. The single source of truth for the
/// cached monthly aggregate.
pub fn sum_sales_entries<'a, I>(entries: I) -> CoreResult<SalesTotals>
where
    I: IntoIterator<Item = &'a SalesEntry>,
{
    entries
        .into_iter()
        .try_fold(SalesTotals::default(), |totals, entry| {
            Some(SalesTotals {
                amount: totals.amount.checked_add(entry.amount)?,
                profit: totals.profit.checked_add(entry.profit)?,
            })
        })
        .ok_or(CoreError::Overflow("summing sales entries"))
}

/// One value per month of `window`, zero where `rows` has nothing.
pub fn zero_fill<T: Copy + Default>(
    window: &[YearMonth],
    rows: impl IntoIterator<Item = (YearMonth, T)>,
) -> Vec<(YearMonth, T)> {
    let rows: Vec<(YearMonth, T)> = rows.into_iter().collect();
    window
        .iter()
        .map(|period| {
            let value = rows
                .iter()
                .find(|(row_period, _)| row_period == period)
                .map(|(_, value)| *value)
                .unwrap_or_default();
            (*period, value)
        })
        .collect()
}

pub struct Aggregator<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> Aggregator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Aggregator { store }
    }

    pub async fn labor_cost(&self, period: YearMonth, team: Option<Team>) -> CoreResult<Money> {
        self.store
            .allocation_total(AllocationKind::Salary, period, team)
            .await
    }

    pub async fn team_labor_costs(&self, period: YearMonth) -> CoreResult<PerTeam<Money>> {
        let (design, field, sales) = try_join!(
            self.labor_cost(period, Some(Team::Design)),
            self.labor_cost(period, Some(Team::Field)),
            self.labor_cost(period, Some(Team::Sales)),
        )?;
        let mut costs = PerTeam::default();
        costs[Team::Design] = design;
        costs[Team::Field] = field;
        costs[Team::Sales] = sales;
        Ok(costs)
    }

    /// The cached aggregate; a month without one counts as zero.
    pub async fn sales(&self, period: YearMonth) -> CoreResult<SalesTotals> {
        Ok(self
            .store
            .sales_aggregate(period)
            .await?
            .unwrap_or_default())
    }

    /// Recomputed from the itemized entries. Agrees with `sales`.
    pub async fn recomputed_sales(&self, period: YearMonth) -> CoreResult<SalesTotals> {
        let entries = self.store.sales_entries(period).await?;
        sum_sales_entries(&entries)
    }

    /// Incentives already handed out. Display only, never fed to the calculator.
    pub async fn incentive_distributed(
        &self,
        period: YearMonth,
        team: Option<Team>,
    ) -> CoreResult<Money> {
        self.store
            .allocation_total(AllocationKind::Incentive, period, team)
            .await
    }

    pub async fn inputs(&self, period: YearMonth) -> CoreResult<CalculationInputs> {
        let (labor_cost, team_labor_cost, sales) = try_join!(
            self.labor_cost(period, None),
            self.team_labor_costs(period),
            self.sales(period),
        )?;
        debug!(%period, labor_cost = %labor_cost, sales = %sales.amount, profit = %sales.profit, "Aggregated month");
        Ok(CalculationInputs {
            period,
            labor_cost,
            team_labor_cost,
            sales,
        })
    }

    /// Company-wide figures for every month of `window`, zero-filled.
    pub async fn monthly_series(&self, window: &[YearMonth]) -> CoreResult<Vec<MonthlyFigures>> {
        let (Some(from), Some(to)) = (window.first().copied(), window.last().copied()) else {
            return Ok(Vec::new());
        };
        let (labor_rows, sales_rows) = try_join!(
            self.store
                .allocation_totals_between(AllocationKind::Salary, from, to),
            self.store.sales_aggregates_between(from, to),
        )?;

        let labor = zero_fill(window, labor_rows);
        let sales = zero_fill(window, sales_rows);
        Ok(labor
            .into_iter()
            .zip(sales)
            .map(|((period, labor_cost), (_, sales))| MonthlyFigures {
                period,
                labor_cost,
                sales,
            })
            .collect())
    }
}
