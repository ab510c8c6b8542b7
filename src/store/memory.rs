//! In-process store. Mutations run against a copy of the tables that only
//! replaces the live tables once every step has succeeded.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::aggregate::sum_sales_entries;
use crate::auth::visibility::Visibility;
use crate::error::{CoreError, CoreResult};
use crate::model::allocation::{AllocationBatch, AllocationKind, AllocationRow};
use crate::model::money::Money;
use crate::model::period::YearMonth;
use crate::model::sales::{SalesEntry, SalesTotals, ValidSalesEntry};
use crate::model::settings::RatioSettings;
use crate::model::team::Team;
use crate::model::user::Employee;
use crate::store::Store;

#[derive(Debug, Clone, Default)]
struct Tables {
    settings: Option<RatioSettings>,
    employees: BTreeMap<u64, Employee>,
    salaries: BTreeMap<(YearMonth, u64), Money>,
    incentives: BTreeMap<(YearMonth, u64), Money>,
    sales_entries: BTreeMap<u64, SalesEntry>,
    sales_aggregates: BTreeMap<YearMonth, SalesTotals>,
    next_entry_id: u64,
}

impl Tables {
    fn allocations(&self, kind: AllocationKind) -> &BTreeMap<(YearMonth, u64), Money> {
        match kind {
            AllocationKind::Salary => &self.salaries,
            AllocationKind::Incentive => &self.incentives,
        }
    }

    fn allocations_mut(&mut self, kind: AllocationKind) -> &mut BTreeMap<(YearMonth, u64), Money> {
        match kind {
            AllocationKind::Salary => &mut self.salaries,
            AllocationKind::Incentive => &mut self.incentives,
        }
    }

    fn on_team(&self, user_id: u64, team: Team) -> bool {
        self.employees
            .get(&user_id)
            .is_some_and(|employee| employee.team == Some(team))
    }

    fn recompute_sales_aggregate(&mut self, period: YearMonth) -> CoreResult<SalesTotals> {
        let totals = sum_sales_entries(
            self.sales_entries
                .values()
                .filter(|entry| entry.period() == period),
        )?;
        self.sales_aggregates.insert(period, totals);
        Ok(totals)
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a roster entry. Replacing moves the employee's
    /// history with them.
    pub async fn upsert_employee(&self, employee: Employee) {
        self.tables
            .lock()
            .await
            .employees
            .insert(employee.id, employee);
    }

    /// Runs `f` against a copy of the tables and publishes the copy only when
    /// `f` succeeds.
    async fn transaction<T>(&self, f: impl FnOnce(&mut Tables) -> CoreResult<T>) -> CoreResult<T> {
        let mut tables = self.tables.lock().await;
        let mut working = tables.clone();
        let value = f(&mut working)?;
        *tables = working;
        Ok(value)
    }
}

impl Store for MemoryStore {
    async fn load_settings(&self) -> CoreResult<Option<RatioSettings>> {
        Ok(self.tables.lock().await.settings.clone())
    }

    async fn save_settings(&self, settings: &RatioSettings) -> CoreResult<RatioSettings> {
        let mut saved = settings.clone();
        saved.updated_at = Some(Utc::now().naive_utc());
        self.tables.lock().await.settings = Some(saved.clone());
        Ok(saved)
    }

    async fn allocation_total(
        &self,
        kind: AllocationKind,
        period: YearMonth,
        team: Option<Team>,
    ) -> CoreResult<Money> {
        let tables = self.tables.lock().await;
        let amounts = tables
            .allocations(kind)
            .iter()
            .filter(|((row_period, user_id), _)| {
                *row_period == period && team.is_none_or(|team| tables.on_team(*user_id, team))
            })
            .map(|(_, amount)| *amount);
        Money::checked_sum(amounts).ok_or(CoreError::Overflow("summing allocations"))
    }

    async fn allocation_totals_between(
        &self,
        kind: AllocationKind,
        from: YearMonth,
        to: YearMonth,
    ) -> CoreResult<Vec<(YearMonth, Money)>> {
        let tables = self.tables.lock().await;
        let mut totals: BTreeMap<YearMonth, Money> = BTreeMap::new();
        for ((period, _), amount) in tables.allocations(kind).iter() {
            if *period < from || *period > to {
                continue;
            }
            let total = totals.entry(*period).or_default();
            *total = total
                .checked_add(*amount)
                .ok_or(CoreError::Overflow("summing allocations"))?;
        }
        Ok(totals.into_iter().collect())
    }

    async fn upsert_allocations(&self, batch: &AllocationBatch) -> CoreResult<()> {
        self.transaction(|tables| {
            let rows = tables.allocations_mut(batch.kind);
            for line in &batch.lines {
                rows.insert((batch.period, line.user_id), line.amount);
            }
            Ok(())
        })
        .await
    }

    async fn allocation_rows(
        &self,
        kind: AllocationKind,
        period: YearMonth,
        visibility: Visibility,
    ) -> CoreResult<Vec<AllocationRow>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<AllocationRow> = tables
            .allocations(kind)
            .iter()
            .filter(|((row_period, _), _)| *row_period == period)
            .filter_map(|((_, user_id), amount)| {
                let employee = tables.employees.get(user_id)?;
                visibility.admits(employee).then(|| AllocationRow {
                    user_id: *user_id,
                    year: period.year,
                    month: period.month,
                    amount: *amount,
                    user_name: employee.name.clone(),
                    user_email: employee.email.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| a.user_name.cmp(&b.user_name));
        Ok(rows)
    }

    async fn sales_aggregate(&self, period: YearMonth) -> CoreResult<Option<SalesTotals>> {
        Ok(self.tables.lock().await.sales_aggregates.get(&period).copied())
    }

    async fn sales_aggregates_between(
        &self,
        from: YearMonth,
        to: YearMonth,
    ) -> CoreResult<Vec<(YearMonth, SalesTotals)>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .sales_aggregates
            .range(from..=to)
            .map(|(period, totals)| (*period, *totals))
            .collect())
    }

    async fn sales_entries(&self, period: YearMonth) -> CoreResult<Vec<SalesEntry>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .sales_entries
            .values()
            .filter(|entry| entry.period() == period)
            .cloned()
            .collect())
    }

    async fn add_sales_entry(&self, entry: ValidSalesEntry) -> CoreResult<SalesEntry> {
        self.transaction(|tables| {
            tables.next_entry_id += 1;
            let entry = entry.into_entry(tables.next_entry_id);
            let period = entry.period();
            tables.sales_entries.insert(entry.id, entry.clone());
            let totals = tables.recompute_sales_aggregate(period)?;
            debug!(entry_id = entry.id, %period, amount = %totals.amount, "Sales aggregate rewritten");
            Ok(entry)
        })
        .await
    }

    async fn delete_sales_entry(&self, id: u64) -> CoreResult<SalesEntry> {
        self.transaction(|tables| {
            let entry = tables
                .sales_entries
                .remove(&id)
                .ok_or_else(|| CoreError::NotFound(format!("sales entry {}", id)))?;
            let totals = tables.recompute_sales_aggregate(entry.period())?;
            debug!(entry_id = id, period = %entry.period(), amount = %totals.amount, "Sales aggregate rewritten");
            Ok(entry)
        })
        .await
    }
}
