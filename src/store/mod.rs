//! Persistence collaborator.
//!
//! Every sales-entry mutation re-derives the month's cached aggregate from the
//! entries in the same transaction, so readers never see an entry without its
//! aggregate (or the other way round).

pub mod memory;
pub mod mysql;

use crate::auth::visibility::Visibility;
use crate::error::CoreResult;
use crate::model::allocation::{AllocationBatch, AllocationKind, AllocationRow};
use crate::model::money::Money;
use crate::model::period::YearMonth;
use crate::model::sales::{SalesEntry, SalesTotals, ValidSalesEntry};
use crate::model::settings::RatioSettings;
use crate::model::team::Team;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[allow(async_fn_in_trait)]
pub trait Store {
    async fn load_settings(&self) -> CoreResult<Option<RatioSettings>>;

    /// Overwrites the singleton row (last write wins).
    async fn save_settings(&self, settings: &RatioSettings) -> CoreResult<RatioSettings>;

    /// Sum of a month's allocations. With a team, only users currently on
    /// that team are counted.
    async fn allocation_total(
        &self,
        kind: AllocationKind,
        period: YearMonth,
        team: Option<Team>,
    ) -> CoreResult<Money>;

    /// Company-wide monthly sums for `from..=to`. Months without rows are absent.
    async fn allocation_totals_between(
        &self,
        kind: AllocationKind,
        from: YearMonth,
        to: YearMonth,
    ) -> CoreResult<Vec<(YearMonth, Money)>>;

    /// Upserts per (user, month).
    async fn upsert_allocations(&self, batch: &AllocationBatch) -> CoreResult<()>;

    /// Rows joined with their user, ordered by user name.
    async fn allocation_rows(
        &self,
        kind: AllocationKind,
        period: YearMonth,
        visibility: Visibility,
    ) -> CoreResult<Vec<AllocationRow>>;

    /// The cached aggregate row, if one was ever written.
    async fn sales_aggregate(&self, period: YearMonth) -> CoreResult<Option<SalesTotals>>;

    async fn sales_aggregates_between(
        &self,
        from: YearMonth,
        to: YearMonth,
    ) -> CoreResult<Vec<(YearMonth, SalesTotals)>>;

    async fn sales_entries(&self, period: YearMonth) -> CoreResult<Vec<SalesEntry>>;

    /// Inserts the entry and rewrites its month's aggregate atomically.
    async fn add_sales_entry(&self, entry: ValidSalesEntry) -> CoreResult<SalesEntry>;

    /// Deletes the entry and rewrites its month's aggregate atomically.
    /// Returns the removed entry.
    async fn delete_sales_entry(&self, id: u64) -> CoreResult<SalesEntry>;
}
