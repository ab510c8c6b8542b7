use tracing::{info, instrument};

use crate::auth::auth::AuthUser;
use crate::error::CoreResult;
use crate::model::period::PeriodQuery;
use crate::model::sales::{NewSalesEntry, SalesEntry, SalesMonth};
use crate::store::Store;

#[instrument(skip(store, payload), fields(user_id = auth.user_id))]
pub async fn add_sales_entry<S: Store>(
    auth: &AuthUser,
    store: &S,
    payload: NewSalesEntry,
) -> CoreResult<SalesEntry> {
    auth.require_admin()?;

    let entry = store.add_sales_entry(payload.validate()?).await?;
    info!(entry_id = entry.id, year = entry.year, month = entry.month, "Sales entry added");
    Ok(entry)
}

#[instrument(skip(store), fields(user_id = auth.user_id))]
pub async fn delete_sales_entry<S: Store>(
    auth: &AuthUser,
    store: &S,
    entry_id: u64,
) -> CoreResult<SalesEntry> {
    auth.require_admin()?;

    let entry = store.delete_sales_entry(entry_id).await?;
    info!(entry_id, year = entry.year, month = entry.month, "Sales entry deleted");
    Ok(entry)
}

/// Entries of a month together with its cached aggregate.
pub async fn list_sales<S: Store>(store: &S, query: PeriodQuery) -> CoreResult<SalesMonth> {
    let period = query.require()?;
    let (aggregate, entries) = futures::try_join!(
        store.sales_aggregate(period),
        store.sales_entries(period),
    )?;
    Ok(SalesMonth {
        year: period.year,
        month: period.month,
        aggregate,
        entries,
    })
}
