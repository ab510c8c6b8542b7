use serde_json::Value;
use tracing::{info, instrument};

use crate::auth::auth::AuthUser;
use crate::error::CoreResult;
use crate::model::allocation::{AllocationBatch, AllocationKind, AllocationRow};
use crate::model::period::PeriodQuery;
use crate::model::team::Team;
use crate::store::Store;

/// Bulk upsert of salaries or incentives for one month. Admin only.
#[instrument(skip(store, payload), fields(user_id = auth.user_id))]
pub async fn submit<S: Store>(
    auth: &AuthUser,
    store: &S,
    kind: AllocationKind,
    payload: &Value,
) -> CoreResult<usize> {
    auth.require_admin()?;

    let batch = AllocationBatch::from_json(kind, payload)?;
    store.upsert_allocations(&batch).await?;

    info!(%kind, period = %batch.period, count = batch.lines.len(), "Allocations saved");
    Ok(batch.lines.len())
}

/// Rows the caller may see. `team` only narrows the listing for admins.
pub async fn list<S: Store>(
    auth: &AuthUser,
    store: &S,
    kind: AllocationKind,
    query: PeriodQuery,
    team: Option<Team>,
) -> CoreResult<Vec<AllocationRow>> {
    let period = query.require()?;
    store
        .allocation_rows(kind, period, auth.visibility(team))
        .await
}
