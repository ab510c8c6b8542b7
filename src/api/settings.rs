use serde_json::Value;
use tracing::{info, instrument};

use crate::auth::auth::AuthUser;
use crate::error::{CoreError, CoreResult};
use crate::model::settings::{RatioSettings, SettingsUpdate};
use crate::store::Store;

pub async fn get_settings<S: Store>(store: &S) -> CoreResult<RatioSettings> {
    store.load_settings().await?.ok_or(CoreError::NotConfigured)
}

/// Replaces the ratio settings. Admin only.
#[instrument(skip(store, payload), fields(user_id = auth.user_id))]
pub async fn update_settings<S: Store>(
    auth: &AuthUser,
    store: &S,
    payload: &Value,
) -> CoreResult<RatioSettings> {
    auth.require_admin()?;

    let settings = SettingsUpdate::from_json(payload)?.into_settings()?;
    let saved = store.save_settings(&settings).await?;

    info!(
        labor_cost_ratio = %saved.labor_cost_ratio,
        incentive_ratio = %saved.incentive_ratio,
        "Settings updated"
    );
    Ok(saved)
}
