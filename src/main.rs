use anyhow::{Context, Result};
use chrono::Local;
use tracing::{error, info};
use tracing_appender::rolling;

use incentive::api::dashboard;
use incentive::config::Config;
use incentive::db::init_db;
use incentive::model::period::PeriodQuery;
use incentive::store::MySqlStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(model = %config.model, "Incentive report starting...");

    let pool = init_db(&config.database_url).await?;
    let store = MySqlStore::new(pool);

    let today = Local::now().date_naive();
    let query = PeriodQuery {
        year: config.report_year,
        month: config.report_month,
    };

    let (summary, chart) = futures::try_join!(
        dashboard::summary(&store, config.model, query, today),
        dashboard::chart(&store, config.model, today),
    )
    .map_err(|e| {
        error!(error = %e, "Failed to compute incentive report");
        e
    })?;

    let report = serde_json::json!({
        "summary": summary,
        "chart": chart,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );

    info!(period = %summary.result.period, "Incentive report written");
    Ok(())
}
