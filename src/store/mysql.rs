//! MySQL-backed store over the application's existing tables.
//!
//! Amounts are `DECIMAL(15,2)` and ratios `DECIMAL(5,2)` in the database and
//! are decoded straight into `Decimal`.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, Transaction};
use tracing::{debug, error};

use crate::aggregate::sum_sales_entries;
use crate::auth::visibility::Visibility;
use crate::error::{CoreError, CoreResult};
use crate::model::allocation::{AllocationBatch, AllocationKind, AllocationRow};
use crate::model::money::{Money, Percent};
use crate::model::period::YearMonth;
use crate::model::sales::{SalesEntry, SalesTotals, ValidSalesEntry};
use crate::model::settings::RatioSettings;
use crate::model::team::Team;
use crate::store::Store;

const SETTINGS_ID: u64 = 1;

const SELECT_SETTINGS: &str = r#"
    SELECT labor_cost_ratio, incentive_ratio,
           design_team_labor_cost_ratio, design_team_incentive_ratio,
           field_team_labor_cost_ratio, field_team_incentive_ratio,
           sales_team_labor_cost_ratio, sales_team_incentive_ratio,
           updated_at
    FROM settings
    ORDER BY id
    LIMIT 1
"#;

const SELECT_ENTRY_COLUMNS: &str = r#"
    SELECT id, year, month, amount, profit, description, entry_date
    FROM sales_entries
"#;

type SettingsRow = (
    Decimal,
    Decimal,
    Decimal,
    Decimal,
    Decimal,
    Decimal,
    Decimal,
    Decimal,
    Option<NaiveDateTime>,
);

type EntryRow = (u64, i32, i32, Decimal, Decimal, Option<String>, Option<NaiveDate>);

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlStore { pool }
    }

    /// Re-derives the month's aggregate from its entries inside `tx`.
    /// The entry rows are read with `FOR UPDATE` so concurrent writers to the
    /// same month serialize.
    async fn rewrite_sales_aggregate(
        tx: &mut Transaction<'_, MySql>,
        period: YearMonth,
    ) -> CoreResult<SalesTotals> {
        let rows: Vec<EntryRow> = sqlx::query_as(&format!(
            "{} WHERE year = ? AND month = ? FOR UPDATE",
            SELECT_ENTRY_COLUMNS
        ))
        .bind(period.year)
        .bind(period.month)
        .fetch_all(&mut **tx)
        .await?;

        let entries = rows
            .into_iter()
            .map(entry_from_row)
            .collect::<CoreResult<Vec<_>>>()?;
        let totals = sum_sales_entries(&entries)?;

        sqlx::query(
            r#"
            INSERT INTO monthly_sales (year, month, amount, profit)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE amount = VALUES(amount), profit = VALUES(profit)
            "#,
        )
        .bind(period.year)
        .bind(period.month)
        .bind(totals.amount.amount())
        .bind(totals.profit.amount())
        .execute(&mut **tx)
        .await?;

        Ok(totals)
    }
}

fn percent(value: Decimal) -> CoreResult<Percent> {
    Percent::new(value)
        .ok_or_else(|| CoreError::validation(format!("stored ratio out of range: {}", value)))
}

fn month(value: i32) -> CoreResult<u32> {
    u32::try_from(value).map_err(|_| CoreError::validation(format!("stored month out of range: {}", value)))
}

fn entry_from_row(row: EntryRow) -> CoreResult<SalesEntry> {
    let (id, year, month_value, amount, profit, description, entry_date) = row;
    Ok(SalesEntry {
        id,
        year,
        month: month(month_value)?,
        amount: Money::new(amount),
        profit: Money::new(profit),
        description,
        entry_date,
    })
}

fn visibility_clause(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::All => "",
        Visibility::Team(_) => "AND u.team = ?",
        Visibility::User(_) => "AND a.user_id = ?",
    }
}

impl Store for MySqlStore {
    async fn load_settings(&self) -> CoreResult<Option<RatioSettings>> {
        let row: Option<SettingsRow> = sqlx::query_as(SELECT_SETTINGS)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch settings");
                e
            })?;

        let Some((labor, incentive, design_labor, design_incentive, field_labor, field_incentive, sales_labor, sales_incentive, updated_at)) = row
        else {
            return Ok(None);
        };

        Ok(Some(RatioSettings {
            labor_cost_ratio: percent(labor)?,
            incentive_ratio: percent(incentive)?,
            design_team_labor_cost_ratio: percent(design_labor)?,
            design_team_incentive_ratio: percent(design_incentive)?,
            field_team_labor_cost_ratio: percent(field_labor)?,
            field_team_incentive_ratio: percent(field_incentive)?,
            sales_team_labor_cost_ratio: percent(sales_labor)?,
            sales_team_incentive_ratio: percent(sales_incentive)?,
            updated_at,
        }))
    }

    async fn save_settings(&self, settings: &RatioSettings) -> CoreResult<RatioSettings> {
        sqlx::query(
            r#"
            INSERT INTO settings
                (id, labor_cost_ratio, incentive_ratio,
                 design_team_labor_cost_ratio, design_team_incentive_ratio,
                 field_team_labor_cost_ratio, field_team_incentive_ratio,
                 sales_team_labor_cost_ratio, sales_team_incentive_ratio, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NOW())
            ON DUPLICATE KEY UPDATE
                labor_cost_ratio = VALUES(labor_cost_ratio),
                incentive_ratio = VALUES(incentive_ratio),
                design_team_labor_cost_ratio = VALUES(design_team_labor_cost_ratio),
                design_team_incentive_ratio = VALUES(design_team_incentive_ratio),
                field_team_labor_cost_ratio = VALUES(field_team_labor_cost_ratio),
                field_team_incentive_ratio = VALUES(field_team_incentive_ratio),
                sales_team_labor_cost_ratio = VALUES(sales_team_labor_cost_ratio),
                sales_team_incentive_ratio = VALUES(sales_team_incentive_ratio),
                updated_at = NOW()
            "#,
        )
        .bind(SETTINGS_ID)
        .bind(settings.labor_cost_ratio.value())
        .bind(settings.incentive_ratio.value())
        .bind(settings.design_team_labor_cost_ratio.value())
        .bind(settings.design_team_incentive_ratio.value())
        .bind(settings.field_team_labor_cost_ratio.value())
        .bind(settings.field_team_incentive_ratio.value())
        .bind(settings.sales_team_labor_cost_ratio.value())
        .bind(settings.sales_team_incentive_ratio.value())
        .execute(&self.pool)
        .await?;

        self.load_settings().await?.ok_or(CoreError::NotConfigured)
    }

    async fn allocation_total(
        &self,
        kind: AllocationKind,
        period: YearMonth,
        team: Option<Team>,
    ) -> CoreResult<Money> {
        let total: Decimal = match team {
            // Company-wide totals count every row, roster or not.
            None => {
                sqlx::query_scalar(&format!(
                    "SELECT COALESCE(SUM(amount), 0) \
                     FROM {} WHERE year = ? AND month = ?",
                    kind.table()
                ))
                .bind(period.year)
                .bind(period.month)
                .fetch_one(&self.pool)
                .await?
            }
            Some(team) => {
                sqlx::query_scalar(&format!(
                    "SELECT COALESCE(SUM(a.amount), 0) \
                     FROM {} a JOIN users u ON a.user_id = u.id \
                     WHERE a.year = ? AND a.month = ? AND u.team = ?",
                    kind.table()
                ))
                .bind(period.year)
                .bind(period.month)
                .bind(team.to_string())
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(Money::new(total))
    }

    async fn allocation_totals_between(
        &self,
        kind: AllocationKind,
        from: YearMonth,
        to: YearMonth,
    ) -> CoreResult<Vec<(YearMonth, Money)>> {
        let rows: Vec<(i32, i32, Decimal)> = sqlx::query_as(&format!(
            r#"
            SELECT year, month, COALESCE(SUM(amount), 0)
            FROM {}
            WHERE (year > ? OR (year = ? AND month >= ?))
              AND (year < ? OR (year = ? AND month <= ?))
            GROUP BY year, month
            "#,
            kind.table()
        ))
        .bind(from.year)
        .bind(from.year)
        .bind(from.month)
        .bind(to.year)
        .bind(to.year)
        .bind(to.month)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(year, month_value, total)| {
                Ok((YearMonth { year, month: month(month_value)? }, Money::new(total)))
            })
            .collect()
    }

    async fn upsert_allocations(&self, batch: &AllocationBatch) -> CoreResult<()> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            "INSERT INTO {} (user_id, year, month, amount) VALUES (?, ?, ?, ?) \
             ON DUPLICATE KEY UPDATE amount = VALUES(amount)",
            batch.kind.table()
        );
        for line in &batch.lines {
            sqlx::query(&sql)
                .bind(line.user_id)
                .bind(batch.period.year)
                .bind(batch.period.month)
                .bind(line.amount.amount())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        debug!(kind = %batch.kind, period = %batch.period, rows = batch.lines.len(), "Allocations upserted");
        Ok(())
    }

    async fn allocation_rows(
        &self,
        kind: AllocationKind,
        period: YearMonth,
        visibility: Visibility,
    ) -> CoreResult<Vec<AllocationRow>> {
        let sql = format!(
            r#"
            SELECT a.user_id, a.year, a.month,
                   a.amount,
                   u.name, u.email
            FROM {} a
            JOIN users u ON a.user_id = u.id
            WHERE a.year = ? AND a.month = ? {}
            ORDER BY u.name ASC
            "#,
            kind.table(),
            visibility_clause(visibility)
        );
        let query = sqlx::query_as::<_, (u64, i32, i32, Decimal, String, String)>(&sql)
            .bind(period.year)
            .bind(period.month);
        let query = match visibility {
            Visibility::All => query,
            Visibility::Team(team) => query.bind(team.to_string()),
            Visibility::User(user_id) => query.bind(user_id),
        };
        let rows = query.fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|(user_id, year, month_value, amount, user_name, user_email)| {
                Ok(AllocationRow {
                    user_id,
                    year,
                    month: month(month_value)?,
                    amount: Money::new(amount),
                    user_name,
                    user_email,
                })
            })
            .collect()
    }

    async fn sales_aggregate(&self, period: YearMonth) -> CoreResult<Option<SalesTotals>> {
        let row: Option<(Decimal, Decimal)> = sqlx::query_as(
            r#"
            SELECT COALESCE(amount, 0), COALESCE(profit, 0)
            FROM monthly_sales
            WHERE year = ? AND month = ?
            "#,
        )
        .bind(period.year)
        .bind(period.month)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(amount, profit)| SalesTotals {
            amount: Money::new(amount),
            profit: Money::new(profit),
        }))
    }

    async fn sales_aggregates_between(
        &self,
        from: YearMonth,
        to: YearMonth,
    ) -> CoreResult<Vec<(YearMonth, SalesTotals)>> {
        let rows: Vec<(i32, i32, Decimal, Decimal)> = sqlx::query_as(
            r#"
            SELECT year, month, COALESCE(amount, 0), COALESCE(profit, 0)
            FROM monthly_sales
            WHERE (year > ? OR (year = ? AND month >= ?))
              AND (year < ? OR (year = ? AND month <= ?))
            "#,
        )
        .bind(from.year)
        .bind(from.year)
        .bind(from.month)
        .bind(to.year)
        .bind(to.year)
        .bind(to.month)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(year, month_value, amount, profit)| {
                Ok((
                    YearMonth { year, month: month(month_value)? },
                    SalesTotals {
                        amount: Money::new(amount),
                        profit: Money::new(profit),
                    },
                ))
            })
            .collect()
    }

    async fn sales_entries(&self, period: YearMonth) -> CoreResult<Vec<SalesEntry>> {
        let rows: Vec<EntryRow> = sqlx::query_as(&format!(
            "{} WHERE year = ? AND month = ? ORDER BY id",
            SELECT_ENTRY_COLUMNS
        ))
        .bind(period.year)
        .bind(period.month)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(entry_from_row).collect()
    }

    async fn add_sales_entry(&self, entry: ValidSalesEntry) -> CoreResult<SalesEntry> {
        let period = entry.period;
        // dropping `tx` without commit rolls back
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO sales_entries (year, month, amount, profit, description, entry_date)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(period.year)
        .bind(period.month)
        .bind(entry.amount.amount())
        .bind(entry.profit.amount())
        .bind(entry.description.as_deref())
        .bind(entry.entry_date)
        .execute(&mut *tx)
        .await?;

        let totals = Self::rewrite_sales_aggregate(&mut tx, period).await?;
        tx.commit().await?;

        let entry = entry.into_entry(result.last_insert_id());
        debug!(entry_id = entry.id, %period, amount = %totals.amount, "Sales aggregate rewritten");
        Ok(entry)
    }

    async fn delete_sales_entry(&self, id: u64) -> CoreResult<SalesEntry> {
        let mut tx = self.pool.begin().await?;

        let row: Option<EntryRow> = sqlx::query_as(&format!(
            "{} WHERE id = ? FOR UPDATE",
            SELECT_ENTRY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(CoreError::NotFound(format!("sales entry {}", id)));
        };
        let entry = entry_from_row(row)?;

        sqlx::query("DELETE FROM sales_entries WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let totals = Self::rewrite_sales_aggregate(&mut tx, entry.period()).await?;
        tx.commit().await?;

        debug!(entry_id = id, period = %entry.period(), amount = %totals.amount, "Sales aggregate rewritten");
        Ok(entry)
    }
}
