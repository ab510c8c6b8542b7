use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

use crate::calc::CalculationModel;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub model: CalculationModel,
    pub log_dir: String,

    // Reporting month; the current month when unset
    pub report_year: Option<i32>,
    pub report_month: Option<u32>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            model: match env::var("INCENTIVE_MODEL") {
                Ok(value) => CalculationModel::from_str(&value)
                    .with_context(|| format!("unknown INCENTIVE_MODEL: {}", value))?,
                Err(_) => CalculationModel::default(),
            },
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            report_year: parse_optional("REPORT_YEAR")?,
            report_month: parse_optional("REPORT_MONTH")?,
        })
    }
}

fn parse_optional<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a number", key)),
        Err(_) => Ok(None),
    }
}
