use anyhow::Result;
use compute::horizon::HorizonPolicy;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use moka::future::Cache;
use sea_orm::{Database, DatabaseConnection};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::schemas::AppState;

/// Application settings.
///
/// Layered from built-in defaults, an optional `budgetapp.{yaml,toml,json}` in the
/// working directory and `BUDGETAPP_*` environment variables, in that order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    /// Projection horizon: `"<n>y"`, `"end-of-year"` or an ISO date
    pub horizon: String,
    /// Seconds a stored starting balance survives without being read or written
    pub balance_ttl_secs: u64,
    pub balance_capacity: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://budgetapp.db?mode=rwc".to_string(),
            bind_address: "0.0.0.0:3000".to_string(),
            horizon: "1y".to_string(),
            balance_ttl_secs: 86_400,
            balance_capacity: 10_000,
        }
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    let settings = Settings::default();
    Ok(Config::builder()
        .set_default("database_url", settings.database_url)?
        .set_default("bind_address", settings.bind_address)?
        .set_default("horizon", settings.horizon)?
        .set_default("balance_ttl_secs", settings.balance_ttl_secs)?
        .set_default("balance_capacity", settings.balance_capacity)?)
}

impl Settings {
    /// Loads `.env`, then the layered configuration.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings: Settings = defaults()?
            .add_source(File::with_name("budgetapp").required(false))
            .add_source(Environment::with_prefix("BUDGETAPP"))
            .build()?
            .try_deserialize()?;

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn horizon_policy(&self) -> Result<HorizonPolicy> {
        Ok(self.horizon.parse()?)
    }
}

/// Builds the shared state around an existing connection.
pub fn build_app_state(db: DatabaseConnection, settings: &Settings) -> Result<AppState> {
    let horizon = settings.horizon_policy()?;

    let balances = Cache::builder()
        .max_capacity(settings.balance_capacity)
        .time_to_idle(Duration::from_secs(settings.balance_ttl_secs))
        .build();

    Ok(AppState {
        db,
        balances,
        horizon,
    })
}

/// Initialize application state for the given database
pub async fn initialize_app_state_with_url(
    database_url: &str,
    settings: &Settings,
) -> Result<AppState> {
    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    build_app_state(db, settings)
}
