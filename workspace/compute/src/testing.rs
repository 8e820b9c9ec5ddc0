pub mod helpers;
pub mod scenario_isolation;
pub mod scenario_quarterly;
pub mod scenario_salary_month;

pub use scenario_isolation::ScenarioIsolation;
pub use scenario_quarterly::ScenarioQuarterly;
pub use scenario_salary_month::ScenarioSalaryMonth;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};

use crate::error::Result as ComputeResult;
use crate::ledger::Projector;
use migration::{Migrator, MigratorTrait};
use model::repository::{DbRepository, RepositoryError};
use model::transaction::OwnerId;

async fn setup_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

    Migrator::up(&db, None).await.expect("Migrations failed.");
    Ok(db)
}

/// Expected projection rows as (date, amount, running balance).
pub type AssertResult = Vec<(NaiveDate, Decimal, Decimal)>;

/// Prepared test scenario: database, owner to project, opening balance and expected rows.
pub type TestScenario = (DatabaseConnection, OwnerId, Decimal, AssertResult);

/// Trait for building test scenarios.
#[async_trait]
pub trait TestScenarioBuilder {
    /// The "today" the scenario was written against.
    fn today(&self) -> NaiveDate;

    async fn get_scenario(&self) -> Result<TestScenario, DbErr>;
}

pub async fn run_and_assert_scenario(
    builder: &dyn TestScenarioBuilder,
    projector: &Projector,
) -> ComputeResult<()> {
    let (db, owner, opening_balance, assert_result) = builder
        .get_scenario()
        .await
        .map_err(RepositoryError::from)?;

    let repository = DbRepository::new(db);
    let sheet = projector
        .project_for_owner(&repository, owner, opening_balance)
        .await?;

    let actual: AssertResult = sheet
        .entries
        .iter()
        .map(|entry| (entry.date(), entry.amount(), entry.balance()))
        .collect();

    assert_eq!(actual, assert_result);
    assert_eq!(sheet.opening_balance, opening_balance);
    Ok(())
}
