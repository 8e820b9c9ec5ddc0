use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DbErr;

use super::helpers::{date, dec, new_one_off_transaction, new_recurring_transaction, new_user};
use super::setup_db;
use crate::testing::{TestScenario, TestScenarioBuilder};
use model::transaction::BasePeriod;

/// Two users sharing a database; only the first one is projected.
pub struct ScenarioIsolation {}

impl ScenarioIsolation {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl TestScenarioBuilder for ScenarioIsolation {
    fn today(&self) -> NaiveDate {
        date(2024, 4, 1)
    }

    async fn get_scenario(&self) -> Result<TestScenario, DbErr> {
        let db = setup_db().await?;
        let alice = new_user(&db, "alice").await?;
        let bob = new_user(&db, "bob").await?;

        new_one_off_transaction(&db, &alice, date(2024, 5, 1), 100).await?;

        new_one_off_transaction(&db, &bob, date(2024, 5, 1), 999).await?;
        new_recurring_transaction(
            &db,
            &bob,
            "Coffee",
            date(2024, 1, 1),
            None,
            -3,
            BasePeriod::Daily,
            false,
        )
        .await?;

        let expected = vec![(date(2024, 5, 1), dec(100), dec(100))];

        Ok((db, alice.id, Decimal::ZERO, expected))
    }
}
