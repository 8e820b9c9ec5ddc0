use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::DbErr;

use super::helpers::{date, dec, new_recurring_transaction, new_user};
use super::setup_db;
use crate::testing::{TestScenario, TestScenarioBuilder};
use model::transaction::BasePeriod;

/// Quarterly insurance anchored on the 30th crossing a leap February.
pub struct ScenarioQuarterly {}

impl ScenarioQuarterly {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl TestScenarioBuilder for ScenarioQuarterly {
    fn today(&self) -> NaiveDate {
        date(2024, 1, 1)
    }

    async fn get_scenario(&self) -> Result<TestScenario, DbErr> {
        let db = setup_db().await?;
        let user = new_user(&db, "quarterly").await?;

        new_recurring_transaction(
            &db,
            &user,
            "Insurance",
            date(2023, 11, 30),
            Some(date(2024, 12, 31)),
            -120,
            BasePeriod::Quarterly,
            false,
        )
        .await?;

        let expected = vec![
            (date(2024, 2, 29), dec(-120), dec(380)),
            (date(2024, 5, 30), dec(-120), dec(260)),
            (date(2024, 8, 30), dec(-120), dec(140)),
            (date(2024, 11, 30), dec(-120), dec(20)),
        ];

        Ok((db, user.id, dec(500), expected))
    }
}
