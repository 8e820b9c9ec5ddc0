use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::DbErr;

use super::helpers::{date, dec, new_one_off_transaction, new_recurring_transaction, new_user};
use super::setup_db;
use crate::testing::{TestScenario, TestScenarioBuilder};
use model::transaction::BasePeriod;

/// Salary and rent around a couple of one-off expenses, including a
/// one-off already in the past and an expense sharing the salary date.
pub struct ScenarioSalaryMonth {}

impl ScenarioSalaryMonth {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl TestScenarioBuilder for ScenarioSalaryMonth {
    fn today(&self) -> NaiveDate {
        date(2024, 1, 10)
    }

    async fn get_scenario(&self) -> Result<TestScenario, DbErr> {
        let db = setup_db().await?;
        let user = new_user(&db, "salary_month").await?;

        new_recurring_transaction(
            &db,
            &user,
            "Salary",
            date(2023, 6, 25),
            Some(date(2024, 2, 29)),
            2500,
            BasePeriod::Monthly,
            true,
        )
        .await?;
        new_recurring_transaction(
            &db,
            &user,
            "Rent",
            date(2023, 1, 1),
            Some(date(2024, 3, 1)),
            -900,
            BasePeriod::Monthly,
            false,
        )
        .await?;

        // Already booked, not part of the projection
        new_one_off_transaction(&db, &user, date(2024, 1, 5), -50).await?;
        new_one_off_transaction(&db, &user, date(2024, 1, 10), -120).await?;
        new_one_off_transaction(&db, &user, date(2024, 2, 25), -300).await?;

        let expected = vec![
            (date(2024, 1, 10), dec(-120), dec(880)),
            (date(2024, 1, 25), dec(2500), dec(3380)),
            (date(2024, 2, 1), dec(-900), dec(2480)),
            (date(2024, 2, 25), dec(-300), dec(2180)),
            (date(2024, 2, 25), dec(2500), dec(4680)),
            (date(2024, 3, 1), dec(-900), dec(3780)),
        ];

        Ok((db, user.id, dec(1000), expected))
    }
}
