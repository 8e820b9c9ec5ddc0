use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

use model::entities::{one_off_transaction, recurring_transaction, user};
use model::transaction::{BasePeriod, OneOffTransaction, RecurringRule};

pub type Result<T> = std::result::Result<T, DbErr>;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn dec(amount: i64) -> Decimal {
    Decimal::new(amount, 0)
}

/// Recurring rule owned by user 1.
pub fn rule(start: NaiveDate, amount: i64, period: BasePeriod, frequency: i32) -> RecurringRule {
    RecurringRule::new(start, dec(amount), period, frequency, 1)
}

/// One-off transaction owned by user 1.
pub fn one_off(on: NaiveDate, amount: i64) -> OneOffTransaction {
    OneOffTransaction::new(on, dec(amount), 1)
}

pub async fn new_user(db: &DatabaseConnection, username: &str) -> Result<user::Model> {
    user::ActiveModel {
        username: Set(username.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_one_off_transaction(
    db: &DatabaseConnection,
    owner: &user::Model,
    on: NaiveDate,
    amount: i64,
) -> Result<one_off_transaction::Model> {
    one_off_transaction::ActiveModel {
        name: Set(None),
        amount: Set(dec(amount)),
        date: Set(on),
        is_salary: Set(false),
        owner_id: Set(owner.id),
        ..Default::default()
    }
    .insert(db)
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn new_recurring_transaction(
    db: &DatabaseConnection,
    owner: &user::Model,
    name: &str,
    start: NaiveDate,
    end: Option<NaiveDate>,
    amount: i64,
    period: BasePeriod,
    is_salary: bool,
) -> Result<recurring_transaction::Model> {
    recurring_transaction::ActiveModel {
        name: Set(Some(name.to_string())),
        amount: Set(dec(amount)),
        start_date: Set(start),
        end_date: Set(end),
        base_period: Set(period),
        frequency: Set(1),
        is_salary: Set(is_salary),
        owner_id: Set(owner.id),
        ..Default::default()
    }
    .insert(db)
    .await
}
