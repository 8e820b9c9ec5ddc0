use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::user;

/// The base unit a recurring transaction advances by.
/// `frequency` on the rule multiplies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
#[serde(rename_all = "lowercase")]
pub enum BasePeriod {
    #[sea_orm(string_value = "DA")]
    Daily,
    #[sea_orm(string_value = "WK")]
    Weekly,
    #[sea_orm(string_value = "MO")]
    Monthly,
    #[sea_orm(string_value = "QR")]
    Quarterly,
    #[sea_orm(string_value = "YR")]
    Annually,
}

/// A transaction that repeats on a regular schedule.
/// Can be used for both income (salary) and expenses (rent, subscriptions).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recurring_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: Option<String>,
    /// The value of each occurrence. Positive for income, negative for expense.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    /// The date of the first occurrence.
    pub start_date: NaiveDate,
    /// The date of the last possible occurrence. If null, it repeats indefinitely.
    pub end_date: Option<NaiveDate>,
    pub base_period: BasePeriod,
    /// Interval multiplier applied to `base_period`, at least 1.
    pub frequency: i32,
    #[sea_orm(default_value = "false")]
    pub is_salary: bool,
    pub owner_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::OwnerId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
