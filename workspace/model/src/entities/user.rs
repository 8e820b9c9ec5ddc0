use sea_orm::entity::prelude::*;

/// Represents a user of the system.
/// Every one-off transaction and recurring rule belongs to exactly one user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::one_off_transaction::Entity")]
    OneOffTransaction,
    #[sea_orm(has_many = "super::recurring_transaction::Entity")]
    RecurringTransaction,
}

impl Related<super::one_off_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OneOffTransaction.def()
    }
}

impl Related<super::recurring_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringTransaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
