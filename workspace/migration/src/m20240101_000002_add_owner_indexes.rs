use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::{one_off_transaction, recurring_transaction};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Upcoming one-offs are always fetched per owner from a date onwards
        manager
            .create_index(
                Index::create()
                    .name("idx_one_off_transactions_owner_date")
                    .table(OneOffTransaction::table())
                    .col(OneOffTransaction::column(one_off_transaction::Column::OwnerId))
                    .col(OneOffTransaction::column(one_off_transaction::Column::Date))
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Active rules are fetched per owner and filtered on their end date
        manager
            .create_index(
                Index::create()
                    .name("idx_recurring_transactions_owner_end_date")
                    .table(RecurringTransaction::table())
                    .col(RecurringTransaction::column(recurring_transaction::Column::OwnerId))
                    .col(RecurringTransaction::column(recurring_transaction::Column::EndDate))
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_recurring_transactions_owner_end_date")
                    .table(RecurringTransaction::table())
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_one_off_transactions_owner_date")
                    .table(OneOffTransaction::table())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
