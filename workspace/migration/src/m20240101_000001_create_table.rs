use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create one_off_transactions table
        manager
            .create_table(
                Table::create()
                    .table(OneOffTransactions::Table)
                    .if_not_exists()
                    .col(pk_auto(OneOffTransactions::Id))
                    .col(string_null(OneOffTransactions::Name))
                    .col(decimal(OneOffTransactions::Amount).decimal_len(16, 4))
                    .col(date(OneOffTransactions::Date))
                    .col(boolean(OneOffTransactions::IsSalary).default(false))
                    .col(integer(OneOffTransactions::OwnerId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_one_off_transactions_owner")
                            .from(OneOffTransactions::Table, OneOffTransactions::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create recurring_transactions table
        manager
            .create_table(
                Table::create()
                    .table(RecurringTransactions::Table)
                    .if_not_exists()
                    .col(pk_auto(RecurringTransactions::Id))
                    .col(string_null(RecurringTransactions::Name))
                    .col(decimal(RecurringTransactions::Amount).decimal_len(16, 4))
                    .col(date(RecurringTransactions::StartDate))
                    .col(date_null(RecurringTransactions::EndDate))
                    .col(string(RecurringTransactions::BasePeriod).string_len(2))
                    .col(integer(RecurringTransactions::Frequency).default(1))
                    .col(boolean(RecurringTransactions::IsSalary).default(false))
                    .col(integer(RecurringTransactions::OwnerId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurring_transactions_owner")
                            .from(RecurringTransactions::Table, RecurringTransactions::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecurringTransactions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OneOffTransactions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
}

#[derive(DeriveIden)]
enum OneOffTransactions {
    Table,
    Id,
    Name,
    Amount,
    Date,
    IsSalary,
    OwnerId,
}

#[derive(DeriveIden)]
enum RecurringTransactions {
    Table,
    Id,
    Name,
    Amount,
    StartDate,
    EndDate,
    BasePeriod,
    Frequency,
    IsSalary,
    OwnerId,
}
