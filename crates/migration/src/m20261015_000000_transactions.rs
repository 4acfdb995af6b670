//! Initial schema: the append-only `transactions` ledger.
//!
//! Every IOU is one row scoped by `group_id`. Amounts are integer cents and
//! `date` is the calendar day the row was appended.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    GroupId,
    Debtor,
    Creditor,
    AmountMinor,
    Reason,
    Date,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::GroupId).string().not_null())
                    .col(ColumnDef::new(Transactions::Debtor).string().not_null())
                    .col(ColumnDef::new(Transactions::Creditor).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Reason).string())
                    .col(ColumnDef::new(Transactions::Date).date().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-group_id-date")
                    .table(Transactions::Table)
                    .col(Transactions::GroupId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}
