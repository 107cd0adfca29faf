use market_db_entity::db::*;
use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000004_create_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(withdrawal_request::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(withdrawal_request::Column::WithdrawalId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(withdrawal_request::Column::UserId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(withdrawal_request::Column::Amount)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(withdrawal_request::Column::Method)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(withdrawal_request::Column::Address)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(withdrawal_request::Column::Status)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(withdrawal_request::Column::TransactionId).string())
                    .col(
                        ColumnDef::new(withdrawal_request::Column::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(withdrawal_request::Column::ProcessedAt).big_integer())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(withdrawal_request::Entity).to_owned())
            .await
    }
}
