use market_db_entity::db::*;
use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000001_create_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(merchant_user::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(merchant_user::Column::UserId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(merchant_user::Column::Email).string().not_null())
                    .col(
                        ColumnDef::new(merchant_user::Column::DisplayName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(merchant_user::Column::Role).string().not_null())
                    .col(
                        ColumnDef::new(merchant_user::Column::Balance)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(merchant_user::Column::TotalEarnings)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(merchant_user::Column::PaymentPin).string())
                    .col(ColumnDef::new(merchant_user::Column::PinResetAt).big_integer())
                    .col(
                        ColumnDef::new(merchant_user::Column::FailedPinAttempts)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(merchant_user::Column::IsWithdrawLocked)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(merchant_user::Column::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(merchant_user::Entity).to_owned())
            .await
    }
}
