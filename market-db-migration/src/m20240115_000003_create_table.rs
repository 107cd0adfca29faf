use market_db_entity::db::*;
use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000003_create_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(asset_submission::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(asset_submission::Column::SubmissionId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(asset_submission::Column::UserId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(asset_submission::Column::PlatformId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(asset_submission::Column::Quantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(asset_submission::Column::VerifiedQuantity).big_integer())
                    .col(ColumnDef::new(asset_submission::Column::FailedQuantity).big_integer())
                    .col(
                        ColumnDef::new(asset_submission::Column::PricePerUnit)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(asset_submission::Column::SheetLink).string())
                    .col(
                        ColumnDef::new(asset_submission::Column::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(asset_submission::Column::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(asset_submission::Column::ProcessedAt).big_integer())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(asset_submission::Entity).to_owned())
            .await
    }
}
