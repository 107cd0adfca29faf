use market_db_entity::db::*;
use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000005_create_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(market_assignment::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(market_assignment::Column::AssignmentId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(market_assignment::Column::PlatformId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(market_assignment::Column::TargetQuantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(market_assignment::Column::CurrentQuantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(market_assignment::Column::PricePerUnit)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(market_assignment::Column::Instructions).string())
                    .col(
                        ColumnDef::new(market_assignment::Column::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(market_assignment::Column::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(market_assignment::Entity).to_owned())
            .await
    }
}
