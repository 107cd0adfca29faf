use market_db_entity::db::*;
use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000002_create_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(platform_price::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(platform_price::Column::PlatformId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(platform_price::Column::Name).string().not_null())
                    .col(
                        ColumnDef::new(platform_price::Column::TodayPrice)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(platform_price::Column::RegularPrice)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(platform_price::Column::Status).string().not_null())
                    .col(
                        ColumnDef::new(platform_price::Column::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(platform_price::Entity).to_owned())
            .await
    }
}
