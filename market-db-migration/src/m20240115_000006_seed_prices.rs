use sea_orm::{DbBackend, Statement};
use sea_orm_migration::{prelude::*, sea_orm::ConnectionTrait};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000006_seed_prices"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        let seed_statement = Statement::from_string(DbBackend::Postgres, SEED_PRICES.to_string());
        match conn.execute(seed_statement).await {
            Ok(_) => Ok(()),
            Err(error) => Err(error),
        }
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        let delete_statement =
            Statement::from_string(DbBackend::Postgres, DELETE_PRICES.to_string());
        match conn.execute(delete_statement).await {
            Ok(_) => Ok(()),
            Err(error) => Err(error),
        }
    }
}

const SEED_PRICES: &str = r#"INSERT INTO public.platform_price
    (platform_id, name, today_price, regular_price, status, updated_at)
    VALUES
    ('fb', 'Facebook', 12.5, 15.0, 'buying', extract(epoch from now())::bigint),
    ('ig', 'Instagram', 8.0, 10.0, 'buying', extract(epoch from now())::bigint),
    ('tiktok', 'TikTok', 22.0, 20.0, 'buying', extract(epoch from now())::bigint),
    ('yt', 'YouTube', 45.0, 50.0, 'closed', extract(epoch from now())::bigint),
    ('tg', 'Telegram', 35.0, 40.0, 'buying', extract(epoch from now())::bigint),
    ('sc', 'Snapchat', 15.0, 18.0, 'buying', extract(epoch from now())::bigint)
    ON CONFLICT (platform_id) DO NOTHING;"#;

const DELETE_PRICES: &str = r#"DELETE FROM public.platform_price
    WHERE platform_id IN ('fb', 'ig', 'tiktok', 'yt', 'tg', 'sc');"#;
