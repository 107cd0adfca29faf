use figment::{
    providers::{Format, Toml},
    Figment,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct MigrationConfig {
    database_url: String,
}

#[tokio::main]
async fn main() {
    if std::env::var("DATABASE_URL").is_err() {
        if let Ok(config) = Figment::new()
            .merge(Toml::file("App.toml"))
            .extract::<MigrationConfig>()
        {
            std::env::set_var("DATABASE_URL", &config.database_url);
        }
    }
    sea_orm_migration::cli::run_cli(market_db_migration::Migrator).await;
}
