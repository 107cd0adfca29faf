use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "asset_submission", schema_name = "public")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub submission_id: String,
    pub user_id: String,
    pub platform_id: String,
    pub quantity: i64,
    pub verified_quantity: Option<i64>,
    pub failed_quantity: Option<i64>,
    // snapshot of the catalog price at submission time
    pub price_per_unit: Decimal,
    pub sheet_link: Option<String>,
    pub status: String,
    pub submitted_at: i64,
    pub processed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
