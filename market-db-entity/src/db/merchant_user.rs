use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "merchant_user", schema_name = "public")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub balance: Decimal,
    pub total_earnings: Decimal,
    // SHA-256 digest, never the raw pin
    pub payment_pin: Option<String>,
    pub pin_reset_at: Option<i64>,
    pub failed_pin_attempts: i16,
    pub is_withdraw_locked: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
