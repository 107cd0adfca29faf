use async_trait::async_trait;
use market_core::model::{
    AssetSubmission, AssignmentStatus, MarketAssignment, MerchantUser, PlatformPrice,
    PlatformStatus, SubmissionStatus, UserRole, WithdrawalRequest, WithdrawalStatus,
};
use market_core::{MarketError, MarketStore, SettlementCoordinator};
use market_db_entity::db::{
    asset_submission, market_assignment, merchant_user, platform_price, withdrawal_request,
};
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use std::str::FromStr;

pub type Coordinator = SettlementCoordinator<SeaOrmStore>;

/// SeaORM adapter behind the settlement coordinator's storage port. Each
/// commit method runs inside a single database transaction.
pub struct SeaOrmStore {
    conn: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        SeaOrmStore { conn }
    }
}

fn storage_error(error: DbErr) -> MarketError {
    MarketError::Storage(error.to_string())
}

fn stored_value_error(what: &str, value: &str) -> MarketError {
    MarketError::Storage(format!("unrecognized {} '{}' in storage", what, value))
}

fn merchant_from_row(row: merchant_user::Model) -> Result<MerchantUser, MarketError> {
    let role = UserRole::from_str(&row.role).map_err(|_| stored_value_error("role", &row.role))?;
    Ok(MerchantUser::restore(
        row.user_id,
        row.email,
        row.display_name,
        role,
        row.balance,
        row.total_earnings,
        row.payment_pin,
        row.pin_reset_at,
        row.failed_pin_attempts,
        row.is_withdraw_locked,
        row.created_at,
    ))
}

fn merchant_row(user: &MerchantUser) -> merchant_user::ActiveModel {
    merchant_user::ActiveModel {
        user_id: ActiveValue::Set(user.user_id.to_owned()),
        email: ActiveValue::Set(user.email.to_owned()),
        display_name: ActiveValue::Set(user.display_name.to_owned()),
        role: ActiveValue::Set(user.role.to_string()),
        balance: ActiveValue::Set(user.balance()),
        total_earnings: ActiveValue::Set(user.total_earnings()),
        payment_pin: ActiveValue::Set(user.payment_pin().map(|pin| pin.to_owned())),
        pin_reset_at: ActiveValue::Set(user.pin_reset_at()),
        failed_pin_attempts: ActiveValue::Set(user.failed_pin_attempts()),
        is_withdraw_locked: ActiveValue::Set(user.is_withdraw_locked()),
        created_at: ActiveValue::Set(user.created_at),
    }
}

fn platform_from_row(row: platform_price::Model) -> Result<PlatformPrice, MarketError> {
    let status = PlatformStatus::from_str(&row.status)
        .map_err(|_| stored_value_error("platform status", &row.status))?;
    Ok(PlatformPrice {
        platform_id: row.platform_id,
        name: row.name,
        today_price: row.today_price,
        regular_price: row.regular_price,
        status,
        updated_at: row.updated_at,
    })
}

fn platform_row(platform: &PlatformPrice) -> platform_price::ActiveModel {
    platform_price::ActiveModel {
        platform_id: ActiveValue::Set(platform.platform_id.to_owned()),
        name: ActiveValue::Set(platform.name.to_owned()),
        today_price: ActiveValue::Set(platform.today_price),
        regular_price: ActiveValue::Set(platform.regular_price),
        status: ActiveValue::Set(platform.status.to_string()),
        updated_at: ActiveValue::Set(platform.updated_at),
    }
}

fn submission_from_row(row: asset_submission::Model) -> Result<AssetSubmission, MarketError> {
    let status = SubmissionStatus::from_str(&row.status)
        .map_err(|_| stored_value_error("submission status", &row.status))?;
    Ok(AssetSubmission {
        submission_id: row.submission_id,
        user_id: row.user_id,
        platform_id: row.platform_id,
        quantity: row.quantity,
        verified_quantity: row.verified_quantity,
        failed_quantity: row.failed_quantity,
        price_per_unit: row.price_per_unit,
        sheet_link: row.sheet_link,
        status,
        submitted_at: row.submitted_at,
        processed_at: row.processed_at,
    })
}

fn submission_row(submission: &AssetSubmission) -> asset_submission::ActiveModel {
    asset_submission::ActiveModel {
        submission_id: ActiveValue::Set(submission.submission_id.to_owned()),
        user_id: ActiveValue::Set(submission.user_id.to_owned()),
        platform_id: ActiveValue::Set(submission.platform_id.to_owned()),
        quantity: ActiveValue::Set(submission.quantity),
        verified_quantity: ActiveValue::Set(submission.verified_quantity),
        failed_quantity: ActiveValue::Set(submission.failed_quantity),
        price_per_unit: ActiveValue::Set(submission.price_per_unit),
        sheet_link: ActiveValue::Set(submission.sheet_link.to_owned()),
        status: ActiveValue::Set(submission.status.to_string()),
        submitted_at: ActiveValue::Set(submission.submitted_at),
        processed_at: ActiveValue::Set(submission.processed_at),
    }
}

fn withdrawal_from_row(row: withdrawal_request::Model) -> Result<WithdrawalRequest, MarketError> {
    let status = WithdrawalStatus::from_str(&row.status)
        .map_err(|_| stored_value_error("withdrawal status", &row.status))?;
    Ok(WithdrawalRequest {
        withdrawal_id: row.withdrawal_id,
        user_id: row.user_id,
        amount: row.amount,
        method: row.method,
        address: row.address,
        status,
        transaction_id: row.transaction_id,
        created_at: row.created_at,
        processed_at: row.processed_at,
    })
}

fn withdrawal_row(withdrawal: &WithdrawalRequest) -> withdrawal_request::ActiveModel {
    withdrawal_request::ActiveModel {
        withdrawal_id: ActiveValue::Set(withdrawal.withdrawal_id.to_owned()),
        user_id: ActiveValue::Set(withdrawal.user_id.to_owned()),
        amount: ActiveValue::Set(withdrawal.amount),
        method: ActiveValue::Set(withdrawal.method.to_owned()),
        address: ActiveValue::Set(withdrawal.address.to_owned()),
        status: ActiveValue::Set(withdrawal.status.to_string()),
        transaction_id: ActiveValue::Set(withdrawal.transaction_id.to_owned()),
        created_at: ActiveValue::Set(withdrawal.created_at),
        processed_at: ActiveValue::Set(withdrawal.processed_at),
    }
}

fn assignment_from_row(row: market_assignment::Model) -> Result<MarketAssignment, MarketError> {
    let status = AssignmentStatus::from_str(&row.status)
        .map_err(|_| stored_value_error("assignment status", &row.status))?;
    Ok(MarketAssignment {
        assignment_id: row.assignment_id,
        platform_id: row.platform_id,
        target_quantity: row.target_quantity,
        current_quantity: row.current_quantity,
        price_per_unit: row.price_per_unit,
        instructions: row.instructions,
        status,
        created_at: row.created_at,
    })
}

fn assignment_row(assignment: &MarketAssignment) -> market_assignment::ActiveModel {
    market_assignment::ActiveModel {
        assignment_id: ActiveValue::Set(assignment.assignment_id.to_owned()),
        platform_id: ActiveValue::Set(assignment.platform_id.to_owned()),
        target_quantity: ActiveValue::Set(assignment.target_quantity),
        current_quantity: ActiveValue::Set(assignment.current_quantity),
        price_per_unit: ActiveValue::Set(assignment.price_per_unit),
        instructions: ActiveValue::Set(assignment.instructions.to_owned()),
        status: ActiveValue::Set(assignment.status.to_string()),
        created_at: ActiveValue::Set(assignment.created_at),
    }
}

#[async_trait]
impl MarketStore for SeaOrmStore {
    async fn merchant(&self, user_id: &str) -> Result<MerchantUser, MarketError> {
        match merchant_user::Entity::find_by_id(user_id.to_owned())
            .one(&self.conn)
            .await
            .map_err(storage_error)?
        {
            Some(row) => merchant_from_row(row),
            None => Err(MarketError::NotFound(format!("merchant {}", user_id))),
        }
    }

    async fn insert_merchant(&self, user: &MerchantUser) -> Result<(), MarketError> {
        merchant_user::Entity::insert(merchant_row(user))
            .exec(&self.conn)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn save_merchant(&self, user: &MerchantUser) -> Result<(), MarketError> {
        merchant_user::Entity::update(merchant_row(user))
            .exec(&self.conn)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn platform(&self, platform_id: &str) -> Result<PlatformPrice, MarketError> {
        match platform_price::Entity::find_by_id(platform_id.to_owned())
            .one(&self.conn)
            .await
            .map_err(storage_error)?
        {
            Some(row) => platform_from_row(row),
            None => Err(MarketError::NotFound(format!("platform {}", platform_id))),
        }
    }

    async fn save_platform(&self, platform: &PlatformPrice) -> Result<(), MarketError> {
        platform_price::Entity::update(platform_row(platform))
            .exec(&self.conn)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn submission(&self, submission_id: &str) -> Result<AssetSubmission, MarketError> {
        match asset_submission::Entity::find_by_id(submission_id.to_owned())
            .one(&self.conn)
            .await
            .map_err(storage_error)?
        {
            Some(row) => submission_from_row(row),
            None => Err(MarketError::NotFound(format!(
                "submission {}",
                submission_id
            ))),
        }
    }

    async fn insert_submission(&self, submission: &AssetSubmission) -> Result<(), MarketError> {
        asset_submission::Entity::insert(submission_row(submission))
            .exec(&self.conn)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn withdrawal(&self, withdrawal_id: &str) -> Result<WithdrawalRequest, MarketError> {
        match withdrawal_request::Entity::find_by_id(withdrawal_id.to_owned())
            .one(&self.conn)
            .await
            .map_err(storage_error)?
        {
            Some(row) => withdrawal_from_row(row),
            None => Err(MarketError::NotFound(format!(
                "withdrawal {}",
                withdrawal_id
            ))),
        }
    }

    async fn insert_assignment(&self, assignment: &MarketAssignment) -> Result<(), MarketError> {
        market_assignment::Entity::insert(assignment_row(assignment))
            .exec(&self.conn)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn active_assignments(
        &self,
        platform_id: &str,
    ) -> Result<Vec<MarketAssignment>, MarketError> {
        let rows = market_assignment::Entity::find()
            .filter(market_assignment::Column::PlatformId.eq(platform_id))
            .filter(market_assignment::Column::Status.eq(AssignmentStatus::Active.to_string()))
            .order_by_asc(market_assignment::Column::CreatedAt)
            .all(&self.conn)
            .await
            .map_err(storage_error)?;
        rows.into_iter().map(assignment_from_row).collect()
    }

    async fn commit_submission_decision(
        &self,
        submission: &AssetSubmission,
        merchant: Option<&MerchantUser>,
        assignments: &[MarketAssignment],
    ) -> Result<(), MarketError> {
        let txn = self.conn.begin().await.map_err(storage_error)?;
        asset_submission::Entity::update(submission_row(submission))
            .exec(&txn)
            .await
            .map_err(storage_error)?;
        if let Some(merchant) = merchant {
            merchant_user::Entity::update(merchant_row(merchant))
                .exec(&txn)
                .await
                .map_err(storage_error)?;
        }
        for assignment in assignments {
            market_assignment::Entity::update(assignment_row(assignment))
                .exec(&txn)
                .await
                .map_err(storage_error)?;
        }
        txn.commit().await.map_err(storage_error)
    }

    async fn commit_withdrawal_request(
        &self,
        withdrawal: &WithdrawalRequest,
        merchant: &MerchantUser,
    ) -> Result<(), MarketError> {
        let txn = self.conn.begin().await.map_err(storage_error)?;
        withdrawal_request::Entity::insert(withdrawal_row(withdrawal))
            .exec(&txn)
            .await
            .map_err(storage_error)?;
        merchant_user::Entity::update(merchant_row(merchant))
            .exec(&txn)
            .await
            .map_err(storage_error)?;
        txn.commit().await.map_err(storage_error)
    }

    async fn commit_withdrawal_decision(
        &self,
        withdrawal: &WithdrawalRequest,
        merchant: Option<&MerchantUser>,
    ) -> Result<(), MarketError> {
        let txn = self.conn.begin().await.map_err(storage_error)?;
        withdrawal_request::Entity::update(withdrawal_row(withdrawal))
            .exec(&txn)
            .await
            .map_err(storage_error)?;
        if let Some(merchant) = merchant {
            merchant_user::Entity::update(merchant_row(merchant))
                .exec(&txn)
                .await
                .map_err(storage_error)?;
        }
        txn.commit().await.map_err(storage_error)
    }
}
