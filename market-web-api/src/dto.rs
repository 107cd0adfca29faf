use market_core::model::{
    AssetSubmission, MarketAssignment, MerchantUser, WithdrawalRequest as WithdrawalRecord,
};
use market_core::MarketError;
use market_db_entity::db::asset_submission::Model as SubmissionModel;
use market_db_entity::db::market_assignment::Model as AssignmentModel;
use market_db_entity::db::platform_price::Model as PlatformModel;
use market_db_entity::db::withdrawal_request::Model as WithdrawalModel;
use rocket::serde::{Deserialize, Serialize};
use sea_orm::prelude::Decimal;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ResponseData<T> {
    pub code: Option<u16>,
    #[serde(rename = "statusCode")]
    pub status_code: Option<u16>,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ResponseData<T> {
    pub fn new(code: u16, message: String, data: Option<T>) -> ResponseData<T> {
        ResponseData {
            code: Some(code),
            status_code: None,
            message,
            data,
        }
    }

    pub fn from_error(error: &MarketError) -> ResponseData<T> {
        ResponseData::new(response_code(error), error.to_string(), None)
    }
}

pub const RESPONSE_OK: u16 = 200;
pub const RESPONSE_BAD_REQUEST: u16 = 400;
pub const RESPONSE_NOT_FOUND: u16 = 404;
pub const RESPONSE_CONFLICT: u16 = 409;
pub const RESPONSE_LOCKED: u16 = 423;
pub const RESPONSE_INTERNAL_ERROR: u16 = 500;

pub fn response_code(error: &MarketError) -> u16 {
    match error {
        MarketError::Validation(_)
        | MarketError::BelowMinimum { .. }
        | MarketError::InsufficientFunds { .. }
        | MarketError::PinMismatch { .. } => RESPONSE_BAD_REQUEST,
        MarketError::InvalidState(_) => RESPONSE_CONFLICT,
        MarketError::WithdrawLocked | MarketError::PinCooldown { .. } => RESPONSE_LOCKED,
        MarketError::NotFound(_) => RESPONSE_NOT_FOUND,
        MarketError::Storage(_) => RESPONSE_INTERNAL_ERROR,
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SubmissionDetails {
    pub submission_id: String,
    pub platform_id: String,
    pub quantity: i64,
    pub verified_quantity: Option<i64>,
    pub failed_quantity: Option<i64>,
    pub price_per_unit: Decimal,
    pub sheet_link: Option<String>,
    pub status: String,
    pub submitted_at: i64,
    pub processed_at: Option<i64>,
}

impl SubmissionDetails {
    pub fn new(row: &SubmissionModel) -> SubmissionDetails {
        SubmissionDetails {
            submission_id: row.submission_id.to_owned(),
            platform_id: row.platform_id.to_owned(),
            quantity: row.quantity,
            verified_quantity: row.verified_quantity,
            failed_quantity: row.failed_quantity,
            price_per_unit: row.price_per_unit,
            sheet_link: row.sheet_link.to_owned(),
            status: row.status.to_owned(),
            submitted_at: row.submitted_at,
            processed_at: row.processed_at,
        }
    }

    pub fn from_domain(submission: &AssetSubmission) -> SubmissionDetails {
        SubmissionDetails {
            submission_id: submission.submission_id.to_owned(),
            platform_id: submission.platform_id.to_owned(),
            quantity: submission.quantity,
            verified_quantity: submission.verified_quantity,
            failed_quantity: submission.failed_quantity,
            price_per_unit: submission.price_per_unit,
            sheet_link: submission.sheet_link.to_owned(),
            status: submission.status.to_string(),
            submitted_at: submission.submitted_at,
            processed_at: submission.processed_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SubmissionHistory {
    pub total_pages: i64,
    pub submissions: Vec<SubmissionDetails>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct WithdrawalDetails {
    pub withdrawal_id: String,
    pub amount: Decimal,
    pub method: String,
    pub address: String,
    pub status: String,
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
    pub created_at: i64,
    pub processed_at: Option<i64>,
}

impl WithdrawalDetails {
    pub fn new(row: &WithdrawalModel) -> WithdrawalDetails {
        WithdrawalDetails {
            withdrawal_id: row.withdrawal_id.to_owned(),
            amount: row.amount,
            method: row.method.to_owned(),
            address: row.address.to_owned(),
            status: row.status.to_owned(),
            transaction_id: row.transaction_id.to_owned(),
            created_at: row.created_at,
            processed_at: row.processed_at,
        }
    }

    pub fn from_domain(withdrawal: &WithdrawalRecord) -> WithdrawalDetails {
        WithdrawalDetails {
            withdrawal_id: withdrawal.withdrawal_id.to_owned(),
            amount: withdrawal.amount,
            method: withdrawal.method.to_owned(),
            address: withdrawal.address.to_owned(),
            status: withdrawal.status.to_string(),
            transaction_id: withdrawal.transaction_id.to_owned(),
            created_at: withdrawal.created_at,
            processed_at: withdrawal.processed_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct WithdrawalHistory {
    pub total_pages: i64,
    pub withdrawals: Vec<WithdrawalDetails>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct AssignmentDetails {
    pub assignment_id: String,
    pub platform_id: String,
    pub target_quantity: i64,
    pub current_quantity: i64,
    pub price_per_unit: Decimal,
    pub instructions: Option<String>,
    pub status: String,
    pub created_at: i64,
}

impl AssignmentDetails {
    pub fn new(row: &AssignmentModel) -> AssignmentDetails {
        AssignmentDetails {
            assignment_id: row.assignment_id.to_owned(),
            platform_id: row.platform_id.to_owned(),
            target_quantity: row.target_quantity,
            current_quantity: row.current_quantity,
            price_per_unit: row.price_per_unit,
            instructions: row.instructions.to_owned(),
            status: row.status.to_owned(),
            created_at: row.created_at,
        }
    }

    pub fn from_domain(assignment: &MarketAssignment) -> AssignmentDetails {
        AssignmentDetails {
            assignment_id: assignment.assignment_id.to_owned(),
            platform_id: assignment.platform_id.to_owned(),
            target_quantity: assignment.target_quantity,
            current_quantity: assignment.current_quantity,
            price_per_unit: assignment.price_per_unit,
            instructions: assignment.instructions.to_owned(),
            status: assignment.status.to_string(),
            created_at: assignment.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct PlatformDetails {
    pub platform_id: String,
    pub name: String,
    pub today_price: Decimal,
    pub regular_price: Decimal,
    pub status: String,
    pub updated_at: i64,
}

impl PlatformDetails {
    pub fn new(row: &PlatformModel) -> PlatformDetails {
        PlatformDetails {
            platform_id: row.platform_id.to_owned(),
            name: row.name.to_owned(),
            today_price: row.today_price,
            regular_price: row.regular_price,
            status: row.status.to_owned(),
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct AccountSummary {
    pub user_id: String,
    pub display_name: String,
    pub balance: Decimal,
    pub total_earnings: Decimal,
    pub total_withdrawn: Decimal,
    pub pending_earnings: Decimal,
    pub pin_configured: bool,
    pub failed_pin_attempts: i16,
    pub is_withdraw_locked: bool,
    pub pin_cooldown_remaining_secs: i64,
}

impl AccountSummary {
    pub fn new(
        merchant: &MerchantUser,
        total_withdrawn: Decimal,
        pending_earnings: Decimal,
        now: i64,
    ) -> AccountSummary {
        let pin_cooldown_remaining_secs = match merchant.pin_reset_at() {
            Some(reset_at) => {
                let remaining = market_core::pin::PIN_RESET_COOLDOWN_SECS - (now - reset_at);
                if remaining > 0 {
                    remaining
                } else {
                    0
                }
            }
            None => 0,
        };
        AccountSummary {
            user_id: merchant.user_id.to_owned(),
            display_name: merchant.display_name.to_owned(),
            balance: merchant.balance(),
            total_earnings: merchant.total_earnings(),
            total_withdrawn,
            pending_earnings,
            pin_configured: merchant.has_pin(),
            failed_pin_attempts: merchant.failed_pin_attempts(),
            is_withdraw_locked: merchant.is_withdraw_locked(),
            pin_cooldown_remaining_secs,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct LoginRequestData {
    pub email: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct LoginResponseData {
    pub user_id: String,
    pub role: String,
    pub token: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SubmitBatchRequestData {
    pub platform_id: String,
    pub quantity: i64,
    pub sheet_link: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct WithdrawalIntakeRequestData {
    pub amount: Decimal,
    pub method: String,
    pub address: String,
    pub pin: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SetPinRequestData {
    pub pin: String,
    #[serde(rename = "confirmPin")]
    pub confirm_pin: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct VerifyPinRequestData {
    pub pin: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SetPinResponseData {
    pub is_reset: bool,
    pub cooldown_secs: i64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ProcessSubmissionRequestData {
    pub submission_id: String,
    pub outcome: String,
    pub verified_quantity: Option<i64>,
    pub failed_quantity: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ProcessWithdrawalRequestData {
    pub withdrawal_id: String,
    pub outcome: String,
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct CreateAssignmentRequestData {
    pub platform_id: String,
    pub target_quantity: i64,
    pub instructions: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct UpdatePriceRequestData {
    pub platform_id: String,
    pub today_price: Decimal,
    pub regular_price: Decimal,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct UnlockUserRequestData {
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_gate_errors_map_to_locked() {
        assert_eq!(response_code(&MarketError::WithdrawLocked), RESPONSE_LOCKED);
        assert_eq!(
            response_code(&MarketError::PinCooldown { remaining_secs: 60 }),
            RESPONSE_LOCKED
        );
        assert_eq!(
            response_code(&MarketError::PinMismatch {
                attempts_remaining: 2
            }),
            RESPONSE_BAD_REQUEST
        );
        assert_eq!(
            response_code(&MarketError::InvalidState("decided".to_owned())),
            RESPONSE_CONFLICT
        );
    }
}
