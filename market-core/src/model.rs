use rust_decimal::Decimal;
use strum_macros::{Display, EnumString};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum UserRole {
    Merchant,
    Admin,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum WithdrawalStatus {
    Pending,
    Paid,
    Rejected,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AssignmentStatus {
    Active,
    Completed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum PlatformStatus {
    Buying,
    Closed,
}

/// A merchant account. Balance, earnings and the pin-guard fields are private
/// to this crate: the settlement coordinator is the only mutation path, so a
/// stale read can never be written back around the ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct MerchantUser {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub(crate) balance: Decimal,
    pub(crate) total_earnings: Decimal,
    pub(crate) payment_pin: Option<String>,
    pub(crate) pin_reset_at: Option<i64>,
    pub(crate) failed_pin_attempts: i16,
    pub(crate) is_withdraw_locked: bool,
    pub created_at: i64,
}

impl MerchantUser {
    pub fn new(user_id: &str, email: &str, display_name: &str, role: UserRole, now: i64) -> Self {
        MerchantUser {
            user_id: user_id.to_owned(),
            email: email.to_owned(),
            display_name: display_name.to_owned(),
            role,
            balance: Decimal::ZERO,
            total_earnings: Decimal::ZERO,
            payment_pin: None,
            pin_reset_at: None,
            failed_pin_attempts: 0,
            is_withdraw_locked: false,
            created_at: now,
        }
    }

    /// Rehydrates an account from storage. Only store adapters should call
    /// this; everything else goes through the coordinator.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        user_id: String,
        email: String,
        display_name: String,
        role: UserRole,
        balance: Decimal,
        total_earnings: Decimal,
        payment_pin: Option<String>,
        pin_reset_at: Option<i64>,
        failed_pin_attempts: i16,
        is_withdraw_locked: bool,
        created_at: i64,
    ) -> Self {
        MerchantUser {
            user_id,
            email,
            display_name,
            role,
            balance,
            total_earnings,
            payment_pin,
            pin_reset_at,
            failed_pin_attempts,
            is_withdraw_locked,
            created_at,
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn total_earnings(&self) -> Decimal {
        self.total_earnings
    }

    pub fn payment_pin(&self) -> Option<&str> {
        self.payment_pin.as_deref()
    }

    pub fn has_pin(&self) -> bool {
        self.payment_pin.is_some()
    }

    pub fn pin_reset_at(&self) -> Option<i64> {
        self.pin_reset_at
    }

    pub fn failed_pin_attempts(&self) -> i16 {
        self.failed_pin_attempts
    }

    pub fn is_withdraw_locked(&self) -> bool {
        self.is_withdraw_locked
    }
}

/// A batch of submitted account units. `price_per_unit` is snapshotted from
/// the catalog at submission time and never changes afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetSubmission {
    pub submission_id: String,
    pub user_id: String,
    pub platform_id: String,
    pub quantity: i64,
    pub verified_quantity: Option<i64>,
    pub failed_quantity: Option<i64>,
    pub price_per_unit: Decimal,
    pub sheet_link: Option<String>,
    pub status: SubmissionStatus,
    pub submitted_at: i64,
    pub processed_at: Option<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WithdrawalRequest {
    pub withdrawal_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub method: String,
    pub address: String,
    pub status: WithdrawalStatus,
    pub transaction_id: Option<String>,
    pub created_at: i64,
    pub processed_at: Option<i64>,
}

/// An admin demand goal. Progress only ever moves forward; a completed
/// assignment never reverts to active.
#[derive(Clone, Debug, PartialEq)]
pub struct MarketAssignment {
    pub assignment_id: String,
    pub platform_id: String,
    pub target_quantity: i64,
    pub current_quantity: i64,
    pub price_per_unit: Decimal,
    pub instructions: Option<String>,
    pub status: AssignmentStatus,
    pub created_at: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlatformPrice {
    pub platform_id: String,
    pub name: String,
    pub today_price: Decimal,
    pub regular_price: Decimal,
    pub status: PlatformStatus,
    pub updated_at: i64,
}
