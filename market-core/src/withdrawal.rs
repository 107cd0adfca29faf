use crate::balance;
use crate::error::MarketError;
use crate::model::{MerchantUser, WithdrawalRequest, WithdrawalStatus};
use rust_decimal::Decimal;
use uuid::Uuid;

const MIN_WITHDRAWAL_UNITS: i64 = 100;

pub fn minimum_withdrawal() -> Decimal {
    Decimal::from(MIN_WITHDRAWAL_UNITS)
}

/// Debits the merchant and records the pending request in one step. A failed
/// debit aborts the whole request, so no record without a matching debit.
pub fn request(
    user: &mut MerchantUser,
    amount: Decimal,
    method: &str,
    address: &str,
    now: i64,
) -> Result<WithdrawalRequest, MarketError> {
    if amount < minimum_withdrawal() {
        return Err(MarketError::BelowMinimum {
            minimum: minimum_withdrawal(),
        });
    }
    balance::debit(user, amount)?;
    Ok(WithdrawalRequest {
        withdrawal_id: Uuid::new_v4().to_string(),
        user_id: user.user_id.to_owned(),
        amount,
        method: method.to_owned(),
        address: address.to_owned(),
        status: WithdrawalStatus::Pending,
        transaction_id: None,
        created_at: now,
        processed_at: None,
    })
}

/// Marks a pending request paid under the gateway reference. The balance was
/// already debited at request time, so paying has no balance effect.
pub fn fulfill(
    withdrawal: &mut WithdrawalRequest,
    transaction_id: &str,
    now: i64,
) -> Result<(), MarketError> {
    if withdrawal.status != WithdrawalStatus::Pending {
        return Err(MarketError::InvalidState(format!(
            "withdrawal {} is already {}",
            withdrawal.withdrawal_id, withdrawal.status
        )));
    }
    if transaction_id.trim().is_empty() {
        return Err(MarketError::Validation(
            "a transaction reference is required to mark a withdrawal paid".to_owned(),
        ));
    }
    withdrawal.status = WithdrawalStatus::Paid;
    withdrawal.transaction_id = Some(transaction_id.to_owned());
    withdrawal.processed_at = Some(now);
    Ok(())
}

/// Rejects a pending request and refunds the debited amount.
pub fn reject(
    withdrawal: &mut WithdrawalRequest,
    user: &mut MerchantUser,
    now: i64,
) -> Result<(), MarketError> {
    if withdrawal.status != WithdrawalStatus::Pending {
        return Err(MarketError::InvalidState(format!(
            "withdrawal {} is already {}",
            withdrawal.withdrawal_id, withdrawal.status
        )));
    }
    balance::refund(user, withdrawal.amount)?;
    withdrawal.status = WithdrawalStatus::Rejected;
    withdrawal.processed_at = Some(now);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserRole;

    fn merchant_with(amount: i64) -> MerchantUser {
        let mut user =
            MerchantUser::new("u1", "u1@example.com", "Merchant One", UserRole::Merchant, 0);
        balance::credit(&mut user, Decimal::from(amount)).unwrap();
        user
    }

    #[test]
    fn request_debits_immediately() {
        let mut user = merchant_with(500);
        let withdrawal =
            request(&mut user, Decimal::from(300), "bkash", "Merchant One (017...)", 1).unwrap();
        assert_eq!(user.balance(), Decimal::from(200));
        assert_eq!(withdrawal.status, WithdrawalStatus::Pending);
        assert_eq!(withdrawal.amount, Decimal::from(300));
    }

    #[test]
    fn request_below_minimum_is_rejected() {
        let mut user = merchant_with(500);
        let error = request(&mut user, Decimal::from(99), "bkash", "addr", 1).unwrap_err();
        assert_eq!(
            error,
            MarketError::BelowMinimum {
                minimum: Decimal::from(100)
            }
        );
        assert_eq!(user.balance(), Decimal::from(500));
    }

    #[test]
    fn request_exceeding_balance_leaves_no_record_or_debit() {
        let mut user = merchant_with(200);
        let error = request(&mut user, Decimal::from(300), "nagad", "addr", 1).unwrap_err();
        assert!(matches!(error, MarketError::InsufficientFunds { .. }));
        assert_eq!(user.balance(), Decimal::from(200));
    }

    #[test]
    fn fulfill_requires_a_transaction_reference() {
        let mut user = merchant_with(500);
        let mut withdrawal = request(&mut user, Decimal::from(300), "bkash", "addr", 1).unwrap();
        assert!(fulfill(&mut withdrawal, "  ", 2).is_err());
        assert_eq!(withdrawal.status, WithdrawalStatus::Pending);
        fulfill(&mut withdrawal, "TX1", 2).unwrap();
        assert_eq!(withdrawal.status, WithdrawalStatus::Paid);
        assert_eq!(withdrawal.transaction_id.as_deref(), Some("TX1"));
        assert_eq!(user.balance(), Decimal::from(200));
    }

    #[test]
    fn paid_is_terminal() {
        let mut user = merchant_with(500);
        let mut withdrawal = request(&mut user, Decimal::from(300), "bkash", "addr", 1).unwrap();
        fulfill(&mut withdrawal, "TX1", 2).unwrap();
        assert!(matches!(
            fulfill(&mut withdrawal, "TX2", 3),
            Err(MarketError::InvalidState(_))
        ));
        assert!(matches!(
            reject(&mut withdrawal, &mut user, 3),
            Err(MarketError::InvalidState(_))
        ));
        assert_eq!(withdrawal.transaction_id.as_deref(), Some("TX1"));
    }

    #[test]
    fn reject_refunds_the_original_amount() {
        let mut user = merchant_with(500);
        let mut withdrawal = request(&mut user, Decimal::from(300), "upay", "addr", 1).unwrap();
        assert_eq!(user.balance(), Decimal::from(200));
        reject(&mut withdrawal, &mut user, 2).unwrap();
        assert_eq!(user.balance(), Decimal::from(500));
        assert_eq!(withdrawal.status, WithdrawalStatus::Rejected);
        assert!(matches!(
            reject(&mut withdrawal, &mut user, 3),
            Err(MarketError::InvalidState(_))
        ));
        assert_eq!(user.balance(), Decimal::from(500));
    }
}
