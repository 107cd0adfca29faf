use crate::error::MarketError;
use crate::model::MerchantUser;
use rust_decimal::Decimal;

/// Increases balance and lifetime earnings together. Exactly-once semantics
/// are the caller's responsibility (the submission decision gate).
pub fn credit(user: &mut MerchantUser, amount: Decimal) -> Result<(), MarketError> {
    if amount < Decimal::ZERO {
        return Err(MarketError::Validation(format!(
            "credit amount {} is negative",
            amount
        )));
    }
    user.balance += amount;
    user.total_earnings += amount;
    Ok(())
}

/// Decreases balance only. A withdrawal is not a loss of lifetime earnings.
pub fn debit(user: &mut MerchantUser, amount: Decimal) -> Result<(), MarketError> {
    if amount < Decimal::ZERO {
        return Err(MarketError::Validation(format!(
            "debit amount {} is negative",
            amount
        )));
    }
    if amount > user.balance {
        return Err(MarketError::InsufficientFunds {
            requested: amount,
            available: user.balance,
        });
    }
    user.balance -= amount;
    Ok(())
}

/// Inverse of [`debit`], applied when a withdrawal request is rejected.
pub fn refund(user: &mut MerchantUser, amount: Decimal) -> Result<(), MarketError> {
    if amount < Decimal::ZERO {
        return Err(MarketError::Validation(format!(
            "refund amount {} is negative",
            amount
        )));
    }
    user.balance += amount;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserRole;

    fn merchant() -> MerchantUser {
        MerchantUser::new("u1", "u1@example.com", "Merchant One", UserRole::Merchant, 0)
    }

    #[test]
    fn credit_bumps_balance_and_earnings() {
        let mut user = merchant();
        credit(&mut user, Decimal::new(11250, 1)).unwrap();
        assert_eq!(user.balance(), Decimal::new(11250, 1));
        assert_eq!(user.total_earnings(), Decimal::new(11250, 1));
    }

    #[test]
    fn debit_leaves_earnings_untouched() {
        let mut user = merchant();
        credit(&mut user, Decimal::from(500)).unwrap();
        debit(&mut user, Decimal::from(300)).unwrap();
        assert_eq!(user.balance(), Decimal::from(200));
        assert_eq!(user.total_earnings(), Decimal::from(500));
    }

    #[test]
    fn debit_exceeding_balance_fails_and_changes_nothing() {
        let mut user = merchant();
        credit(&mut user, Decimal::from(100)).unwrap();
        let error = debit(&mut user, Decimal::from(101)).unwrap_err();
        assert_eq!(
            error,
            MarketError::InsufficientFunds {
                requested: Decimal::from(101),
                available: Decimal::from(100),
            }
        );
        assert_eq!(user.balance(), Decimal::from(100));
    }

    #[test]
    fn refund_restores_a_debit_exactly() {
        let mut user = merchant();
        credit(&mut user, Decimal::from(500)).unwrap();
        debit(&mut user, Decimal::from(300)).unwrap();
        refund(&mut user, Decimal::from(300)).unwrap();
        assert_eq!(user.balance(), Decimal::from(500));
        assert_eq!(user.total_earnings(), Decimal::from(500));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let mut user = merchant();
        assert!(credit(&mut user, Decimal::from(-1)).is_err());
        assert!(debit(&mut user, Decimal::from(-1)).is_err());
        assert!(refund(&mut user, Decimal::from(-1)).is_err());
        assert_eq!(user.balance(), Decimal::ZERO);
    }
}
