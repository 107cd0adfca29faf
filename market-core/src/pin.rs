use crate::error::MarketError;
use crate::model::MerchantUser;
use sha2::{Digest, Sha256};

pub const PIN_RESET_COOLDOWN_SECS: i64 = 24 * 60 * 60;
pub const MAX_PIN_ATTEMPTS: i16 = 3;

/// Sets or resets the withdrawal pin. A first-time setup activates
/// immediately; a reset clears the attempt counter and any lock but starts
/// the 24h withdrawal cooldown.
pub fn set_pin(
    user: &mut MerchantUser,
    pin: &str,
    is_reset: bool,
    now: i64,
) -> Result<(), MarketError> {
    if pin.len() < 4 || pin.len() > 6 || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(MarketError::Validation(
            "pin must be 4 to 6 digits".to_owned(),
        ));
    }
    user.payment_pin = Some(digest(pin));
    if is_reset {
        user.pin_reset_at = Some(now);
    }
    user.failed_pin_attempts = 0;
    user.is_withdraw_locked = false;
    Ok(())
}

/// Withdrawal authorization gate. Lock and cooldown are checked before the
/// pin itself; the third consecutive mismatch locks the account one-way.
pub fn authorize(user: &mut MerchantUser, supplied: &str, now: i64) -> Result<(), MarketError> {
    if user.is_withdraw_locked {
        return Err(MarketError::WithdrawLocked);
    }
    if let Some(reset_at) = user.pin_reset_at {
        let elapsed = now - reset_at;
        if elapsed < PIN_RESET_COOLDOWN_SECS {
            return Err(MarketError::PinCooldown {
                remaining_secs: PIN_RESET_COOLDOWN_SECS - elapsed,
            });
        }
    }
    let stored = match &user.payment_pin {
        Some(stored) => stored,
        None => {
            return Err(MarketError::Validation(
                "no withdrawal pin is configured".to_owned(),
            ))
        }
    };
    if digest(supplied).ne(stored) {
        user.failed_pin_attempts += 1;
        if user.failed_pin_attempts >= MAX_PIN_ATTEMPTS {
            user.is_withdraw_locked = true;
            return Err(MarketError::WithdrawLocked);
        }
        return Err(MarketError::PinMismatch {
            attempts_remaining: MAX_PIN_ATTEMPTS - user.failed_pin_attempts,
        });
    }
    user.failed_pin_attempts = 0;
    Ok(())
}

/// Out-of-band recovery: clears the lock and the attempt counter. The reset
/// cooldown keeps running.
pub fn admin_unlock(user: &mut MerchantUser) {
    user.is_withdraw_locked = false;
    user.failed_pin_attempts = 0;
}

fn digest(pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pin.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserRole;

    fn merchant() -> MerchantUser {
        MerchantUser::new("u1", "u1@example.com", "Merchant One", UserRole::Merchant, 0)
    }

    #[test]
    fn pin_must_be_four_to_six_digits() {
        let mut user = merchant();
        assert!(set_pin(&mut user, "123", false, 0).is_err());
        assert!(set_pin(&mut user, "1234567", false, 0).is_err());
        assert!(set_pin(&mut user, "12a4", false, 0).is_err());
        assert!(set_pin(&mut user, "1234", false, 0).is_ok());
        assert!(set_pin(&mut user, "123456", false, 0).is_ok());
    }

    #[test]
    fn plaintext_pin_is_never_stored() {
        let mut user = merchant();
        set_pin(&mut user, "1234", false, 0).unwrap();
        assert_ne!(user.payment_pin(), Some("1234"));
    }

    #[test]
    fn first_set_authorizes_without_cooldown() {
        let mut user = merchant();
        set_pin(&mut user, "1234", false, 100).unwrap();
        assert!(authorize(&mut user, "1234", 101).is_ok());
    }

    #[test]
    fn reset_starts_the_cooldown_even_for_the_correct_pin() {
        let mut user = merchant();
        set_pin(&mut user, "1234", false, 100).unwrap();
        set_pin(&mut user, "5678", true, 200).unwrap();
        let error = authorize(&mut user, "5678", 300).unwrap_err();
        assert_eq!(
            error,
            MarketError::PinCooldown {
                remaining_secs: PIN_RESET_COOLDOWN_SECS - 100
            }
        );
        // window elapsed
        assert!(authorize(&mut user, "5678", 200 + PIN_RESET_COOLDOWN_SECS).is_ok());
    }

    #[test]
    fn three_mismatches_lock_one_way() {
        let mut user = merchant();
        set_pin(&mut user, "1234", false, 0).unwrap();
        assert_eq!(
            authorize(&mut user, "0000", 1),
            Err(MarketError::PinMismatch {
                attempts_remaining: 2
            })
        );
        assert_eq!(
            authorize(&mut user, "0000", 2),
            Err(MarketError::PinMismatch {
                attempts_remaining: 1
            })
        );
        assert_eq!(authorize(&mut user, "0000", 3), Err(MarketError::WithdrawLocked));
        assert!(user.is_withdraw_locked());
        // locked fast-fails before the pin is even checked, counter stays put
        assert_eq!(authorize(&mut user, "1234", 4), Err(MarketError::WithdrawLocked));
        assert_eq!(user.failed_pin_attempts(), MAX_PIN_ATTEMPTS);
    }

    #[test]
    fn a_match_resets_the_attempt_counter() {
        let mut user = merchant();
        set_pin(&mut user, "1234", false, 0).unwrap();
        authorize(&mut user, "0000", 1).unwrap_err();
        authorize(&mut user, "0001", 2).unwrap_err();
        assert!(authorize(&mut user, "1234", 3).is_ok());
        assert_eq!(user.failed_pin_attempts(), 0);
    }

    #[test]
    fn admin_unlock_clears_the_lock_but_not_the_cooldown() {
        let mut user = merchant();
        set_pin(&mut user, "1234", false, 0).unwrap();
        for second in 1..=3 {
            let _ = authorize(&mut user, "0000", second);
        }
        assert!(user.is_withdraw_locked());
        admin_unlock(&mut user);
        assert!(!user.is_withdraw_locked());
        assert_eq!(user.failed_pin_attempts(), 0);
        assert!(authorize(&mut user, "1234", 10).is_ok());

        set_pin(&mut user, "9999", true, 20).unwrap();
        admin_unlock(&mut user);
        assert!(matches!(
            authorize(&mut user, "9999", 30),
            Err(MarketError::PinCooldown { .. })
        ));
    }

    #[test]
    fn authorize_without_a_pin_is_a_validation_error() {
        let mut user = merchant();
        assert!(matches!(
            authorize(&mut user, "1234", 0),
            Err(MarketError::Validation(_))
        ));
    }
}
