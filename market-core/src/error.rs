use rust_decimal::Decimal;
use thiserror::Error;

/// Settlement errors surfaced to the caller as typed results. None of these
/// leave partially applied state behind.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MarketError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("amount is below the minimum withdrawal of {minimum}")]
    BelowMinimum { minimum: Decimal },
    #[error(
        "withdrawal access is locked after too many incorrect pin attempts; \
         contact support to verify your identity and restore access"
    )]
    WithdrawLocked,
    #[error("withdrawals are cooling down after a pin reset; {remaining_secs}s remaining")]
    PinCooldown { remaining_secs: i64 },
    #[error("incorrect pin; {attempts_remaining} attempts remaining")]
    PinMismatch { attempts_remaining: i16 },
    #[error("{0} not found")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
}
