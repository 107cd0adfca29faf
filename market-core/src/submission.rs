use crate::error::MarketError;
use crate::model::{AssetSubmission, PlatformPrice, PlatformStatus, SubmissionStatus};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Emitted by [`decide`] for the settlement coordinator to apply; the
/// submission ledger itself never touches balances.
#[derive(Clone, Debug, PartialEq)]
pub struct SettlementEvent {
    pub user_id: String,
    pub platform_id: String,
    pub verified_quantity: i64,
    pub earning: Decimal,
}

/// Records a pending batch with the platform's price snapshotted at call
/// time. Later catalog edits never reprice it.
pub fn create(
    user_id: &str,
    platform: &PlatformPrice,
    quantity: i64,
    sheet_link: Option<String>,
    now: i64,
) -> Result<AssetSubmission, MarketError> {
    if quantity <= 0 {
        return Err(MarketError::Validation(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    if platform.status != PlatformStatus::Buying {
        return Err(MarketError::Validation(format!(
            "platform {} is not buying",
            platform.platform_id
        )));
    }
    Ok(AssetSubmission {
        submission_id: Uuid::new_v4().to_string(),
        user_id: user_id.to_owned(),
        platform_id: platform.platform_id.to_owned(),
        quantity,
        verified_quantity: None,
        failed_quantity: None,
        price_per_unit: platform.today_price,
        sheet_link,
        status: SubmissionStatus::Pending,
        submitted_at: now,
        processed_at: None,
    })
}

/// Applies the admin decision. A submission is decided exactly once: any
/// status other than pending fails with `InvalidState`.
///
/// Approving without an explicit count verifies the full batch; rejecting
/// without one verifies nothing. An omitted failed count is the remainder.
pub fn decide(
    submission: &mut AssetSubmission,
    outcome: SubmissionStatus,
    verified_qty: Option<i64>,
    failed_qty: Option<i64>,
    now: i64,
) -> Result<SettlementEvent, MarketError> {
    if submission.status != SubmissionStatus::Pending {
        return Err(MarketError::InvalidState(format!(
            "submission {} is already {}",
            submission.submission_id, submission.status
        )));
    }
    let verified = match outcome {
        SubmissionStatus::Approved => verified_qty.unwrap_or(submission.quantity),
        SubmissionStatus::Rejected => verified_qty.unwrap_or(0),
        SubmissionStatus::Pending => {
            return Err(MarketError::Validation(
                "decision outcome must be approved or rejected".to_owned(),
            ))
        }
    };
    let failed = failed_qty.unwrap_or(submission.quantity - verified);
    if verified < 0 || failed < 0 {
        return Err(MarketError::Validation(
            "verified and failed quantities can not be negative".to_owned(),
        ));
    }
    if verified + failed > submission.quantity {
        return Err(MarketError::Validation(format!(
            "verified {} + failed {} exceeds submitted quantity {}",
            verified, failed, submission.quantity
        )));
    }

    submission.status = outcome;
    submission.verified_quantity = Some(verified);
    submission.failed_quantity = Some(failed);
    submission.processed_at = Some(now);

    Ok(SettlementEvent {
        user_id: submission.user_id.to_owned(),
        platform_id: submission.platform_id.to_owned(),
        verified_quantity: verified,
        earning: Decimal::from(verified) * submission.price_per_unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn buying_platform() -> PlatformPrice {
        catalog::new_platform(
            "fb",
            "Facebook",
            Decimal::new(125, 1),
            Decimal::from(15),
            PlatformStatus::Buying,
            0,
        )
        .unwrap()
    }

    #[test]
    fn create_snapshots_the_current_price() {
        let mut platform = buying_platform();
        let submission = create("u1", &platform, 100, None, 5).unwrap();
        catalog::update_price(
            &mut platform,
            Decimal::from(99),
            Decimal::from(99),
            PlatformStatus::Buying,
            6,
        )
        .unwrap();
        assert_eq!(submission.price_per_unit, Decimal::new(125, 1));
        assert_eq!(submission.status, SubmissionStatus::Pending);
    }

    #[test]
    fn create_rejects_non_positive_quantity() {
        let platform = buying_platform();
        assert!(matches!(
            create("u1", &platform, 0, None, 0),
            Err(MarketError::Validation(_))
        ));
        assert!(matches!(
            create("u1", &platform, -4, None, 0),
            Err(MarketError::Validation(_))
        ));
    }

    #[test]
    fn create_rejects_closed_platform() {
        let mut platform = buying_platform();
        platform.status = PlatformStatus::Closed;
        assert!(matches!(
            create("u1", &platform, 10, None, 0),
            Err(MarketError::Validation(_))
        ));
    }

    #[test]
    fn approve_with_split_computes_earning() {
        let platform = buying_platform();
        let mut submission = create("u1", &platform, 100, None, 0).unwrap();
        let event = decide(
            &mut submission,
            SubmissionStatus::Approved,
            Some(90),
            Some(10),
            7,
        )
        .unwrap();
        assert_eq!(event.earning, Decimal::new(11250, 1));
        assert_eq!(event.verified_quantity, 90);
        assert_eq!(submission.verified_quantity, Some(90));
        assert_eq!(submission.failed_quantity, Some(10));
        assert_eq!(submission.processed_at, Some(7));
    }

    #[test]
    fn approve_defaults_to_full_batch() {
        let platform = buying_platform();
        let mut submission = create("u1", &platform, 40, None, 0).unwrap();
        let event = decide(&mut submission, SubmissionStatus::Approved, None, None, 0).unwrap();
        assert_eq!(event.verified_quantity, 40);
        assert_eq!(submission.failed_quantity, Some(0));
    }

    #[test]
    fn reject_defaults_to_zero_verified() {
        let platform = buying_platform();
        let mut submission = create("u1", &platform, 40, None, 0).unwrap();
        let event = decide(&mut submission, SubmissionStatus::Rejected, None, None, 0).unwrap();
        assert_eq!(event.verified_quantity, 0);
        assert_eq!(event.earning, Decimal::ZERO);
        assert_eq!(submission.failed_quantity, Some(40));
    }

    #[test]
    fn decide_is_single_shot() {
        let platform = buying_platform();
        let mut submission = create("u1", &platform, 40, None, 0).unwrap();
        decide(&mut submission, SubmissionStatus::Approved, None, None, 0).unwrap();
        let error =
            decide(&mut submission, SubmissionStatus::Approved, None, None, 0).unwrap_err();
        assert!(matches!(error, MarketError::InvalidState(_)));
    }

    #[test]
    fn split_exceeding_quantity_is_rejected() {
        let platform = buying_platform();
        let mut submission = create("u1", &platform, 40, None, 0).unwrap();
        let error = decide(
            &mut submission,
            SubmissionStatus::Approved,
            Some(30),
            Some(20),
            0,
        )
        .unwrap_err();
        assert!(matches!(error, MarketError::Validation(_)));
        assert_eq!(submission.status, SubmissionStatus::Pending);
    }
}
