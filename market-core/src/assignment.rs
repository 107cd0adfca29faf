use crate::error::MarketError;
use crate::model::{AssignmentStatus, MarketAssignment, PlatformPrice};
use uuid::Uuid;

/// Posts a demand goal with the platform price snapshotted at creation time.
pub fn create_goal(
    platform: &PlatformPrice,
    target_quantity: i64,
    instructions: Option<String>,
    now: i64,
) -> Result<MarketAssignment, MarketError> {
    if target_quantity <= 0 {
        return Err(MarketError::Validation(format!(
            "target quantity must be positive, got {}",
            target_quantity
        )));
    }
    Ok(MarketAssignment {
        assignment_id: Uuid::new_v4().to_string(),
        platform_id: platform.platform_id.to_owned(),
        target_quantity,
        current_quantity: 0,
        price_per_unit: platform.today_price,
        instructions,
        status: AssignmentStatus::Active,
        created_at: now,
    })
}

/// Advances progress by the approved unit count. Progress is monotone:
/// non-positive inputs are ignored and a completed assignment never reverts.
pub fn advance(assignment: &mut MarketAssignment, approved_units: i64) {
    if assignment.status != AssignmentStatus::Active || approved_units <= 0 {
        return;
    }
    assignment.current_quantity += approved_units;
    if assignment.current_quantity >= assignment.target_quantity {
        assignment.status = AssignmentStatus::Completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::model::PlatformStatus;
    use rust_decimal::Decimal;

    fn goal(target: i64) -> MarketAssignment {
        let platform = catalog::new_platform(
            "tg",
            "Telegram",
            Decimal::from(35),
            Decimal::from(40),
            PlatformStatus::Buying,
            0,
        )
        .unwrap();
        create_goal(&platform, target, None, 0).unwrap()
    }

    #[test]
    fn create_goal_requires_positive_target() {
        let platform = catalog::new_platform(
            "tg",
            "Telegram",
            Decimal::from(35),
            Decimal::from(40),
            PlatformStatus::Buying,
            0,
        )
        .unwrap();
        assert!(create_goal(&platform, 0, None, 0).is_err());
    }

    #[test]
    fn advance_accumulates_until_target() {
        let mut assignment = goal(100);
        advance(&mut assignment, 40);
        assert_eq!(assignment.current_quantity, 40);
        assert_eq!(assignment.status, AssignmentStatus::Active);
        advance(&mut assignment, 60);
        assert_eq!(assignment.current_quantity, 100);
        assert_eq!(assignment.status, AssignmentStatus::Completed);
    }

    #[test]
    fn overshoot_completes_and_keeps_the_total() {
        let mut assignment = goal(50);
        advance(&mut assignment, 90);
        assert_eq!(assignment.current_quantity, 90);
        assert_eq!(assignment.status, AssignmentStatus::Completed);
    }

    #[test]
    fn completed_assignment_never_reverts() {
        let mut assignment = goal(50);
        advance(&mut assignment, 50);
        assert_eq!(assignment.status, AssignmentStatus::Completed);
        advance(&mut assignment, 10);
        assert_eq!(assignment.current_quantity, 50);
        advance(&mut assignment, -30);
        assert_eq!(assignment.current_quantity, 50);
        assert_eq!(assignment.status, AssignmentStatus::Completed);
    }

    #[test]
    fn negative_units_are_ignored_on_active_assignments() {
        let mut assignment = goal(50);
        advance(&mut assignment, -10);
        assert_eq!(assignment.current_quantity, 0);
        assert_eq!(assignment.status, AssignmentStatus::Active);
    }
}
