use crate::error::MarketError;
use crate::model::{
    AssetSubmission, MarketAssignment, MerchantUser, PlatformPrice, PlatformStatus,
    SubmissionStatus, UserRole, WithdrawalRequest,
};
use crate::store::MarketStore;
use crate::{assignment, balance, catalog, pin, submission, withdrawal};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Drives every cross-ledger transaction. Operations on one merchant are
/// serialized through a per-user mutex, and every composite operation
/// validates and mutates in memory before a single store commit, so a failed
/// step never leaves the ledgers half-applied.
pub struct SettlementCoordinator<S: MarketStore> {
    store: Arc<S>,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    // serializes assignment fan-out across merchants
    assignment_guard: Mutex<()>,
}

impl<S: MarketStore> SettlementCoordinator<S> {
    pub fn new(store: Arc<S>) -> Self {
        SettlementCoordinator {
            store,
            user_locks: Mutex::new(HashMap::new()),
            assignment_guard: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.user_locks.lock().await;
        locks
            .entry(user_id.to_owned())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Looks up a merchant account, creating it on first sight. The web
    /// boundary authenticates; this only materializes the ledger row.
    pub async fn register_merchant(
        &self,
        user_id: &str,
        email: &str,
        display_name: &str,
        role: UserRole,
    ) -> Result<MerchantUser, MarketError> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;
        match self.store.merchant(user_id).await {
            Ok(existing) => Ok(existing),
            Err(MarketError::NotFound(_)) => {
                let user = MerchantUser::new(user_id, email, display_name, role, now());
                self.store.insert_merchant(&user).await?;
                info!("registered merchant {}", user_id);
                Ok(user)
            }
            Err(error) => Err(error),
        }
    }

    pub async fn submit_batch(
        &self,
        user_id: &str,
        platform_id: &str,
        quantity: i64,
        sheet_link: Option<String>,
    ) -> Result<AssetSubmission, MarketError> {
        let merchant = self.store.merchant(user_id).await?;
        let platform = self.store.platform(platform_id).await?;
        let submission =
            submission::create(&merchant.user_id, &platform, quantity, sheet_link, now())?;
        self.store.insert_submission(&submission).await?;
        info!(
            "merchant {} submitted {} units for {}",
            user_id, quantity, platform_id
        );
        Ok(submission)
    }

    /// Approves a pending submission: marks it decided, credits the earning
    /// and advances every active assignment for the platform, all in one
    /// commit.
    pub async fn approve_submission(
        &self,
        submission_id: &str,
        verified_qty: Option<i64>,
        failed_qty: Option<i64>,
    ) -> Result<AssetSubmission, MarketError> {
        let owner = self.store.submission(submission_id).await?.user_id;
        let lock = self.user_lock(&owner).await;
        let _guard = lock.lock().await;
        // re-read under the lock so a racing decision surfaces as InvalidState
        let mut submission = self.store.submission(submission_id).await?;
        let event = submission::decide(
            &mut submission,
            SubmissionStatus::Approved,
            verified_qty,
            failed_qty,
            now(),
        )?;

        let mut merchant = self.store.merchant(&event.user_id).await?;
        balance::credit(&mut merchant, event.earning)?;

        let _fan_out = self.assignment_guard.lock().await;
        let mut assignments = self.store.active_assignments(&event.platform_id).await?;
        for active in assignments.iter_mut() {
            assignment::advance(active, event.verified_quantity);
        }

        self.store
            .commit_submission_decision(&submission, Some(&merchant), &assignments)
            .await?;
        info!(
            "submission {} approved, credited {} to {}",
            submission_id, event.earning, event.user_id
        );
        Ok(submission)
    }

    pub async fn reject_submission(
        &self,
        submission_id: &str,
        verified_qty: Option<i64>,
        failed_qty: Option<i64>,
    ) -> Result<AssetSubmission, MarketError> {
        let owner = self.store.submission(submission_id).await?.user_id;
        let lock = self.user_lock(&owner).await;
        let _guard = lock.lock().await;
        let mut submission = self.store.submission(submission_id).await?;
        submission::decide(
            &mut submission,
            SubmissionStatus::Rejected,
            verified_qty,
            failed_qty,
            now(),
        )?;
        self.store
            .commit_submission_decision(&submission, None, &[])
            .await?;
        info!("submission {} rejected", submission_id);
        Ok(submission)
    }

    /// Pin-gated withdrawal intake. The debit and the pending record land in
    /// one commit; a failed authorization still persists the attempt counter
    /// and any lock it tripped.
    pub async fn request_withdrawal(
        &self,
        user_id: &str,
        supplied_pin: &str,
        amount: Decimal,
        method: &str,
        address: &str,
    ) -> Result<WithdrawalRequest, MarketError> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;
        let mut merchant = self.store.merchant(user_id).await?;
        if let Err(error) = pin::authorize(&mut merchant, supplied_pin, now()) {
            self.store.save_merchant(&merchant).await?;
            return Err(error);
        }
        let withdrawal = withdrawal::request(&mut merchant, amount, method, address, now())?;
        self.store
            .commit_withdrawal_request(&withdrawal, &merchant)
            .await?;
        info!(
            "merchant {} requested withdrawal of {} via {}",
            user_id, amount, method
        );
        Ok(withdrawal)
    }

    pub async fn fulfill_withdrawal(
        &self,
        withdrawal_id: &str,
        transaction_id: &str,
    ) -> Result<WithdrawalRequest, MarketError> {
        let owner = self.store.withdrawal(withdrawal_id).await?.user_id;
        let lock = self.user_lock(&owner).await;
        let _guard = lock.lock().await;
        let mut withdrawal = self.store.withdrawal(withdrawal_id).await?;
        withdrawal::fulfill(&mut withdrawal, transaction_id, now())?;
        self.store
            .commit_withdrawal_decision(&withdrawal, None)
            .await?;
        info!(
            "withdrawal {} paid under reference {}",
            withdrawal_id, transaction_id
        );
        Ok(withdrawal)
    }

    pub async fn reject_withdrawal(
        &self,
        withdrawal_id: &str,
    ) -> Result<WithdrawalRequest, MarketError> {
        let owner = self.store.withdrawal(withdrawal_id).await?.user_id;
        let lock = self.user_lock(&owner).await;
        let _guard = lock.lock().await;
        let mut withdrawal = self.store.withdrawal(withdrawal_id).await?;
        let mut merchant = self.store.merchant(&withdrawal.user_id).await?;
        withdrawal::reject(&mut withdrawal, &mut merchant, now())?;
        self.store
            .commit_withdrawal_decision(&withdrawal, Some(&merchant))
            .await?;
        info!(
            "withdrawal {} rejected, refunded {} to {}",
            withdrawal_id, withdrawal.amount, withdrawal.user_id
        );
        Ok(withdrawal)
    }

    /// Standalone pin check. Counts against the attempt budget exactly like
    /// a withdrawal attempt, and persists whatever it tripped.
    pub async fn authorize_pin(
        &self,
        user_id: &str,
        supplied_pin: &str,
    ) -> Result<(), MarketError> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;
        let mut merchant = self.store.merchant(user_id).await?;
        let result = pin::authorize(&mut merchant, supplied_pin, now());
        self.store.save_merchant(&merchant).await?;
        result
    }

    /// Sets or resets the withdrawal pin. Returns whether this was a reset,
    /// which starts the 24h cooldown.
    pub async fn set_pin(&self, user_id: &str, new_pin: &str) -> Result<bool, MarketError> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;
        let mut merchant = self.store.merchant(user_id).await?;
        let is_reset = merchant.has_pin();
        pin::set_pin(&mut merchant, new_pin, is_reset, now())?;
        self.store.save_merchant(&merchant).await?;
        info!("merchant {} pin {}", user_id, if is_reset { "reset" } else { "set" });
        Ok(is_reset)
    }

    pub async fn admin_unlock(&self, user_id: &str) -> Result<MerchantUser, MarketError> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;
        let mut merchant = self.store.merchant(user_id).await?;
        pin::admin_unlock(&mut merchant);
        self.store.save_merchant(&merchant).await?;
        info!("withdrawal access restored for {}", user_id);
        Ok(merchant)
    }

    pub async fn create_goal(
        &self,
        platform_id: &str,
        target_quantity: i64,
        instructions: Option<String>,
    ) -> Result<MarketAssignment, MarketError> {
        let platform = self.store.platform(platform_id).await?;
        let goal = assignment::create_goal(&platform, target_quantity, instructions, now())?;
        self.store.insert_assignment(&goal).await?;
        info!(
            "assignment posted: {} units for {}",
            target_quantity, platform_id
        );
        Ok(goal)
    }

    pub async fn update_price(
        &self,
        platform_id: &str,
        today_price: Decimal,
        regular_price: Decimal,
        status: PlatformStatus,
    ) -> Result<PlatformPrice, MarketError> {
        let mut platform = self.store.platform(platform_id).await?;
        catalog::update_price(&mut platform, today_price, regular_price, status, now())?;
        self.store.save_platform(&platform).await?;
        Ok(platform)
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssignmentStatus, WithdrawalStatus};
    use crate::store::MemoryStore;

    async fn coordinator() -> SettlementCoordinator<MemoryStore> {
        let store = MemoryStore::new();
        let platform = catalog::new_platform(
            "fb",
            "Facebook",
            Decimal::new(125, 1),
            Decimal::from(15),
            PlatformStatus::Buying,
            0,
        )
        .unwrap();
        store.save_platform(&platform).await.unwrap();
        SettlementCoordinator::new(Arc::new(store))
    }

    async fn funded_merchant(
        coordinator: &SettlementCoordinator<MemoryStore>,
        user_id: &str,
        amount: i64,
    ) {
        let mut merchant = coordinator
            .register_merchant(user_id, "m@example.com", "Merchant", UserRole::Merchant)
            .await
            .unwrap();
        balance::credit(&mut merchant, Decimal::from(amount)).unwrap();
        coordinator.store().save_merchant(&merchant).await.unwrap();
    }

    #[tokio::test]
    async fn approval_credits_once_and_advances_every_active_assignment() {
        let coordinator = coordinator().await;
        funded_merchant(&coordinator, "u1", 0).await;
        let first = coordinator.create_goal("fb", 200, None).await.unwrap();
        let second = coordinator.create_goal("fb", 60, None).await.unwrap();

        let submission = coordinator
            .submit_batch("u1", "fb", 100, Some("https://sheets/batch".to_owned()))
            .await
            .unwrap();
        let approved = coordinator
            .approve_submission(&submission.submission_id, Some(90), Some(10))
            .await
            .unwrap();
        assert_eq!(approved.status, SubmissionStatus::Approved);

        let merchant = coordinator.store().merchant("u1").await.unwrap();
        assert_eq!(merchant.balance(), Decimal::new(11250, 1));
        assert_eq!(merchant.total_earnings(), Decimal::new(11250, 1));

        // fan-out: both active goals advanced, the small one completed
        let open = coordinator.store().active_assignments("fb").await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].assignment_id, first.assignment_id);
        assert_ne!(open[0].assignment_id, second.assignment_id);
        assert_eq!(open[0].current_quantity, 90);
        let done = coordinator
            .store()
            .submission(&submission.submission_id)
            .await
            .unwrap();
        assert_eq!(done.verified_quantity, Some(90));

        // deciding again must not credit again
        let error = coordinator
            .approve_submission(&submission.submission_id, None, None)
            .await
            .unwrap_err();
        assert!(matches!(error, MarketError::InvalidState(_)));
        let merchant = coordinator.store().merchant("u1").await.unwrap();
        assert_eq!(merchant.balance(), Decimal::new(11250, 1));
    }

    #[tokio::test]
    async fn rejection_settles_nothing() {
        let coordinator = coordinator().await;
        funded_merchant(&coordinator, "u1", 0).await;
        let submission = coordinator
            .submit_batch("u1", "fb", 50, None)
            .await
            .unwrap();
        let rejected = coordinator
            .reject_submission(&submission.submission_id, None, None)
            .await
            .unwrap();
        assert_eq!(rejected.status, SubmissionStatus::Rejected);
        assert_eq!(rejected.verified_quantity, Some(0));
        let merchant = coordinator.store().merchant("u1").await.unwrap();
        assert_eq!(merchant.balance(), Decimal::ZERO);
        assert_eq!(merchant.total_earnings(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn submission_intake_rejects_closed_platforms() {
        let coordinator = coordinator().await;
        funded_merchant(&coordinator, "u1", 0).await;
        coordinator
            .update_price(
                "fb",
                Decimal::new(125, 1),
                Decimal::from(15),
                PlatformStatus::Closed,
            )
            .await
            .unwrap();
        let error = coordinator
            .submit_batch("u1", "fb", 10, None)
            .await
            .unwrap_err();
        assert!(matches!(error, MarketError::Validation(_)));
    }

    #[tokio::test]
    async fn withdrawal_lifecycle_fulfill() {
        let coordinator = coordinator().await;
        funded_merchant(&coordinator, "u1", 500).await;
        coordinator.set_pin("u1", "1234").await.unwrap();

        let withdrawal = coordinator
            .request_withdrawal("u1", "1234", Decimal::from(300), "bkash", "Merchant (017...)")
            .await
            .unwrap();
        assert_eq!(withdrawal.status, WithdrawalStatus::Pending);
        let merchant = coordinator.store().merchant("u1").await.unwrap();
        assert_eq!(merchant.balance(), Decimal::from(200));

        let paid = coordinator
            .fulfill_withdrawal(&withdrawal.withdrawal_id, "TX1")
            .await
            .unwrap();
        assert_eq!(paid.status, WithdrawalStatus::Paid);
        assert_eq!(paid.transaction_id.as_deref(), Some("TX1"));
        let merchant = coordinator.store().merchant("u1").await.unwrap();
        assert_eq!(merchant.balance(), Decimal::from(200));

        let error = coordinator
            .fulfill_withdrawal(&withdrawal.withdrawal_id, "TX2")
            .await
            .unwrap_err();
        assert!(matches!(error, MarketError::InvalidState(_)));
    }

    #[tokio::test]
    async fn rejected_withdrawal_refunds_the_debit() {
        let coordinator = coordinator().await;
        funded_merchant(&coordinator, "u1", 500).await;
        coordinator.set_pin("u1", "1234").await.unwrap();

        let withdrawal = coordinator
            .request_withdrawal("u1", "1234", Decimal::from(300), "nagad", "addr")
            .await
            .unwrap();
        coordinator
            .reject_withdrawal(&withdrawal.withdrawal_id)
            .await
            .unwrap();
        let merchant = coordinator.store().merchant("u1").await.unwrap();
        assert_eq!(merchant.balance(), Decimal::from(500));
        assert_eq!(merchant.total_earnings(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn withdrawal_guards_abort_before_any_record() {
        let coordinator = coordinator().await;
        funded_merchant(&coordinator, "u1", 150).await;
        coordinator.set_pin("u1", "1234").await.unwrap();

        let error = coordinator
            .request_withdrawal("u1", "1234", Decimal::from(99), "bkash", "addr")
            .await
            .unwrap_err();
        assert!(matches!(error, MarketError::BelowMinimum { .. }));

        let error = coordinator
            .request_withdrawal("u1", "1234", Decimal::from(200), "bkash", "addr")
            .await
            .unwrap_err();
        assert!(matches!(error, MarketError::InsufficientFunds { .. }));

        let merchant = coordinator.store().merchant("u1").await.unwrap();
        assert_eq!(merchant.balance(), Decimal::from(150));
    }

    #[tokio::test]
    async fn failed_pin_attempts_survive_the_request() {
        let coordinator = coordinator().await;
        funded_merchant(&coordinator, "u1", 500).await;
        coordinator.set_pin("u1", "1234").await.unwrap();

        for expected_remaining in [2i16, 1] {
            let error = coordinator
                .request_withdrawal("u1", "0000", Decimal::from(100), "bkash", "addr")
                .await
                .unwrap_err();
            assert_eq!(
                error,
                MarketError::PinMismatch {
                    attempts_remaining: expected_remaining
                }
            );
        }
        let merchant = coordinator.store().merchant("u1").await.unwrap();
        assert_eq!(merchant.failed_pin_attempts(), 2);

        let error = coordinator
            .request_withdrawal("u1", "0000", Decimal::from(100), "bkash", "addr")
            .await
            .unwrap_err();
        assert_eq!(error, MarketError::WithdrawLocked);
        let merchant = coordinator.store().merchant("u1").await.unwrap();
        assert!(merchant.is_withdraw_locked());

        // the correct pin is refused while locked and the balance never moved
        let error = coordinator
            .request_withdrawal("u1", "1234", Decimal::from(100), "bkash", "addr")
            .await
            .unwrap_err();
        assert_eq!(error, MarketError::WithdrawLocked);
        let merchant = coordinator.store().merchant("u1").await.unwrap();
        assert_eq!(merchant.balance(), Decimal::from(500));

        coordinator.admin_unlock("u1").await.unwrap();
        let withdrawal = coordinator
            .request_withdrawal("u1", "1234", Decimal::from(100), "bkash", "addr")
            .await
            .unwrap();
        assert_eq!(withdrawal.status, WithdrawalStatus::Pending);
    }

    #[tokio::test]
    async fn standalone_pin_check_counts_attempts() {
        let coordinator = coordinator().await;
        funded_merchant(&coordinator, "u1", 0).await;
        coordinator.set_pin("u1", "1234").await.unwrap();

        let error = coordinator.authorize_pin("u1", "0000").await.unwrap_err();
        assert_eq!(
            error,
            MarketError::PinMismatch {
                attempts_remaining: 2
            }
        );
        let merchant = coordinator.store().merchant("u1").await.unwrap();
        assert_eq!(merchant.failed_pin_attempts(), 1);

        coordinator.authorize_pin("u1", "1234").await.unwrap();
        let merchant = coordinator.store().merchant("u1").await.unwrap();
        assert_eq!(merchant.failed_pin_attempts(), 0);
    }

    #[tokio::test]
    async fn pin_reset_cools_withdrawals_down() {
        let coordinator = coordinator().await;
        funded_merchant(&coordinator, "u1", 500).await;
        assert!(!coordinator.set_pin("u1", "1234").await.unwrap());
        assert!(coordinator.set_pin("u1", "5678").await.unwrap());

        let error = coordinator
            .request_withdrawal("u1", "5678", Decimal::from(100), "bkash", "addr")
            .await
            .unwrap_err();
        assert!(matches!(error, MarketError::PinCooldown { .. }));
        let merchant = coordinator.store().merchant("u1").await.unwrap();
        assert_eq!(merchant.balance(), Decimal::from(500));
    }

    #[tokio::test]
    async fn goal_price_is_snapshotted_at_creation() {
        let coordinator = coordinator().await;
        let goal = coordinator.create_goal("fb", 100, None).await.unwrap();
        coordinator
            .update_price(
                "fb",
                Decimal::from(99),
                Decimal::from(99),
                PlatformStatus::Buying,
            )
            .await
            .unwrap();
        let open = coordinator.store().active_assignments("fb").await.unwrap();
        assert_eq!(open[0].assignment_id, goal.assignment_id);
        assert_eq!(open[0].price_per_unit, Decimal::new(125, 1));
        assert_eq!(open[0].status, AssignmentStatus::Active);
    }
}
