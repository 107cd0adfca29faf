use crate::error::MarketError;
use crate::model::{
    AssetSubmission, AssignmentStatus, MarketAssignment, MerchantUser, PlatformPrice,
    WithdrawalRequest,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Persistence port for the settlement coordinator. Implementations decide
/// the medium; the commit methods are single transaction boundaries so a
/// database-backed store can wrap each in one transaction.
#[async_trait]
pub trait MarketStore: Send + Sync {
    async fn merchant(&self, user_id: &str) -> Result<MerchantUser, MarketError>;
    async fn insert_merchant(&self, user: &MerchantUser) -> Result<(), MarketError>;
    async fn save_merchant(&self, user: &MerchantUser) -> Result<(), MarketError>;

    async fn platform(&self, platform_id: &str) -> Result<PlatformPrice, MarketError>;
    async fn save_platform(&self, platform: &PlatformPrice) -> Result<(), MarketError>;

    async fn submission(&self, submission_id: &str) -> Result<AssetSubmission, MarketError>;
    async fn insert_submission(&self, submission: &AssetSubmission) -> Result<(), MarketError>;

    async fn withdrawal(&self, withdrawal_id: &str) -> Result<WithdrawalRequest, MarketError>;

    async fn insert_assignment(&self, assignment: &MarketAssignment) -> Result<(), MarketError>;
    async fn active_assignments(
        &self,
        platform_id: &str,
    ) -> Result<Vec<MarketAssignment>, MarketError>;

    /// Persists a decided submission together with the credited merchant and
    /// the advanced assignments.
    async fn commit_submission_decision(
        &self,
        submission: &AssetSubmission,
        merchant: Option<&MerchantUser>,
        assignments: &[MarketAssignment],
    ) -> Result<(), MarketError>;

    /// Persists a new pending withdrawal together with the debited merchant.
    async fn commit_withdrawal_request(
        &self,
        withdrawal: &WithdrawalRequest,
        merchant: &MerchantUser,
    ) -> Result<(), MarketError>;

    /// Persists a finalized withdrawal, with the refunded merchant on
    /// rejection.
    async fn commit_withdrawal_decision(
        &self,
        withdrawal: &WithdrawalRequest,
        merchant: Option<&MerchantUser>,
    ) -> Result<(), MarketError>;
}

/// Hash-map store used by the test suite and as a throwaway demo backend.
#[derive(Default)]
pub struct MemoryStore {
    merchants: RwLock<HashMap<String, MerchantUser>>,
    platforms: RwLock<HashMap<String, PlatformPrice>>,
    submissions: RwLock<HashMap<String, AssetSubmission>>,
    withdrawals: RwLock<HashMap<String, WithdrawalRequest>>,
    assignments: RwLock<HashMap<String, MarketAssignment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketStore for MemoryStore {
    async fn merchant(&self, user_id: &str) -> Result<MerchantUser, MarketError> {
        self.merchants
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| MarketError::NotFound(format!("merchant {}", user_id)))
    }

    async fn insert_merchant(&self, user: &MerchantUser) -> Result<(), MarketError> {
        self.merchants
            .write()
            .await
            .insert(user.user_id.to_owned(), user.clone());
        Ok(())
    }

    async fn save_merchant(&self, user: &MerchantUser) -> Result<(), MarketError> {
        self.insert_merchant(user).await
    }

    async fn platform(&self, platform_id: &str) -> Result<PlatformPrice, MarketError> {
        self.platforms
            .read()
            .await
            .get(platform_id)
            .cloned()
            .ok_or_else(|| MarketError::NotFound(format!("platform {}", platform_id)))
    }

    async fn save_platform(&self, platform: &PlatformPrice) -> Result<(), MarketError> {
        self.platforms
            .write()
            .await
            .insert(platform.platform_id.to_owned(), platform.clone());
        Ok(())
    }

    async fn submission(&self, submission_id: &str) -> Result<AssetSubmission, MarketError> {
        self.submissions
            .read()
            .await
            .get(submission_id)
            .cloned()
            .ok_or_else(|| MarketError::NotFound(format!("submission {}", submission_id)))
    }

    async fn insert_submission(&self, submission: &AssetSubmission) -> Result<(), MarketError> {
        self.submissions
            .write()
            .await
            .insert(submission.submission_id.to_owned(), submission.clone());
        Ok(())
    }

    async fn withdrawal(&self, withdrawal_id: &str) -> Result<WithdrawalRequest, MarketError> {
        self.withdrawals
            .read()
            .await
            .get(withdrawal_id)
            .cloned()
            .ok_or_else(|| MarketError::NotFound(format!("withdrawal {}", withdrawal_id)))
    }

    async fn insert_assignment(&self, assignment: &MarketAssignment) -> Result<(), MarketError> {
        self.assignments
            .write()
            .await
            .insert(assignment.assignment_id.to_owned(), assignment.clone());
        Ok(())
    }

    async fn active_assignments(
        &self,
        platform_id: &str,
    ) -> Result<Vec<MarketAssignment>, MarketError> {
        let mut matching: Vec<MarketAssignment> = self
            .assignments
            .read()
            .await
            .values()
            .filter(|a| a.platform_id == platform_id && a.status == AssignmentStatus::Active)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matching)
    }

    async fn commit_submission_decision(
        &self,
        submission: &AssetSubmission,
        merchant: Option<&MerchantUser>,
        assignments: &[MarketAssignment],
    ) -> Result<(), MarketError> {
        self.submissions
            .write()
            .await
            .insert(submission.submission_id.to_owned(), submission.clone());
        if let Some(merchant) = merchant {
            self.merchants
                .write()
                .await
                .insert(merchant.user_id.to_owned(), merchant.clone());
        }
        let mut stored = self.assignments.write().await;
        for assignment in assignments {
            stored.insert(assignment.assignment_id.to_owned(), assignment.clone());
        }
        Ok(())
    }

    async fn commit_withdrawal_request(
        &self,
        withdrawal: &WithdrawalRequest,
        merchant: &MerchantUser,
    ) -> Result<(), MarketError> {
        self.withdrawals
            .write()
            .await
            .insert(withdrawal.withdrawal_id.to_owned(), withdrawal.clone());
        self.merchants
            .write()
            .await
            .insert(merchant.user_id.to_owned(), merchant.clone());
        Ok(())
    }

    async fn commit_withdrawal_decision(
        &self,
        withdrawal: &WithdrawalRequest,
        merchant: Option<&MerchantUser>,
    ) -> Result<(), MarketError> {
        self.withdrawals
            .write()
            .await
            .insert(withdrawal.withdrawal_id.to_owned(), withdrawal.clone());
        if let Some(merchant) = merchant {
            self.merchants
                .write()
                .await
                .insert(merchant.user_id.to_owned(), merchant.clone());
        }
        Ok(())
    }
}
