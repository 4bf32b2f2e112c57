//! Driving port for creator payouts and revenue credits.

use async_trait::async_trait;

use crate::domain::{
    Error, LedgerTransaction, PayoutSummary, RevenueDraft, TransactionId, TransactionStatus,
    UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Payouts: Send + Sync {
    /// Fresh balance plus ledger history.
    async fn summary(&self, user: UserId) -> Result<PayoutSummary, Error>;

    /// Request a payout; rejections surface as `400` with the rule's message.
    async fn request_payout(&self, user: UserId, amount_cents: i64)
    -> Result<LedgerTransaction, Error>;

    /// Credit completed revenue to a creator.
    async fn record_revenue(&self, draft: RevenueDraft) -> Result<LedgerTransaction, Error>;

    /// Settle a pending payout as completed or failed.
    async fn settle_payout(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<LedgerTransaction, Error>;
}
