//! Driven port for the earnings ledger.

use async_trait::async_trait;

use crate::domain::{
    LedgerTransaction, PayoutOutcome, PayoutPolicy, RevenueDraft, TransactionId,
    TransactionStatus, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payout ledger adapters.
    pub enum PayoutLedgerError {
        /// Repository connection could not be established.
        Connection { message: String } => "payout ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "payout ledger query failed: {message}",
        /// The credited user does not exist.
        UserNotFound { user_id: UserId } => "user {user_id} not found",
        /// The payout was already settled.
        NotPending { id: TransactionId } => "payout {id} is not pending",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PayoutLedger: Send + Sync {
    /// Ledger rows of `user`, newest first.
    async fn transactions(&self, user: UserId)
    -> Result<Vec<LedgerTransaction>, PayoutLedgerError>;

    /// Evaluate `policy` against a freshly computed balance and, when it
    /// passes, record a `PENDING` payout of `-amount_cents`.
    ///
    /// Balance computation and insert happen in one atomic unit with the
    /// user's ledger locked.
    async fn request_payout(
        &self,
        user: UserId,
        amount_cents: i64,
        policy: &PayoutPolicy,
    ) -> Result<PayoutOutcome, PayoutLedgerError>;

    /// Record `COMPLETED` revenue.
    async fn record_revenue(
        &self,
        draft: &RevenueDraft,
    ) -> Result<LedgerTransaction, PayoutLedgerError>;

    /// Move a pending payout to `status`; `None` when no payout has `id`.
    async fn settle_payout(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<Option<LedgerTransaction>, PayoutLedgerError>;
}
