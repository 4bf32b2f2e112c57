//! Payout and revenue service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{PayoutLedger, PayoutLedgerError, Payouts};
use crate::domain::{
    Error, LedgerBalance, LedgerTransaction, PayoutOutcome, PayoutPolicy, PayoutRejection,
    PayoutSummary, RevenueDraft, TransactionId, TransactionStatus, UserId,
};

fn map_ledger_error(error: PayoutLedgerError) -> Error {
    match error {
        PayoutLedgerError::Connection { message } => {
            Error::service_unavailable(format!("payout ledger unavailable: {message}"))
        }
        PayoutLedgerError::Query { message } => {
            Error::internal(format!("payout ledger error: {message}"))
        }
        PayoutLedgerError::UserNotFound { user_id } => {
            Error::not_found(format!("user {user_id} not found"))
        }
        PayoutLedgerError::NotPending { id } => {
            Error::invalid_request(format!("payout {id} is already settled"))
        }
    }
}

fn rejection_error(rejection: PayoutRejection) -> Error {
    let details = match rejection {
        PayoutRejection::BelowMinimum { minimum_cents } => {
            json!({ "code": "below_minimum", "minimumCents": minimum_cents })
        }
        PayoutRejection::InsufficientBalance { requestable_cents } => {
            json!({ "code": "insufficient_balance", "availableCents": requestable_cents })
        }
    };
    Error::invalid_request(rejection.to_string()).with_details(details)
}

/// Payout service implementing [`Payouts`].
#[derive(Clone)]
pub struct PayoutService<L> {
    ledger: Arc<L>,
    policy: PayoutPolicy,
}

impl<L> PayoutService<L> {
    pub fn new(ledger: Arc<L>, policy: PayoutPolicy) -> Self {
        Self { ledger, policy }
    }
}

#[async_trait]
impl<L> Payouts for PayoutService<L>
where
    L: PayoutLedger,
{
    async fn summary(&self, user: UserId) -> Result<PayoutSummary, Error> {
        let transactions = self
            .ledger
            .transactions(user)
            .await
            .map_err(map_ledger_error)?;
        Ok(PayoutSummary {
            balance: LedgerBalance::from_transactions(&transactions),
            transactions,
        })
    }

    async fn request_payout(
        &self,
        user: UserId,
        amount_cents: i64,
    ) -> Result<LedgerTransaction, Error> {
        let outcome = self
            .ledger
            .request_payout(user, amount_cents, &self.policy)
            .await
            .map_err(map_ledger_error)?;
        match outcome {
            PayoutOutcome::Accepted(row) => {
                info!(%user, payout = %row.id, amount_cents, "payout requested");
                Ok(row)
            }
            PayoutOutcome::Rejected(rejection) => Err(rejection_error(rejection)),
        }
    }

    async fn record_revenue(&self, draft: RevenueDraft) -> Result<LedgerTransaction, Error> {
        self.ledger
            .record_revenue(&draft)
            .await
            .map_err(map_ledger_error)
    }

    async fn settle_payout(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<LedgerTransaction, Error> {
        if status == TransactionStatus::Pending {
            return Err(Error::invalid_request(
                "payout status must be COMPLETED or FAILED",
            ));
        }
        self.ledger
            .settle_payout(id, status)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| Error::not_found(format!("payout {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockPayoutLedger;
    use crate::domain::{ErrorCode, TransactionKind};
    use chrono::Utc;
    use rstest::rstest;

    fn revenue(user: UserId, amount_cents: i64) -> LedgerTransaction {
        LedgerTransaction {
            id: TransactionId::random(),
            user_id: user,
            kind: TransactionKind::Revenue,
            amount_cents,
            status: TransactionStatus::Completed,
            description: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn summary_derives_balance_from_ledger() {
        let user = UserId::random();
        let rows = vec![revenue(user, 12_500), revenue(user, 500)];
        let mut ledger = MockPayoutLedger::new();
        ledger
            .expect_transactions()
            .times(1)
            .return_once(move |_| Ok(rows));
        let service = PayoutService::new(Arc::new(ledger), PayoutPolicy::default());

        let summary = service.summary(user).await.expect("summary");
        assert_eq!(summary.balance.available_cents(), 13_000);
        assert_eq!(summary.transactions.len(), 2);
    }

    #[rstest]
    #[case(
        PayoutRejection::InsufficientBalance { requestable_cents: 5_000 },
        "Insufficient balance"
    )]
    #[case(
        PayoutRejection::BelowMinimum { minimum_cents: 10_000 },
        "Minimum payout amount is $100"
    )]
    #[tokio::test]
    async fn rejections_are_bad_requests(
        #[case] rejection: PayoutRejection,
        #[case] message: &str,
    ) {
        let mut ledger = MockPayoutLedger::new();
        ledger
            .expect_request_payout()
            .times(1)
            .return_once(move |_, _, _| Ok(PayoutOutcome::Rejected(rejection)));
        let service = PayoutService::new(Arc::new(ledger), PayoutPolicy::default());

        let err = service
            .request_payout(UserId::random(), 20_000)
            .await
            .expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), message);
    }

    #[tokio::test]
    async fn service_passes_configured_policy_to_ledger() {
        let mut ledger = MockPayoutLedger::new();
        ledger
            .expect_request_payout()
            .withf(|_, amount, policy| *amount == 2_500 && policy.minimum_cents() == 2_000)
            .times(1)
            .return_once(|user, amount, _| {
                let mut row = revenue(user, -amount);
                row.kind = TransactionKind::Payout;
                row.status = TransactionStatus::Pending;
                Ok(PayoutOutcome::Accepted(row))
            });
        let service = PayoutService::new(Arc::new(ledger), PayoutPolicy::new(2_000));

        let row = service
            .request_payout(UserId::random(), 2_500)
            .await
            .expect("accepted");
        assert_eq!(row.amount_cents, -2_500);
        assert_eq!(row.status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn settling_to_pending_is_invalid() {
        let mut ledger = MockPayoutLedger::new();
        ledger.expect_settle_payout().never();
        let service = PayoutService::new(Arc::new(ledger), PayoutPolicy::default());

        let err = service
            .settle_payout(TransactionId::random(), TransactionStatus::Pending)
            .await
            .expect_err("invalid status");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
