//! PostgreSQL-backed `PayoutLedger` implementation using Diesel ORM.
//!
//! A payout request locks the requesting user's row so concurrent requests
//! from the same user serialise: the balance is recomputed from the ledger
//! and the pending payout row is inserted in the same transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{PayoutLedger, PayoutLedgerError};
use crate::domain::{
    LedgerBalance, LedgerTransaction, PayoutOutcome, PayoutPolicy, RevenueDraft, TransactionId,
    TransactionKind, TransactionStatus, UserId,
};

use super::diesel_basic_error_mapping::{
    decode_failure, is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{LedgerRow, NewLedgerRow, RowDecodeError};
use super::pool::{DbPool, PoolError};
use super::schema::{ledger_transactions, users};

const PAYOUT_DESCRIPTION: &str = "Payout request";

/// Diesel-backed implementation of the earnings ledger port.
#[derive(Clone)]
pub struct DieselPayoutLedger {
    pool: DbPool,
}

impl DieselPayoutLedger {
    /// Create a new ledger with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PayoutLedgerError {
    map_basic_pool_error(error, |message| PayoutLedgerError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> PayoutLedgerError {
    map_basic_diesel_error(error, PayoutLedgerError::query, PayoutLedgerError::connection)
}

fn map_decode_error(error: RowDecodeError) -> PayoutLedgerError {
    PayoutLedgerError::query(error.to_string())
}

/// Outcome of the settle transaction before it is mapped onto the port.
enum Settlement {
    Missing,
    NotPending,
    Settled(LedgerTransaction),
}

#[async_trait]
impl PayoutLedger for DieselPayoutLedger {
    async fn transactions(
        &self,
        user: UserId,
    ) -> Result<Vec<LedgerTransaction>, PayoutLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LedgerRow> = ledger_transactions::table
            .filter(ledger_transactions::user_id.eq(*user.as_uuid()))
            .order((
                ledger_transactions::created_at.desc(),
                ledger_transactions::id.asc(),
            ))
            .select(LedgerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(LedgerTransaction::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_decode_error)
    }

    async fn request_payout(
        &self,
        user: UserId,
        amount_cents: i64,
        policy: &PayoutPolicy,
    ) -> Result<PayoutOutcome, PayoutLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let policy = *policy;

        let outcome = conn
            .transaction(|conn| {
                async move {
                    let locked: Option<Uuid> = users::table
                        .find(user_id)
                        .select(users::id)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    if locked.is_none() {
                        return Ok(None);
                    }

                    let rows: Vec<LedgerRow> = ledger_transactions::table
                        .filter(ledger_transactions::user_id.eq(user_id))
                        .select(LedgerRow::as_select())
                        .load(conn)
                        .await?;
                    let history = rows
                        .into_iter()
                        .map(LedgerTransaction::try_from)
                        .collect::<Result<Vec<_>, _>>()
                        .map_err(decode_failure)?;
                    let balance = LedgerBalance::from_transactions(&history);

                    if let Err(rejection) = policy.evaluate(&balance, amount_cents) {
                        return Ok(Some(PayoutOutcome::Rejected(rejection)));
                    }

                    let row: LedgerRow = diesel::insert_into(ledger_transactions::table)
                        .values(&NewLedgerRow {
                            id: Uuid::new_v4(),
                            user_id,
                            kind: TransactionKind::Payout.as_str(),
                            amount_cents: -amount_cents,
                            status: TransactionStatus::Pending.as_str(),
                            description: Some(PAYOUT_DESCRIPTION),
                        })
                        .returning(LedgerRow::as_returning())
                        .get_result(conn)
                        .await?;
                    let accepted = LedgerTransaction::try_from(row).map_err(decode_failure)?;
                    Ok(Some(PayoutOutcome::Accepted(accepted)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        outcome.ok_or_else(|| PayoutLedgerError::user_not_found(user))
    }

    async fn record_revenue(
        &self,
        draft: &RevenueDraft,
    ) -> Result<LedgerTransaction, PayoutLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(ledger_transactions::table)
            .values(&NewLedgerRow {
                id: Uuid::new_v4(),
                user_id: *draft.user_id.as_uuid(),
                kind: TransactionKind::Revenue.as_str(),
                amount_cents: draft.amount_cents,
                status: TransactionStatus::Completed.as_str(),
                description: draft.description.as_deref(),
            })
            .returning(LedgerRow::as_returning())
            .get_result::<LedgerRow>(&mut conn)
            .await;

        match inserted {
            Ok(row) => LedgerTransaction::try_from(row).map_err(map_decode_error),
            Err(err) if is_foreign_key_violation(&err) => {
                Err(PayoutLedgerError::user_not_found(draft.user_id))
            }
            Err(err) => Err(map_diesel_error(err)),
        }
    }

    async fn settle_payout(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<Option<LedgerTransaction>, PayoutLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row_id = *id.as_uuid();

        let settlement = conn
            .transaction(|conn| {
                async move {
                    let current: Option<String> = ledger_transactions::table
                        .find(row_id)
                        .filter(ledger_transactions::kind.eq(TransactionKind::Payout.as_str()))
                        .select(ledger_transactions::status)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(current) = current else {
                        return Ok(Settlement::Missing);
                    };
                    if current != TransactionStatus::Pending.as_str() {
                        return Ok(Settlement::NotPending);
                    }

                    let row: LedgerRow =
                        diesel::update(ledger_transactions::table.find(row_id))
                            .set(ledger_transactions::status.eq(status.as_str()))
                            .returning(LedgerRow::as_returning())
                            .get_result(conn)
                            .await?;
                    LedgerTransaction::try_from(row)
                        .map(Settlement::Settled)
                        .map_err(decode_failure)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        match settlement {
            Settlement::Missing => Ok(None),
            Settlement::NotPending => Err(PayoutLedgerError::not_pending(id)),
            Settlement::Settled(row) => Ok(Some(row)),
        }
    }
}
