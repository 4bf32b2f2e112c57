//! Users, block list and earnings ledger.

use async_trait::async_trait;
use chrono::Utc;

use super::{InMemoryStore, PoisonedStoreError};
use crate::domain::ports::{
    BlockRepository, BlockRepositoryError, PayoutLedger, PayoutLedgerError, StoredCredentials,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    BlockDraft, BlockId, BlockRecord, LedgerBalance, LedgerTransaction, PayoutOutcome,
    PayoutPolicy, RevenueDraft, TransactionId, TransactionKind, TransactionStatus, User, UserId,
};

impl From<PoisonedStoreError> for UserPersistenceError {
    fn from(err: PoisonedStoreError) -> Self {
        Self::query(err.to_string())
    }
}

impl From<PoisonedStoreError> for BlockRepositoryError {
    fn from(err: PoisonedStoreError) -> Self {
        Self::query(err.to_string())
    }
}

impl From<PoisonedStoreError> for PayoutLedgerError {
    fn from(err: PoisonedStoreError) -> Self {
        Self::query(err.to_string())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.users.get(id).map(|row| row.user.clone()))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.lock()?;
        Ok(state
            .users
            .values()
            .find(|row| row.user.username() == username)
            .map(|row| StoredCredentials {
                user: row.user.clone(),
                password_digest: row.password_digest.clone(),
            }))
    }
}

#[async_trait]
impl BlockRepository for InMemoryStore {
    async fn list_blocks(&self, blocker: UserId) -> Result<Vec<BlockRecord>, BlockRepositoryError> {
        let state = self.lock()?;
        let mut blocks: Vec<BlockRecord> = state
            .blocks
            .iter()
            .filter(|block| block.blocker_id == blocker)
            .cloned()
            .collect();
        blocks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(blocks)
    }

    async fn insert_block(&self, draft: &BlockDraft) -> Result<BlockRecord, BlockRepositoryError> {
        let mut state = self.lock()?;
        let blocked = state
            .users
            .get(&draft.blocked_id())
            .ok_or_else(|| BlockRepositoryError::user_not_found(draft.blocked_id()))?;
        let blocked_display_name = blocked.user.display_name().as_ref().to_owned();
        let exists = state.blocks.iter().any(|block| {
            block.blocker_id == draft.blocker_id() && block.blocked_id == draft.blocked_id()
        });
        if exists {
            return Err(BlockRepositoryError::duplicate());
        }
        let record = BlockRecord {
            id: BlockId::random(),
            blocker_id: draft.blocker_id(),
            blocked_id: draft.blocked_id(),
            blocked_display_name,
            created_at: Utc::now(),
        };
        state.blocks.push(record.clone());
        Ok(record)
    }

    async fn find_block(&self, id: BlockId) -> Result<Option<BlockRecord>, BlockRepositoryError> {
        Ok(self
            .lock()?
            .blocks
            .iter()
            .find(|block| block.id == id)
            .cloned())
    }

    async fn delete_block(&self, id: BlockId) -> Result<bool, BlockRepositoryError> {
        let mut state = self.lock()?;
        let before = state.blocks.len();
        state.blocks.retain(|block| block.id != id);
        Ok(state.blocks.len() != before)
    }
}

#[async_trait]
impl PayoutLedger for InMemoryStore {
    async fn transactions(
        &self,
        user: UserId,
    ) -> Result<Vec<LedgerTransaction>, PayoutLedgerError> {
        let state = self.lock()?;
        let mut rows: Vec<LedgerTransaction> = state
            .ledger
            .iter()
            .filter(|row| row.user_id == user)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn request_payout(
        &self,
        user: UserId,
        amount_cents: i64,
        policy: &PayoutPolicy,
    ) -> Result<PayoutOutcome, PayoutLedgerError> {
        let mut state = self.lock()?;
        let balance =
            LedgerBalance::from_transactions(state.ledger.iter().filter(|row| row.user_id == user));
        if let Err(rejection) = policy.evaluate(&balance, amount_cents) {
            return Ok(PayoutOutcome::Rejected(rejection));
        }
        let row = LedgerTransaction {
            id: TransactionId::random(),
            user_id: user,
            kind: TransactionKind::Payout,
            amount_cents: -amount_cents,
            status: TransactionStatus::Pending,
            description: Some("Payout request".to_owned()),
            created_at: Utc::now(),
        };
        state.ledger.push(row.clone());
        Ok(PayoutOutcome::Accepted(row))
    }

    async fn record_revenue(
        &self,
        draft: &RevenueDraft,
    ) -> Result<LedgerTransaction, PayoutLedgerError> {
        let mut state = self.lock()?;
        if !state.users.contains_key(&draft.user_id) {
            return Err(PayoutLedgerError::user_not_found(draft.user_id));
        }
        let row = LedgerTransaction {
            id: TransactionId::random(),
            user_id: draft.user_id,
            kind: TransactionKind::Revenue,
            amount_cents: draft.amount_cents,
            status: TransactionStatus::Completed,
            description: draft.description.clone(),
            created_at: Utc::now(),
        };
        state.ledger.push(row.clone());
        Ok(row)
    }

    async fn settle_payout(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<Option<LedgerTransaction>, PayoutLedgerError> {
        let mut state = self.lock()?;
        let Some(row) = state
            .ledger
            .iter_mut()
            .find(|row| row.id == id && row.kind == TransactionKind::Payout)
        else {
            return Ok(None);
        };
        if row.status != TransactionStatus::Pending {
            return Err(PayoutLedgerError::not_pending(id));
        }
        row.status = status;
        Ok(Some(row.clone()))
    }
}
