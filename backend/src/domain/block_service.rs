//! Block list service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{BlockList, BlockRepository, BlockRepositoryError};
use crate::domain::{AccessRule, BlockDraft, BlockId, BlockRecord, Error, Principal, UserId};

/// Message returned when a pair is already blocked.
pub const DUPLICATE_BLOCK_MESSAGE: &str = "User is already blocked";

fn map_block_error(error: BlockRepositoryError) -> Error {
    match error {
        BlockRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("block repository unavailable: {message}"))
        }
        BlockRepositoryError::Query { message } => {
            Error::internal(format!("block repository error: {message}"))
        }
        BlockRepositoryError::Duplicate => Error::invalid_request(DUPLICATE_BLOCK_MESSAGE),
        BlockRepositoryError::UserNotFound { user_id } => {
            Error::not_found(format!("user {user_id} not found"))
        }
    }
}

/// Block list service implementing [`BlockList`].
#[derive(Clone)]
pub struct BlockService<R> {
    repo: Arc<R>,
}

impl<R> BlockService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> BlockList for BlockService<R>
where
    R: BlockRepository,
{
    async fn list(&self, owner: UserId) -> Result<Vec<BlockRecord>, Error> {
        self.repo.list_blocks(owner).await.map_err(map_block_error)
    }

    async fn block(&self, owner: UserId, target: UserId) -> Result<BlockRecord, Error> {
        let draft =
            BlockDraft::new(owner, target).map_err(|err| Error::invalid_request(err.to_string()))?;
        let record = self
            .repo
            .insert_block(&draft)
            .await
            .map_err(map_block_error)?;
        info!(block = %record.id, %owner, %target, "user blocked");
        Ok(record)
    }

    async fn unblock(&self, caller: Principal, id: BlockId) -> Result<(), Error> {
        let record = self
            .repo
            .find_block(id)
            .await
            .map_err(map_block_error)?
            .ok_or_else(|| Error::not_found(format!("block {id} not found")))?;
        AccessRule::owned_by(record.blocker_id).authorize(Some(&caller))?;
        if !self.repo.delete_block(id).await.map_err(map_block_error)? {
            return Err(Error::not_found(format!("block {id} not found")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockBlockRepository;
    use crate::domain::{ErrorCode, Role};
    use chrono::Utc;
    use rstest::rstest;

    fn record(owner: UserId) -> BlockRecord {
        BlockRecord {
            id: BlockId::random(),
            blocker_id: owner,
            blocked_id: UserId::random(),
            blocked_display_name: "someone".to_owned(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn blocking_yourself_never_reaches_storage() {
        let mut repo = MockBlockRepository::new();
        repo.expect_insert_block().never();
        let service = BlockService::new(Arc::new(repo));
        let me = UserId::random();

        let err = service.block(me, me).await.expect_err("self block");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "You cannot block yourself");
    }

    #[tokio::test]
    async fn duplicate_block_uses_contract_message() {
        let mut repo = MockBlockRepository::new();
        repo.expect_insert_block()
            .times(1)
            .return_once(|_| Err(BlockRepositoryError::duplicate()));
        let service = BlockService::new(Arc::new(repo));

        let err = service
            .block(UserId::random(), UserId::random())
            .await
            .expect_err("duplicate");
        assert_eq!(err.message(), DUPLICATE_BLOCK_MESSAGE);
    }

    #[rstest]
    #[case(Role::User)]
    #[case(Role::Admin)]
    #[tokio::test]
    async fn deleting_another_users_block_is_forbidden(#[case] role: Role) {
        let owned = record(UserId::random());
        let mut repo = MockBlockRepository::new();
        repo.expect_find_block()
            .times(1)
            .return_once(move |_| Ok(Some(owned)));
        repo.expect_delete_block().never();
        let service = BlockService::new(Arc::new(repo));

        let err = service
            .unblock(Principal::new(UserId::random(), role), BlockId::random())
            .await
            .expect_err("not the owner");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn owner_can_delete_block() {
        let owner = UserId::random();
        let owned = record(owner);
        let id = owned.id;
        let mut repo = MockBlockRepository::new();
        repo.expect_find_block()
            .return_once(move |_| Ok(Some(owned)));
        repo.expect_delete_block()
            .withf(move |target| *target == id)
            .times(1)
            .return_once(|_| Ok(true));
        let service = BlockService::new(Arc::new(repo));

        service
            .unblock(Principal::new(owner, Role::User), id)
            .await
            .expect("owner unblocks");
    }

    #[tokio::test]
    async fn missing_block_is_not_found() {
        let mut repo = MockBlockRepository::new();
        repo.expect_find_block().return_once(|_| Ok(None));
        let service = BlockService::new(Arc::new(repo));

        let err = service
            .unblock(Principal::new(UserId::random(), Role::User), BlockId::random())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
