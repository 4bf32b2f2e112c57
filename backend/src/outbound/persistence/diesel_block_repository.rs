//! PostgreSQL-backed `BlockRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{BlockRepository, BlockRepositoryError};
use crate::domain::{BlockDraft, BlockId, BlockRecord, UserId};

use super::diesel_basic_error_mapping::{
    is_foreign_key_violation, is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{BlockRow, NewBlockRow};
use super::pool::{DbPool, PoolError};
use super::schema::{user_blocks, users};

/// Diesel-backed implementation of the block list port.
#[derive(Clone)]
pub struct DieselBlockRepository {
    pool: DbPool,
}

impl DieselBlockRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BlockRepositoryError {
    map_basic_pool_error(error, |message| BlockRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> BlockRepositoryError {
    map_basic_diesel_error(
        error,
        BlockRepositoryError::query,
        BlockRepositoryError::connection,
    )
}

#[async_trait]
impl BlockRepository for DieselBlockRepository {
    async fn list_blocks(&self, blocker: UserId) -> Result<Vec<BlockRecord>, BlockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(BlockRow, String)> = user_blocks::table
            .inner_join(users::table.on(users::id.eq(user_blocks::blocked_id)))
            .filter(user_blocks::blocker_id.eq(*blocker.as_uuid()))
            .order(user_blocks::created_at.desc())
            .select((BlockRow::as_select(), users::display_name))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(row, display_name)| row.into_record(display_name))
            .collect())
    }

    async fn insert_block(&self, draft: &BlockDraft) -> Result<BlockRecord, BlockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let display_name: String = users::table
            .find(*draft.blocked_id().as_uuid())
            .select(users::display_name)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .ok_or_else(|| BlockRepositoryError::user_not_found(draft.blocked_id()))?;

        let inserted = diesel::insert_into(user_blocks::table)
            .values(&NewBlockRow {
                id: Uuid::new_v4(),
                blocker_id: *draft.blocker_id().as_uuid(),
                blocked_id: *draft.blocked_id().as_uuid(),
            })
            .returning(BlockRow::as_returning())
            .get_result::<BlockRow>(&mut conn)
            .await;

        match inserted {
            Ok(row) => Ok(row.into_record(display_name)),
            Err(err) if is_unique_violation(&err) => Err(BlockRepositoryError::duplicate()),
            Err(err) if is_foreign_key_violation(&err) => {
                Err(BlockRepositoryError::user_not_found(draft.blocked_id()))
            }
            Err(err) => Err(map_diesel_error(err)),
        }
    }

    async fn find_block(&self, id: BlockId) -> Result<Option<BlockRecord>, BlockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(BlockRow, String)> = user_blocks::table
            .inner_join(users::table.on(users::id.eq(user_blocks::blocked_id)))
            .filter(user_blocks::id.eq(*id.as_uuid()))
            .select((BlockRow::as_select(), users::display_name))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|(row, display_name)| row.into_record(display_name)))
    }

    async fn delete_block(&self, id: BlockId) -> Result<bool, BlockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(user_blocks::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
