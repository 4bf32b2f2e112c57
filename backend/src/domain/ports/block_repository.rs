//! Driven port for the block list.

use async_trait::async_trait;

use crate::domain::{BlockDraft, BlockId, BlockRecord, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by block repository adapters.
    pub enum BlockRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "block repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "block repository query failed: {message}",
        /// The pair is already blocked.
        Duplicate => "user is already blocked",
        /// The user to block does not exist.
        UserNotFound { user_id: UserId } => "user {user_id} not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockRepository: Send + Sync {
    /// Blocks owned by `blocker`, newest first.
    async fn list_blocks(&self, blocker: UserId) -> Result<Vec<BlockRecord>, BlockRepositoryError>;

    /// Store a block; the pair is unique.
    async fn insert_block(&self, draft: &BlockDraft) -> Result<BlockRecord, BlockRepositoryError>;

    async fn find_block(&self, id: BlockId) -> Result<Option<BlockRecord>, BlockRepositoryError>;

    /// Delete a block; `false` when it was already gone.
    async fn delete_block(&self, id: BlockId) -> Result<bool, BlockRepositoryError>;
}
