//! Driving port for a user's block list.

use async_trait::async_trait;

use crate::domain::{BlockId, BlockRecord, Error, Principal, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockList: Send + Sync {
    /// Blocks owned by `owner`.
    async fn list(&self, owner: UserId) -> Result<Vec<BlockRecord>, Error>;

    /// Block `target` on behalf of `owner`.
    async fn block(&self, owner: UserId, target: UserId) -> Result<BlockRecord, Error>;

    /// Remove a block; only its owner may do so.
    async fn unblock(&self, caller: Principal, id: BlockId) -> Result<(), Error>;
}
