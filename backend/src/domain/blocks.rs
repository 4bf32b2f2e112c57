//! Per-user block list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BlockId, UserId};

/// Raised when a block request is invalid on its face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BlockValidationError {
    #[error("You cannot block yourself")]
    SelfBlock,
}

/// Validated request for `blocker` to block `blocked`.
///
/// # Examples
/// ```
/// use vidhub::domain::{BlockDraft, BlockValidationError, UserId};
///
/// let me = UserId::random();
/// assert_eq!(BlockDraft::new(me, me), Err(BlockValidationError::SelfBlock));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDraft {
    blocker_id: UserId,
    blocked_id: UserId,
}

impl BlockDraft {
    /// Validate a block request.
    ///
    /// # Errors
    /// Returns [`BlockValidationError::SelfBlock`] when both ids match.
    pub fn new(blocker_id: UserId, blocked_id: UserId) -> Result<Self, BlockValidationError> {
        if blocker_id == blocked_id {
            return Err(BlockValidationError::SelfBlock);
        }
        Ok(Self {
            blocker_id,
            blocked_id,
        })
    }

    #[must_use]
    pub const fn blocker_id(&self) -> UserId {
        self.blocker_id
    }

    #[must_use]
    pub const fn blocked_id(&self) -> UserId {
        self.blocked_id
    }
}

/// Stored block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub id: BlockId,
    pub blocker_id: UserId,
    pub blocked_id: UserId,
    /// Display name of the blocked user, for listings.
    pub blocked_display_name: String,
    pub created_at: DateTime<Utc>,
}
