//! Driving port for the personal library.

use async_trait::async_trait;

use crate::domain::{Error, UserId, VideoId, WatchHistoryEntry, WatchLaterEntry, WatchLaterToggle};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Library: Send + Sync {
    async fn toggle_watch_later(&self, user: UserId, video: VideoId)
    -> Result<WatchLaterToggle, Error>;

    async fn watch_later(&self, user: UserId) -> Result<Vec<WatchLaterEntry>, Error>;

    async fn history(&self, user: UserId) -> Result<Vec<WatchHistoryEntry>, Error>;

    /// Returns how many entries were removed.
    async fn clear_history(&self, user: UserId) -> Result<u64, Error>;
}
