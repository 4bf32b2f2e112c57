//! Driven port for watch-later queues and watch history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{UserId, VideoId, WatchHistoryEntry, WatchLaterEntry};

use super::define_port_error;

define_port_error! {
    /// Errors raised by library repository adapters.
    pub enum LibraryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "library repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "library repository query failed: {message}",
        /// The referenced video does not exist.
        VideoNotFound { video_id: VideoId } => "video {video_id} not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// Add `video` to the queue, or remove it if present.
    ///
    /// Returns whether the video is queued afterwards.
    async fn toggle_watch_later(
        &self,
        user: UserId,
        video: VideoId,
        now: DateTime<Utc>,
    ) -> Result<bool, LibraryRepositoryError>;

    /// Queued videos, most recently added first.
    async fn watch_later(&self, user: UserId)
    -> Result<Vec<WatchLaterEntry>, LibraryRepositoryError>;

    /// Upsert the latest watch time of `video`.
    async fn record_watch(
        &self,
        user: UserId,
        video: VideoId,
        at: DateTime<Utc>,
    ) -> Result<(), LibraryRepositoryError>;

    /// Watched videos, most recent first.
    async fn history(&self, user: UserId)
    -> Result<Vec<WatchHistoryEntry>, LibraryRepositoryError>;

    /// Forget every watch; returns how many entries were removed.
    async fn clear_history(&self, user: UserId) -> Result<u64, LibraryRepositoryError>;
}
