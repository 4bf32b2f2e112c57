//! Driven port for view counters.

use async_trait::async_trait;

use crate::domain::VideoId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by view counter adapters.
    pub enum ViewCounterError {
        /// Repository connection could not be established.
        Connection { message: String } => "view counter connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "view counter query failed: {message}",
        /// The target video does not exist.
        VideoNotFound { video_id: VideoId } => "video {video_id} not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ViewCounterRepository: Send + Sync {
    /// Add one view to `video` and to its channel's total, atomically.
    ///
    /// Returns the video's view count after the increment.
    async fn increment_views(&self, video: VideoId) -> Result<u64, ViewCounterError>;
}
