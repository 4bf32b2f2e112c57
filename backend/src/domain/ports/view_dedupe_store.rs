//! Driven port for the server-side recent-view sets.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ClaimUndo, VideoId, ViewClaim, ViewerKey};

use super::define_port_error;

define_port_error! {
    /// Errors raised by dedupe store adapters.
    pub enum ViewDedupeStoreError {
        /// Backing store could not be reached.
        Unavailable { message: String } => "view dedupe store unavailable: {message}",
    }
}

/// Per-viewer bounded set of recently counted videos.
///
/// `claim` must be atomic per viewer: two concurrent claims of the same
/// `(viewer, video)` pair yield exactly one fresh claim.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ViewDedupeStore: Send + Sync {
    /// Record `video` for `viewer` if it is not already remembered.
    async fn claim(
        &self,
        viewer: ViewerKey,
        video: VideoId,
        now: DateTime<Utc>,
    ) -> Result<ViewClaim, ViewDedupeStoreError>;

    /// Roll back a fresh claim whose view could not be counted, restoring
    /// anything the claim evicted.
    async fn release(
        &self,
        viewer: ViewerKey,
        undo: ClaimUndo,
    ) -> Result<(), ViewDedupeStoreError>;
}
