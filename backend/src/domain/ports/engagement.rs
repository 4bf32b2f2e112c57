//! Driving ports for votes and views.

use async_trait::async_trait;

use crate::domain::{Error, UserId, VideoId, ViewOutcome, ViewerKey, VoteKind, VoteOutcome};

/// Vote toggling use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteCommand: Send + Sync {
    /// Toggle `actor`'s vote on `video` towards `kind`.
    async fn vote(&self, actor: UserId, video: VideoId, kind: VoteKind)
    -> Result<VoteOutcome, Error>;
}

/// Deduplicated view counting use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ViewCommand: Send + Sync {
    /// Count a view of `video` unless `viewer` saw it recently.
    async fn record_view(&self, viewer: ViewerKey, video: VideoId) -> Result<ViewOutcome, Error>;
}
