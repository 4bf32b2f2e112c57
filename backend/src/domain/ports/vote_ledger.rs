//! Driven port for the vote ledger and its video aggregates.

use async_trait::async_trait;

use crate::domain::{UserId, VideoId, VoteKind, VoteOutcome};

use super::define_port_error;

define_port_error! {
    /// Errors raised by vote ledger adapters.
    pub enum VoteLedgerError {
        /// Repository connection could not be established.
        Connection { message: String } => "vote ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "vote ledger query failed: {message}",
        /// The target video does not exist.
        VideoNotFound { video_id: VideoId } => "video {video_id} not found",
    }
}

/// Vote storage that keeps video like and dislike counters in lockstep.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteLedger: Send + Sync {
    /// Toggle `actor`'s vote on `video` towards `kind`.
    ///
    /// Implementations plan the change with
    /// [`VoteTransition::plan`](crate::domain::VoteTransition::plan) and apply
    /// the ledger row change and the counter delta in one atomic unit, with
    /// the video row locked for the duration.
    async fn apply_vote(
        &self,
        actor: UserId,
        video: VideoId,
        kind: VoteKind,
    ) -> Result<VoteOutcome, VoteLedgerError>;
}
