//! Vote and view services.
//!
//! [`VoteService`] forwards toggles to the vote ledger, which owns atomicity.
//! [`ViewService`] claims the view in the dedupe store first and only then
//! touches the counters, releasing the claim if counting fails.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{
    LibraryRepository, ViewCommand, ViewCounterError, ViewCounterRepository, ViewDedupeStore,
    ViewDedupeStoreError, VoteCommand, VoteLedger, VoteLedgerError,
};
use crate::domain::{
    ClaimUndo, Error, UserId, VideoId, ViewClaim, ViewOutcome, ViewerKey, VoteKind, VoteOutcome,
};

fn video_not_found(video_id: VideoId) -> Error {
    Error::not_found(format!("video {video_id} not found"))
}

fn map_vote_error(error: VoteLedgerError) -> Error {
    match error {
        VoteLedgerError::Connection { message } => {
            Error::service_unavailable(format!("vote ledger unavailable: {message}"))
        }
        VoteLedgerError::Query { message } => Error::internal(format!("vote ledger error: {message}")),
        VoteLedgerError::VideoNotFound { video_id } => video_not_found(video_id),
    }
}

fn map_counter_error(error: ViewCounterError) -> Error {
    match error {
        ViewCounterError::Connection { message } => {
            Error::service_unavailable(format!("view counter unavailable: {message}"))
        }
        ViewCounterError::Query { message } => {
            Error::internal(format!("view counter error: {message}"))
        }
        ViewCounterError::VideoNotFound { video_id } => video_not_found(video_id),
    }
}

fn map_dedupe_error(error: ViewDedupeStoreError) -> Error {
    match error {
        ViewDedupeStoreError::Unavailable { message } => {
            Error::service_unavailable(format!("view dedupe store unavailable: {message}"))
        }
    }
}

/// Vote toggle service implementing [`VoteCommand`].
#[derive(Clone)]
pub struct VoteService<L> {
    ledger: Arc<L>,
}

impl<L> VoteService<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl<L> VoteCommand for VoteService<L>
where
    L: VoteLedger,
{
    async fn vote(
        &self,
        actor: UserId,
        video: VideoId,
        kind: VoteKind,
    ) -> Result<VoteOutcome, Error> {
        let outcome = self
            .ledger
            .apply_vote(actor, video, kind)
            .await
            .map_err(map_vote_error)?;
        debug!(%actor, %video, vote = ?outcome.vote, "vote applied");
        Ok(outcome)
    }
}

/// Deduplicated view counting implementing [`ViewCommand`].
///
/// Counted views by signed-in viewers are also written to their watch
/// history. History failures are logged and never fail the view.
#[derive(Clone)]
pub struct ViewService<C, D, H> {
    counters: Arc<C>,
    dedupe: Arc<D>,
    history: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<C, D, H> ViewService<C, D, H> {
    pub fn new(counters: Arc<C>, dedupe: Arc<D>, history: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            counters,
            dedupe,
            history,
            clock,
        }
    }
}

impl<C, D, H> ViewService<C, D, H>
where
    C: ViewCounterRepository,
    D: ViewDedupeStore,
    H: LibraryRepository,
{
    async fn count(&self, viewer: ViewerKey, undo: ClaimUndo) -> Result<u64, Error> {
        let video = undo.video();
        match self.counters.increment_views(video).await {
            Ok(views) => Ok(views),
            Err(error) => {
                if let Err(release_error) = self.dedupe.release(viewer, undo).await {
                    warn!(%video, error = %release_error, "failed to release view claim");
                }
                Err(map_counter_error(error))
            }
        }
    }
}

#[async_trait]
impl<C, D, H> ViewCommand for ViewService<C, D, H>
where
    C: ViewCounterRepository,
    D: ViewDedupeStore,
    H: LibraryRepository,
{
    async fn record_view(&self, viewer: ViewerKey, video: VideoId) -> Result<ViewOutcome, Error> {
        let now = self.clock.utc();
        let ViewClaim {
            undo,
            recent,
            expires_at,
        } = self
            .dedupe
            .claim(viewer, video, now)
            .await
            .map_err(map_dedupe_error)?;
        let expires_in = expires_at.map_or_else(Duration::zero, |at| at - now);
        let Some(undo) = undo else {
            return Ok(ViewOutcome {
                video_id: video,
                counted: false,
                views: None,
                recent,
                expires_in,
            });
        };

        let views = self.count(viewer, undo).await?;
        if let ViewerKey::User(user) = viewer {
            if let Err(error) = self.history.record_watch(user, video, now).await {
                warn!(%user, %video, %error, "failed to record watch history");
            }
        }

        Ok(ViewOutcome {
            video_id: video,
            counted: true,
            views: Some(views),
            recent,
            expires_in,
        })
    }
}

#[cfg(test)]
#[path = "engagement_service_tests.rs"]
mod tests;
