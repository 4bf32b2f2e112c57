//! Votes, view counters and the personal library.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{InMemoryStore, PoisonedStoreError};
use crate::domain::ports::{
    LibraryRepository, LibraryRepositoryError, ViewCounterError, ViewCounterRepository,
    VoteLedger, VoteLedgerError,
};
use crate::domain::{
    UserId, VideoId, VoteKind, VoteOutcome, VoteTransition, WatchHistoryEntry, WatchLaterEntry,
};

impl From<PoisonedStoreError> for VoteLedgerError {
    fn from(err: PoisonedStoreError) -> Self {
        Self::query(err.to_string())
    }
}

impl From<PoisonedStoreError> for ViewCounterError {
    fn from(err: PoisonedStoreError) -> Self {
        Self::query(err.to_string())
    }
}

impl From<PoisonedStoreError> for LibraryRepositoryError {
    fn from(err: PoisonedStoreError) -> Self {
        Self::query(err.to_string())
    }
}

#[async_trait]
impl VoteLedger for InMemoryStore {
    async fn apply_vote(
        &self,
        actor: UserId,
        video: VideoId,
        kind: VoteKind,
    ) -> Result<VoteOutcome, VoteLedgerError> {
        let mut state = self.lock()?;
        let counters = state
            .videos
            .get(&video)
            .map(|row| row.counters)
            .ok_or_else(|| VoteLedgerError::video_not_found(video))?;

        let key = (actor, video);
        let transition = VoteTransition::plan(state.votes.get(&key).copied(), kind);
        match transition.resulting_vote() {
            Some(stored) => state.votes.insert(key, stored),
            None => state.votes.remove(&key),
        };
        let updated = transition.delta().apply(counters);
        if let Some(row) = state.videos.get_mut(&video) {
            row.counters = updated;
        }

        Ok(VoteOutcome {
            video_id: video,
            vote: transition.resulting_vote(),
            likes: updated.likes,
            dislikes: updated.dislikes,
        })
    }
}

#[async_trait]
impl ViewCounterRepository for InMemoryStore {
    async fn increment_views(&self, video: VideoId) -> Result<u64, ViewCounterError> {
        let mut state = self.lock()?;
        let row = state
            .videos
            .get_mut(&video)
            .ok_or_else(|| ViewCounterError::video_not_found(video))?;
        row.counters.views += 1;
        let (views, channel_id) = (row.counters.views, row.channel_id);
        if let Some(channel) = state.channels.get_mut(&channel_id) {
            channel.total_views += 1;
        }
        Ok(views)
    }
}

#[async_trait]
impl LibraryRepository for InMemoryStore {
    async fn toggle_watch_later(
        &self,
        user: UserId,
        video: VideoId,
        now: DateTime<Utc>,
    ) -> Result<bool, LibraryRepositoryError> {
        let mut state = self.lock()?;
        if !state.videos.contains_key(&video) {
            return Err(LibraryRepositoryError::video_not_found(video));
        }
        let key = (user, video);
        if state.watch_later.remove(&key).is_some() {
            return Ok(false);
        }
        state.watch_later.insert(key, now);
        Ok(true)
    }

    async fn watch_later(
        &self,
        user: UserId,
    ) -> Result<Vec<WatchLaterEntry>, LibraryRepositoryError> {
        let state = self.lock()?;
        let mut entries: Vec<WatchLaterEntry> = state
            .watch_later
            .iter()
            .filter(|((owner, _), _)| *owner == user)
            .filter_map(|((_, video), added_at)| {
                state.videos.get(video).map(|row| WatchLaterEntry {
                    video: row.clone(),
                    added_at: *added_at,
                })
            })
            .collect();
        entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(entries)
    }

    async fn record_watch(
        &self,
        user: UserId,
        video: VideoId,
        at: DateTime<Utc>,
    ) -> Result<(), LibraryRepositoryError> {
        let mut state = self.lock()?;
        if !state.videos.contains_key(&video) {
            return Err(LibraryRepositoryError::video_not_found(video));
        }
        state.history.insert((user, video), at);
        Ok(())
    }

    async fn history(
        &self,
        user: UserId,
    ) -> Result<Vec<WatchHistoryEntry>, LibraryRepositoryError> {
        let state = self.lock()?;
        let mut entries: Vec<WatchHistoryEntry> = state
            .history
            .iter()
            .filter(|((owner, _), _)| *owner == user)
            .filter_map(|((_, video), watched_at)| {
                state.videos.get(video).map(|row| WatchHistoryEntry {
                    video: row.clone(),
                    watched_at: *watched_at,
                })
            })
            .collect();
        entries.sort_by(|a, b| b.watched_at.cmp(&a.watched_at));
        Ok(entries)
    }

    async fn clear_history(&self, user: UserId) -> Result<u64, LibraryRepositoryError> {
        let mut state = self.lock()?;
        let before = state.history.len();
        state.history.retain(|(owner, _), _| *owner != user);
        Ok(u64::try_from(before - state.history.len()).unwrap_or_default())
    }
}
