//! PostgreSQL-backed engagement adapters: votes, view counters and the
//! personal library.
//!
//! Vote and view writes lock the video row (`SELECT ... FOR UPDATE`) and
//! change the ledger and the denormalized counters in the same transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    LibraryRepository, LibraryRepositoryError, ViewCounterError, ViewCounterRepository,
    VoteLedger, VoteLedgerError,
};
use crate::domain::{
    UserId, Video, VideoId, VoteKind, VoteOutcome, VoteTransition, WatchHistoryEntry,
    WatchLaterEntry,
};

use super::diesel_basic_error_mapping::{
    decode_failure, is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{
    NewVoteRow, NewWatchHistoryRow, NewWatchLaterRow, VideoRow, decode_count, decode_vote_kind,
};
use super::pool::DbPool;
use super::schema::{channels, video_votes, videos, watch_history, watch_later};

/// Diesel-backed vote ledger, view counter and library repository.
#[derive(Clone)]
pub struct DieselEngagementRepository {
    pool: DbPool,
}

impl DieselEngagementRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_vote_error(error: diesel::result::Error) -> VoteLedgerError {
    map_basic_diesel_error(error, VoteLedgerError::query, VoteLedgerError::connection)
}

fn map_view_error(error: diesel::result::Error) -> ViewCounterError {
    map_basic_diesel_error(error, ViewCounterError::query, ViewCounterError::connection)
}

fn map_library_error(error: diesel::result::Error) -> LibraryRepositoryError {
    map_basic_diesel_error(
        error,
        LibraryRepositoryError::query,
        LibraryRepositoryError::connection,
    )
}

/// Convert a counter returned by PostgreSQL, surfacing corruption inside the
/// transaction so it rolls back.
fn counter(column: &'static str, raw: i64) -> Result<u64, diesel::result::Error> {
    decode_count(column, raw).map_err(decode_failure)
}

#[async_trait]
impl VoteLedger for DieselEngagementRepository {
    async fn apply_vote(
        &self,
        actor: UserId,
        video: VideoId,
        kind: VoteKind,
    ) -> Result<VoteOutcome, VoteLedgerError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, VoteLedgerError::connection))?;
        let actor_id = *actor.as_uuid();
        let video_id = *video.as_uuid();

        let applied = conn
            .transaction(|conn| {
                async move {
                    let locked: Option<Uuid> = videos::table
                        .find(video_id)
                        .select(videos::id)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    if locked.is_none() {
                        return Ok(None);
                    }

                    let stored: Option<String> = video_votes::table
                        .find((actor_id, video_id))
                        .select(video_votes::kind)
                        .first(conn)
                        .await
                        .optional()?;
                    let existing = stored
                        .as_deref()
                        .map(decode_vote_kind)
                        .transpose()
                        .map_err(decode_failure)?;

                    let transition = VoteTransition::plan(existing, kind);
                    let ballot = video_votes::table.find((actor_id, video_id));
                    match transition {
                        VoteTransition::Create(created) => {
                            diesel::insert_into(video_votes::table)
                                .values(&NewVoteRow {
                                    user_id: actor_id,
                                    video_id,
                                    kind: created.as_str(),
                                })
                                .execute(conn)
                                .await?;
                        }
                        VoteTransition::Remove(_) => {
                            diesel::delete(ballot).execute(conn).await?;
                        }
                        VoteTransition::Switch { to, .. } => {
                            diesel::update(ballot)
                                .set(video_votes::kind.eq(to.as_str()))
                                .execute(conn)
                                .await?;
                        }
                    }

                    let delta = transition.delta();
                    let (likes, dislikes): (i64, i64) = diesel::update(videos::table.find(video_id))
                        .set((
                            videos::like_count.eq(videos::like_count + delta.likes),
                            videos::dislike_count.eq(videos::dislike_count + delta.dislikes),
                        ))
                        .returning((videos::like_count, videos::dislike_count))
                        .get_result(conn)
                        .await?;

                    Ok(Some(VoteOutcome {
                        video_id: video,
                        vote: transition.resulting_vote(),
                        likes: counter("like_count", likes)?,
                        dislikes: counter("dislike_count", dislikes)?,
                    }))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_vote_error)?;

        applied.ok_or_else(|| VoteLedgerError::video_not_found(video))
    }
}

#[async_trait]
impl ViewCounterRepository for DieselEngagementRepository {
    async fn increment_views(&self, video: VideoId) -> Result<u64, ViewCounterError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, ViewCounterError::connection))?;
        let video_id = *video.as_uuid();

        let views = conn
            .transaction(|conn| {
                async move {
                    let updated: Option<(i64, Uuid)> = diesel::update(videos::table.find(video_id))
                        .set(videos::view_count.eq(videos::view_count + 1_i64))
                        .returning((videos::view_count, videos::channel_id))
                        .get_result(conn)
                        .await
                        .optional()?;
                    let Some((views, channel_id)) = updated else {
                        return Ok(None);
                    };

                    diesel::update(channels::table.find(channel_id))
                        .set(channels::total_views.eq(channels::total_views + 1_i64))
                        .execute(conn)
                        .await?;

                    counter("view_count", views).map(Some)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_view_error)?;

        views.ok_or_else(|| ViewCounterError::video_not_found(video))
    }
}

fn decode_video(row: VideoRow) -> Result<Video, LibraryRepositoryError> {
    Video::try_from(row).map_err(|err| LibraryRepositoryError::query(err.to_string()))
}

#[async_trait]
impl LibraryRepository for DieselEngagementRepository {
    async fn toggle_watch_later(
        &self,
        user: UserId,
        video: VideoId,
        now: DateTime<Utc>,
    ) -> Result<bool, LibraryRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, LibraryRepositoryError::connection))?;
        let user_id = *user.as_uuid();
        let video_id = *video.as_uuid();

        let saved = conn
            .transaction(|conn| {
                async move {
                    let removed = diesel::delete(watch_later::table.find((user_id, video_id)))
                        .execute(conn)
                        .await?;
                    if removed > 0 {
                        return Ok(false);
                    }
                    diesel::insert_into(watch_later::table)
                        .values(&NewWatchLaterRow {
                            user_id,
                            video_id,
                            added_at: now,
                        })
                        .execute(conn)
                        .await?;
                    Ok(true)
                }
                .scope_boxed()
            })
            .await;

        match saved {
            Ok(saved) => Ok(saved),
            Err(err) if is_foreign_key_violation(&err) => {
                Err(LibraryRepositoryError::video_not_found(video))
            }
            Err(err) => Err(map_library_error(err)),
        }
    }

    async fn watch_later(
        &self,
        user: UserId,
    ) -> Result<Vec<WatchLaterEntry>, LibraryRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, LibraryRepositoryError::connection))?;
        let rows: Vec<(VideoRow, DateTime<Utc>)> = watch_later::table
            .inner_join(videos::table)
            .filter(watch_later::user_id.eq(*user.as_uuid()))
            .order(watch_later::added_at.desc())
            .select((VideoRow::as_select(), watch_later::added_at))
            .load(&mut conn)
            .await
            .map_err(map_library_error)?;

        rows.into_iter()
            .map(|(row, added_at)| {
                Ok(WatchLaterEntry {
                    video: decode_video(row)?,
                    added_at,
                })
            })
            .collect()
    }

    async fn record_watch(
        &self,
        user: UserId,
        video: VideoId,
        at: DateTime<Utc>,
    ) -> Result<(), LibraryRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, LibraryRepositoryError::connection))?;
        let written = diesel::insert_into(watch_history::table)
            .values(&NewWatchHistoryRow {
                user_id: *user.as_uuid(),
                video_id: *video.as_uuid(),
                watched_at: at,
            })
            .on_conflict((watch_history::user_id, watch_history::video_id))
            .do_update()
            .set(watch_history::watched_at.eq(excluded(watch_history::watched_at)))
            .execute(&mut conn)
            .await;

        match written {
            Ok(_) => Ok(()),
            Err(err) if is_foreign_key_violation(&err) => {
                Err(LibraryRepositoryError::video_not_found(video))
            }
            Err(err) => Err(map_library_error(err)),
        }
    }

    async fn history(
        &self,
        user: UserId,
    ) -> Result<Vec<WatchHistoryEntry>, LibraryRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, LibraryRepositoryError::connection))?;
        let rows: Vec<(VideoRow, DateTime<Utc>)> = watch_history::table
            .inner_join(videos::table)
            .filter(watch_history::user_id.eq(*user.as_uuid()))
            .order(watch_history::watched_at.desc())
            .select((VideoRow::as_select(), watch_history::watched_at))
            .load(&mut conn)
            .await
            .map_err(map_library_error)?;

        rows.into_iter()
            .map(|(row, watched_at)| {
                Ok(WatchHistoryEntry {
                    video: decode_video(row)?,
                    watched_at,
                })
            })
            .collect()
    }

    async fn clear_history(&self, user: UserId) -> Result<u64, LibraryRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, LibraryRepositoryError::connection))?;
        let removed = diesel::delete(
            watch_history::table.filter(watch_history::user_id.eq(*user.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_library_error)?;
        Ok(u64::try_from(removed).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn negative_counters_abort_the_transaction() {
        let err = counter("like_count", -1).expect_err("negative counter");
        assert!(matches!(err, diesel::result::Error::DeserializationError(_)));
        assert!(matches!(map_vote_error(err), VoteLedgerError::Query { .. }));
    }

    #[rstest]
    fn corrupt_library_rows_map_to_query_errors() {
        let row = VideoRow {
            id: Uuid::new_v4(),
            channel_id: Uuid::new_v4(),
            title: "Broken".to_owned(),
            status: "DRAFT".to_owned(),
            view_count: 0,
            like_count: 0,
            dislike_count: 0,
            created_at: Utc::now(),
        };
        let err = decode_video(row).expect_err("unknown status");
        assert!(matches!(err, LibraryRepositoryError::Query { .. }));
    }
}
