//! Internal Diesel row structs and their conversion into domain types.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Enumerations are stored as their
//! `as_str` spelling and counters as `BIGINT`; decoding validates both.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    BlockId, BlockRecord, Channel, ChannelId, ClaimId, ContactId, ContactSubmission,
    CopyrightClaim, DisplayName, FlagId, FlagRecord, LedgerTransaction, TransactionId, User,
    UserId, Video, VideoCounters, VideoId,
};

use super::schema::{
    channels, contact_submissions, copyright_claims, ledger_transactions, user_blocks, users,
    video_flags, video_votes, videos, watch_history, watch_later,
};

/// Raised when a stored value no longer satisfies the domain's rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {column} value: {message}")]
pub(crate) struct RowDecodeError {
    column: &'static str,
    message: String,
}

fn parse_column<T>(column: &'static str, raw: &str) -> Result<T, RowDecodeError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse().map_err(|err: T::Err| RowDecodeError {
        column,
        message: err.to_string(),
    })
}

/// Decode a non-negative `BIGINT` counter.
pub(crate) fn decode_count(column: &'static str, raw: i64) -> Result<u64, RowDecodeError> {
    u64::try_from(raw).map_err(|_| RowDecodeError {
        column,
        message: format!("{raw} is negative"),
    })
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub password_digest: String,
}

impl UserRow {
    /// Split into the domain user and the stored digest.
    pub(crate) fn into_parts(self) -> Result<(User, String), RowDecodeError> {
        let display_name = DisplayName::new(self.display_name).map_err(|err| RowDecodeError {
            column: "display_name",
            message: err.to_string(),
        })?;
        let role = parse_column("role", &self.role)?;
        let user = User::new(UserId::from_uuid(self.id), self.username, display_name, role);
        Ok((user, self.password_digest))
    }
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = channels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ChannelRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub status: String,
    pub subscriber_count: i64,
    pub total_views: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ChannelRow> for Channel {
    type Error = RowDecodeError;

    fn try_from(row: ChannelRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ChannelId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            name: row.name,
            status: parse_column("channels.status", &row.status)?,
            subscriber_count: decode_count("subscriber_count", row.subscriber_count)?,
            total_views: decode_count("total_views", row.total_views)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = videos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VideoRow {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub title: String,
    pub status: String,
    pub view_count: i64,
    pub like_count: i64,
    pub dislike_count: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<VideoRow> for Video {
    type Error = RowDecodeError;

    fn try_from(row: VideoRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: VideoId::from_uuid(row.id),
            channel_id: ChannelId::from_uuid(row.channel_id),
            title: row.title,
            status: parse_column("videos.status", &row.status)?,
            counters: VideoCounters {
                views: decode_count("view_count", row.view_count)?,
                likes: decode_count("like_count", row.like_count)?,
                dislikes: decode_count("dislike_count", row.dislike_count)?,
            },
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Engagement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = video_votes)]
pub(crate) struct NewVoteRow<'a> {
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub kind: &'a str,
}

/// Decode a stored vote kind.
pub(crate) fn decode_vote_kind(raw: &str) -> Result<crate::domain::VoteKind, RowDecodeError> {
    parse_column("video_votes.kind", raw)
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = watch_later)]
pub(crate) struct NewWatchLaterRow {
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = watch_history)]
pub(crate) struct NewWatchHistoryRow {
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub watched_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = video_flags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FlagRow {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub video_id: Uuid,
    pub reason: String,
    pub comment: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = video_flags)]
pub(crate) struct NewFlagRow<'a> {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub video_id: Uuid,
    pub reason: &'a str,
    pub comment: Option<&'a str>,
}

impl FlagRow {
    /// Combine with the flagged video's title.
    pub(crate) fn into_record(self, video_title: String) -> Result<FlagRecord, RowDecodeError> {
        Ok(FlagRecord {
            id: FlagId::from_uuid(self.id),
            reporter_id: UserId::from_uuid(self.reporter_id),
            video_id: VideoId::from_uuid(self.video_id),
            video_title,
            reason: parse_column("video_flags.reason", &self.reason)?,
            comment: self.comment,
            status: parse_column("video_flags.status", &self.status)?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = copyright_claims)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClaimRow {
    pub id: Uuid,
    pub claimant_id: Uuid,
    pub video_id: Uuid,
    pub claimant_name: String,
    pub claimant_email: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = copyright_claims)]
pub(crate) struct NewClaimRow<'a> {
    pub id: Uuid,
    pub claimant_id: Uuid,
    pub video_id: Uuid,
    pub claimant_name: &'a str,
    pub claimant_email: &'a str,
    pub description: &'a str,
}

impl ClaimRow {
    /// Combine with the claimed video's title.
    pub(crate) fn into_claim(self, video_title: String) -> Result<CopyrightClaim, RowDecodeError> {
        Ok(CopyrightClaim {
            id: ClaimId::from_uuid(self.id),
            claimant_id: UserId::from_uuid(self.claimant_id),
            video_id: VideoId::from_uuid(self.video_id),
            video_title,
            claimant_name: self.claimant_name,
            claimant_email: self.claimant_email,
            description: self.description,
            status: parse_column("copyright_claims.status", &self.status)?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contact_submissions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContactRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contact_submissions)]
pub(crate) struct NewContactRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}

impl TryFrom<ContactRow> for ContactSubmission {
    type Error = RowDecodeError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ContactId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            subject: row.subject,
            message: row.message,
            status: parse_column("contact_submissions.status", &row.status)?,
            created_at: row.created_at,
        })
    }
}

/// Decode a `(status, count)` grouping row.
pub(crate) fn decode_status_count(
    (status, count): (String, i64),
) -> Result<(crate::domain::ModerationStatus, u64), RowDecodeError> {
    Ok((
        parse_column("status", &status)?,
        decode_count("count", count)?,
    ))
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_blocks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BlockRow {
    pub id: Uuid,
    pub blocker_id: Uuid,
    pub blocked_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_blocks)]
pub(crate) struct NewBlockRow {
    pub id: Uuid,
    pub blocker_id: Uuid,
    pub blocked_id: Uuid,
}

impl BlockRow {
    /// Combine with the blocked user's display name.
    pub(crate) fn into_record(self, blocked_display_name: String) -> BlockRecord {
        BlockRecord {
            id: BlockId::from_uuid(self.id),
            blocker_id: UserId::from_uuid(self.blocker_id),
            blocked_id: UserId::from_uuid(self.blocked_id),
            blocked_display_name,
            created_at: self.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ledger_transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LedgerRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub amount_cents: i64,
    pub status: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ledger_transactions)]
pub(crate) struct NewLedgerRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: &'a str,
    pub amount_cents: i64,
    pub status: &'a str,
    pub description: Option<&'a str>,
}

impl TryFrom<LedgerRow> for LedgerTransaction {
    type Error = RowDecodeError;

    fn try_from(row: LedgerRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TransactionId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            kind: parse_column("ledger_transactions.kind", &row.kind)?,
            amount_cents: row.amount_cents,
            status: parse_column("ledger_transactions.status", &row.status)?,
            description: row.description,
            created_at: row.created_at,
        })
    }
}
