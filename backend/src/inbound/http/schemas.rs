//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their wire shape and register under the domain
//! type's name via `#[schema(as = ...)]`, so the generated document refers
//! to `crate.domain.Video` rather than to an adapter type.
#![expect(
    dead_code,
    reason = "Schema wrappers are only read by utoipa during document generation"
)]

use serde_json::Value;
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The database or another backing service is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// Every failure body carries at least `error`.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
pub struct ErrorSchema {
    /// Human-readable message.
    #[schema(example = "Insufficient balance")]
    error: String,
    /// Stable machine-readable code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level validation details.
    details: Option<Value>,
}

/// OpenAPI schema for [`crate::domain::Role`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Role)]
pub enum RoleSchema {
    #[schema(rename = "USER")]
    User,
    #[schema(rename = "ADMIN")]
    Admin,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
pub struct UserSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(example = "viewer")]
    username: String,
    #[schema(rename = "displayName", example = "Ada Lovelace")]
    display_name: String,
    role: RoleSchema,
}

/// OpenAPI schema for [`crate::domain::VoteKind`].
#[derive(ToSchema)]
#[schema(as = crate::domain::VoteKind)]
pub enum VoteKindSchema {
    #[schema(rename = "LIKE")]
    Like,
    #[schema(rename = "DISLIKE")]
    Dislike,
}

/// OpenAPI schema for [`crate::domain::VoteOutcome`].
#[derive(ToSchema)]
#[schema(as = crate::domain::VoteOutcome)]
pub struct VoteOutcomeSchema {
    #[schema(rename = "videoId", value_type = String, format = Uuid)]
    video_id: String,
    /// Caller's vote after the toggle; absent when toggled off.
    vote: Option<VoteKindSchema>,
    likes: u64,
    dislikes: u64,
}

/// OpenAPI schema for [`crate::domain::VideoStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::VideoStatus)]
pub enum VideoStatusSchema {
    #[schema(rename = "PUBLISHED")]
    Published,
    #[schema(rename = "UNLISTED")]
    Unlisted,
    #[schema(rename = "REMOVED")]
    Removed,
}

/// OpenAPI schema for [`crate::domain::ChannelStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ChannelStatus)]
pub enum ChannelStatusSchema {
    #[schema(rename = "ACTIVE")]
    Active,
    #[schema(rename = "SUSPENDED")]
    Suspended,
}

/// OpenAPI schema for [`crate::domain::VideoCounters`].
#[derive(ToSchema)]
#[schema(as = crate::domain::VideoCounters)]
pub struct VideoCountersSchema {
    views: u64,
    likes: u64,
    dislikes: u64,
}

/// OpenAPI schema for [`crate::domain::Video`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Video)]
pub struct VideoSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(rename = "channelId", value_type = String, format = Uuid)]
    channel_id: String,
    title: String,
    status: VideoStatusSchema,
    counters: VideoCountersSchema,
    #[schema(rename = "createdAt", value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Channel`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Channel)]
pub struct ChannelSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(rename = "ownerId", value_type = String, format = Uuid)]
    owner_id: String,
    name: String,
    status: ChannelStatusSchema,
    #[schema(rename = "subscriberCount")]
    subscriber_count: u64,
    #[schema(rename = "totalViews")]
    total_views: u64,
    #[schema(rename = "createdAt", value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::ModerationStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ModerationStatus)]
pub enum ModerationStatusSchema {
    #[schema(rename = "PENDING")]
    Pending,
    #[schema(rename = "IN_PROGRESS")]
    InProgress,
    #[schema(rename = "RESOLVED")]
    Resolved,
    #[schema(rename = "REJECTED")]
    Rejected,
}

/// OpenAPI schema for [`crate::domain::FlagReason`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FlagReason)]
pub enum FlagReasonSchema {
    #[schema(rename = "SPAM")]
    Spam,
    #[schema(rename = "HARASSMENT")]
    Harassment,
    #[schema(rename = "HATE_SPEECH")]
    HateSpeech,
    #[schema(rename = "VIOLENCE")]
    Violence,
    #[schema(rename = "SEXUAL_CONTENT")]
    SexualContent,
    #[schema(rename = "COPYRIGHT")]
    Copyright,
    #[schema(rename = "MISINFORMATION")]
    Misinformation,
    #[schema(rename = "OTHER")]
    Other,
}

/// OpenAPI schema for [`crate::domain::FlagRecord`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FlagRecord)]
pub struct FlagRecordSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(rename = "reporterId", value_type = String, format = Uuid)]
    reporter_id: String,
    #[schema(rename = "videoId", value_type = String, format = Uuid)]
    video_id: String,
    #[schema(rename = "videoTitle")]
    video_title: String,
    reason: FlagReasonSchema,
    comment: Option<String>,
    status: ModerationStatusSchema,
    #[schema(rename = "createdAt", value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::CopyrightClaim`].
#[derive(ToSchema)]
#[schema(as = crate::domain::CopyrightClaim)]
pub struct CopyrightClaimSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(rename = "claimantId", value_type = String, format = Uuid)]
    claimant_id: String,
    #[schema(rename = "videoId", value_type = String, format = Uuid)]
    video_id: String,
    #[schema(rename = "videoTitle")]
    video_title: String,
    #[schema(rename = "claimantName")]
    claimant_name: String,
    #[schema(rename = "claimantEmail")]
    claimant_email: String,
    description: String,
    status: ModerationStatusSchema,
    #[schema(rename = "createdAt", value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::ContactSubmission`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ContactSubmission)]
pub struct ContactSubmissionSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    name: String,
    email: String,
    subject: String,
    message: String,
    status: ModerationStatusSchema,
    #[schema(rename = "createdAt", value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::BlockRecord`].
#[derive(ToSchema)]
#[schema(as = crate::domain::BlockRecord)]
pub struct BlockRecordSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(rename = "blockerId", value_type = String, format = Uuid)]
    blocker_id: String,
    #[schema(rename = "blockedId", value_type = String, format = Uuid)]
    blocked_id: String,
    #[schema(rename = "blockedDisplayName")]
    blocked_display_name: String,
    #[schema(rename = "createdAt", value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::WatchLaterEntry`].
#[derive(ToSchema)]
#[schema(as = crate::domain::WatchLaterEntry)]
pub struct WatchLaterEntrySchema {
    video: VideoSchema,
    #[schema(rename = "addedAt", value_type = String, format = DateTime)]
    added_at: String,
}

/// OpenAPI schema for [`crate::domain::WatchLaterToggle`].
#[derive(ToSchema)]
#[schema(as = crate::domain::WatchLaterToggle)]
pub struct WatchLaterToggleSchema {
    #[schema(rename = "videoId", value_type = String, format = Uuid)]
    video_id: String,
    /// Whether the video is queued after the toggle.
    saved: bool,
}

/// OpenAPI schema for [`crate::domain::WatchHistoryEntry`].
#[derive(ToSchema)]
#[schema(as = crate::domain::WatchHistoryEntry)]
pub struct WatchHistoryEntrySchema {
    video: VideoSchema,
    #[schema(rename = "watchedAt", value_type = String, format = DateTime)]
    watched_at: String,
}

/// OpenAPI schema for [`crate::domain::TransactionKind`].
#[derive(ToSchema)]
#[schema(as = crate::domain::TransactionKind)]
pub enum TransactionKindSchema {
    #[schema(rename = "REVENUE")]
    Revenue,
    #[schema(rename = "PAYOUT")]
    Payout,
}

/// OpenAPI schema for [`crate::domain::TransactionStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::TransactionStatus)]
pub enum TransactionStatusSchema {
    #[schema(rename = "PENDING")]
    Pending,
    #[schema(rename = "COMPLETED")]
    Completed,
    #[schema(rename = "FAILED")]
    Failed,
}

/// OpenAPI schema for [`crate::domain::LedgerTransaction`].
#[derive(ToSchema)]
#[schema(as = crate::domain::LedgerTransaction)]
pub struct LedgerTransactionSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(rename = "userId", value_type = String, format = Uuid)]
    user_id: String,
    kind: TransactionKindSchema,
    /// Signed amount in cents; negative for payouts.
    #[schema(rename = "amountCents")]
    amount_cents: i64,
    status: TransactionStatusSchema,
    description: Option<String>,
    #[schema(rename = "createdAt", value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::StatusCounts`].
#[derive(ToSchema)]
#[schema(as = crate::domain::StatusCounts)]
pub struct StatusCountsSchema {
    pending: u64,
    #[schema(rename = "inProgress")]
    in_progress: u64,
    resolved: u64,
    rejected: u64,
}

/// OpenAPI schema for [`crate::domain::CatalogueTotals`].
#[derive(ToSchema)]
#[schema(as = crate::domain::CatalogueTotals)]
pub struct CatalogueTotalsSchema {
    users: u64,
    channels: u64,
    videos: u64,
    views: u64,
}

/// OpenAPI schema for [`crate::domain::DashboardStats`].
#[derive(ToSchema)]
#[schema(as = crate::domain::DashboardStats)]
pub struct DashboardStatsSchema {
    totals: CatalogueTotalsSchema,
    flags: StatusCountsSchema,
    #[schema(rename = "copyrightClaims")]
    copyright_claims: StatusCountsSchema,
    #[schema(rename = "contactSubmissions")]
    contact_submissions: StatusCountsSchema,
}

macro_rules! page_schema {
    ($(#[$meta:meta])* $name:ident, $alias:ident, $item:ty) => {
        $(#[$meta])*
        #[derive(ToSchema)]
        #[schema(as = $alias)]
        pub struct $name {
            items: Vec<$item>,
            /// 1-based page number.
            page: u32,
            limit: u32,
            /// Matching items across all pages.
            total: u64,
            #[schema(rename = "totalPages")]
            total_pages: u64,
        }
    };
}

page_schema!(
    /// Page of flags.
    FlagPageSchema, FlagPage, FlagRecordSchema
);
page_schema!(
    /// Page of copyright claims.
    ClaimPageSchema, ClaimPage, CopyrightClaimSchema
);
page_schema!(
    /// Page of contact submissions.
    ContactPageSchema, ContactPage, ContactSubmissionSchema
);
page_schema!(
    /// Page of channels.
    ChannelPageSchema, ChannelPage, ChannelSchema
);
page_schema!(
    /// Page of videos.
    VideoPageSchema, VideoPage, VideoSchema
);
