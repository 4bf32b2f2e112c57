//! Domain primitives, decision logic, services and ports.
//!
//! Types here are transport agnostic. Inbound adapters translate requests
//! into these types, call the driving ports in [`ports`], and map
//! [`Error`] back onto HTTP. Outbound adapters implement the driven ports.

pub mod access;
pub mod account_service;
pub mod auth;
pub mod block_service;
pub mod blocks;
pub mod catalogue;
pub mod catalogue_admin_service;
pub mod engagement_service;
pub mod error;
pub mod ids;
pub mod library;
pub mod library_service;
pub mod listing;
pub mod moderation;
pub mod moderation_service;
pub mod payout_service;
pub mod payouts;
pub mod ports;
pub mod stats;
pub mod trace_id;
pub mod user;
pub mod views;
pub mod votes;

pub use self::access::{AccessRule, Principal};
pub use self::account_service::AccountService;
pub use self::auth::{LoginCredentials, LoginValidationError, password_digest};
pub use self::block_service::{BlockService, DUPLICATE_BLOCK_MESSAGE};
pub use self::blocks::{BlockDraft, BlockRecord, BlockValidationError};
pub use self::catalogue::{
    CatalogueTotals, Channel, ChannelStatus, UnknownStatusError, Video, VideoCounters, VideoStatus,
};
pub use self::catalogue_admin_service::CatalogueAdminService;
pub use self::engagement_service::{ViewService, VoteService};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{
    BlockId, ChannelId, ClaimId, ContactId, FlagId, IdParseError, TransactionId, UserId, VideoId,
};
pub use self::library::{WatchHistoryEntry, WatchLaterEntry, WatchLaterToggle};
pub use self::library_service::LibraryService;
pub use self::listing::{
    ChannelQuery, ChannelSort, ClaimQuery, ClaimSort, ContactQuery, ContactSort, FlagQuery,
    FlagSort, ListingQuery, Page, PageRequest, PageRequestError, SortDirection,
    UnknownSortFieldError, VideoQuery, VideoSort,
};
pub use self::moderation::{
    ContactDraft, ContactSubmission, CopyrightClaim, CopyrightClaimDraft, FlagDraft, FlagReason,
    FlagRecord, ModerationStatus, ModerationValidationError, StatusCounts,
};
pub use self::moderation_service::{DUPLICATE_FLAG_MESSAGE, ModerationService};
pub use self::payout_service::PayoutService;
pub use self::payouts::{
    DEFAULT_PAYOUT_MINIMUM_CENTS, LedgerBalance, LedgerTransaction, MAX_REVENUE_CENTS,
    PayoutOutcome, PayoutPolicy, PayoutRejection, PayoutSummary, RevenueAmountError, RevenueDraft,
    TransactionKind, TransactionStatus,
};
pub use self::stats::DashboardStats;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{DisplayName, Role, User, UserValidationError};
pub use self::views::{
    ClaimUndo, DEFAULT_VIEW_DEDUPE_CAPACITY, DEFAULT_VIEW_DEDUPE_MAX_VIEWERS,
    DEFAULT_VIEW_DEDUPE_TTL_HOURS, RecentViews, ViewClaim, ViewDedupePolicy, ViewDedupePolicyError, ViewOutcome, ViewerKey,
};
pub use self::votes::{CounterDelta, ParseVoteKindError, VoteKind, VoteOutcome, VoteTransition};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use vidhub::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
