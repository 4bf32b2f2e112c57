//! OpenAPI documentation.
//!
//! [`ApiDoc`] registers every handler under `/api`, the health probes, the
//! domain schema wrappers from [`crate::inbound::http::schemas`], and the
//! `session` cookie security scheme. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for tooling.

use crate::inbound::http::schemas::{
    BlockRecordSchema, CatalogueTotalsSchema, ChannelPageSchema, ChannelSchema,
    ChannelStatusSchema, ClaimPageSchema, ContactPageSchema, ContactSubmissionSchema,
    CopyrightClaimSchema, DashboardStatsSchema, ErrorCodeSchema, ErrorSchema, FlagPageSchema,
    FlagReasonSchema, FlagRecordSchema, LedgerTransactionSchema, ModerationStatusSchema,
    RoleSchema, StatusCountsSchema, TransactionKindSchema, TransactionStatusSchema, UserSchema,
    VideoCountersSchema, VideoPageSchema, VideoSchema, VideoStatusSchema, VoteKindSchema,
    VoteOutcomeSchema, WatchHistoryEntrySchema, WatchLaterEntrySchema, WatchLaterToggleSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "vidhub API",
        description = "Video engagement, moderation and creator payouts over a session-authenticated JSON API."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::videos::like,
        crate::inbound::http::videos::view,
        crate::inbound::http::videos::flag,
        crate::inbound::http::videos::toggle_watch_later,
        crate::inbound::http::blocks::list_blocks,
        crate::inbound::http::blocks::block_user,
        crate::inbound::http::blocks::unblock_user,
        crate::inbound::http::library::list_watch_later,
        crate::inbound::http::library::list_history,
        crate::inbound::http::library::clear_history,
        crate::inbound::http::monetization::payout_summary,
        crate::inbound::http::monetization::request_payout,
        crate::inbound::http::support::submit_claim,
        crate::inbound::http::support::submit_contact,
        crate::inbound::http::admin::list_flags,
        crate::inbound::http::admin::update_flag,
        crate::inbound::http::admin::list_claims,
        crate::inbound::http::admin::update_claim,
        crate::inbound::http::admin::list_contact,
        crate::inbound::http::admin::update_contact,
        crate::inbound::http::admin::list_channels,
        crate::inbound::http::admin::update_channel,
        crate::inbound::http::admin::list_videos,
        crate::inbound::http::admin::update_video,
        crate::inbound::http::admin::stats,
        crate::inbound::http::admin::record_revenue,
        crate::inbound::http::admin::settle_payout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserSchema,
        RoleSchema,
        VoteKindSchema,
        VoteOutcomeSchema,
        VideoSchema,
        VideoStatusSchema,
        VideoCountersSchema,
        ChannelSchema,
        ChannelStatusSchema,
        FlagRecordSchema,
        FlagReasonSchema,
        CopyrightClaimSchema,
        ContactSubmissionSchema,
        ModerationStatusSchema,
        BlockRecordSchema,
        WatchLaterEntrySchema,
        WatchLaterToggleSchema,
        WatchHistoryEntrySchema,
        LedgerTransactionSchema,
        TransactionKindSchema,
        TransactionStatusSchema,
        StatusCountsSchema,
        CatalogueTotalsSchema,
        DashboardStatsSchema,
        FlagPageSchema,
        ClaimPageSchema,
        ContactPageSchema,
        ChannelPageSchema,
        VideoPageSchema,
    )),
    tags(
        (name = "auth", description = "Session login and the current user"),
        (name = "videos", description = "Votes, views and flags"),
        (name = "library", description = "Watch-later queue and watch history"),
        (name = "blocks", description = "The caller's block list"),
        (name = "monetization", description = "Creator balance and payouts"),
        (name = "support", description = "Copyright claims and the contact form"),
        (name = "admin", description = "Moderation, catalogue and ledger administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
