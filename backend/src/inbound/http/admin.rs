//! Administrator routes, mounted under `/api/admin` behind the admin guard.
//!
//! Listings share the query string `page`, `limit`, `status`, `search`,
//! `sort` and `order`, and answer `{items, page, limit, total, totalPages}`.
//!
//! ```text
//! GET /api/admin/flags?status=PENDING&sort=createdAt&order=desc
//! PATCH /api/admin/flags/{id} {"status":"RESOLVED"}
//! GET /api/admin/videos?search=cat&sort=viewCount&limit=10
//! POST /api/admin/monetization/revenue {"userId":"...","amountCents":5000}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    Channel, ChannelId, ChannelQuery, ChannelStatus, ClaimId, ClaimQuery, ContactId,
    ContactQuery, ContactSubmission, CopyrightClaim, DashboardStats, FlagId, FlagQuery,
    FlagRecord, LedgerTransaction, ModerationStatus, Page, RevenueDraft, TransactionId,
    TransactionStatus, UserId, Video, VideoId, VideoQuery, VideoStatus,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    ChannelPageSchema, ChannelSchema, ClaimPageSchema, ContactPageSchema,
    ContactSubmissionSchema, CopyrightClaimSchema, DashboardStatsSchema, ErrorSchema,
    FlagPageSchema, FlagRecordSchema, LedgerTransactionSchema, VideoPageSchema, VideoSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, ListingParams, ValidationCode, field_error, parse_id, parse_value,
};

const ID: FieldName = FieldName::new("id");
const STATUS: FieldName = FieldName::new("status");

/// Status change body shared by every PATCH route.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct StatusRequest {
    #[schema(example = "RESOLVED")]
    pub status: String,
}

/// Revenue credit body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueRequest {
    pub user_id: String,
    /// Positive amount in cents.
    pub amount_cents: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Flags filed by viewers.
#[utoipa::path(
    get,
    path = "/api/admin/flags",
    params(ListingParams),
    responses(
        (status = 200, description = "Page of flags", body = FlagPageSchema),
        (status = 400, description = "Invalid listing parameters", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListFlags"
)]
#[get("/flags")]
pub async fn list_flags(
    state: web::Data<HttpState>,
    params: web::Query<ListingParams>,
) -> ApiResult<web::Json<Page<FlagRecord>>> {
    let query: FlagQuery = params.into_inner().into_query()?;
    Ok(web::Json(state.moderation_query.list_flags(query).await?))
}

/// Move a flag through its review states.
#[utoipa::path(
    patch,
    path = "/api/admin/flags/{id}",
    params(("id" = String, Path, description = "Flag id")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Updated flag", body = FlagRecordSchema),
        (status = 400, description = "Invalid status", body = ErrorSchema),
        (status = 404, description = "Flag not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateFlag"
)]
#[patch("/flags/{id}")]
pub async fn update_flag(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<web::Json<FlagRecord>> {
    let id: FlagId = parse_id(&path, ID)?;
    let status: ModerationStatus = parse_value(&payload.status, STATUS)?;
    let record = state.moderation.set_flag_status(id, status).await?;
    info!(flag = %id, %status, "flag status changed");
    Ok(web::Json(record))
}

/// Copyright claims.
#[utoipa::path(
    get,
    path = "/api/admin/copyright/claims",
    params(ListingParams),
    responses(
        (status = 200, description = "Page of claims", body = ClaimPageSchema),
        (status = 400, description = "Invalid listing parameters", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListClaims"
)]
#[get("/copyright/claims")]
pub async fn list_claims(
    state: web::Data<HttpState>,
    params: web::Query<ListingParams>,
) -> ApiResult<web::Json<Page<CopyrightClaim>>> {
    let query: ClaimQuery = params.into_inner().into_query()?;
    Ok(web::Json(state.moderation_query.list_claims(query).await?))
}

/// Move a copyright claim through its review states.
#[utoipa::path(
    patch,
    path = "/api/admin/copyright/claims/{id}",
    params(("id" = String, Path, description = "Claim id")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Updated claim", body = CopyrightClaimSchema),
        (status = 400, description = "Invalid status", body = ErrorSchema),
        (status = 404, description = "Claim not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateClaim"
)]
#[patch("/copyright/claims/{id}")]
pub async fn update_claim(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<web::Json<CopyrightClaim>> {
    let id: ClaimId = parse_id(&path, ID)?;
    let status: ModerationStatus = parse_value(&payload.status, STATUS)?;
    let claim = state.moderation.set_claim_status(id, status).await?;
    info!(claim = %id, %status, "copyright claim status changed");
    Ok(web::Json(claim))
}

/// Contact form submissions.
#[utoipa::path(
    get,
    path = "/api/admin/contact",
    params(ListingParams),
    responses(
        (status = 200, description = "Page of submissions", body = ContactPageSchema),
        (status = 400, description = "Invalid listing parameters", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListContact"
)]
#[get("/contact")]
pub async fn list_contact(
    state: web::Data<HttpState>,
    params: web::Query<ListingParams>,
) -> ApiResult<web::Json<Page<ContactSubmission>>> {
    let query: ContactQuery = params.into_inner().into_query()?;
    Ok(web::Json(state.moderation_query.list_contact(query).await?))
}

/// Move a contact submission through its review states.
#[utoipa::path(
    patch,
    path = "/api/admin/contact/{id}",
    params(("id" = String, Path, description = "Submission id")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Updated submission", body = ContactSubmissionSchema),
        (status = 400, description = "Invalid status", body = ErrorSchema),
        (status = 404, description = "Submission not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateContact"
)]
#[patch("/contact/{id}")]
pub async fn update_contact(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<web::Json<ContactSubmission>> {
    let id: ContactId = parse_id(&path, ID)?;
    let status: ModerationStatus = parse_value(&payload.status, STATUS)?;
    let submission = state.moderation.set_contact_status(id, status).await?;
    Ok(web::Json(submission))
}

/// Channels.
#[utoipa::path(
    get,
    path = "/api/admin/channels",
    params(ListingParams),
    responses(
        (status = 200, description = "Page of channels", body = ChannelPageSchema),
        (status = 400, description = "Invalid listing parameters", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListChannels"
)]
#[get("/channels")]
pub async fn list_channels(
    state: web::Data<HttpState>,
    params: web::Query<ListingParams>,
) -> ApiResult<web::Json<Page<Channel>>> {
    let query: ChannelQuery = params.into_inner().into_query()?;
    Ok(web::Json(state.catalogue.list_channels(query).await?))
}

/// Suspend or reinstate a channel.
#[utoipa::path(
    patch,
    path = "/api/admin/channels/{id}",
    params(("id" = String, Path, description = "Channel id")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Updated channel", body = ChannelSchema),
        (status = 400, description = "Invalid status", body = ErrorSchema),
        (status = 404, description = "Channel not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateChannel"
)]
#[patch("/channels/{id}")]
pub async fn update_channel(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<web::Json<Channel>> {
    let id: ChannelId = parse_id(&path, ID)?;
    let status: ChannelStatus = parse_value(&payload.status, STATUS)?;
    let channel = state.catalogue.set_channel_status(id, status).await?;
    info!(channel = %id, %status, "channel status changed");
    Ok(web::Json(channel))
}

/// Videos.
#[utoipa::path(
    get,
    path = "/api/admin/videos",
    params(ListingParams),
    responses(
        (status = 200, description = "Page of videos", body = VideoPageSchema),
        (status = 400, description = "Invalid listing parameters", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListVideos"
)]
#[get("/videos")]
pub async fn list_videos(
    state: web::Data<HttpState>,
    params: web::Query<ListingParams>,
) -> ApiResult<web::Json<Page<Video>>> {
    let query: VideoQuery = params.into_inner().into_query()?;
    Ok(web::Json(state.catalogue.list_videos(query).await?))
}

/// Publish, unlist or remove a video.
#[utoipa::path(
    patch,
    path = "/api/admin/videos/{id}",
    params(("id" = String, Path, description = "Video id")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Updated video", body = VideoSchema),
        (status = 400, description = "Invalid status", body = ErrorSchema),
        (status = 404, description = "Video not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateVideo"
)]
#[patch("/videos/{id}")]
pub async fn update_video(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<web::Json<Video>> {
    let id: VideoId = parse_id(&path, ID)?;
    let status: VideoStatus = parse_value(&payload.status, STATUS)?;
    let video = state.catalogue.set_video_status(id, status).await?;
    info!(video = %id, %status, "video status changed");
    Ok(web::Json(video))
}

/// Platform totals and moderation queue sizes.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Dashboard figures", body = DashboardStatsSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminStats"
)]
#[get("/stats")]
pub async fn stats(state: web::Data<HttpState>) -> ApiResult<web::Json<DashboardStats>> {
    Ok(web::Json(state.catalogue.dashboard().await?))
}

/// Credit completed revenue to a creator.
#[utoipa::path(
    post,
    path = "/api/admin/monetization/revenue",
    request_body = RevenueRequest,
    responses(
        (status = 201, description = "Revenue recorded", body = LedgerTransactionSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminRecordRevenue"
)]
#[post("/monetization/revenue")]
pub async fn record_revenue(
    state: web::Data<HttpState>,
    payload: web::Json<RevenueRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let user: UserId = parse_id(&body.user_id, FieldName::new("userId"))?;
    let draft = RevenueDraft::new(user, body.amount_cents, body.description.as_deref())
        .map_err(|err| {
            field_error(
                FieldName::new("amountCents"),
                ValidationCode::OutOfRange,
                err.to_string(),
            )
        })?;
    let row: LedgerTransaction = state.payouts.record_revenue(draft).await?;
    info!(%user, amount_cents = row.amount_cents, "revenue recorded");
    Ok(HttpResponse::Created().json(row))
}

/// Settle a pending payout as `COMPLETED` or `FAILED`.
#[utoipa::path(
    patch,
    path = "/api/admin/monetization/payouts/{id}",
    params(("id" = String, Path, description = "Payout transaction id")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Settled payout", body = LedgerTransactionSchema),
        (status = 400, description = "Invalid status or already settled", body = ErrorSchema),
        (status = 404, description = "Payout not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminSettlePayout"
)]
#[patch("/monetization/payouts/{id}")]
pub async fn settle_payout(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<web::Json<LedgerTransaction>> {
    let id: TransactionId = parse_id(&path, ID)?;
    let status: TransactionStatus = parse_value(&payload.status, STATUS)?;
    let row = state.payouts.settle_payout(id, status).await?;
    info!(payout = %id, status = status.as_str(), "payout settled");
    Ok(web::Json(row))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
