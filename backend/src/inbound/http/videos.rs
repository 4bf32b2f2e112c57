//! Per-video engagement: votes, views, flags and the watch-later toggle.
//!
//! ```text
//! POST /api/videos/{id}/like {"type":"LIKE"}
//! POST /api/videos/{id}/view
//! POST /api/videos/{id}/flag {"reason":"SPAM","comment":"..."}
//! POST /api/videos/{id}/watch-later
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    FlagDraft, FlagReason, FlagRecord, VideoId, VoteKind, VoteOutcome, WatchLaterToggle,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guard::CurrentUser;
use crate::inbound::http::schemas::{
    ErrorSchema, FlagRecordSchema, VoteOutcomeSchema, WatchLaterToggleSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, moderation_error, parse_id, parse_value};
use crate::inbound::http::view_cookie::viewed_videos_cookie;

const VIDEO_ID: FieldName = FieldName::new("videoId");

/// Vote request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct VoteRequest {
    /// `LIKE` or `DISLIKE`.
    #[serde(rename = "type")]
    #[schema(example = "LIKE")]
    pub kind: String,
}

/// Flag request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct FlagRequest {
    #[schema(example = "SPAM")]
    pub reason: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Result of a view request.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    #[schema(value_type = String, format = Uuid)]
    pub video_id: VideoId,
    /// Whether this request incremented the counters.
    pub counted: bool,
    /// View count after the increment; absent for repeat views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    /// `"already viewed"` for repeat views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Toggle the caller's vote on a video.
///
/// Same kind twice removes the vote; the opposite kind switches it.
#[utoipa::path(
    post,
    path = "/api/videos/{id}/like",
    params(("id" = String, Path, description = "Video id")),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Vote after the toggle", body = VoteOutcomeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Video not found", body = ErrorSchema)
    ),
    tags = ["videos"],
    operation_id = "voteVideo"
)]
#[post("/videos/{id}/like")]
pub async fn like(
    state: web::Data<HttpState>,
    CurrentUser(caller): CurrentUser,
    path: web::Path<String>,
    payload: web::Json<VoteRequest>,
) -> ApiResult<web::Json<VoteOutcome>> {
    let video: VideoId = parse_id(&path, VIDEO_ID)?;
    let kind: VoteKind = parse_value(&payload.kind, FieldName::new("type"))?;
    let outcome = state.votes.vote(caller.user_id(), video, kind).await?;
    Ok(web::Json(outcome))
}

/// Count a view unless the viewer saw the video within the dedupe window.
///
/// Always reissues the `viewed_videos` cookie.
#[utoipa::path(
    post,
    path = "/api/videos/{id}/view",
    params(("id" = String, Path, description = "Video id")),
    responses(
        (status = 200, description = "View recorded or recognised as a repeat", body = ViewResponse,
            headers(("Set-Cookie" = String, description = "viewed_videos mirror cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Video not found", body = ErrorSchema)
    ),
    tags = ["videos"],
    operation_id = "viewVideo",
    security([])
)]
#[post("/videos/{id}/view")]
pub async fn view(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let video: VideoId = parse_id(&path, VIDEO_ID)?;
    let viewer = session.viewer_key()?;
    let outcome = state.views.record_view(viewer, video).await?;
    let body = ViewResponse {
        video_id: outcome.video_id,
        counted: outcome.counted,
        view_count: outcome.views,
        message: (!outcome.counted).then(|| "already viewed".to_owned()),
    };
    Ok(HttpResponse::Ok()
        .cookie(viewed_videos_cookie(&outcome.recent, outcome.expires_in))
        .json(body))
}

/// Flag a video for review.
///
/// A reporter may hold one pending flag per video.
#[utoipa::path(
    post,
    path = "/api/videos/{id}/flag",
    params(("id" = String, Path, description = "Video id")),
    request_body = FlagRequest,
    responses(
        (status = 201, description = "Flag created", body = FlagRecordSchema),
        (status = 400, description = "Invalid request or duplicate flag", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Video not found", body = ErrorSchema)
    ),
    tags = ["videos"],
    operation_id = "flagVideo"
)]
#[post("/videos/{id}/flag")]
pub async fn flag(
    state: web::Data<HttpState>,
    CurrentUser(caller): CurrentUser,
    path: web::Path<String>,
    payload: web::Json<FlagRequest>,
) -> ApiResult<HttpResponse> {
    let video: VideoId = parse_id(&path, VIDEO_ID)?;
    let FlagRequest { reason, comment } = payload.into_inner();
    let reason: FlagReason = reason.parse().map_err(|err| moderation_error(&err))?;
    let draft = FlagDraft::new(caller.user_id(), video, reason, comment.as_deref())
        .map_err(|err| moderation_error(&err))?;
    let record: FlagRecord = state.moderation.flag_video(draft).await?;
    Ok(HttpResponse::Created().json(record))
}

/// Add or remove a video from the caller's watch-later queue.
#[utoipa::path(
    post,
    path = "/api/videos/{id}/watch-later",
    params(("id" = String, Path, description = "Video id")),
    responses(
        (status = 200, description = "Queue membership after the toggle", body = WatchLaterToggleSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Video not found", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "toggleWatchLater"
)]
#[post("/videos/{id}/watch-later")]
pub async fn toggle_watch_later(
    state: web::Data<HttpState>,
    CurrentUser(caller): CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<WatchLaterToggle>> {
    let video: VideoId = parse_id(&path, VIDEO_ID)?;
    let toggle = state
        .library
        .toggle_watch_later(caller.user_id(), video)
        .await?;
    Ok(web::Json(toggle))
}

#[cfg(test)]
#[path = "videos_tests.rs"]
mod tests;
