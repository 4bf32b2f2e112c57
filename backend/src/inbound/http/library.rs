//! Watch-later queue and watch history for the signed-in caller.
//!
//! ```text
//! GET /api/user/watch-later
//! GET /api/user/history
//! DELETE /api/user/history
//! ```

use actix_web::{delete, get, web};
use serde::Serialize;

use crate::domain::{WatchHistoryEntry, WatchLaterEntry};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guard::CurrentUser;
use crate::inbound::http::schemas::{ErrorSchema, WatchHistoryEntrySchema, WatchLaterEntrySchema};
use crate::inbound::http::state::HttpState;

/// Result of clearing the history.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearHistoryResponse {
    /// Number of entries removed.
    pub removed: u64,
}

/// Videos queued for later, newest first.
#[utoipa::path(
    get,
    path = "/api/user/watch-later",
    responses(
        (status = 200, description = "Watch-later queue", body = [WatchLaterEntrySchema]),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "listWatchLater"
)]
#[get("/user/watch-later")]
pub async fn list_watch_later(
    state: web::Data<HttpState>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<web::Json<Vec<WatchLaterEntry>>> {
    Ok(web::Json(state.library.watch_later(caller.user_id()).await?))
}

/// Watched videos, most recently watched first.
#[utoipa::path(
    get,
    path = "/api/user/history",
    responses(
        (status = 200, description = "Watch history", body = [WatchHistoryEntrySchema]),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "listHistory"
)]
#[get("/user/history")]
pub async fn list_history(
    state: web::Data<HttpState>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<web::Json<Vec<WatchHistoryEntry>>> {
    Ok(web::Json(state.library.history(caller.user_id()).await?))
}

/// Forget the caller's watch history.
#[utoipa::path(
    delete,
    path = "/api/user/history",
    responses(
        (status = 200, description = "History cleared", body = ClearHistoryResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "clearHistory"
)]
#[delete("/user/history")]
pub async fn clear_history(
    state: web::Data<HttpState>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<web::Json<ClearHistoryResponse>> {
    let removed = state.library.clear_history(caller.user_id()).await?;
    Ok(web::Json(ClearHistoryResponse { removed }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{login_cookie, seeded_state, test_app};
    use crate::outbound::memory::SEED_VIDEO_IDS;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::Value;

    #[actix_web::test]
    async fn counted_views_appear_in_history_until_cleared() {
        let app = test::init_service(test_app(seeded_state())).await;
        let cookie = login_cookie(&app, "viewer").await;
        for video in &SEED_VIDEO_IDS[..2] {
            let res = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri(&format!("/api/videos/{video}/view"))
                    .cookie(cookie.clone())
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::OK);
        }

        let history: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/user/history")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(history.as_array().map(Vec::len), Some(2));
        assert!(history[0]["watchedAt"].is_string());

        let cleared: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::delete()
                .uri("/api/user/history")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(cleared["removed"], 2);

        let history: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/user/history")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(history.as_array().map(Vec::len), Some(0));
    }

    #[actix_web::test]
    async fn queued_videos_are_listed() {
        let app = test::init_service(test_app(seeded_state())).await;
        let cookie = login_cookie(&app, "creator").await;
        let video = SEED_VIDEO_IDS[2];
        let _ = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/videos/{video}/watch-later"))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;

        let queue: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/user/watch-later")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(queue[0]["video"]["id"], video.to_string());
        assert_eq!(queue[0]["video"]["title"], "Night sky timelapse");
    }

    #[actix_web::test]
    async fn library_requires_a_session() {
        let app = test::init_service(test_app(seeded_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/user/watch-later").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
