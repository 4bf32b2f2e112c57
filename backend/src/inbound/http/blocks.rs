//! The caller's block list.
//!
//! ```text
//! GET /api/user/blocked-users
//! POST /api/user/blocked-users {"userId":"..."}
//! DELETE /api/user/blocked-users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{BlockId, BlockRecord, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guard::CurrentUser;
use crate::inbound::http::schemas::{BlockRecordSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Block request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockRequest {
    /// User to block.
    pub user_id: String,
}

/// Users the caller has blocked, newest first.
#[utoipa::path(
    get,
    path = "/api/user/blocked-users",
    responses(
        (status = 200, description = "Blocks", body = [BlockRecordSchema]),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["blocks"],
    operation_id = "listBlocks"
)]
#[get("/user/blocked-users")]
pub async fn list_blocks(
    state: web::Data<HttpState>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<web::Json<Vec<BlockRecord>>> {
    Ok(web::Json(state.blocks.list(caller.user_id()).await?))
}

/// Block another user.
#[utoipa::path(
    post,
    path = "/api/user/blocked-users",
    request_body = BlockRequest,
    responses(
        (status = 201, description = "Block created", body = BlockRecordSchema),
        (status = 400, description = "Self-block, duplicate or invalid id", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["blocks"],
    operation_id = "blockUser"
)]
#[post("/user/blocked-users")]
pub async fn block_user(
    state: web::Data<HttpState>,
    CurrentUser(caller): CurrentUser,
    payload: web::Json<BlockRequest>,
) -> ApiResult<HttpResponse> {
    let target: UserId = parse_id(&payload.user_id, FieldName::new("userId"))?;
    let record = state.blocks.block(caller.user_id(), target).await?;
    Ok(HttpResponse::Created().json(record))
}

/// Remove one of the caller's blocks.
///
/// Blocks belong to the user who created them; anyone else gets `403`.
#[utoipa::path(
    delete,
    path = "/api/user/blocked-users/{id}",
    params(("id" = String, Path, description = "Block id")),
    responses(
        (status = 204, description = "Block removed"),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Block owned by another user", body = ErrorSchema),
        (status = 404, description = "Block not found", body = ErrorSchema)
    ),
    tags = ["blocks"],
    operation_id = "unblockUser"
)]
#[delete("/user/blocked-users/{id}")]
pub async fn unblock_user(
    state: web::Data<HttpState>,
    CurrentUser(caller): CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: BlockId = parse_id(&path, FieldName::new("id"))?;
    state.blocks.unblock(caller, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DUPLICATE_BLOCK_MESSAGE;
    use crate::inbound::http::test_utils::{login_cookie, seeded_state, test_app};
    use crate::outbound::memory::{SEED_CREATOR_ID, SEED_VIEWER_ID};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    fn block_request(target: UserId, cookie: Cookie<'static>) -> actix_http::Request {
        test::TestRequest::post()
            .uri("/api/user/blocked-users")
            .cookie(cookie)
            .set_json(json!({ "userId": target.to_string() }))
            .to_request()
    }

    #[actix_web::test]
    async fn blocks_are_listed_for_their_owner() {
        let app = test::init_service(test_app(seeded_state())).await;
        let cookie = login_cookie(&app, "viewer").await;

        let created = test::call_service(&app, block_request(SEED_CREATOR_ID, cookie.clone())).await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let record: Value = test::read_body_json(created).await;
        assert_eq!(record["blockedDisplayName"], "Demo Creator");

        let listed: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/user/blocked-users")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(listed.as_array().map(Vec::len), Some(1));
        assert_eq!(listed[0]["id"], record["id"]);
    }

    #[actix_web::test]
    async fn self_and_duplicate_blocks_are_rejected() {
        let app = test::init_service(test_app(seeded_state())).await;
        let cookie = login_cookie(&app, "viewer").await;

        let own = test::call_service(&app, block_request(SEED_VIEWER_ID, cookie.clone())).await;
        assert_eq!(own.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(own).await;
        assert_eq!(body["error"], "You cannot block yourself");

        let _ = test::call_service(&app, block_request(SEED_CREATOR_ID, cookie.clone())).await;
        let again = test::call_service(&app, block_request(SEED_CREATOR_ID, cookie)).await;
        assert_eq!(again.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(again).await;
        assert_eq!(body["error"], DUPLICATE_BLOCK_MESSAGE);
    }

    #[actix_web::test]
    async fn blocking_an_unknown_user_is_not_found() {
        let app = test::init_service(test_app(seeded_state())).await;
        let cookie = login_cookie(&app, "viewer").await;
        let res = test::call_service(&app, block_request(UserId::random(), cookie)).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn only_the_owner_may_remove_a_block() {
        let app = test::init_service(test_app(seeded_state())).await;
        let owner = login_cookie(&app, "viewer").await;
        let other = login_cookie(&app, "admin").await;
        let record: Value =
            test::call_and_read_body_json(&app, block_request(SEED_CREATOR_ID, owner.clone()))
                .await;
        let uri = format!(
            "/api/user/blocked-users/{}",
            record["id"].as_str().expect("block id")
        );

        let denied = test::call_service(
            &app,
            test::TestRequest::delete().uri(&uri).cookie(other).to_request(),
        )
        .await;
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);

        let removed = test::call_service(
            &app,
            test::TestRequest::delete().uri(&uri).cookie(owner.clone()).to_request(),
        )
        .await;
        assert_eq!(removed.status(), StatusCode::NO_CONTENT);

        let gone = test::call_service(
            &app,
            test::TestRequest::delete().uri(&uri).cookie(owner).to_request(),
        )
        .await;
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn block_routes_require_a_session() {
        let app = test::init_service(test_app(seeded_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/user/blocked-users")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
