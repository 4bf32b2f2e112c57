//! Public support forms: copyright claims and the contact form.
//!
//! ```text
//! POST /api/copyright/claims {"videoId":"...","claimantName":"...","claimantEmail":"...","description":"..."}
//! POST /api/contact {"name":"...","email":"...","subject":"...","message":"..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{ContactDraft, CopyrightClaimDraft, VideoId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guard::CurrentUser;
use crate::inbound::http::schemas::{CopyrightClaimSchema, ContactSubmissionSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, moderation_error, parse_id};

/// Copyright claim body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub video_id: String,
    pub claimant_name: String,
    pub claimant_email: String,
    pub description: String,
}

/// Contact form body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// File a copyright claim against a video.
#[utoipa::path(
    post,
    path = "/api/copyright/claims",
    request_body = ClaimRequest,
    responses(
        (status = 201, description = "Claim filed", body = CopyrightClaimSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Video not found", body = ErrorSchema)
    ),
    tags = ["support"],
    operation_id = "submitCopyrightClaim"
)]
#[post("/copyright/claims")]
pub async fn submit_claim(
    state: web::Data<HttpState>,
    CurrentUser(caller): CurrentUser,
    payload: web::Json<ClaimRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let video: VideoId = parse_id(&body.video_id, FieldName::new("videoId"))?;
    let draft = CopyrightClaimDraft::new(
        caller.user_id(),
        video,
        &body.claimant_name,
        &body.claimant_email,
        &body.description,
    )
    .map_err(|err| moderation_error(&err))?;
    let claim = state.moderation.submit_claim(draft).await?;
    Ok(HttpResponse::Created().json(claim))
}

/// Send a message to the site operators.
#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Submission received", body = ContactSubmissionSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["support"],
    operation_id = "submitContact",
    security([])
)]
#[post("/contact")]
pub async fn submit_contact(
    state: web::Data<HttpState>,
    payload: web::Json<ContactRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let draft = ContactDraft::new(&body.name, &body.email, &body.subject, &body.message)
        .map_err(|err| moderation_error(&err))?;
    let submission = state.moderation.submit_contact(draft).await?;
    Ok(HttpResponse::Created().json(submission))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{login_cookie, seeded_state, test_app};
    use crate::outbound::memory::SEED_VIDEO_IDS;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn contact(overrides: Value) -> Value {
        let mut body = json!({
            "name": "Ada",
            "email": "ada@example.com",
            "subject": "Hello",
            "message": "Lovely site",
        });
        if let (Some(target), Some(patch)) = (body.as_object_mut(), overrides.as_object()) {
            target.extend(patch.clone());
        }
        body
    }

    #[actix_web::test]
    async fn contact_form_is_public() {
        let app = test::init_service(test_app(seeded_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/contact")
                .set_json(contact(json!({})))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "PENDING");
        assert_eq!(body["subject"], "Hello");
    }

    #[rstest]
    #[case(json!({ "email": "not-an-email" }), "email", "invalid_email")]
    #[case(json!({ "subject": "   " }), "subject", "empty")]
    #[case(json!({ "name": "" }), "name", "empty")]
    #[actix_web::test]
    async fn invalid_contact_fields_are_named(
        #[case] overrides: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = test::init_service(test_app(seeded_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/contact")
                .set_json(contact(overrides))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn claims_are_filed_against_existing_videos() {
        let app = test::init_service(test_app(seeded_state())).await;
        let cookie = login_cookie(&app, "creator").await;
        let claim = |video: String| {
            test::TestRequest::post()
                .uri("/api/copyright/claims")
                .cookie(cookie.clone())
                .set_json(json!({
                    "videoId": video,
                    "claimantName": "Rights Holder",
                    "claimantEmail": "legal@example.com",
                    "description": "Uses my footage",
                }))
                .to_request()
        };

        let res = test::call_service(&app, claim(SEED_VIDEO_IDS[0].to_string())).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["videoTitle"], "Welcome to vidhub");
        assert_eq!(body["status"], "PENDING");

        let missing = test::call_service(&app, claim(VideoId::random().to_string())).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn claims_require_a_session() {
        let app = test::init_service(test_app(seeded_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/copyright/claims")
                .set_json(json!({
                    "videoId": SEED_VIDEO_IDS[0].to_string(),
                    "claimantName": "x",
                    "claimantEmail": "x@example.com",
                    "description": "x",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
