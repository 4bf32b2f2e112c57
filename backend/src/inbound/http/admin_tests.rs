//! Tests for the administrator routes.

use super::*;
use crate::inbound::http::test_utils::{login_cookie, seeded_state, test_app};
use crate::outbound::memory::{SEED_CHANNEL_ID, SEED_CREATOR_ID, SEED_VIDEO_IDS};
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

fn get(uri: &str, cookie: &Cookie<'static>) -> actix_http::Request {
    test::TestRequest::get()
        .uri(uri)
        .cookie(cookie.clone())
        .to_request()
}

fn patch_status(uri: &str, status: &str, cookie: &Cookie<'static>) -> actix_http::Request {
    test::TestRequest::patch()
        .uri(uri)
        .cookie(cookie.clone())
        .set_json(json!({ "status": status }))
        .to_request()
}

fn titles(page: &Value) -> Vec<&str> {
    page["items"]
        .as_array()
        .map(|items| items.iter().filter_map(|v| v["title"].as_str()).collect())
        .unwrap_or_default()
}

#[rstest]
#[case("/api/admin/flags")]
#[case("/api/admin/copyright/claims")]
#[case("/api/admin/contact")]
#[case("/api/admin/channels")]
#[case("/api/admin/videos")]
#[case("/api/admin/stats")]
#[actix_web::test]
async fn admin_routes_reject_other_callers(#[case] uri: &str) {
    let app = test::init_service(test_app(seeded_state())).await;

    let anonymous =
        test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let viewer = login_cookie(&app, "viewer").await;
    let res = test::call_service(&app, get(uri, &viewer)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "Forbidden");
}

#[actix_web::test]
async fn flags_move_through_review_states() {
    let app = test::init_service(test_app(seeded_state())).await;
    let viewer = login_cookie(&app, "viewer").await;
    let admin = login_cookie(&app, "admin").await;
    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/videos/{}/flag", SEED_VIDEO_IDS[1]))
            .cookie(viewer)
            .set_json(json!({ "reason": "HARASSMENT" }))
            .to_request(),
    )
    .await;
    let flag_id = created["id"].as_str().expect("flag id").to_owned();

    let pending: Value =
        test::call_and_read_body_json(&app, get("/api/admin/flags?status=PENDING", &admin)).await;
    assert_eq!(pending["total"], 1);
    assert_eq!(pending["items"][0]["videoTitle"], "Cooking with cats");

    let updated: Value = test::call_and_read_body_json(
        &app,
        patch_status(&format!("/api/admin/flags/{flag_id}"), "RESOLVED", &admin),
    )
    .await;
    assert_eq!(updated["status"], "RESOLVED");

    let pending: Value =
        test::call_and_read_body_json(&app, get("/api/admin/flags?status=PENDING", &admin)).await;
    assert_eq!(pending["total"], 0);
    let resolved: Value =
        test::call_and_read_body_json(&app, get("/api/admin/flags?status=resolved", &admin)).await;
    assert_eq!(resolved["total"], 1);
}

#[rstest]
#[case("/api/admin/videos?limit=0", "limit")]
#[case("/api/admin/videos?limit=101", "limit")]
#[case("/api/admin/videos?page=0", "page")]
#[case("/api/admin/videos?sort=owner", "sort")]
#[case("/api/admin/videos?order=random", "order")]
#[case("/api/admin/channels?status=PENDING", "status")]
#[actix_web::test]
async fn invalid_listing_parameters_are_rejected(#[case] uri: &str, #[case] field: &str) {
    let app = test::init_service(test_app(seeded_state())).await;
    let admin = login_cookie(&app, "admin").await;
    let res = test::call_service(&app, get(uri, &admin)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn videos_are_sorted_searched_and_paged() {
    let app = test::init_service(test_app(seeded_state())).await;
    let admin = login_cookie(&app, "admin").await;

    let sorted: Value = test::call_and_read_body_json(
        &app,
        get("/api/admin/videos?sort=title&order=asc", &admin),
    )
    .await;
    assert_eq!(
        titles(&sorted),
        ["Cooking with cats", "Night sky timelapse", "Welcome to vidhub"]
    );

    let newest: Value = test::call_and_read_body_json(&app, get("/api/admin/videos", &admin)).await;
    assert_eq!(titles(&newest)[0], "Night sky timelapse");

    let searched: Value =
        test::call_and_read_body_json(&app, get("/api/admin/videos?search=CATS", &admin)).await;
    assert_eq!(titles(&searched), ["Cooking with cats"]);
    assert_eq!(searched["total"], 1);

    let paged: Value = test::call_and_read_body_json(
        &app,
        get("/api/admin/videos?limit=2&page=2", &admin),
    )
    .await;
    assert_eq!(paged["page"], 2);
    assert_eq!(paged["limit"], 2);
    assert_eq!(paged["total"], 3);
    assert_eq!(paged["totalPages"], 2);
    assert_eq!(titles(&paged).len(), 1);
}

#[actix_web::test]
async fn catalogue_statuses_can_be_changed() {
    let app = test::init_service(test_app(seeded_state())).await;
    let admin = login_cookie(&app, "admin").await;

    let channel: Value = test::call_and_read_body_json(
        &app,
        patch_status(
            &format!("/api/admin/channels/{SEED_CHANNEL_ID}"),
            "SUSPENDED",
            &admin,
        ),
    )
    .await;
    assert_eq!(channel["status"], "SUSPENDED");

    let video: Value = test::call_and_read_body_json(
        &app,
        patch_status(
            &format!("/api/admin/videos/{}", SEED_VIDEO_IDS[0]),
            "UNLISTED",
            &admin,
        ),
    )
    .await;
    assert_eq!(video["status"], "UNLISTED");

    let unlisted: Value = test::call_and_read_body_json(
        &app,
        get("/api/admin/videos?status=UNLISTED", &admin),
    )
    .await;
    assert_eq!(unlisted["total"], 1);
}

#[rstest]
#[case("/api/admin/videos/00000000-0000-0000-0000-000000001001", "DELETED", StatusCode::BAD_REQUEST)]
#[case("/api/admin/videos/00000000-0000-0000-0000-00000000ffff", "REMOVED", StatusCode::NOT_FOUND)]
#[case("/api/admin/channels/not-a-uuid", "ACTIVE", StatusCode::BAD_REQUEST)]
#[case("/api/admin/flags/00000000-0000-0000-0000-00000000ffff", "RESOLVED", StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn bad_status_updates_are_rejected(
    #[case] uri: &str,
    #[case] status: &str,
    #[case] expected: StatusCode,
) {
    let app = test::init_service(test_app(seeded_state())).await;
    let admin = login_cookie(&app, "admin").await;
    let res = test::call_service(&app, patch_status(uri, status, &admin)).await;
    assert_eq!(res.status(), expected);
}

#[actix_web::test]
async fn contact_submissions_are_listed_and_reviewed() {
    let app = test::init_service(test_app(seeded_state())).await;
    let admin = login_cookie(&app, "admin").await;
    for subject in ["Billing question", "Bug report"] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/contact")
                .set_json(json!({
                    "name": "Ada",
                    "email": "ada@example.com",
                    "subject": subject,
                    "message": "Hello",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let listed: Value = test::call_and_read_body_json(
        &app,
        get("/api/admin/contact?search=bug", &admin),
    )
    .await;
    assert_eq!(listed["total"], 1);
    let id = listed["items"][0]["id"].as_str().expect("id").to_owned();

    let updated: Value = test::call_and_read_body_json(
        &app,
        patch_status(&format!("/api/admin/contact/{id}"), "IN_PROGRESS", &admin),
    )
    .await;
    assert_eq!(updated["status"], "IN_PROGRESS");
}

#[actix_web::test]
async fn stats_count_catalogue_and_queues() {
    let app = test::init_service(test_app(seeded_state())).await;
    let viewer = login_cookie(&app, "viewer").await;
    let admin = login_cookie(&app, "admin").await;
    let _ = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/videos/{}/flag", SEED_VIDEO_IDS[0]))
            .cookie(viewer)
            .set_json(json!({ "reason": "SPAM" }))
            .to_request(),
    )
    .await;

    let dashboard: Value = test::call_and_read_body_json(&app, get("/api/admin/stats", &admin)).await;
    assert_eq!(dashboard["totals"]["users"], 3);
    assert_eq!(dashboard["totals"]["channels"], 1);
    assert_eq!(dashboard["totals"]["videos"], 3);
    assert_eq!(dashboard["flags"]["pending"], 1);
    assert_eq!(dashboard["copyrightClaims"]["pending"], 0);
}

#[actix_web::test]
async fn revenue_and_payout_settlement_round_trip() {
    let app = test::init_service(test_app(seeded_state())).await;
    let admin = login_cookie(&app, "admin").await;
    let creator = login_cookie(&app, "creator").await;

    let credited = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/monetization/revenue")
            .cookie(admin.clone())
            .set_json(json!({
                "userId": SEED_CREATOR_ID.to_string(),
                "amountCents": 5_000,
                "description": "Sponsorship",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(credited.status(), StatusCode::CREATED);

    let payout: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/monetization/payout")
            .cookie(creator.clone())
            .set_json(json!({ "amountCents": 30_000 }))
            .to_request(),
    )
    .await;
    assert_eq!(payout["status"], "PENDING");
    let uri = format!(
        "/api/admin/monetization/payouts/{}",
        payout["id"].as_str().expect("payout id")
    );

    let still_pending = test::call_service(&app, patch_status(&uri, "PENDING", &admin)).await;
    assert_eq!(still_pending.status(), StatusCode::BAD_REQUEST);

    let settled: Value =
        test::call_and_read_body_json(&app, patch_status(&uri, "COMPLETED", &admin)).await;
    assert_eq!(settled["status"], "COMPLETED");

    let again = test::call_service(&app, patch_status(&uri, "FAILED", &admin)).await;
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);

    let summary: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/monetization/payout")
            .cookie(creator)
            .to_request(),
    )
    .await;
    assert_eq!(summary["availableCents"], 0);
    assert_eq!(summary["pendingPayoutCents"], 0);
}

#[rstest]
#[case(json!({ "userId": "nope", "amountCents": 100 }), StatusCode::BAD_REQUEST)]
#[case(json!({ "userId": "00000000-0000-0000-0000-000000000002", "amountCents": 0 }), StatusCode::BAD_REQUEST)]
#[case(json!({ "userId": "00000000-0000-0000-0000-00000000ffff", "amountCents": 100 }), StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn invalid_revenue_is_rejected(#[case] body: Value, #[case] expected: StatusCode) {
    let app = test::init_service(test_app(seeded_state())).await;
    let admin = login_cookie(&app, "admin").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/monetization/revenue")
            .cookie(admin)
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), expected);
}
