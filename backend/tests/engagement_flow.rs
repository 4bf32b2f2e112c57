//! End-to-end flows over the public HTTP surface and the seeded store.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use mockable::{Clock, DefaultClock};
use rstest::rstest;
use serde_json::{Value, json};

use vidhub::Trace;
use vidhub::domain::{
    AccountService, BlockService, CatalogueAdminService, LibraryService, ModerationService,
    PayoutPolicy, PayoutService, ViewDedupePolicy, ViewService, VoteService,
};
use vidhub::inbound::http::configure;
use vidhub::inbound::http::state::HttpState;
use vidhub::outbound::dedupe::DashMapViewDedupeStore;
use vidhub::outbound::memory::{InMemoryStore, SEED_CREATOR_ID, SEED_VIDEO_IDS};

fn seeded_state() -> HttpState {
    let store = Arc::new(InMemoryStore::seeded());
    let dedupe = Arc::new(DashMapViewDedupeStore::new(ViewDedupePolicy::default()));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let accounts = Arc::new(AccountService::new(store.clone()));
    let moderation = Arc::new(ModerationService::new(store.clone()));

    HttpState {
        login: accounts.clone(),
        profile: accounts,
        votes: Arc::new(VoteService::new(store.clone())),
        views: Arc::new(ViewService::new(
            store.clone(),
            dedupe,
            store.clone(),
            clock.clone(),
        )),
        library: Arc::new(LibraryService::new(store.clone(), clock)),
        blocks: Arc::new(BlockService::new(store.clone())),
        moderation: moderation.clone(),
        moderation_query: moderation,
        catalogue: Arc::new(CatalogueAdminService::new(store.clone(), store.clone())),
        payouts: Arc::new(PayoutService::new(store, PayoutPolicy::default())),
    }
}

macro_rules! init_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(seeded_state()))
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_name("session".to_owned())
                        .cookie_secure(false)
                        .build(),
                )
                .wrap(Trace)
                .configure(configure),
        )
        .await
    };
}

async fn login<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "username": username, "password": "password" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

#[rstest]
#[actix_rt::test]
async fn flagged_video_moves_through_moderation_and_stats() {
    let app = init_app!();
    let viewer = login(&app, "viewer").await;
    let admin = login(&app, "admin").await;
    let video = SEED_VIDEO_IDS[2];

    let flagged = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/videos/{video}/flag"))
            .cookie(viewer)
            .set_json(json!({ "reason": "SPAM", "comment": "Link farm" }))
            .to_request(),
    )
    .await;
    assert_eq!(flagged.status(), StatusCode::CREATED);
    let flag: Value = test::read_body_json(flagged).await;

    let pending: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/admin/stats")
            .cookie(admin.clone())
            .to_request(),
    )
    .await;
    assert_eq!(pending["flags"]["pending"], 1);

    let resolved: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::patch()
            .uri(&format!(
                "/api/admin/flags/{}",
                flag["id"].as_str().expect("flag id")
            ))
            .cookie(admin.clone())
            .set_json(json!({ "status": "RESOLVED" }))
            .to_request(),
    )
    .await;
    assert_eq!(resolved["status"], "RESOLVED");

    let after: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/admin/stats")
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(after["flags"]["pending"], 0);
    assert_eq!(after["flags"]["resolved"], 1);
}

#[rstest]
#[actix_rt::test]
async fn counted_views_reach_history_and_admin_listing() {
    let app = init_app!();
    let viewer = login(&app, "viewer").await;
    let admin = login(&app, "admin").await;
    let video = SEED_VIDEO_IDS[0];

    for _ in 0..2 {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/videos/{video}/view"))
                .cookie(viewer.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let history: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/user/history")
            .cookie(viewer)
            .to_request(),
    )
    .await;
    assert_eq!(history.as_array().map(Vec::len), Some(1));

    let videos: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/admin/videos?search=welcome")
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(videos["total"], 1);
    assert_eq!(videos["items"][0]["counters"]["views"], 1);
}

#[rstest]
#[actix_rt::test]
async fn blocked_creator_cannot_be_unblocked_by_someone_else() {
    let app = init_app!();
    let viewer = login(&app, "viewer").await;
    let creator = login(&app, "creator").await;

    let blocked = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/user/blocked-users")
            .cookie(viewer.clone())
            .set_json(json!({ "userId": SEED_CREATOR_ID.to_string() }))
            .to_request(),
    )
    .await;
    assert_eq!(blocked.status(), StatusCode::CREATED);
    let record: Value = test::read_body_json(blocked).await;
    let uri = format!(
        "/api/user/blocked-users/{}",
        record["id"].as_str().expect("block id")
    );

    let foreign = test::call_service(
        &app,
        test::TestRequest::delete().uri(&uri).cookie(creator).to_request(),
    )
    .await;
    assert_eq!(foreign.status(), StatusCode::FORBIDDEN);
    assert!(foreign.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(foreign).await;
    assert!(body["error"].is_string());

    let own = test::call_service(
        &app,
        test::TestRequest::delete().uri(&uri).cookie(viewer).to_request(),
    )
    .await;
    assert_eq!(own.status(), StatusCode::NO_CONTENT);
}
