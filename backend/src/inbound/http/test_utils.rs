//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use mockable::{Clock, DefaultClock};
use serde_json::json;

use crate::domain::{
    AccountService, BlockService, CatalogueAdminService, DEFAULT_PAYOUT_MINIMUM_CENTS,
    LibraryService, ModerationService, PayoutPolicy, PayoutService, ViewDedupePolicy,
    ViewService, VoteService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::dedupe::DashMapViewDedupeStore;
use crate::outbound::memory::InMemoryStore;

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation and disables the `Secure` flag for
/// plain HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set on a response.
///
/// # Panics
/// Panics when the response did not set one.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// The full `/api` surface over `state`, with a test session middleware.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .configure(crate::inbound::http::configure)
}

/// Sign in as a seeded user and return the session cookie.
///
/// Seeded accounts are `admin`, `creator` and `viewer`, all with the
/// password `password`.
pub async fn login_cookie<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "username": username, "password": "password" }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "seeded login failed for {username}");
    session_cookie(&res)
}

/// HTTP state wired to services over a seeded in-memory store.
pub fn seeded_state() -> HttpState {
    seeded_state_with_view_policy(ViewDedupePolicy::default())
}

/// [`seeded_state`] with explicit view dedupe bounds.
pub fn seeded_state_with_view_policy(policy: ViewDedupePolicy) -> HttpState {
    let store = Arc::new(InMemoryStore::seeded());
    let dedupe = Arc::new(DashMapViewDedupeStore::new(policy));
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
        payouts: Arc::new(PayoutService::new(
            store,
            PayoutPolicy::new(DEFAULT_PAYOUT_MINIMUM_CENTS),
        )),
    }
}
