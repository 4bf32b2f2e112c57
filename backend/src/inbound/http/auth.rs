//! Session login, logout and the current user.
//!
//! ```text
//! POST /api/login {"username":"viewer","password":"password"}
//! POST /api/logout
//! GET /api/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{Error, LoginCredentials, LoginValidationError, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guard::CurrentUser;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty" })),
    }
}

/// Authenticate and start a session.
///
/// The session id is rotated and the cookie carries the user id and role.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = UserSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<User>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let principal = state.login.authenticate(&credentials).await?;
    session.persist_principal(&principal)?;
    let user = state.profile.fetch_profile(&principal.user_id()).await?;
    info!(user = %principal.user_id(), role = %principal.role(), "signed in");
    Ok(web::Json(user))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Profile of the signed-in caller.
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current user", body = UserSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<web::Json<User>> {
    let user = state.profile.fetch_profile(&caller.user_id()).await?;
    Ok(web::Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{login_cookie, seeded_state, session_cookie, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::Value;

    #[actix_web::test]
    async fn login_returns_the_profile_and_a_session() {
        let app = test::init_service(test_app(seeded_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/login")
                .set_json(json!({ "username": "admin", "password": "password" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = session_cookie(&res);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["username"], "admin");
        assert_eq!(body["role"], "ADMIN");

        let profile = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/me").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(profile.status(), StatusCode::OK);
        let body: Value = test::read_body_json(profile).await;
        assert_eq!(body["displayName"], "Site Admin");
    }

    #[rstest]
    #[case("viewer", "wrong", StatusCode::UNAUTHORIZED)]
    #[case("nobody", "password", StatusCode::UNAUTHORIZED)]
    #[case("", "password", StatusCode::BAD_REQUEST)]
    #[case("viewer", "", StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn bad_credentials_are_rejected(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: StatusCode,
    ) {
        let app = test::init_service(test_app(seeded_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/login")
                .set_json(json!({ "username": username, "password": password }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), expected);
        let body: Value = test::read_body_json(res).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn logout_ends_the_session() {
        let app = test::init_service(test_app(seeded_state())).await;
        let cookie = login_cookie(&app, "viewer").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let cleared = res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("removal cookie");

        let profile = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/me")
                .cookie(cleared.into_owned())
                .to_request(),
        )
        .await;
        assert_eq!(profile.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn me_requires_a_session() {
        let app = test::init_service(test_app(seeded_state())).await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/api/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "login required");
    }
}
