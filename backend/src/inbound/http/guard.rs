//! Authorization for HTTP routes.
//!
//! [`Authorize`] wraps a scope and evaluates an [`AccessRule`] against the
//! session principal before any handler in it runs. [`CurrentUser`] is the
//! per-handler extractor for routes that only need a signed-in caller.
//! Ownership checks reuse the same [`AccessRule`] inside the domain.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error as ActixError, FromRequest, HttpRequest};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::{AccessRule, Principal, Role};
use crate::inbound::http::session::SessionContext;

/// Middleware rejecting requests whose caller fails `rule`.
///
/// Missing sessions get `401`; callers that fail the rule get `403`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use vidhub::inbound::http::guard::Authorize;
///
/// let app = App::new().service(web::scope("/api/admin").wrap(Authorize::admin()));
/// ```
#[derive(Debug, Clone)]
pub struct Authorize {
    rule: Rc<AccessRule>,
}

impl Authorize {
    /// Guard with an arbitrary rule.
    pub fn new(rule: AccessRule) -> Self {
        Self {
            rule: Rc::new(rule),
        }
    }

    /// Guard admitting administrators only.
    pub fn admin() -> Self {
        Self::new(AccessRule::role(Role::Admin))
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authorize
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type InitError = ();
    type Transform = AuthorizeMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthorizeMiddleware {
            service: Rc::new(service),
            rule: Rc::clone(&self.rule),
        }))
    }
}

/// Service wrapper produced by [`Authorize`].
pub struct AuthorizeMiddleware<S> {
    service: Rc<S>,
    rule: Rc<AccessRule>,
}

impl<S, B> Service<ServiceRequest> for AuthorizeMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let rule = Rc::clone(&self.rule);
        Box::pin(async move {
            let session = SessionContext::new(req.get_session());
            let decision = session
                .principal()
                .and_then(|principal| rule.authorize(principal.as_ref()));
            match decision {
                Ok(()) => service.call(req).await.map(ServiceResponse::map_into_left_body),
                Err(error) => {
                    debug!(path = req.path(), code = ?error.code(), "request denied");
                    Ok(req.error_response(error).map_into_right_body())
                }
            }
        })
    }
}

/// Extractor yielding the signed-in caller or failing with `401`.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Principal);

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let principal = session.await?.require_principal()?;
            Ok(Self(principal))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error, UserId};
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;
    use serde_json::Value;

    fn login_as(role: Role) -> impl Fn(SessionContext) -> std::future::Ready<Result<HttpResponse, Error>> + Clone {
        move |session: SessionContext| {
            std::future::ready(
                session
                    .persist_principal(&Principal::new(UserId::random(), role))
                    .map(|()| HttpResponse::Ok().finish()),
            )
        }
    }

    #[rstest]
    #[case(None, StatusCode::UNAUTHORIZED)]
    #[case(Some(Role::User), StatusCode::FORBIDDEN)]
    #[case(Some(Role::Admin), StatusCode::OK)]
    #[actix_web::test]
    async fn admin_scope_checks_the_session_role(
        #[case] role: Option<Role>,
        #[case] expected: StatusCode,
    ) {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/login/user", web::post().to(login_as(Role::User)))
                .route("/login/admin", web::post().to(login_as(Role::Admin)))
                .service(
                    web::scope("/admin")
                        .wrap(Authorize::admin())
                        .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
                ),
        )
        .await;

        let mut request = test::TestRequest::get().uri("/admin/ping");
        if let Some(role) = role {
            let uri = match role {
                Role::Admin => "/login/admin",
                Role::User => "/login/user",
            };
            let login = test::call_service(&app, test::TestRequest::post().uri(uri).to_request()).await;
            request = request.cookie(session_cookie(&login));
        }

        let res = test::call_service(&app, request.to_request()).await;
        assert_eq!(res.status(), expected);
        if expected != StatusCode::OK {
            let body: Value = test::read_body_json(res).await;
            assert!(body["error"].is_string());
        }
    }

    #[actix_web::test]
    async fn current_user_extractor_requires_a_session() {
        let app = test::init_service(App::new().wrap(test_session_middleware()).route(
            "/me",
            web::get().to(|CurrentUser(caller): CurrentUser| async move {
                HttpResponse::Ok().body(caller.user_id().to_string())
            }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
