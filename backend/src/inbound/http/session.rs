//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The encrypted `session` cookie carries the signed-in user's id and role,
//! plus a random viewer id minted on first use so anonymous views can be
//! deduplicated server-side.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{Error, Principal, Role, UserId, ViewerKey};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";
pub(crate) const VIEWER_ID_KEY: &str = "viewer_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated caller and rotate the session id.
    pub fn persist_principal(&self, principal: &Principal) -> Result<(), Error> {
        self.0.renew();
        self.insert(USER_ID_KEY, principal.user_id().to_string())?;
        self.insert(ROLE_KEY, principal.role().as_str().to_owned())
    }

    /// Drop every session value.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// The signed-in caller, if the cookie carries a valid one.
    ///
    /// Tampered or stale values are logged and treated as signed out.
    pub fn principal(&self) -> Result<Option<Principal>, Error> {
        let (Some(raw_id), Some(raw_role)) = (self.get(USER_ID_KEY)?, self.get(ROLE_KEY)?) else {
            return Ok(None);
        };
        let user_id = match UserId::parse(&raw_id) {
            Ok(id) => id,
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                return Ok(None);
            }
        };
        match raw_role.parse::<Role>() {
            Ok(role) => Ok(Some(Principal::new(user_id, role))),
            Err(error) => {
                warn!(%error, "invalid role in session cookie");
                Ok(None)
            }
        }
    }

    /// Require a signed-in caller or return `401 Unauthorized`.
    pub fn require_principal(&self) -> Result<Principal, Error> {
        self.principal()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Identity used for view deduplication.
    ///
    /// Signed-in callers are keyed by user id. Anonymous callers get a
    /// random viewer id stored in the session on first use.
    pub fn viewer_key(&self) -> Result<ViewerKey, Error> {
        if let Some(principal) = self.principal()? {
            return Ok(ViewerKey::User(principal.user_id()));
        }
        if let Some(raw) = self.get(VIEWER_ID_KEY)? {
            match Uuid::parse_str(&raw) {
                Ok(id) => return Ok(ViewerKey::Anonymous(id)),
                Err(error) => warn!(%error, "invalid viewer id in session cookie"),
            }
        }
        let minted = Uuid::new_v4();
        self.insert(VIEWER_ID_KEY, minted.to_string())?;
        Ok(ViewerKey::Anonymous(minted))
    }

    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    fn insert(&self, key: &str, value: String) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
