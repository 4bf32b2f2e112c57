//! The `viewed_videos` cookie.
//!
//! Mirrors the viewer's server-side recent-view set so clients can render
//! "already watched" hints. The server never reads it back; dedupe decisions
//! come from the dedupe store only.

use actix_web::cookie::{Cookie, SameSite, time};

use crate::domain::VideoId;

/// Cookie name.
pub const VIEWED_VIDEOS_COOKIE: &str = "viewed_videos";

/// Build the cookie for `recent`, oldest first, comma-joined.
///
/// The max-age matches `lifetime`, the time left on the server-side set;
/// negative lifetimes expire the cookie immediately.
///
/// # Examples
/// ```
/// use chrono::Duration;
/// use vidhub::domain::VideoId;
/// use vidhub::inbound::http::view_cookie::viewed_videos_cookie;
///
/// let id = VideoId::random();
/// let cookie = viewed_videos_cookie(&[id], Duration::hours(24));
/// assert_eq!(cookie.value(), id.to_string());
/// assert_eq!(cookie.http_only(), Some(true));
/// ```
pub fn viewed_videos_cookie(recent: &[VideoId], lifetime: chrono::Duration) -> Cookie<'static> {
    let value = recent
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    Cookie::build(VIEWED_VIDEOS_COOKIE, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(lifetime.num_seconds().max(0)))
        .finish()
}
