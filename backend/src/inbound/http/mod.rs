//! HTTP inbound adapter exposing the REST API.
//!
//! [`configure`] mounts every route under `/api` and installs the extractor
//! error handlers, so malformed bodies, query strings and paths produce the
//! same `{"error": ...}` payload as domain failures. Admin routes sit in a
//! nested scope guarded by [`guard::Authorize::admin`].

pub mod admin;
pub mod auth;
pub mod blocks;
pub mod error;
pub mod guard;
pub mod health;
pub mod library;
pub mod monetization;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod support;
#[cfg(test)]
pub mod test_utils;
pub mod validation;
pub mod videos;
pub mod view_cookie;

use actix_web::web;

pub use error::ApiResult;

use self::error::{json_error_handler, path_error_handler, query_error_handler};
use self::guard::Authorize;

/// Register the `/api` scope.
///
/// Callers must provide `web::Data<HttpState>` and a session middleware.
///
/// # Examples
/// ```no_run
/// use actix_web::App;
///
/// let app = App::new().configure(vidhub::inbound::http::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/api")
                .service(auth::login)
                .service(auth::logout)
                .service(auth::me)
                .service(videos::like)
                .service(videos::view)
                .service(videos::flag)
                .service(videos::toggle_watch_later)
                .service(blocks::list_blocks)
                .service(blocks::block_user)
                .service(blocks::unblock_user)
                .service(library::list_watch_later)
                .service(library::list_history)
                .service(library::clear_history)
                .service(monetization::payout_summary)
                .service(monetization::request_payout)
                .service(support::submit_claim)
                .service(support::submit_contact)
                .service(
                    web::scope("/admin")
                        .wrap(Authorize::admin())
                        .service(admin::list_flags)
                        .service(admin::update_flag)
                        .service(admin::list_claims)
                        .service(admin::update_claim)
                        .service(admin::list_contact)
                        .service(admin::update_contact)
                        .service(admin::list_channels)
                        .service(admin::update_channel)
                        .service(admin::list_videos)
                        .service(admin::update_video)
                        .service(admin::stats)
                        .service(admin::record_revenue)
                        .service(admin::settle_payout),
                ),
        );
}
