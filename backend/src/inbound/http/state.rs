//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see driving ports, so they
//! stay testable against mocks or the in-memory store.

use std::sync::Arc;

use crate::domain::ports::{
    BlockList, CatalogueAdmin, Library, LoginService, ModerationCommand, ModerationQuery, Payouts,
    UserProfileQuery, ViewCommand, VoteCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub votes: Arc<dyn VoteCommand>,
    pub views: Arc<dyn ViewCommand>,
    pub library: Arc<dyn Library>,
    pub blocks: Arc<dyn BlockList>,
    pub moderation: Arc<dyn ModerationCommand>,
    pub moderation_query: Arc<dyn ModerationQuery>,
    pub catalogue: Arc<dyn CatalogueAdmin>,
    pub payouts: Arc<dyn Payouts>,
}
