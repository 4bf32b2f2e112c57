//! Builders wiring domain services onto driven adapters.
//!
//! A database pool selects the Diesel repositories; without one every port is
//! served by a single seeded [`InMemoryStore`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use vidhub::domain::ports::{
    BlockRepository, CatalogueRepository, LibraryRepository, ModerationRepository, PayoutLedger,
    UserRepository, ViewCounterRepository, VoteLedger,
};
use vidhub::domain::{
    AccountService, BlockService, CatalogueAdminService, LibraryService, ModerationService,
    PayoutService, ViewService, VoteService,
};
use vidhub::inbound::http::state::HttpState;
use vidhub::outbound::dedupe::DashMapViewDedupeStore;
use vidhub::outbound::memory::InMemoryStore;
use vidhub::outbound::persistence::{
    DbPool, DieselBlockRepository, DieselCatalogueRepository, DieselEngagementRepository,
    DieselModerationRepository, DieselPayoutLedger, DieselUserRepository,
};

use super::ServerConfig;

/// Driven adapters backing the HTTP state, one per port family.
struct Adapters<U, B, P, C, M, E> {
    users: Arc<U>,
    blocks: Arc<B>,
    ledger: Arc<P>,
    catalogue: Arc<C>,
    moderation: Arc<M>,
    engagement: Arc<E>,
}

impl
    Adapters<
        InMemoryStore,
        InMemoryStore,
        InMemoryStore,
        InMemoryStore,
        InMemoryStore,
        InMemoryStore,
    >
{
    fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            blocks: store.clone(),
            ledger: store.clone(),
            catalogue: store.clone(),
            moderation: store.clone(),
            engagement: store,
        }
    }
}

impl
    Adapters<
        DieselUserRepository,
        DieselBlockRepository,
        DieselPayoutLedger,
        DieselCatalogueRepository,
        DieselModerationRepository,
        DieselEngagementRepository,
    >
{
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            blocks: Arc::new(DieselBlockRepository::new(pool.clone())),
            ledger: Arc::new(DieselPayoutLedger::new(pool.clone())),
            catalogue: Arc::new(DieselCatalogueRepository::new(pool.clone())),
            moderation: Arc::new(DieselModerationRepository::new(pool.clone())),
            engagement: Arc::new(DieselEngagementRepository::new(pool.clone())),
        }
    }
}

impl<U, B, P, C, M, E> Adapters<U, B, P, C, M, E>
where
    U: UserRepository + 'static,
    B: BlockRepository + 'static,
    P: PayoutLedger + 'static,
    C: CatalogueRepository + 'static,
    M: ModerationRepository + 'static,
    E: VoteLedger + ViewCounterRepository + LibraryRepository + 'static,
{
    fn into_state(self, config: &ServerConfig, dedupe: Arc<DashMapViewDedupeStore>) -> HttpState {
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let accounts = Arc::new(AccountService::new(self.users));
        let moderation = Arc::new(ModerationService::new(self.moderation.clone()));

        HttpState {
            login: accounts.clone(),
            profile: accounts,
            votes: Arc::new(VoteService::new(self.engagement.clone())),
            views: Arc::new(ViewService::new(
                self.engagement.clone(),
                dedupe,
                self.engagement.clone(),
                clock.clone(),
            )),
            library: Arc::new(LibraryService::new(self.engagement, clock)),
            blocks: Arc::new(BlockService::new(self.blocks)),
            moderation: moderation.clone(),
            moderation_query: moderation,
            catalogue: Arc::new(CatalogueAdminService::new(self.catalogue, self.moderation)),
            payouts: Arc::new(PayoutService::new(self.ledger, config.payout_policy)),
        }
    }
}

/// Build the handler state and the dedupe store the purge task sweeps.
pub(crate) fn build_http_state(
    config: &ServerConfig,
) -> (web::Data<HttpState>, Arc<DashMapViewDedupeStore>) {
    let dedupe = Arc::new(DashMapViewDedupeStore::new(config.view_dedupe));
    let state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL adapters");
            Adapters::diesel(pool).into_state(config, dedupe.clone())
        }
        None => {
            info!("no database configured; serving the seeded in-memory store");
            Adapters::in_memory(Arc::new(InMemoryStore::seeded()))
                .into_state(config, dedupe.clone())
        }
    };
    (web::Data::new(state), dedupe)
}

#[cfg(test)]
mod tests {
    //! State wiring over the in-memory store.

    use super::*;
    use actix_web::cookie::{Key, SameSite};
    use rstest::rstest;
    use vidhub::domain::ports::LoginService;
    use vidhub::domain::{LoginCredentials, PayoutPolicy};

    fn config() -> ServerConfig {
        ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("socket addr"),
        )
        .with_payout_policy(PayoutPolicy::new(500))
    }

    #[rstest]
    #[actix_rt::test]
    async fn in_memory_state_authenticates_seeded_accounts() {
        let (state, dedupe) = build_http_state(&config());
        let credentials = LoginCredentials::try_from_parts("creator", "password")
            .expect("credentials");

        let principal = state.login.authenticate(&credentials).await;

        assert!(principal.is_ok());
        assert!(dedupe.is_empty());
    }
}
