//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`VoteLedger`], [`PayoutLedger`],
//! [`ViewDedupeStore`]) are implemented by outbound adapters. Driving ports
//! ([`VoteCommand`], [`BlockList`], [`Payouts`] and friends) are implemented
//! by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod block_list;
mod block_repository;
mod catalogue_admin;
mod catalogue_repository;
mod engagement;
mod library;
mod library_repository;
mod login_service;
mod moderation_command;
mod moderation_repository;
mod payout_ledger;
mod payouts;
mod user_repository;
mod view_counter;
mod view_dedupe_store;
mod vote_ledger;

#[cfg(test)]
pub use block_list::MockBlockList;
pub use block_list::BlockList;
#[cfg(test)]
pub use block_repository::MockBlockRepository;
pub use block_repository::{BlockRepository, BlockRepositoryError};
#[cfg(test)]
pub use catalogue_admin::MockCatalogueAdmin;
pub use catalogue_admin::CatalogueAdmin;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError};
#[cfg(test)]
pub use engagement::{MockViewCommand, MockVoteCommand};
pub use engagement::{ViewCommand, VoteCommand};
#[cfg(test)]
pub use library::MockLibrary;
pub use library::Library;
#[cfg(test)]
pub use library_repository::MockLibraryRepository;
pub use library_repository::{LibraryRepository, LibraryRepositoryError};
#[cfg(test)]
pub use login_service::{MockLoginService, MockUserProfileQuery};
pub use login_service::{LoginService, UserProfileQuery};
#[cfg(test)]
pub use moderation_command::{MockModerationCommand, MockModerationQuery};
pub use moderation_command::{ModerationCommand, ModerationQuery};
#[cfg(test)]
pub use moderation_repository::MockModerationRepository;
pub use moderation_repository::{
    ModerationCounts, ModerationRepository, ModerationRepositoryError,
};
#[cfg(test)]
pub use payout_ledger::MockPayoutLedger;
pub use payout_ledger::{PayoutLedger, PayoutLedgerError};
#[cfg(test)]
pub use payouts::MockPayouts;
pub use payouts::Payouts;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use view_counter::MockViewCounterRepository;
pub use view_counter::{ViewCounterError, ViewCounterRepository};
#[cfg(test)]
pub use view_dedupe_store::MockViewDedupeStore;
pub use view_dedupe_store::{ViewDedupeStore, ViewDedupeStoreError};
#[cfg(test)]
pub use vote_ledger::MockVoteLedger;
pub use vote_ledger::{VoteLedger, VoteLedgerError};
