//! In-memory adapters for every driven port.
//!
//! [`InMemoryStore`] keeps all tables behind one mutex, so each port call is
//! a single atomic unit, matching the transaction boundaries of the
//! PostgreSQL adapters. It backs the server when no `database_url` is
//! configured and drives the HTTP handler tests.

mod accounts;
mod catalogue;
mod engagement;
mod moderation;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::{
    BlockRecord, Channel, ChannelId, ChannelStatus, ContactSubmission, CopyrightClaim,
    DisplayName, FlagRecord, LedgerTransaction, ListingQuery, Page, Role, TransactionId,
    TransactionKind, TransactionStatus, User, UserId, Video, VideoCounters, VideoId, VideoStatus,
    VoteKind, password_digest,
};

/// Seeded administrator (`admin` / `password`).
pub const SEED_ADMIN_ID: UserId = UserId::from_uuid(Uuid::from_u128(0x0001));
/// Seeded creator owning the demo channel (`creator` / `password`).
pub const SEED_CREATOR_ID: UserId = UserId::from_uuid(Uuid::from_u128(0x0002));
/// Seeded viewer (`viewer` / `password`).
pub const SEED_VIEWER_ID: UserId = UserId::from_uuid(Uuid::from_u128(0x0003));
/// Seeded demo channel.
pub const SEED_CHANNEL_ID: ChannelId = ChannelId::from_uuid(Uuid::from_u128(0x0100));
/// Seeded demo videos.
pub const SEED_VIDEO_IDS: [VideoId; 3] = [
    VideoId::from_uuid(Uuid::from_u128(0x1001)),
    VideoId::from_uuid(Uuid::from_u128(0x1002)),
    VideoId::from_uuid(Uuid::from_u128(0x1003)),
];

const SEED_PASSWORD: &str = "password";

#[derive(Debug, Clone)]
struct UserRow {
    user: User,
    password_digest: String,
}

#[derive(Debug, Default)]
struct StoreState {
    users: HashMap<UserId, UserRow>,
    channels: HashMap<ChannelId, Channel>,
    videos: HashMap<VideoId, Video>,
    votes: HashMap<(UserId, VideoId), VoteKind>,
    flags: Vec<FlagRecord>,
    claims: Vec<CopyrightClaim>,
    contact: Vec<ContactSubmission>,
    blocks: Vec<BlockRecord>,
    ledger: Vec<LedgerTransaction>,
    watch_later: HashMap<(UserId, VideoId), DateTime<Utc>>,
    history: HashMap<(UserId, VideoId), DateTime<Utc>>,
}

/// Raised when the state mutex was poisoned by a panicking writer.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("in-memory store lock poisoned")]
pub struct PoisonedStoreError;

/// Process-local implementation of every driven port.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store populated with demo users, a channel, videos and some revenue.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            state: Mutex::new(StoreState::seeded()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, PoisonedStoreError> {
        self.state.lock().map_err(|_| PoisonedStoreError)
    }

    /// Insert or replace a user with the given plain-text password.
    ///
    /// # Errors
    /// Returns [`PoisonedStoreError`] when the state lock is poisoned.
    pub fn put_user(&self, user: User, password: &str) -> Result<(), PoisonedStoreError> {
        let mut state = self.lock()?;
        state.users.insert(
            user.id(),
            UserRow {
                user,
                password_digest: password_digest(password),
            },
        );
        Ok(())
    }

    /// Insert or replace a video; its channel must already exist.
    ///
    /// # Errors
    /// Returns [`PoisonedStoreError`] when the state lock is poisoned.
    pub fn put_video(&self, video: Video) -> Result<(), PoisonedStoreError> {
        let mut state = self.lock()?;
        state.videos.insert(video.id, video);
        Ok(())
    }

    /// Current video row.
    ///
    /// # Errors
    /// Returns [`PoisonedStoreError`] when the state lock is poisoned.
    pub fn video(&self, id: VideoId) -> Result<Option<Video>, PoisonedStoreError> {
        Ok(self.lock()?.videos.get(&id).cloned())
    }

    /// Current channel row.
    ///
    /// # Errors
    /// Returns [`PoisonedStoreError`] when the state lock is poisoned.
    pub fn channel(&self, id: ChannelId) -> Result<Option<Channel>, PoisonedStoreError> {
        Ok(self.lock()?.channels.get(&id).cloned())
    }
}

fn seed_user(id: UserId, username: &str, display: &str, role: Role) -> Option<UserRow> {
    let display_name = DisplayName::new(display).ok()?;
    Some(UserRow {
        user: User::new(id, username, display_name, role),
        password_digest: password_digest(SEED_PASSWORD),
    })
}

impl StoreState {
    fn seeded() -> Self {
        let epoch = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let mut state = Self::default();

        let users = [
            seed_user(SEED_ADMIN_ID, "admin", "Site Admin", Role::Admin),
            seed_user(SEED_CREATOR_ID, "creator", "Demo Creator", Role::User),
            seed_user(SEED_VIEWER_ID, "viewer", "Demo Viewer", Role::User),
        ];
        for row in users.into_iter().flatten() {
            state.users.insert(row.user.id(), row);
        }

        state.channels.insert(
            SEED_CHANNEL_ID,
            Channel {
                id: SEED_CHANNEL_ID,
                owner_id: SEED_CREATOR_ID,
                name: "Demo Channel".to_owned(),
                status: ChannelStatus::Active,
                subscriber_count: 0,
                total_views: 0,
                created_at: epoch,
            },
        );

        let titles = ["Welcome to vidhub", "Cooking with cats", "Night sky timelapse"];
        for (offset, (id, title)) in SEED_VIDEO_IDS.iter().zip(titles).enumerate() {
            let created_at = epoch + Duration::days(i64::try_from(offset).unwrap_or_default());
            state.videos.insert(
                *id,
                Video {
                    id: *id,
                    channel_id: SEED_CHANNEL_ID,
                    title: title.to_owned(),
                    status: VideoStatus::Published,
                    counters: VideoCounters::default(),
                    created_at,
                },
            );
        }

        state.ledger.push(LedgerTransaction {
            id: TransactionId::from_uuid(Uuid::from_u128(0x2001)),
            user_id: SEED_CREATOR_ID,
            kind: TransactionKind::Revenue,
            amount_cents: 25_000,
            status: TransactionStatus::Completed,
            description: Some("Ad revenue".to_owned()),
            created_at: epoch,
        });
        state
    }
}

/// Filter, order and slice an in-memory listing.
///
/// `key` extracts the status used for filtering and the text searched.
fn run_listing<T, S, F>(
    rows: impl IntoIterator<Item = T>,
    query: &ListingQuery<S, F>,
    key: impl Fn(&T) -> (F, &str),
    compare: impl Fn(&T, &T) -> std::cmp::Ordering,
) -> Page<T>
where
    F: PartialEq,
{
    let mut matching: Vec<T> = rows
        .into_iter()
        .filter(|row| {
            let (status, text) = key(row);
            query.status.as_ref().is_none_or(|wanted| *wanted == status)
                && query.matches_search(text)
        })
        .collect();
    matching.sort_by(|a, b| query.order(compare(a, b)));
    Page::from_ordered(matching, query.page)
}
