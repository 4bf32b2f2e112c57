//! Server-side recent-view sets keyed by viewer.
//!
//! The authoritative dedupe state lives here rather than in the
//! `viewed_videos` cookie, so a client that drops or edits its cookie still
//! cannot inflate view counts. Each viewer's set sits in its own `DashMap`
//! shard entry; holding the entry guard makes a claim atomic per viewer.
//!
//! The number of tracked viewers is capped by
//! [`ViewDedupePolicy::max_viewers`]: admitting a new viewer at the cap first
//! drops lapsed sets, then the set closest to expiry. Concurrent admissions
//! may overshoot the cap by the number of racing requests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use crate::domain::ports::{ViewDedupeStore, ViewDedupeStoreError};
use crate::domain::{ClaimUndo, RecentViews, VideoId, ViewClaim, ViewDedupePolicy, ViewerKey};

/// Process-local [`ViewDedupeStore`].
#[derive(Debug, Default)]
pub struct DashMapViewDedupeStore {
    policy: ViewDedupePolicy,
    sets: DashMap<ViewerKey, RecentViews>,
}

impl DashMapViewDedupeStore {
    /// Build an empty store enforcing `policy`.
    #[must_use]
    pub fn new(policy: ViewDedupePolicy) -> Self {
        Self {
            policy,
            sets: DashMap::new(),
        }
    }

    /// Drop every set that has lapsed at `now`. Returns how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.sets.len();
        self.sets.retain(|_, recent| !recent.is_expired(now));
        let removed = before.saturating_sub(self.sets.len());
        if removed > 0 {
            debug!(removed, "purged expired view dedupe sets");
        }
        removed
    }

    /// Make room for one more viewer when the cap is reached.
    fn admit(&self, now: DateTime<Utc>) {
        if self.sets.len() < self.policy.max_viewers() {
            return;
        }
        self.purge_expired(now);
        while self.sets.len() >= self.policy.max_viewers() {
            let oldest = self
                .sets
                .iter()
                .min_by_key(|entry| entry.value().expires_at())
                .map(|entry| *entry.key());
            let Some(viewer) = oldest else { break };
            self.sets.remove(&viewer);
            debug!(?viewer, "evicted view dedupe set at viewer cap");
        }
    }

    /// Number of viewers currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether no viewer is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[async_trait]
impl ViewDedupeStore for DashMapViewDedupeStore {
    async fn claim(
        &self,
        viewer: ViewerKey,
        video: VideoId,
        now: DateTime<Utc>,
    ) -> Result<ViewClaim, ViewDedupeStoreError> {
        if !self.sets.contains_key(&viewer) {
            self.admit(now);
        }
        let mut recent = self.sets.entry(viewer).or_default();
        let undo = recent.claim(video, now, &self.policy);
        Ok(ViewClaim {
            undo,
            recent: recent.ids(),
            expires_at: recent.expires_at(),
        })
    }

    async fn release(
        &self,
        viewer: ViewerKey,
        undo: ClaimUndo,
    ) -> Result<(), ViewDedupeStoreError> {
        let emptied = match self.sets.get_mut(&viewer) {
            Some(mut recent) => {
                recent.release(&undo, &self.policy);
                recent.is_empty()
            }
            None => false,
        };
        if emptied {
            self.sets.remove_if(&viewer, |_, recent| recent.is_empty());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;
    use crate::domain::UserId;

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    #[fixture]
    fn viewer() -> ViewerKey {
        ViewerKey::User(UserId::random())
    }

    #[rstest]
    #[tokio::test]
    async fn same_video_is_claimed_once(now: DateTime<Utc>, viewer: ViewerKey) {
        let store = DashMapViewDedupeStore::default();
        let video = VideoId::random();

        let first = store.claim(viewer, video, now).await.expect("claim");
        let second = store.claim(viewer, video, now).await.expect("claim");

        assert!(first.is_fresh());
        assert!(!second.is_fresh());
        assert_eq!(second.recent, vec![video]);
        assert_eq!(second.expires_at, Some(now + Duration::hours(24)));
    }

    #[rstest]
    #[tokio::test]
    async fn viewers_are_tracked_independently(now: DateTime<Utc>, viewer: ViewerKey) {
        let store = DashMapViewDedupeStore::default();
        let video = VideoId::random();
        let anonymous = ViewerKey::Anonymous(Uuid::new_v4());

        assert!(store.claim(viewer, video, now).await.expect("claim").is_fresh());
        assert!(store.claim(anonymous, video, now).await.expect("claim").is_fresh());
        assert_eq!(store.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn oldest_view_is_forgotten_after_capacity(now: DateTime<Utc>, viewer: ViewerKey) {
        let store = DashMapViewDedupeStore::default();
        let first = VideoId::random();
        store.claim(viewer, first, now).await.expect("claim");
        for _ in 0..100 {
            store
                .claim(viewer, VideoId::random(), now)
                .await
                .expect("claim");
        }

        let again = store.claim(viewer, first, now).await.expect("claim");
        assert!(again.is_fresh());
        assert_eq!(again.recent.len(), 100);
    }

    #[rstest]
    #[tokio::test]
    async fn released_claim_can_be_counted_again(now: DateTime<Utc>, viewer: ViewerKey) {
        let store = DashMapViewDedupeStore::default();
        let video = VideoId::random();
        let claim = store.claim(viewer, video, now).await.expect("claim");
        let undo = claim.undo.expect("fresh claim");
        store.release(viewer, undo).await.expect("release");

        assert!(store.is_empty());
        assert!(store.claim(viewer, video, now).await.expect("claim").is_fresh());
    }

    #[rstest]
    #[tokio::test]
    async fn sets_lapse_after_the_lifetime(now: DateTime<Utc>, viewer: ViewerKey) {
        let policy = ViewDedupePolicy::new(10, Duration::hours(1)).expect("valid policy");
        let store = DashMapViewDedupeStore::new(policy);
        let video = VideoId::random();
        store.claim(viewer, video, now).await.expect("claim");

        let later = now + Duration::hours(2);
        assert_eq!(store.purge_expired(later), 1);
        assert!(store.is_empty());
        assert!(store.claim(viewer, video, later).await.expect("claim").is_fresh());
    }

    #[rstest]
    #[tokio::test]
    async fn released_claim_restores_the_evicted_view(now: DateTime<Utc>, viewer: ViewerKey) {
        let policy = ViewDedupePolicy::new(2, Duration::hours(24)).expect("valid policy");
        let store = DashMapViewDedupeStore::new(policy);
        let (a, b) = (VideoId::random(), VideoId::random());
        store.claim(viewer, a, now).await.expect("claim");
        store.claim(viewer, b, now).await.expect("claim");

        let claim = store
            .claim(viewer, VideoId::random(), now)
            .await
            .expect("claim");
        store
            .release(viewer, claim.undo.expect("fresh claim"))
            .await
            .expect("release");

        let again = store.claim(viewer, a, now).await.expect("claim");
        assert!(!again.is_fresh());
        assert_eq!(again.recent, vec![a, b]);
    }

    #[rstest]
    #[tokio::test]
    async fn tracked_viewers_stay_within_the_cap(now: DateTime<Utc>) {
        let policy = ViewDedupePolicy::default()
            .with_max_viewers(3)
            .expect("valid policy");
        let store = DashMapViewDedupeStore::new(policy);
        let video = VideoId::random();
        let first = ViewerKey::Anonymous(Uuid::new_v4());
        store.claim(first, video, now).await.expect("claim");

        for minute in 1..=10 {
            let viewer = ViewerKey::Anonymous(Uuid::new_v4());
            store
                .claim(viewer, video, now + Duration::minutes(minute))
                .await
                .expect("claim");
            assert!(store.len() <= 3);
        }

        assert_eq!(store.len(), 3);
        let returning = store
            .claim(first, video, now + Duration::minutes(11))
            .await
            .expect("claim");
        assert!(returning.is_fresh());
    }

    #[rstest]
    #[tokio::test]
    async fn lapsed_sets_are_dropped_before_live_ones_at_the_cap(now: DateTime<Utc>) {
        let policy = ViewDedupePolicy::new(10, Duration::hours(1))
            .and_then(|policy| policy.with_max_viewers(2))
            .expect("valid policy");
        let store = DashMapViewDedupeStore::new(policy);
        let video = VideoId::random();
        let stale = ViewerKey::Anonymous(Uuid::new_v4());
        let live = ViewerKey::Anonymous(Uuid::new_v4());
        store.claim(stale, video, now).await.expect("claim");
        store
            .claim(live, video, now + Duration::minutes(90))
            .await
            .expect("claim");

        store
            .claim(ViewerKey::Anonymous(Uuid::new_v4()), video, now + Duration::minutes(100))
            .await
            .expect("claim");

        assert_eq!(store.len(), 2);
        let again = store
            .claim(live, video, now + Duration::minutes(101))
            .await
            .expect("claim");
        assert!(!again.is_fresh());
    }
}
