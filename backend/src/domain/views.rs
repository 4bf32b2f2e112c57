//! View deduplication model.
//!
//! Each viewer owns a [`RecentViews`] set: the most recently counted video ids
//! in arrival order, bounded by [`ViewDedupePolicy::capacity`] with the oldest
//! evicted first. The whole set expires [`ViewDedupePolicy::ttl`] after the
//! last counted view, mirroring a cookie reissued with a fresh max-age on
//! every counted view.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{UserId, VideoId};

/// Default number of recent views remembered per viewer.
pub const DEFAULT_VIEW_DEDUPE_CAPACITY: usize = 100;
/// Default lifetime of a viewer's recent-view set, in hours.
pub const DEFAULT_VIEW_DEDUPE_TTL_HOURS: i64 = 24;
/// Default number of viewers whose sets are kept at once.
pub const DEFAULT_VIEW_DEDUPE_MAX_VIEWERS: usize = 100_000;

/// Raised when a dedupe policy is configured with unusable bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ViewDedupePolicyError {
    /// Capacity must be at least one.
    #[error("view dedupe capacity must be at least 1")]
    ZeroCapacity,
    /// Lifetime must be positive.
    #[error("view dedupe lifetime must be positive")]
    NonPositiveTtl,
    /// At least one viewer must be trackable.
    #[error("view dedupe viewer limit must be at least 1")]
    ZeroViewers,
}

/// Bounds of the per-viewer recent-view set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewDedupePolicy {
    capacity: usize,
    ttl: Duration,
    max_viewers: usize,
}

impl Default for ViewDedupePolicy {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_VIEW_DEDUPE_CAPACITY,
            ttl: Duration::hours(DEFAULT_VIEW_DEDUPE_TTL_HOURS),
            max_viewers: DEFAULT_VIEW_DEDUPE_MAX_VIEWERS,
        }
    }
}

impl ViewDedupePolicy {
    /// Build a policy from explicit bounds.
    ///
    /// # Errors
    /// Returns [`ViewDedupePolicyError`] for a zero capacity or a
    /// non-positive lifetime.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self, ViewDedupePolicyError> {
        if capacity == 0 {
            return Err(ViewDedupePolicyError::ZeroCapacity);
        }
        if ttl <= Duration::zero() {
            return Err(ViewDedupePolicyError::NonPositiveTtl);
        }
        Ok(Self {
            capacity,
            ttl,
            max_viewers: DEFAULT_VIEW_DEDUPE_MAX_VIEWERS,
        })
    }

    /// Replace the cap on tracked viewers.
    ///
    /// # Errors
    /// Returns [`ViewDedupePolicyError::ZeroViewers`] for a zero cap.
    pub const fn with_max_viewers(
        mut self,
        max_viewers: usize,
    ) -> Result<Self, ViewDedupePolicyError> {
        if max_viewers == 0 {
            return Err(ViewDedupePolicyError::ZeroViewers);
        }
        self.max_viewers = max_viewers;
        Ok(self)
    }

    /// Maximum number of remembered views.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lifetime of the set after the last counted view.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Most viewers whose sets are kept at once.
    #[must_use]
    pub const fn max_viewers(&self) -> usize {
        self.max_viewers
    }
}

/// Identity a recent-view set is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum ViewerKey {
    /// Signed-in viewer.
    User(UserId),
    /// Anonymous viewer identified by a server-issued session id.
    Anonymous(Uuid),
}

/// Bounded, expiring set of recently counted videos for one viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentViews {
    entries: VecDeque<VideoId>,
    expires_at: Option<DateTime<Utc>>,
}

impl Default for RecentViews {
    fn default() -> Self {
        Self::new()
    }
}

impl RecentViews {
    /// Empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            expires_at: None,
        }
    }

    /// Whether the set has lapsed at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// When the set lapses, if it holds anything.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Try to record a view of `video`.
    ///
    /// Returns a [`ClaimUndo`] when the view should be counted and `None` for
    /// a duplicate. Lapsed sets are cleared first; counted views renew the
    /// expiry and evict the oldest entries beyond capacity.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use vidhub::domain::{RecentViews, VideoId, ViewDedupePolicy};
    ///
    /// let policy = ViewDedupePolicy::default();
    /// let mut recent = RecentViews::new();
    /// let video = VideoId::random();
    /// assert!(recent.claim(video, Utc::now(), &policy).is_some());
    /// assert!(recent.claim(video, Utc::now(), &policy).is_none());
    /// ```
    pub fn claim(
        &mut self,
        video: VideoId,
        now: DateTime<Utc>,
        policy: &ViewDedupePolicy,
    ) -> Option<ClaimUndo> {
        if self.is_expired(now) {
            self.entries.clear();
            self.expires_at = None;
        }
        if self.entries.contains(&video) {
            return None;
        }
        let previous_expiry = self.expires_at;
        self.entries.push_back(video);
        let mut evicted = Vec::new();
        while self.entries.len() > policy.capacity() {
            if let Some(oldest) = self.entries.pop_front() {
                evicted.push(oldest);
            }
        }
        let renewed_expiry = now + policy.ttl();
        self.expires_at = Some(renewed_expiry);
        Some(ClaimUndo {
            video,
            evicted,
            previous_expiry,
            renewed_expiry,
        })
    }

    /// Roll back a counted claim whose view could not be recorded.
    ///
    /// Removes the claimed id, puts evicted ids back at the front while
    /// there is room, and restores the old expiry unless a later claim has
    /// renewed it since.
    pub fn release(&mut self, undo: &ClaimUndo, policy: &ViewDedupePolicy) {
        self.entries.retain(|entry| *entry != undo.video);
        for id in undo.evicted.iter().rev() {
            if self.entries.len() >= policy.capacity() {
                break;
            }
            if !self.entries.contains(id) {
                self.entries.push_front(*id);
            }
        }
        if self.expires_at == Some(undo.renewed_expiry) {
            self.expires_at = if self.entries.is_empty() {
                None
            } else {
                undo.previous_expiry
            };
        }
    }

    /// Remembered ids, oldest first.
    #[must_use]
    pub fn ids(&self) -> Vec<VideoId> {
        self.entries.iter().copied().collect()
    }

    /// Number of remembered ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Changes made by a counted claim, kept so the claim can be rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimUndo {
    video: VideoId,
    evicted: Vec<VideoId>,
    previous_expiry: Option<DateTime<Utc>>,
    renewed_expiry: DateTime<Utc>,
}

impl ClaimUndo {
    /// Video the claim recorded.
    #[must_use]
    pub const fn video(&self) -> VideoId {
        self.video
    }

    /// Ids pushed out of the set to make room, oldest first.
    #[must_use]
    pub fn evicted(&self) -> &[VideoId] {
        &self.evicted
    }
}

/// Outcome of an atomic dedupe claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewClaim {
    /// Present when the view should be counted.
    pub undo: Option<ClaimUndo>,
    /// Viewer's remembered ids after the claim, oldest first.
    pub recent: Vec<VideoId>,
    /// When the viewer's set lapses after the claim.
    pub expires_at: Option<DateTime<Utc>>,
}

impl ViewClaim {
    /// Whether the view should be counted.
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        self.undo.is_some()
    }
}

/// Result of a view request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOutcome {
    /// Video the request targeted.
    pub video_id: VideoId,
    /// Whether the view incremented the counters.
    pub counted: bool,
    /// Video view count after increment; absent for duplicates.
    pub views: Option<u64>,
    /// Viewer's remembered ids, oldest first.
    pub recent: Vec<VideoId>,
    /// Time left before the viewer's set lapses.
    pub expires_in: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .expect("fixture timestamp")
            .with_timezone(&Utc)
    }

    #[rstest]
    fn duplicate_within_lifetime_is_not_counted(now: DateTime<Utc>) {
        let policy = ViewDedupePolicy::default();
        let mut recent = RecentViews::new();
        let video = VideoId::random();
        assert!(recent.claim(video, now, &policy).is_some());
        assert!(recent.claim(video, now + Duration::hours(23), &policy).is_none());
    }

    #[rstest]
    fn lapsed_set_counts_again(now: DateTime<Utc>) {
        let policy = ViewDedupePolicy::default();
        let mut recent = RecentViews::new();
        let video = VideoId::random();
        assert!(recent.claim(video, now, &policy).is_some());
        assert!(recent.claim(video, now + Duration::hours(24), &policy).is_some());
        assert_eq!(recent.len(), 1);
    }

    #[rstest]
    fn counted_views_slide_the_expiry(now: DateTime<Utc>) {
        let policy = ViewDedupePolicy::default();
        let mut recent = RecentViews::new();
        let first = VideoId::random();
        assert!(recent.claim(first, now, &policy).is_some());
        assert!(recent.claim(VideoId::random(), now + Duration::hours(20), &policy).is_some());
        assert!(recent.claim(first, now + Duration::hours(30), &policy).is_none());
    }

    #[rstest]
    fn fifo_eviction_recounts_after_capacity_distinct_views(now: DateTime<Utc>) {
        let policy = ViewDedupePolicy::default();
        let mut recent = RecentViews::new();
        let first = VideoId::random();
        assert!(recent.claim(first, now, &policy).is_some());
        for _ in 0..DEFAULT_VIEW_DEDUPE_CAPACITY {
            assert!(recent.claim(VideoId::random(), now, &policy).is_some());
        }
        assert_eq!(recent.len(), DEFAULT_VIEW_DEDUPE_CAPACITY);
        assert!(recent.claim(first, now, &policy).is_some());
    }

    #[rstest]
    fn capacity_boundary_still_suppresses(now: DateTime<Utc>) {
        let policy = ViewDedupePolicy::default();
        let mut recent = RecentViews::new();
        let first = VideoId::random();
        assert!(recent.claim(first, now, &policy).is_some());
        for _ in 1..DEFAULT_VIEW_DEDUPE_CAPACITY {
            assert!(recent.claim(VideoId::random(), now, &policy).is_some());
        }
        assert!(recent.claim(first, now, &policy).is_none());
    }

    #[rstest]
    fn release_forgets_a_claim(now: DateTime<Utc>) {
        let policy = ViewDedupePolicy::default();
        let mut recent = RecentViews::new();
        let video = VideoId::random();
        let undo = recent.claim(video, now, &policy).expect("counted");
        recent.release(&undo, &policy);
        assert!(recent.is_empty());
        assert_eq!(recent.expires_at(), None);
        assert!(recent.claim(video, now, &policy).is_some());
    }

    #[rstest]
    fn release_restores_the_evicted_view_and_expiry(now: DateTime<Utc>) {
        let policy = ViewDedupePolicy::new(2, Duration::hours(24)).expect("valid policy");
        let mut recent = RecentViews::new();
        let (a, b) = (VideoId::random(), VideoId::random());
        assert!(recent.claim(a, now, &policy).is_some());
        assert!(recent.claim(b, now, &policy).is_some());
        let before = recent.expires_at();

        let undo = recent
            .claim(VideoId::random(), now + Duration::hours(1), &policy)
            .expect("counted");
        assert_eq!(undo.evicted(), &[a]);
        recent.release(&undo, &policy);

        assert_eq!(recent.ids(), vec![a, b]);
        assert_eq!(recent.expires_at(), before);
        assert!(recent.claim(a, now + Duration::hours(2), &policy).is_none());
    }

    #[rstest]
    fn release_keeps_an_expiry_renewed_by_a_later_claim(now: DateTime<Utc>) {
        let policy = ViewDedupePolicy::default();
        let mut recent = RecentViews::new();
        let undo = recent.claim(VideoId::random(), now, &policy).expect("counted");
        let later = now + Duration::hours(3);
        assert!(recent.claim(VideoId::random(), later, &policy).is_some());

        recent.release(&undo, &policy);

        assert_eq!(recent.len(), 1);
        assert_eq!(recent.expires_at(), Some(later + policy.ttl()));
    }

    #[rstest]
    #[case(0, Duration::hours(1), ViewDedupePolicyError::ZeroCapacity)]
    #[case(5, Duration::zero(), ViewDedupePolicyError::NonPositiveTtl)]
    fn policy_rejects_bad_bounds(
        #[case] capacity: usize,
        #[case] ttl: Duration,
        #[case] expected: ViewDedupePolicyError,
    ) {
        assert_eq!(ViewDedupePolicy::new(capacity, ttl), Err(expected));
    }

    #[rstest]
    fn policy_rejects_zero_viewer_limit() {
        assert_eq!(
            ViewDedupePolicy::default().with_max_viewers(0),
            Err(ViewDedupePolicyError::ZeroViewers)
        );
    }
}
