//! Vote toggle planning.
//!
//! A vote request is resolved in two steps. [`VoteTransition::plan`] decides,
//! from the caller's existing vote and the requested kind, what happens to
//! the ledger row. [`VoteTransition::delta`] is the matching change to the
//! video's like and dislike counters. Adapters apply both inside one atomic
//! unit, so the counters always equal the ledger partitioned by kind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{VideoCounters, VideoId};

/// Kind of vote a viewer can cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteKind {
    /// Thumbs up.
    Like,
    /// Thumbs down.
    Dislike,
}

impl VoteKind {
    /// Stable storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "LIKE",
            Self::Dislike => "DISLIKE",
        }
    }
}

/// Raised when a vote kind string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("vote type must be LIKE or DISLIKE, got {0}")]
pub struct ParseVoteKindError(pub String);

impl FromStr for VoteKind {
    type Err = ParseVoteKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIKE" => Ok(Self::Like),
            "DISLIKE" => Ok(Self::Dislike),
            _ => Err(ParseVoteKindError(s.to_owned())),
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed change to a video's vote counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterDelta {
    /// Change to the like counter.
    pub likes: i64,
    /// Change to the dislike counter.
    pub dislikes: i64,
}

impl CounterDelta {
    const fn unit(kind: VoteKind, step: i64) -> Self {
        match kind {
            VoteKind::Like => Self {
                likes: step,
                dislikes: 0,
            },
            VoteKind::Dislike => Self {
                likes: 0,
                dislikes: step,
            },
        }
    }

    /// Apply the delta, clamping at zero.
    #[must_use]
    pub const fn apply(self, counters: VideoCounters) -> VideoCounters {
        VideoCounters {
            views: counters.views,
            likes: counters.likes.saturating_add_signed(self.likes),
            dislikes: counters.dislikes.saturating_add_signed(self.dislikes),
        }
    }
}

/// Ledger change required to honour a vote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    /// No vote existed: insert one.
    Create(VoteKind),
    /// Same vote existed: delete it (toggle off).
    Remove(VoteKind),
    /// Opposite vote existed: rewrite its kind.
    Switch {
        /// Kind being replaced.
        from: VoteKind,
        /// Kind being stored.
        to: VoteKind,
    },
}

impl VoteTransition {
    /// Decide the transition for an existing vote and a requested kind.
    ///
    /// # Examples
    /// ```
    /// use vidhub::domain::{VoteKind, VoteTransition};
    ///
    /// let plan = VoteTransition::plan(Some(VoteKind::Like), VoteKind::Like);
    /// assert_eq!(plan, VoteTransition::Remove(VoteKind::Like));
    /// assert_eq!(plan.resulting_vote(), None);
    /// ```
    #[must_use]
    pub fn plan(existing: Option<VoteKind>, desired: VoteKind) -> Self {
        match existing {
            None => Self::Create(desired),
            Some(current) if current == desired => Self::Remove(current),
            Some(current) => Self::Switch {
                from: current,
                to: desired,
            },
        }
    }

    /// Vote left in the ledger once the transition is applied.
    #[must_use]
    pub const fn resulting_vote(self) -> Option<VoteKind> {
        match self {
            Self::Create(kind) => Some(kind),
            Self::Remove(_) => None,
            Self::Switch { to, .. } => Some(to),
        }
    }

    /// Counter change matching the ledger change.
    #[must_use]
    pub const fn delta(self) -> CounterDelta {
        match self {
            Self::Create(kind) => CounterDelta::unit(kind, 1),
            Self::Remove(kind) => CounterDelta::unit(kind, -1),
            Self::Switch { from, to } => {
                let removed = CounterDelta::unit(from, -1);
                let added = CounterDelta::unit(to, 1);
                CounterDelta {
                    likes: removed.likes + added.likes,
                    dislikes: removed.dislikes + added.dislikes,
                }
            }
        }
    }
}

/// Result of a vote toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    /// Video the vote was cast on.
    pub video_id: VideoId,
    /// Caller's vote after the toggle, if any.
    pub vote: Option<VoteKind>,
    /// Like count after the vote.
    pub likes: u64,
    /// Dislike count after the vote.
    pub dislikes: u64,
}
