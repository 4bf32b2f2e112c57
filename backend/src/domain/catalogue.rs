//! Video and channel read models with their denormalized counters.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ChannelId, UserId, VideoId};

/// Raised when a status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {entity} status: {value}")]
pub struct UnknownStatusError {
    entity: &'static str,
    value: String,
}

impl UnknownStatusError {
    pub(crate) fn new(entity: &'static str, value: &str) -> Self {
        Self {
            entity,
            value: value.to_owned(),
        }
    }
}

/// Publication state of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoStatus {
    /// Listed and playable.
    Published,
    /// Playable by link only.
    Unlisted,
    /// Taken down by moderation.
    Removed,
}

impl VideoStatus {
    /// Stable storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Published => "PUBLISHED",
            Self::Unlisted => "UNLISTED",
            Self::Removed => "REMOVED",
        }
    }
}

impl FromStr for VideoStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PUBLISHED" => Ok(Self::Published),
            "UNLISTED" => Ok(Self::Unlisted),
            "REMOVED" => Ok(Self::Removed),
            _ => Err(UnknownStatusError::new("video", s)),
        }
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standing of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelStatus {
    /// Channel in good standing.
    Active,
    /// Channel suspended by an administrator.
    Suspended,
}

impl ChannelStatus {
    /// Stable storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
        }
    }
}

impl FromStr for ChannelStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "SUSPENDED" => Ok(Self::Suspended),
            _ => Err(UnknownStatusError::new("channel", s)),
        }
    }
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Denormalized engagement counters stored on a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoCounters {
    /// Counted views.
    pub views: u64,
    /// Current number of LIKE votes.
    pub likes: u64,
    /// Current number of DISLIKE votes.
    pub dislikes: u64,
}

/// Video as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: VideoId,
    pub channel_id: ChannelId,
    pub title: String,
    pub status: VideoStatus,
    pub counters: VideoCounters,
    pub created_at: DateTime<Utc>,
}

/// Channel as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: ChannelId,
    pub owner_id: UserId,
    pub name: String,
    pub status: ChannelStatus,
    pub subscriber_count: u64,
    pub total_views: u64,
    pub created_at: DateTime<Utc>,
}

/// Platform-wide totals for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueTotals {
    pub users: u64,
    pub channels: u64,
    pub videos: u64,
    pub views: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("published", VideoStatus::Published)]
    #[case("UNLISTED", VideoStatus::Unlisted)]
    #[case("Removed", VideoStatus::Removed)]
    fn video_status_parses(#[case] raw: &str, #[case] expected: VideoStatus) {
        assert_eq!(raw.parse::<VideoStatus>(), Ok(expected));
    }

    #[rstest]
    fn channel_status_rejects_unknown_values() {
        let err = "banned".parse::<ChannelStatus>().expect_err("unknown status");
        assert_eq!(err.to_string(), "unknown channel status: banned");
    }
}
