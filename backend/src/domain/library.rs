//! Personal library: watch-later queue and watch history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Video, VideoId};

/// Video saved for later, with the time it was saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchLaterEntry {
    pub video: Video,
    pub added_at: DateTime<Utc>,
}

/// Result of toggling a video in the watch-later queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchLaterToggle {
    pub video_id: VideoId,
    /// Whether the video is queued after the toggle.
    pub saved: bool,
}

/// Video the user has watched, with the latest watch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryEntry {
    pub video: Video,
    pub watched_at: DateTime<Utc>,
}
