//! Moderation queue: content flags, copyright claims and contact submissions.
//!
//! All three share the [`ModerationStatus`] lifecycle. New items start as
//! `PENDING`; administrators move them to any other state with a direct write.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClaimId, ContactId, FlagId, UnknownStatusError, UserId, VideoId};

/// Longest accepted flag comment, in characters.
pub const FLAG_COMMENT_MAX: usize = 500;
/// Longest accepted claim description or contact message, in characters.
pub const LONG_TEXT_MAX: usize = 2000;
/// Longest accepted short field (names, subjects, emails), in characters.
pub const SHORT_TEXT_MAX: usize = 200;

/// Review state shared by every moderation item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModerationStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Picked up by an administrator.
    InProgress,
    /// Action taken.
    Resolved,
    /// Dismissed.
    Rejected,
}

impl ModerationStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Resolved,
        Self::Rejected,
    ];

    /// Stable storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl FromStr for ModerationStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "RESOLVED" => Ok(Self::Resolved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(UnknownStatusError::new("moderation", s)),
        }
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a viewer flagged a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagReason {
    Spam,
    Harassment,
    HateSpeech,
    Violence,
    SexualContent,
    Copyright,
    Misinformation,
    Other,
}

impl FlagReason {
    /// Stable storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spam => "SPAM",
            Self::Harassment => "HARASSMENT",
            Self::HateSpeech => "HATE_SPEECH",
            Self::Violence => "VIOLENCE",
            Self::SexualContent => "SEXUAL_CONTENT",
            Self::Copyright => "COPYRIGHT",
            Self::Misinformation => "MISINFORMATION",
            Self::Other => "OTHER",
        }
    }
}

impl FromStr for FlagReason {
    type Err = ModerationValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SPAM" => Ok(Self::Spam),
            "HARASSMENT" => Ok(Self::Harassment),
            "HATE_SPEECH" => Ok(Self::HateSpeech),
            "VIOLENCE" => Ok(Self::Violence),
            "SEXUAL_CONTENT" => Ok(Self::SexualContent),
            "COPYRIGHT" => Ok(Self::Copyright),
            "MISINFORMATION" => Ok(Self::Misinformation),
            "OTHER" => Ok(Self::Other),
            _ => Err(ModerationValidationError::UnknownReason(s.to_owned())),
        }
    }
}

impl fmt::Display for FlagReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for moderation submissions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModerationValidationError {
    #[error("unknown flag reason: {0}")]
    UnknownReason(String),
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must be a valid email address")]
    InvalidEmail { field: &'static str },
}

impl ModerationValidationError {
    /// Request field the failure refers to, when there is one.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::UnknownReason(_) => Some("reason"),
            Self::Empty { field } | Self::TooLong { field, .. } | Self::InvalidEmail { field } => {
                Some(*field)
            }
        }
    }
}

fn required(field: &'static str, raw: &str, max: usize) -> Result<String, ModerationValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ModerationValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ModerationValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

fn email(field: &'static str, raw: &str) -> Result<String, ModerationValidationError> {
    let value = required(field, raw, SHORT_TEXT_MAX)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(value),
        _ => Err(ModerationValidationError::InvalidEmail { field }),
    }
}

/// Validated request to flag a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDraft {
    pub reporter_id: UserId,
    pub video_id: VideoId,
    pub reason: FlagReason,
    /// Optional free text; blank input is stored as absent.
    pub comment: Option<String>,
}

impl FlagDraft {
    /// Validate a flag request.
    ///
    /// # Errors
    /// Returns [`ModerationValidationError::TooLong`] for oversized comments.
    pub fn new(
        reporter_id: UserId,
        video_id: VideoId,
        reason: FlagReason,
        comment: Option<&str>,
    ) -> Result<Self, ModerationValidationError> {
        let comment = match comment.map(str::trim).filter(|text| !text.is_empty()) {
            Some(text) if text.chars().count() > FLAG_COMMENT_MAX => {
                return Err(ModerationValidationError::TooLong {
                    field: "comment",
                    max: FLAG_COMMENT_MAX,
                });
            }
            other => other.map(str::to_owned),
        };
        Ok(Self {
            reporter_id,
            video_id,
            reason,
            comment,
        })
    }
}

/// Stored flag as listed for administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagRecord {
    pub id: FlagId,
    pub reporter_id: UserId,
    pub video_id: VideoId,
    pub video_title: String,
    pub reason: FlagReason,
    pub comment: Option<String>,
    pub status: ModerationStatus,
    pub created_at: DateTime<Utc>,
}

/// Validated copyright claim against a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyrightClaimDraft {
    pub claimant_id: UserId,
    pub video_id: VideoId,
    pub claimant_name: String,
    pub claimant_email: String,
    pub description: String,
}

impl CopyrightClaimDraft {
    /// Validate a claim submission.
    ///
    /// # Errors
    /// Returns [`ModerationValidationError`] for blank, oversized or malformed
    /// fields.
    pub fn new(
        claimant_id: UserId,
        video_id: VideoId,
        claimant_name: &str,
        claimant_email: &str,
        description: &str,
    ) -> Result<Self, ModerationValidationError> {
        Ok(Self {
            claimant_id,
            video_id,
            claimant_name: required("claimantName", claimant_name, SHORT_TEXT_MAX)?,
            claimant_email: email("claimantEmail", claimant_email)?,
            description: required("description", description, LONG_TEXT_MAX)?,
        })
    }
}

/// Stored copyright claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyrightClaim {
    pub id: ClaimId,
    pub claimant_id: UserId,
    pub video_id: VideoId,
    pub video_title: String,
    pub claimant_name: String,
    pub claimant_email: String,
    pub description: String,
    pub status: ModerationStatus,
    pub created_at: DateTime<Utc>,
}

/// Validated contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactDraft {
    /// Validate a contact submission.
    ///
    /// # Errors
    /// Returns [`ModerationValidationError`] for blank, oversized or malformed
    /// fields.
    pub fn new(
        name: &str,
        email_address: &str,
        subject: &str,
        message: &str,
    ) -> Result<Self, ModerationValidationError> {
        Ok(Self {
            name: required("name", name, SHORT_TEXT_MAX)?,
            email: email("email", email_address)?,
            subject: required("subject", subject, SHORT_TEXT_MAX)?,
            message: required("message", message, LONG_TEXT_MAX)?,
        })
    }
}

/// Stored contact submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ModerationStatus,
    pub created_at: DateTime<Utc>,
}

/// Item counts per moderation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub pending: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub rejected: u64,
}

impl StatusCounts {
    /// Tally statuses, e.g. from grouped query rows.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ModerationStatus, u64)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::default(), |mut counts, (status, count)| {
                *counts.slot(status) += count;
                counts
            })
    }

    fn slot(&mut self, status: ModerationStatus) -> &mut u64 {
        match status {
            ModerationStatus::Pending => &mut self.pending,
            ModerationStatus::InProgress => &mut self.in_progress,
            ModerationStatus::Resolved => &mut self.resolved,
            ModerationStatus::Rejected => &mut self.rejected,
        }
    }

    /// Sum across statuses.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.pending + self.in_progress + self.resolved + self.rejected
    }
}
