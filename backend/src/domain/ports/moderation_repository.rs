//! Driven port for the moderation queue.
//!
//! Flags, copyright claims and contact submissions are stored by one adapter
//! because the admin dashboard counts all three together.

use async_trait::async_trait;

use crate::domain::{
    ClaimId, ClaimQuery, ContactDraft, ContactId, ContactQuery, ContactSubmission, CopyrightClaim,
    CopyrightClaimDraft, FlagDraft, FlagId, FlagQuery, FlagRecord, ModerationStatus, Page,
    StatusCounts, VideoId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by moderation repository adapters.
    pub enum ModerationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "moderation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "moderation repository query failed: {message}",
        /// The referenced video does not exist.
        VideoNotFound { video_id: VideoId } => "video {video_id} not found",
        /// The reporter already has a pending flag on the video.
        DuplicatePendingFlag => "reporter already has a pending flag on this video",
    }
}

/// Status counts across the three moderation queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModerationCounts {
    pub flags: StatusCounts,
    pub copyright_claims: StatusCounts,
    pub contact_submissions: StatusCounts,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationRepository: Send + Sync {
    /// Store a new `PENDING` flag.
    ///
    /// Fails with [`ModerationRepositoryError::DuplicatePendingFlag`] when the
    /// reporter already has a pending flag on the same video.
    async fn insert_flag(&self, draft: &FlagDraft) -> Result<FlagRecord, ModerationRepositoryError>;

    async fn list_flags(&self, query: &FlagQuery)
    -> Result<Page<FlagRecord>, ModerationRepositoryError>;

    /// Set a flag's status; `None` when the flag does not exist.
    async fn set_flag_status(
        &self,
        id: FlagId,
        status: ModerationStatus,
    ) -> Result<Option<FlagRecord>, ModerationRepositoryError>;

    /// Store a new `PENDING` copyright claim.
    async fn insert_claim(
        &self,
        draft: &CopyrightClaimDraft,
    ) -> Result<CopyrightClaim, ModerationRepositoryError>;

    async fn list_claims(
        &self,
        query: &ClaimQuery,
    ) -> Result<Page<CopyrightClaim>, ModerationRepositoryError>;

    async fn set_claim_status(
        &self,
        id: ClaimId,
        status: ModerationStatus,
    ) -> Result<Option<CopyrightClaim>, ModerationRepositoryError>;

    /// Store a new `PENDING` contact submission.
    async fn insert_contact(
        &self,
        draft: &ContactDraft,
    ) -> Result<ContactSubmission, ModerationRepositoryError>;

    async fn list_contact(
        &self,
        query: &ContactQuery,
    ) -> Result<Page<ContactSubmission>, ModerationRepositoryError>;

    async fn set_contact_status(
        &self,
        id: ContactId,
        status: ModerationStatus,
    ) -> Result<Option<ContactSubmission>, ModerationRepositoryError>;

    /// Count every queue grouped by status.
    async fn status_counts(&self) -> Result<ModerationCounts, ModerationRepositoryError>;
}
