//! Driving ports for moderation submissions, review and listings.

use async_trait::async_trait;

use crate::domain::{
    ClaimId, ClaimQuery, ContactDraft, ContactId, ContactQuery, ContactSubmission, CopyrightClaim,
    CopyrightClaimDraft, Error, FlagDraft, FlagId, FlagQuery, FlagRecord, ModerationStatus, Page,
};

/// Submissions and admin status writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationCommand: Send + Sync {
    /// Flag a video; a second pending flag from the same reporter is rejected.
    async fn flag_video(&self, draft: FlagDraft) -> Result<FlagRecord, Error>;

    async fn submit_claim(&self, draft: CopyrightClaimDraft) -> Result<CopyrightClaim, Error>;

    async fn submit_contact(&self, draft: ContactDraft) -> Result<ContactSubmission, Error>;

    async fn set_flag_status(&self, id: FlagId, status: ModerationStatus)
    -> Result<FlagRecord, Error>;

    async fn set_claim_status(
        &self,
        id: ClaimId,
        status: ModerationStatus,
    ) -> Result<CopyrightClaim, Error>;

    async fn set_contact_status(
        &self,
        id: ContactId,
        status: ModerationStatus,
    ) -> Result<ContactSubmission, Error>;
}

/// Admin listings of the moderation queues.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationQuery: Send + Sync {
    async fn list_flags(&self, query: FlagQuery) -> Result<Page<FlagRecord>, Error>;

    async fn list_claims(&self, query: ClaimQuery) -> Result<Page<CopyrightClaim>, Error>;

    async fn list_contact(&self, query: ContactQuery) -> Result<Page<ContactSubmission>, Error>;
}
