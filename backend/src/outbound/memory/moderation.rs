//! Flags, copyright claims and contact submissions.

use async_trait::async_trait;
use chrono::Utc;

use super::{InMemoryStore, PoisonedStoreError, run_listing};
use crate::domain::ports::{ModerationCounts, ModerationRepository, ModerationRepositoryError};
use crate::domain::{
    ClaimId, ClaimQuery, ClaimSort, ContactDraft, ContactId, ContactQuery, ContactSort,
    ContactSubmission, CopyrightClaim, CopyrightClaimDraft, FlagDraft, FlagId, FlagQuery,
    FlagRecord, FlagSort, ModerationStatus, Page, StatusCounts,
};

impl From<PoisonedStoreError> for ModerationRepositoryError {
    fn from(err: PoisonedStoreError) -> Self {
        Self::query(err.to_string())
    }
}

fn counts<'a>(statuses: impl Iterator<Item = &'a ModerationStatus>) -> StatusCounts {
    StatusCounts::from_pairs(statuses.map(|status| (*status, 1)))
}

#[async_trait]
impl ModerationRepository for InMemoryStore {
    async fn insert_flag(&self, draft: &FlagDraft) -> Result<FlagRecord, ModerationRepositoryError> {
        let mut state = self.lock()?;
        let video_title = state
            .videos
            .get(&draft.video_id)
            .map(|video| video.title.clone())
            .ok_or_else(|| ModerationRepositoryError::video_not_found(draft.video_id))?;
        let duplicate = state.flags.iter().any(|flag| {
            flag.reporter_id == draft.reporter_id
                && flag.video_id == draft.video_id
                && flag.status == ModerationStatus::Pending
        });
        if duplicate {
            return Err(ModerationRepositoryError::duplicate_pending_flag());
        }
        let record = FlagRecord {
            id: FlagId::random(),
            reporter_id: draft.reporter_id,
            video_id: draft.video_id,
            video_title,
            reason: draft.reason,
            comment: draft.comment.clone(),
            status: ModerationStatus::Pending,
            created_at: Utc::now(),
        };
        state.flags.push(record.clone());
        Ok(record)
    }

    async fn list_flags(
        &self,
        query: &FlagQuery,
    ) -> Result<Page<FlagRecord>, ModerationRepositoryError> {
        let state = self.lock()?;
        Ok(run_listing(
            state.flags.iter().cloned(),
            query,
            |flag| (flag.status, flag.video_title.as_str()),
            |a, b| match query.sort {
                FlagSort::CreatedAt => a.created_at.cmp(&b.created_at),
                FlagSort::Status => a.status.as_str().cmp(b.status.as_str()),
                FlagSort::Reason => a.reason.as_str().cmp(b.reason.as_str()),
            },
        ))
    }

    async fn set_flag_status(
        &self,
        id: FlagId,
        status: ModerationStatus,
    ) -> Result<Option<FlagRecord>, ModerationRepositoryError> {
        let mut state = self.lock()?;
        Ok(state.flags.iter_mut().find(|flag| flag.id == id).map(|flag| {
            flag.status = status;
            flag.clone()
        }))
    }

    async fn insert_claim(
        &self,
        draft: &CopyrightClaimDraft,
    ) -> Result<CopyrightClaim, ModerationRepositoryError> {
        let mut state = self.lock()?;
        let video_title = state
            .videos
            .get(&draft.video_id)
            .map(|video| video.title.clone())
            .ok_or_else(|| ModerationRepositoryError::video_not_found(draft.video_id))?;
        let claim = CopyrightClaim {
            id: ClaimId::random(),
            claimant_id: draft.claimant_id,
            video_id: draft.video_id,
            video_title,
            claimant_name: draft.claimant_name.clone(),
            claimant_email: draft.claimant_email.clone(),
            description: draft.description.clone(),
            status: ModerationStatus::Pending,
            created_at: Utc::now(),
        };
        state.claims.push(claim.clone());
        Ok(claim)
    }

    async fn list_claims(
        &self,
        query: &ClaimQuery,
    ) -> Result<Page<CopyrightClaim>, ModerationRepositoryError> {
        let state = self.lock()?;
        Ok(run_listing(
            state.claims.iter().cloned(),
            query,
            |claim| (claim.status, claim.claimant_name.as_str()),
            |a, b| match query.sort {
                ClaimSort::CreatedAt => a.created_at.cmp(&b.created_at),
                ClaimSort::Status => a.status.as_str().cmp(b.status.as_str()),
                ClaimSort::ClaimantName => a.claimant_name.cmp(&b.claimant_name),
            },
        ))
    }

    async fn set_claim_status(
        &self,
        id: ClaimId,
        status: ModerationStatus,
    ) -> Result<Option<CopyrightClaim>, ModerationRepositoryError> {
        let mut state = self.lock()?;
        Ok(state.claims.iter_mut().find(|claim| claim.id == id).map(|claim| {
            claim.status = status;
            claim.clone()
        }))
    }

    async fn insert_contact(
        &self,
        draft: &ContactDraft,
    ) -> Result<ContactSubmission, ModerationRepositoryError> {
        let submission = ContactSubmission {
            id: ContactId::random(),
            name: draft.name.clone(),
            email: draft.email.clone(),
            subject: draft.subject.clone(),
            message: draft.message.clone(),
            status: ModerationStatus::Pending,
            created_at: Utc::now(),
        };
        self.lock()?.contact.push(submission.clone());
        Ok(submission)
    }

    async fn list_contact(
        &self,
        query: &ContactQuery,
    ) -> Result<Page<ContactSubmission>, ModerationRepositoryError> {
        let state = self.lock()?;
        Ok(run_listing(
            state.contact.iter().cloned(),
            query,
            |entry| (entry.status, entry.subject.as_str()),
            |a, b| match query.sort {
                ContactSort::CreatedAt => a.created_at.cmp(&b.created_at),
                ContactSort::Status => a.status.as_str().cmp(b.status.as_str()),
                ContactSort::Subject => a.subject.cmp(&b.subject),
            },
        ))
    }

    async fn set_contact_status(
        &self,
        id: ContactId,
        status: ModerationStatus,
    ) -> Result<Option<ContactSubmission>, ModerationRepositoryError> {
        let mut state = self.lock()?;
        Ok(state
            .contact
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(|entry| {
                entry.status = status;
                entry.clone()
            }))
    }

    async fn status_counts(&self) -> Result<ModerationCounts, ModerationRepositoryError> {
        let state = self.lock()?;
        Ok(ModerationCounts {
            flags: counts(state.flags.iter().map(|flag| &flag.status)),
            copyright_claims: counts(state.claims.iter().map(|claim| &claim.status)),
            contact_submissions: counts(state.contact.iter().map(|entry| &entry.status)),
        })
    }
}
