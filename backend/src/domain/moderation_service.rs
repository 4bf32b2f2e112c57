//! Moderation queue services.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    ModerationCommand, ModerationQuery, ModerationRepository, ModerationRepositoryError,
};
use crate::domain::{
    ClaimId, ClaimQuery, ContactDraft, ContactId, ContactQuery, ContactSubmission, CopyrightClaim,
    CopyrightClaimDraft, Error, FlagDraft, FlagId, FlagQuery, FlagRecord, ModerationStatus, Page,
};

/// Message returned when a reporter flags the same video twice.
pub const DUPLICATE_FLAG_MESSAGE: &str = "You have already flagged this video";

pub(crate) fn map_moderation_error(error: ModerationRepositoryError) -> Error {
    match error {
        ModerationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("moderation repository unavailable: {message}"))
        }
        ModerationRepositoryError::Query { message } => {
            Error::internal(format!("moderation repository error: {message}"))
        }
        ModerationRepositoryError::VideoNotFound { video_id } => {
            Error::not_found(format!("video {video_id} not found"))
        }
        ModerationRepositoryError::DuplicatePendingFlag => {
            Error::invalid_request(DUPLICATE_FLAG_MESSAGE)
        }
    }
}

/// Moderation service implementing [`ModerationCommand`] and [`ModerationQuery`].
#[derive(Clone)]
pub struct ModerationService<R> {
    repo: Arc<R>,
}

impl<R> ModerationService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> ModerationCommand for ModerationService<R>
where
    R: ModerationRepository,
{
    async fn flag_video(&self, draft: FlagDraft) -> Result<FlagRecord, Error> {
        let record = self
            .repo
            .insert_flag(&draft)
            .await
            .map_err(map_moderation_error)?;
        info!(flag = %record.id, video = %record.video_id, reason = %record.reason, "video flagged");
        Ok(record)
    }

    async fn submit_claim(&self, draft: CopyrightClaimDraft) -> Result<CopyrightClaim, Error> {
        self.repo
            .insert_claim(&draft)
            .await
            .map_err(map_moderation_error)
    }

    async fn submit_contact(&self, draft: ContactDraft) -> Result<ContactSubmission, Error> {
        self.repo
            .insert_contact(&draft)
            .await
            .map_err(map_moderation_error)
    }

    async fn set_flag_status(
        &self,
        id: FlagId,
        status: ModerationStatus,
    ) -> Result<FlagRecord, Error> {
        self.repo
            .set_flag_status(id, status)
            .await
            .map_err(map_moderation_error)?
            .ok_or_else(|| Error::not_found(format!("flag {id} not found")))
    }

    async fn set_claim_status(
        &self,
        id: ClaimId,
        status: ModerationStatus,
    ) -> Result<CopyrightClaim, Error> {
        self.repo
            .set_claim_status(id, status)
            .await
            .map_err(map_moderation_error)?
            .ok_or_else(|| Error::not_found(format!("copyright claim {id} not found")))
    }

    async fn set_contact_status(
        &self,
        id: ContactId,
        status: ModerationStatus,
    ) -> Result<ContactSubmission, Error> {
        self.repo
            .set_contact_status(id, status)
            .await
            .map_err(map_moderation_error)?
            .ok_or_else(|| Error::not_found(format!("contact submission {id} not found")))
    }
}

#[async_trait]
impl<R> ModerationQuery for ModerationService<R>
where
    R: ModerationRepository,
{
    async fn list_flags(&self, query: FlagQuery) -> Result<Page<FlagRecord>, Error> {
        self.repo
            .list_flags(&query)
            .await
            .map_err(map_moderation_error)
    }

    async fn list_claims(&self, query: ClaimQuery) -> Result<Page<CopyrightClaim>, Error> {
        self.repo
            .list_claims(&query)
            .await
            .map_err(map_moderation_error)
    }

    async fn list_contact(&self, query: ContactQuery) -> Result<Page<ContactSubmission>, Error> {
        self.repo
            .list_contact(&query)
            .await
            .map_err(map_moderation_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockModerationRepository;
    use crate::domain::{ErrorCode, FlagReason, UserId, VideoId};
    use rstest::rstest;

    fn draft() -> FlagDraft {
        FlagDraft::new(UserId::random(), VideoId::random(), FlagReason::Spam, None)
            .expect("valid draft")
    }

    #[tokio::test]
    async fn duplicate_pending_flag_is_rejected_with_contract_message() {
        let mut repo = MockModerationRepository::new();
        repo.expect_insert_flag()
            .times(1)
            .return_once(|_| Err(ModerationRepositoryError::duplicate_pending_flag()));
        let service = ModerationService::new(Arc::new(repo));

        let err = service.flag_video(draft()).await.expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), DUPLICATE_FLAG_MESSAGE);
    }

    #[rstest]
    #[case(ModerationStatus::Resolved)]
    #[case(ModerationStatus::Rejected)]
    #[case(ModerationStatus::InProgress)]
    #[tokio::test]
    async fn unknown_flag_status_write_is_not_found(#[case] status: ModerationStatus) {
        let mut repo = MockModerationRepository::new();
        repo.expect_set_flag_status()
            .withf(move |_, requested| *requested == status)
            .times(1)
            .return_once(|_, _| Ok(None));
        let service = ModerationService::new(Arc::new(repo));

        let err = service
            .set_flag_status(FlagId::random(), status)
            .await
            .expect_err("missing flag");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn listing_failures_map_to_service_unavailable() {
        let mut repo = MockModerationRepository::new();
        repo.expect_list_claims()
            .times(1)
            .return_once(|_| Err(ModerationRepositoryError::connection("pool closed")));
        let service = ModerationService::new(Arc::new(repo));

        let err = service
            .list_claims(ClaimQuery::default())
            .await
            .expect_err("unavailable");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
