//! PostgreSQL-backed `ModerationRepository` implementation using Diesel ORM.
//!
//! The one-pending-flag rule is enforced by the partial unique index
//! `video_flags_one_pending_idx`; its violation maps to
//! [`ModerationRepositoryError::DuplicatePendingFlag`].

use async_trait::async_trait;
use diesel::dsl::{IntoBoxed, InnerJoin, count_star};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ModerationCounts, ModerationRepository, ModerationRepositoryError};
use crate::domain::{
    ClaimId, ClaimQuery, ClaimSort, ContactDraft, ContactId, ContactQuery, ContactSort,
    ContactSubmission, CopyrightClaim, CopyrightClaimDraft, FlagDraft, FlagId, FlagQuery,
    FlagRecord, FlagSort, ModerationStatus, Page, StatusCounts, VideoId,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::diesel_listing::{contains_pattern, into_page, limit_offset, order_by_direction};
use super::models::{
    ClaimRow, ContactRow, FlagRow, NewClaimRow, NewContactRow, NewFlagRow, RowDecodeError,
    decode_status_count,
};
use super::pool::DbPool;
use super::schema::{contact_submissions, copyright_claims, video_flags, videos};

/// Diesel-backed implementation of the moderation repository port.
#[derive(Clone)]
pub struct DieselModerationRepository {
    pool: DbPool,
}

impl DieselModerationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<
        diesel_async::pooled_connection::bb8::PooledConnection<'_, AsyncPgConnection>,
        ModerationRepositoryError,
    > {
        self.pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, ModerationRepositoryError::connection))
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ModerationRepositoryError {
    if is_unique_violation(&error) {
        return ModerationRepositoryError::duplicate_pending_flag();
    }
    map_basic_diesel_error(
        error,
        ModerationRepositoryError::query,
        ModerationRepositoryError::connection,
    )
}

fn map_decode_error(error: RowDecodeError) -> ModerationRepositoryError {
    ModerationRepositoryError::query(error.to_string())
}

async fn video_title(
    conn: &mut AsyncPgConnection,
    video: VideoId,
) -> Result<String, ModerationRepositoryError> {
    videos::table
        .find(*video.as_uuid())
        .select(videos::title)
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?
        .ok_or_else(|| ModerationRepositoryError::video_not_found(video))
}

type FlagSource = InnerJoin<video_flags::table, videos::table>;
type ClaimSource = InnerJoin<copyright_claims::table, videos::table>;

fn filtered_flags(query: &FlagQuery) -> IntoBoxed<'static, FlagSource, Pg> {
    let mut boxed = video_flags::table.inner_join(videos::table).into_boxed();
    if let Some(status) = query.status {
        boxed = boxed.filter(video_flags::status.eq(status.as_str()));
    }
    if let Some(term) = &query.search {
        boxed = boxed.filter(videos::title.ilike(contains_pattern(term)));
    }
    boxed
}

fn filtered_claims(query: &ClaimQuery) -> IntoBoxed<'static, ClaimSource, Pg> {
    let mut boxed = copyright_claims::table
        .inner_join(videos::table)
        .into_boxed();
    if let Some(status) = query.status {
        boxed = boxed.filter(copyright_claims::status.eq(status.as_str()));
    }
    if let Some(term) = &query.search {
        boxed = boxed.filter(copyright_claims::claimant_name.ilike(contains_pattern(term)));
    }
    boxed
}

fn filtered_contact(query: &ContactQuery) -> contact_submissions::BoxedQuery<'static, Pg> {
    let mut boxed = contact_submissions::table.into_boxed();
    if let Some(status) = query.status {
        boxed = boxed.filter(contact_submissions::status.eq(status.as_str()));
    }
    if let Some(term) = &query.search {
        boxed = boxed.filter(contact_submissions::subject.ilike(contains_pattern(term)));
    }
    boxed
}

fn counts_from(rows: Vec<(String, i64)>) -> Result<StatusCounts, ModerationRepositoryError> {
    let pairs = rows
        .into_iter()
        .map(decode_status_count)
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_decode_error)?;
    Ok(StatusCounts::from_pairs(pairs))
}

#[async_trait]
impl ModerationRepository for DieselModerationRepository {
    async fn insert_flag(&self, draft: &FlagDraft) -> Result<FlagRecord, ModerationRepositoryError> {
        let mut conn = self.connection().await?;
        let title = video_title(&mut conn, draft.video_id).await?;
        let row: FlagRow = diesel::insert_into(video_flags::table)
            .values(&NewFlagRow {
                id: Uuid::new_v4(),
                reporter_id: *draft.reporter_id.as_uuid(),
                video_id: *draft.video_id.as_uuid(),
                reason: draft.reason.as_str(),
                comment: draft.comment.as_deref(),
            })
            .returning(FlagRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_record(title).map_err(map_decode_error)
    }

    async fn list_flags(
        &self,
        query: &FlagQuery,
    ) -> Result<Page<FlagRecord>, ModerationRepositoryError> {
        let mut conn = self.connection().await?;
        let total: i64 = filtered_flags(query)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let selected = filtered_flags(query).select((FlagRow::as_select(), videos::title));
        let ordered = match query.sort {
            FlagSort::CreatedAt => {
                order_by_direction!(selected, video_flags::created_at, query.direction)
            }
            FlagSort::Status => order_by_direction!(selected, video_flags::status, query.direction),
            FlagSort::Reason => order_by_direction!(selected, video_flags::reason, query.direction),
        };
        let (limit, offset) = limit_offset(query.page);
        let rows: Vec<(FlagRow, String)> = ordered
            .then_order_by(video_flags::id.asc())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(|(row, title)| row.into_record(title))
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_decode_error)?;
        Ok(into_page(items, query.page, total))
    }

    async fn set_flag_status(
        &self,
        id: FlagId,
        status: ModerationStatus,
    ) -> Result<Option<FlagRecord>, ModerationRepositoryError> {
        let mut conn = self.connection().await?;
        let updated: Option<FlagRow> = diesel::update(video_flags::table.find(*id.as_uuid()))
            .set(video_flags::status.eq(status.as_str()))
            .returning(FlagRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = updated else {
            return Ok(None);
        };
        let title = video_title(&mut conn, VideoId::from_uuid(row.video_id)).await?;
        row.into_record(title).map(Some).map_err(map_decode_error)
    }

    async fn insert_claim(
        &self,
        draft: &CopyrightClaimDraft,
    ) -> Result<CopyrightClaim, ModerationRepositoryError> {
        let mut conn = self.connection().await?;
        let title = video_title(&mut conn, draft.video_id).await?;
        let row: ClaimRow = diesel::insert_into(copyright_claims::table)
            .values(&NewClaimRow {
                id: Uuid::new_v4(),
                claimant_id: *draft.claimant_id.as_uuid(),
                video_id: *draft.video_id.as_uuid(),
                claimant_name: &draft.claimant_name,
                claimant_email: &draft.claimant_email,
                description: &draft.description,
            })
            .returning(ClaimRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_claim(title).map_err(map_decode_error)
    }

    async fn list_claims(
        &self,
        query: &ClaimQuery,
    ) -> Result<Page<CopyrightClaim>, ModerationRepositoryError> {
        let mut conn = self.connection().await?;
        let total: i64 = filtered_claims(query)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let selected = filtered_claims(query).select((ClaimRow::as_select(), videos::title));
        let ordered = match query.sort {
            ClaimSort::CreatedAt => {
                order_by_direction!(selected, copyright_claims::created_at, query.direction)
            }
            ClaimSort::Status => {
                order_by_direction!(selected, copyright_claims::status, query.direction)
            }
            ClaimSort::ClaimantName => {
                order_by_direction!(selected, copyright_claims::claimant_name, query.direction)
            }
        };
        let (limit, offset) = limit_offset(query.page);
        let rows: Vec<(ClaimRow, String)> = ordered
            .then_order_by(copyright_claims::id.asc())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(|(row, title)| row.into_claim(title))
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_decode_error)?;
        Ok(into_page(items, query.page, total))
    }

    async fn set_claim_status(
        &self,
        id: ClaimId,
        status: ModerationStatus,
    ) -> Result<Option<CopyrightClaim>, ModerationRepositoryError> {
        let mut conn = self.connection().await?;
        let updated: Option<ClaimRow> = diesel::update(copyright_claims::table.find(*id.as_uuid()))
            .set(copyright_claims::status.eq(status.as_str()))
            .returning(ClaimRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = updated else {
            return Ok(None);
        };
        let title = video_title(&mut conn, VideoId::from_uuid(row.video_id)).await?;
        row.into_claim(title).map(Some).map_err(map_decode_error)
    }

    async fn insert_contact(
        &self,
        draft: &ContactDraft,
    ) -> Result<ContactSubmission, ModerationRepositoryError> {
        let mut conn = self.connection().await?;
        let row: ContactRow = diesel::insert_into(contact_submissions::table)
            .values(&NewContactRow {
                id: Uuid::new_v4(),
                name: &draft.name,
                email: &draft.email,
                subject: &draft.subject,
                message: &draft.message,
            })
            .returning(ContactRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        ContactSubmission::try_from(row).map_err(map_decode_error)
    }

    async fn list_contact(
        &self,
        query: &ContactQuery,
    ) -> Result<Page<ContactSubmission>, ModerationRepositoryError> {
        let mut conn = self.connection().await?;
        let total: i64 = filtered_contact(query)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let selected = filtered_contact(query).select(ContactRow::as_select());
        let ordered = match query.sort {
            ContactSort::CreatedAt => {
                order_by_direction!(selected, contact_submissions::created_at, query.direction)
            }
            ContactSort::Status => {
                order_by_direction!(selected, contact_submissions::status, query.direction)
            }
            ContactSort::Subject => {
                order_by_direction!(selected, contact_submissions::subject, query.direction)
            }
        };
        let (limit, offset) = limit_offset(query.page);
        let rows: Vec<ContactRow> = ordered
            .then_order_by(contact_submissions::id.asc())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(ContactSubmission::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_decode_error)?;
        Ok(into_page(items, query.page, total))
    }

    async fn set_contact_status(
        &self,
        id: ContactId,
        status: ModerationStatus,
    ) -> Result<Option<ContactSubmission>, ModerationRepositoryError> {
        let mut conn = self.connection().await?;
        let updated: Option<ContactRow> =
            diesel::update(contact_submissions::table.find(*id.as_uuid()))
                .set(contact_submissions::status.eq(status.as_str()))
                .returning(ContactRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
        updated
            .map(ContactSubmission::try_from)
            .transpose()
            .map_err(map_decode_error)
    }

    async fn status_counts(&self) -> Result<ModerationCounts, ModerationRepositoryError> {
        let mut conn = self.connection().await?;
        let flags: Vec<(String, i64)> = video_flags::table
            .group_by(video_flags::status)
            .select((video_flags::status, count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let claims: Vec<(String, i64)> = copyright_claims::table
            .group_by(copyright_claims::status)
            .select((copyright_claims::status, count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let contact: Vec<(String, i64)> = contact_submissions::table
            .group_by(contact_submissions::status)
            .select((contact_submissions::status, count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(ModerationCounts {
            flags: counts_from(flags)?,
            copyright_claims: counts_from(claims)?,
            contact_submissions: counts_from(contact)?,
        })
    }
}
