//! PostgreSQL-backed `CatalogueRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::{count_star, sql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use diesel_async::scoped_futures::ScopedFutureExt;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{
    CatalogueTotals, Channel, ChannelId, ChannelQuery, ChannelSort, ChannelStatus, Page, Video,
    VideoId, VideoQuery, VideoSort, VideoStatus,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_listing::{contains_pattern, into_page, limit_offset, order_by_direction};
use super::models::{ChannelRow, RowDecodeError, VideoRow, decode_count};
use super::pool::{DbPool, PoolError};
use super::schema::{channels, users, videos};

/// Diesel-backed implementation of the admin catalogue port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    map_basic_pool_error(error, |message| CatalogueRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    map_basic_diesel_error(
        error,
        CatalogueRepositoryError::query,
        CatalogueRepositoryError::connection,
    )
}

fn map_decode_error(error: RowDecodeError) -> CatalogueRepositoryError {
    CatalogueRepositoryError::query(error.to_string())
}

fn filtered_channels(query: &ChannelQuery) -> channels::BoxedQuery<'static, Pg> {
    let mut boxed = channels::table.into_boxed();
    if let Some(status) = query.status {
        boxed = boxed.filter(channels::status.eq(status.as_str()));
    }
    if let Some(term) = &query.search {
        boxed = boxed.filter(channels::name.ilike(contains_pattern(term)));
    }
    boxed
}

fn filtered_videos(query: &VideoQuery) -> videos::BoxedQuery<'static, Pg> {
    let mut boxed = videos::table.into_boxed();
    if let Some(status) = query.status {
        boxed = boxed.filter(videos::status.eq(status.as_str()));
    }
    if let Some(term) = &query.search {
        boxed = boxed.filter(videos::title.ilike(contains_pattern(term)));
    }
    boxed
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list_channels(
        &self,
        query: &ChannelQuery,
    ) -> Result<Page<Channel>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered_channels(query)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let selected = filtered_channels(query).select(ChannelRow::as_select());
        let ordered = match query.sort {
            ChannelSort::CreatedAt => {
                order_by_direction!(selected, channels::created_at, query.direction)
            }
            ChannelSort::Name => order_by_direction!(selected, channels::name, query.direction),
            ChannelSort::Subscribers => {
                order_by_direction!(selected, channels::subscriber_count, query.direction)
            }
            ChannelSort::TotalViews => {
                order_by_direction!(selected, channels::total_views, query.direction)
            }
        };
        let (limit, offset) = limit_offset(query.page);
        let rows: Vec<ChannelRow> = ordered
            .then_order_by(channels::id.asc())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(Channel::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_decode_error)?;
        Ok(into_page(items, query.page, total))
    }

    async fn list_videos(&self, query: &VideoQuery) -> Result<Page<Video>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered_videos(query)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let selected = filtered_videos(query).select(VideoRow::as_select());
        let ordered = match query.sort {
            VideoSort::CreatedAt => {
                order_by_direction!(selected, videos::created_at, query.direction)
            }
            VideoSort::Title => order_by_direction!(selected, videos::title, query.direction),
            VideoSort::Views => order_by_direction!(selected, videos::view_count, query.direction),
            VideoSort::Likes => order_by_direction!(selected, videos::like_count, query.direction),
        };
        let (limit, offset) = limit_offset(query.page);
        let rows: Vec<VideoRow> = ordered
            .then_order_by(videos::id.asc())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(Video::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_decode_error)?;
        Ok(into_page(items, query.page, total))
    }

    async fn set_channel_status(
        &self,
        id: ChannelId,
        status: ChannelStatus,
    ) -> Result<Option<Channel>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ChannelRow> = diesel::update(channels::table.find(*id.as_uuid()))
            .set(channels::status.eq(status.as_str()))
            .returning(ChannelRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Channel::try_from).transpose().map_err(map_decode_error)
    }

    async fn set_video_status(
        &self,
        id: VideoId,
        status: VideoStatus,
    ) -> Result<Option<Video>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<VideoRow> = diesel::update(videos::table.find(*id.as_uuid()))
            .set(videos::status.eq(status.as_str()))
            .returning(VideoRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Video::try_from).transpose().map_err(map_decode_error)
    }

    async fn totals(&self) -> Result<CatalogueTotals, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // One snapshot for all four counts.
        let (user_count, channel_count, video_count, view_sum) = conn
            .transaction(|conn| {
                async move {
                    let user_count: i64 = users::table.select(count_star()).get_result(conn).await?;
                    let channel_count: i64 =
                        channels::table.select(count_star()).get_result(conn).await?;
                    let video_count: i64 =
                        videos::table.select(count_star()).get_result(conn).await?;
                    let view_sum: i64 = videos::table
                        .select(sql::<BigInt>("COALESCE(SUM(view_count), 0)::BIGINT"))
                        .get_result(conn)
                        .await?;
                    Ok((user_count, channel_count, video_count, view_sum))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let decode = |column, raw| decode_count(column, raw).map_err(map_decode_error);
        Ok(CatalogueTotals {
            users: decode("users", user_count)?,
            channels: decode("channels", channel_count)?,
            videos: decode("videos", video_count)?,
            views: decode("views", view_sum)?,
        })
    }
}
