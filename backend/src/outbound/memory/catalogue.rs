//! Admin catalogue reads and status writes.

use async_trait::async_trait;

use super::{InMemoryStore, PoisonedStoreError, run_listing};
use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{
    CatalogueTotals, Channel, ChannelId, ChannelQuery, ChannelSort, ChannelStatus, Page, Video,
    VideoId, VideoQuery, VideoSort, VideoStatus,
};

impl From<PoisonedStoreError> for CatalogueRepositoryError {
    fn from(err: PoisonedStoreError) -> Self {
        Self::query(err.to_string())
    }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

#[async_trait]
impl CatalogueRepository for InMemoryStore {
    async fn list_channels(
        &self,
        query: &ChannelQuery,
    ) -> Result<Page<Channel>, CatalogueRepositoryError> {
        let state = self.lock()?;
        Ok(run_listing(
            state.channels.values().cloned(),
            query,
            |channel| (channel.status, channel.name.as_str()),
            |a, b| match query.sort {
                ChannelSort::CreatedAt => a.created_at.cmp(&b.created_at),
                ChannelSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                ChannelSort::Subscribers => a.subscriber_count.cmp(&b.subscriber_count),
                ChannelSort::TotalViews => a.total_views.cmp(&b.total_views),
            },
        ))
    }

    async fn list_videos(&self, query: &VideoQuery) -> Result<Page<Video>, CatalogueRepositoryError> {
        let state = self.lock()?;
        Ok(run_listing(
            state.videos.values().cloned(),
            query,
            |video| (video.status, video.title.as_str()),
            |a, b| match query.sort {
                VideoSort::CreatedAt => a.created_at.cmp(&b.created_at),
                VideoSort::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
                VideoSort::Views => a.counters.views.cmp(&b.counters.views),
                VideoSort::Likes => a.counters.likes.cmp(&b.counters.likes),
            },
        ))
    }

    async fn set_channel_status(
        &self,
        id: ChannelId,
        status: ChannelStatus,
    ) -> Result<Option<Channel>, CatalogueRepositoryError> {
        let mut state = self.lock()?;
        Ok(state.channels.get_mut(&id).map(|channel| {
            channel.status = status;
            channel.clone()
        }))
    }

    async fn set_video_status(
        &self,
        id: VideoId,
        status: VideoStatus,
    ) -> Result<Option<Video>, CatalogueRepositoryError> {
        let mut state = self.lock()?;
        Ok(state.videos.get_mut(&id).map(|video| {
            video.status = status;
            video.clone()
        }))
    }

    async fn totals(&self) -> Result<CatalogueTotals, CatalogueRepositoryError> {
        let state = self.lock()?;
        Ok(CatalogueTotals {
            users: count(state.users.len()),
            channels: count(state.channels.len()),
            videos: count(state.videos.len()),
            views: state.videos.values().map(|video| video.counters.views).sum(),
        })
    }
}
