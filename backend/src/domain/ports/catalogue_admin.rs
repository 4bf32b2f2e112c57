//! Driving port for admin catalogue management and the dashboard.

use async_trait::async_trait;

use crate::domain::{
    Channel, ChannelId, ChannelQuery, ChannelStatus, DashboardStats, Error, Page, Video, VideoId,
    VideoQuery, VideoStatus,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueAdmin: Send + Sync {
    async fn list_channels(&self, query: ChannelQuery) -> Result<Page<Channel>, Error>;

    async fn list_videos(&self, query: VideoQuery) -> Result<Page<Video>, Error>;

    async fn set_channel_status(&self, id: ChannelId, status: ChannelStatus)
    -> Result<Channel, Error>;

    async fn set_video_status(&self, id: VideoId, status: VideoStatus) -> Result<Video, Error>;

    /// Platform totals and moderation counts.
    async fn dashboard(&self) -> Result<DashboardStats, Error>;
}
