//! Driven port for admin catalogue reads and writes.

use async_trait::async_trait;

use crate::domain::{
    CatalogueTotals, Channel, ChannelId, ChannelQuery, ChannelStatus, Page, Video, VideoId,
    VideoQuery, VideoStatus,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "catalogue repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    async fn list_channels(
        &self,
        query: &ChannelQuery,
    ) -> Result<Page<Channel>, CatalogueRepositoryError>;

    async fn list_videos(&self, query: &VideoQuery) -> Result<Page<Video>, CatalogueRepositoryError>;

    /// Set a channel's status; `None` when it does not exist.
    async fn set_channel_status(
        &self,
        id: ChannelId,
        status: ChannelStatus,
    ) -> Result<Option<Channel>, CatalogueRepositoryError>;

    /// Set a video's status; `None` when it does not exist.
    async fn set_video_status(
        &self,
        id: VideoId,
        status: VideoStatus,
    ) -> Result<Option<Video>, CatalogueRepositoryError>;

    /// Platform-wide totals.
    async fn totals(&self) -> Result<CatalogueTotals, CatalogueRepositoryError>;
}
