//! Admin catalogue management and dashboard service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::moderation_service::map_moderation_error;
use crate::domain::ports::{
    CatalogueAdmin, CatalogueRepository, CatalogueRepositoryError, ModerationRepository,
};
use crate::domain::{
    Channel, ChannelId, ChannelQuery, ChannelStatus, DashboardStats, Error, Page, Video, VideoId,
    VideoQuery, VideoStatus,
};

fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalogue repository unavailable: {message}"))
        }
        CatalogueRepositoryError::Query { message } => {
            Error::internal(format!("catalogue repository error: {message}"))
        }
    }
}

/// Service implementing [`CatalogueAdmin`].
#[derive(Clone)]
pub struct CatalogueAdminService<C, M> {
    catalogue: Arc<C>,
    moderation: Arc<M>,
}

impl<C, M> CatalogueAdminService<C, M> {
    pub fn new(catalogue: Arc<C>, moderation: Arc<M>) -> Self {
        Self {
            catalogue,
            moderation,
        }
    }
}

#[async_trait]
impl<C, M> CatalogueAdmin for CatalogueAdminService<C, M>
where
    C: CatalogueRepository,
    M: ModerationRepository,
{
    async fn list_channels(&self, query: ChannelQuery) -> Result<Page<Channel>, Error> {
        self.catalogue
            .list_channels(&query)
            .await
            .map_err(map_catalogue_error)
    }

    async fn list_videos(&self, query: VideoQuery) -> Result<Page<Video>, Error> {
        self.catalogue
            .list_videos(&query)
            .await
            .map_err(map_catalogue_error)
    }

    async fn set_channel_status(
        &self,
        id: ChannelId,
        status: ChannelStatus,
    ) -> Result<Channel, Error> {
        let channel = self
            .catalogue
            .set_channel_status(id, status)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("channel {id} not found")))?;
        info!(channel = %id, %status, "channel status changed");
        Ok(channel)
    }

    async fn set_video_status(&self, id: VideoId, status: VideoStatus) -> Result<Video, Error> {
        let video = self
            .catalogue
            .set_video_status(id, status)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("video {id} not found")))?;
        info!(video = %id, %status, "video status changed");
        Ok(video)
    }

    async fn dashboard(&self) -> Result<DashboardStats, Error> {
        let totals = self
            .catalogue
            .totals()
            .await
            .map_err(map_catalogue_error)?;
        let counts = self
            .moderation
            .status_counts()
            .await
            .map_err(map_moderation_error)?;
        Ok(DashboardStats {
            totals,
            flags: counts.flags,
            copyright_claims: counts.copyright_claims,
            contact_submissions: counts.contact_submissions,
        })
    }
}
