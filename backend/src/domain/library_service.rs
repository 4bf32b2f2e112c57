//! Watch-later and history service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{Library, LibraryRepository, LibraryRepositoryError};
use crate::domain::{
    Error, UserId, VideoId, WatchHistoryEntry, WatchLaterEntry, WatchLaterToggle,
};

fn map_library_error(error: LibraryRepositoryError) -> Error {
    match error {
        LibraryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("library repository unavailable: {message}"))
        }
        LibraryRepositoryError::Query { message } => {
            Error::internal(format!("library repository error: {message}"))
        }
        LibraryRepositoryError::VideoNotFound { video_id } => {
            Error::not_found(format!("video {video_id} not found"))
        }
    }
}

/// Service implementing [`Library`].
#[derive(Clone)]
pub struct LibraryService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> LibraryService<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

#[async_trait]
impl<R> Library for LibraryService<R>
where
    R: LibraryRepository,
{
    async fn toggle_watch_later(
        &self,
        user: UserId,
        video: VideoId,
    ) -> Result<WatchLaterToggle, Error> {
        let saved = self
            .repo
            .toggle_watch_later(user, video, self.clock.utc())
            .await
            .map_err(map_library_error)?;
        Ok(WatchLaterToggle {
            video_id: video,
            saved,
        })
    }

    async fn watch_later(&self, user: UserId) -> Result<Vec<WatchLaterEntry>, Error> {
        self.repo.watch_later(user).await.map_err(map_library_error)
    }

    async fn history(&self, user: UserId) -> Result<Vec<WatchHistoryEntry>, Error> {
        self.repo.history(user).await.map_err(map_library_error)
    }

    async fn clear_history(&self, user: UserId) -> Result<u64, Error> {
        self.repo.clear_history(user).await.map_err(map_library_error)
    }
}
