use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{NewWatchRecord, WatchRecord, WatchUpdate},
};

/// Persistence for watch records
///
/// Reads always return the full, unfiltered collection; ordering is left to the
/// timeline and calendar services.
#[async_trait::async_trait]
pub trait WatchStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<WatchRecord>>;

    async fn insert(&self, new: NewWatchRecord) -> AppResult<WatchRecord>;

    /// Fails with `NotFound` when no record has this id
    async fn update(&self, id: Uuid, update: WatchUpdate) -> AppResult<WatchRecord>;

    /// Fails with `NotFound` when no record has this id
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    fn name(&self) -> &'static str;
}
