use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::WatchStore,
    error::{AppError, AppResult},
    models::{NewWatchRecord, WatchRecord, WatchUpdate},
};

/// `WatchStore` kept in process memory
#[derive(Clone, Default)]
pub struct InMemoryWatchStore {
    records: Arc<RwLock<HashMap<Uuid, WatchRecord>>>,
}

impl InMemoryWatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with existing records
    pub fn with_records(records: impl IntoIterator<Item = WatchRecord>) -> Self {
        let records = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }
}

#[async_trait::async_trait]
impl WatchStore for InMemoryWatchStore {
    async fn list(&self) -> AppResult<Vec<WatchRecord>> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn insert(&self, new: NewWatchRecord) -> AppResult<WatchRecord> {
        let record = WatchRecord::from_new(new);
        let mut records = self.records.write().await;
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, update: WatchUpdate) -> AppResult<WatchRecord> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("watch record {}", id)))?;

        record.platform = update.platform;
        record.watch_date = update.watch_date;
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut records = self.records.write().await;
        records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("watch record {}", id)))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn new_record(title: &str) -> NewWatchRecord {
        NewWatchRecord {
            title: title.to_string(),
            watch_date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            platform: "Criterion".to_string(),
            tmdb_id: None,
            poster_url: None,
        }
    }

    #[test]
    fn test_insert_then_list() {
        let store = InMemoryWatchStore::new();

        tokio_test::block_on(async {
            let inserted = store.insert(new_record("Ikiru")).await.unwrap();
            let listed = store.list().await.unwrap();

            assert_eq!(listed, vec![inserted]);
        });
    }

    #[tokio::test]
    async fn test_update_changes_platform_and_date_only() {
        let store = InMemoryWatchStore::new();
        let inserted = store.insert(new_record("Ran")).await.unwrap();
        let new_date = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        let updated = store
            .update(
                inserted.id,
                WatchUpdate {
                    platform: "Blu-ray".to_string(),
                    watch_date: new_date,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Ran");
        assert_eq!(updated.platform, "Blu-ray");
        assert_eq!(updated.watch_date, new_date);
        assert_eq!(updated.created_at, inserted.created_at);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let store = InMemoryWatchStore::new();
        let update = WatchUpdate {
            platform: "Cinema".to_string(),
            watch_date: Utc::now(),
        };

        assert!(matches!(
            store.update(Uuid::new_v4(), update).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = InMemoryWatchStore::new();
        let inserted = store.insert(new_record("Yojimbo")).await.unwrap();

        store.delete(inserted.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
