use std::sync::Arc;

use crate::{db::WatchStore, middleware::WriteGuard, services::MetadataProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WatchStore>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub write_guard: WriteGuard,
}

impl AppState {
    pub fn new(
        store: Arc<dyn WatchStore>,
        metadata: Arc<dyn MetadataProvider>,
        write_guard: WriteGuard,
    ) -> Self {
        tracing::info!(
            store = store.name(),
            metadata = metadata.name(),
            writes_enabled = write_guard.writes_enabled(),
            "Application state ready"
        );

        Self {
            store,
            metadata,
            write_guard,
        }
    }
}
