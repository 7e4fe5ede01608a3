use serde::Deserialize;
use uuid::Uuid;

use crate::{
    db::WatchStore,
    error::{AppError, AppResult},
    middleware::WriteCapability,
    models::{NewWatchRecord, WatchRecord, WatchUpdate},
    services::{
        providers::MetadataProvider,
        timeline::{newest_first, parse_watch_date},
    },
};

#[derive(Debug, Deserialize)]
pub struct CreateWatchRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub platform: String,
    /// `YYYY-MM-DD` or RFC 3339; defaults to now
    #[serde(default)]
    pub watch_date: Option<String>,
    /// Release-year hint for the poster lookup
    #[serde(default)]
    pub year: Option<i32>,
    /// Set when the caller already picked a metadata candidate
    #[serde(default)]
    pub tmdb_id: Option<i64>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditWatchRequest {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub watch_date: String,
}

/// Full log, newest first
pub async fn list_watches(store: &dyn WatchStore) -> AppResult<Vec<WatchRecord>> {
    let mut records = store.list().await?;
    records.sort_by(newest_first);
    Ok(records)
}

/// Logs a new watch, filling in poster art from the metadata provider when the
/// caller did not pick one.
pub async fn create_watch(
    _capability: &WriteCapability,
    store: &dyn WatchStore,
    metadata: &dyn MetadataProvider,
    request: CreateWatchRequest,
) -> AppResult<WatchRecord> {
    let title = required("title", &request.title)?;
    let platform = required("platform", &request.platform)?;
    let watch_date = match request.watch_date.as_deref().map(str::trim) {
        Some(date) if !date.is_empty() => parse_watch_date(date)?,
        _ => chrono::Utc::now(),
    };

    let chosen_poster = request.poster_url.filter(|url| !url.trim().is_empty());
    let (tmdb_id, poster_url) = if request.tmdb_id.is_some() || chosen_poster.is_some() {
        (request.tmdb_id, chosen_poster)
    } else {
        match metadata.best_match(&title, request.year).await {
            Ok(Some(found)) => (Some(found.tmdb_id), found.poster_url),
            Ok(None) => (None, None),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    title = %title,
                    provider = metadata.name(),
                    "Poster lookup failed, saving without poster"
                );
                (None, None)
            }
        }
    };

    let record = store
        .insert(NewWatchRecord {
            title,
            watch_date,
            platform,
            tmdb_id,
            poster_url,
        })
        .await?;

    tracing::info!(
        id = %record.id,
        title = %record.title,
        watch_date = %record.watch_date,
        store = store.name(),
        "Watch logged"
    );

    Ok(record)
}

/// Changes the platform and date of an existing watch
pub async fn edit_watch(
    _capability: &WriteCapability,
    store: &dyn WatchStore,
    id: Uuid,
    request: EditWatchRequest,
) -> AppResult<WatchRecord> {
    let platform = required("platform", &request.platform)?;
    let watch_date = parse_watch_date(&request.watch_date)?;

    let record = store.update(id, WatchUpdate { platform, watch_date }).await?;
    tracing::info!(id = %id, "Watch updated");
    Ok(record)
}

pub async fn delete_watch(
    _capability: &WriteCapability,
    store: &dyn WatchStore,
    id: Uuid,
) -> AppResult<()> {
    store.delete(id).await?;
    tracing::info!(id = %id, "Watch deleted");
    Ok(())
}

fn required(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}
