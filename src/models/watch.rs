use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged viewing of a film
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct WatchRecord {
    pub id: Uuid,
    pub title: String,
    /// Only the UTC calendar date is meaningful for grouping; the full timestamp orders ties.
    pub watch_date: DateTime<Utc>,
    pub platform: String,
    pub tmdb_id: Option<i64>,
    pub poster_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WatchRecord {
    /// Builds a record the way storage would hand it back after an insert
    pub fn from_new(new: NewWatchRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            watch_date: new.watch_date,
            platform: new.platform,
            tmdb_id: new.tmdb_id,
            poster_url: new.poster_url,
            created_at: Utc::now(),
        }
    }
}

/// Validated insert payload handed to a `WatchStore`
#[derive(Debug, Clone, PartialEq)]
pub struct NewWatchRecord {
    pub title: String,
    pub watch_date: DateTime<Utc>,
    pub platform: String,
    pub tmdb_id: Option<i64>,
    pub poster_url: Option<String>,
}

/// Fields an edit is allowed to change
#[derive(Debug, Clone, PartialEq)]
pub struct WatchUpdate {
    pub platform: String,
    pub watch_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_new_keeps_payload() {
        let watch_date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let record = WatchRecord::from_new(NewWatchRecord {
            title: "Heat".to_string(),
            watch_date,
            platform: "Cinema".to_string(),
            tmdb_id: Some(949),
            poster_url: None,
        });

        assert_eq!(record.title, "Heat");
        assert_eq!(record.watch_date, watch_date);
        assert_eq!(record.platform, "Cinema");
        assert_eq!(record.tmdb_id, Some(949));
        assert_eq!(record.poster_url, None);
    }

    #[test]
    fn test_watch_record_serializes_snake_case() {
        let record = WatchRecord {
            id: Uuid::nil(),
            title: "Heat".to_string(),
            watch_date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            platform: "Cinema".to_string(),
            tmdb_id: None,
            poster_url: Some("https://image.tmdb.org/t/p/w500/heat.jpg".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["watch_date"], "2024-01-15T00:00:00Z");
        assert_eq!(json["poster_url"], "https://image.tmdb.org/t/p/w500/heat.jpg");
        assert!(json["tmdb_id"].is_null());
    }
}
