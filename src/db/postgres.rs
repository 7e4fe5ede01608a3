use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    db::WatchStore,
    error::{AppError, AppResult},
    models::{NewWatchRecord, WatchRecord, WatchUpdate},
};

/// Creates a PostgreSQL connection pool
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded migrations in `migrations/`
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!().run(pool).await?;
    Ok(())
}

/// `WatchStore` backed by the `movie_watches` table
#[derive(Clone)]
pub struct PgWatchStore {
    pool: PgPool,
}

impl PgWatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl WatchStore for PgWatchStore {
    async fn list(&self) -> AppResult<Vec<WatchRecord>> {
        let records = sqlx::query_as::<_, WatchRecord>(
            r#"
            SELECT id, title, watch_date, platform, tmdb_id, poster_url, created_at
            FROM movie_watches
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn insert(&self, new: NewWatchRecord) -> AppResult<WatchRecord> {
        let record = sqlx::query_as::<_, WatchRecord>(
            r#"
            INSERT INTO movie_watches (id, title, watch_date, platform, tmdb_id, poster_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, watch_date, platform, tmdb_id, poster_url, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(new.watch_date)
        .bind(&new.platform)
        .bind(new.tmdb_id)
        .bind(&new.poster_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update(&self, id: Uuid, update: WatchUpdate) -> AppResult<WatchRecord> {
        sqlx::query_as::<_, WatchRecord>(
            r#"
            UPDATE movie_watches
            SET platform = $2, watch_date = $3
            WHERE id = $1
            RETURNING id, title, watch_date, platform, tmdb_id, poster_url, created_at
            "#,
        )
        .bind(id)
        .bind(&update.platform)
        .bind(update.watch_date)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("watch record {}", id)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM movie_watches WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("watch record {}", id)));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
