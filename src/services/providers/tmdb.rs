/// TMDB metadata provider
///
/// Two calls against `/search/movie`:
/// 1. Search: top results for the user to pick from (thumbnail posters, cached).
/// 2. Best match: first result for a title, used when a record arrives without a poster.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieCandidate, PosterMatch, TmdbMovie, TmdbSearchResponse},
    services::providers::{is_searchable, MetadataProvider, MAX_CANDIDATES},
};
use reqwest::Client as HttpClient;

const SEARCH_CACHE_TTL: u64 = 300; // 5 minutes
const POSTER_SIZE: &str = "w500";
const THUMBNAIL_SIZE: &str = "w185";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    image_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(
        cache: Cache,
        api_key: Option<String>,
        api_url: String,
        image_url: String,
    ) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("TMDB_API_KEY not set, metadata lookups will return no results");
        }

        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_url: image_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    fn poster_url(&self, size: &str, poster_path: Option<&str>) -> Option<String> {
        poster_path
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}/{}{}", self.image_url, size, path))
    }

    fn to_candidate(&self, movie: TmdbMovie) -> MovieCandidate {
        MovieCandidate {
            tmdb_id: movie.id,
            year: movie.release_year(),
            poster_url: self.poster_url(THUMBNAIL_SIZE, movie.poster_path.as_deref()),
            title: movie.title,
        }
    }

    /// Maps search results to candidates, keeping the first `MAX_CANDIDATES` in TMDB's order
    fn candidates(&self, movies: Vec<TmdbMovie>) -> Vec<MovieCandidate> {
        movies
            .into_iter()
            .take(MAX_CANDIDATES)
            .map(|movie| self.to_candidate(movie))
            .collect()
    }

    fn to_poster_match(&self, movie: &TmdbMovie) -> PosterMatch {
        PosterMatch {
            tmdb_id: movie.id,
            poster_url: self.poster_url(POSTER_SIZE, movie.poster_path.as_deref()),
        }
    }

    /// Search through the cache. Failed lookups propagate and are not cached.
    async fn cached_search(&self, api_key: &str, query: &str) -> AppResult<Vec<MovieCandidate>> {
        cached!(
            self.cache,
            CacheKey::MovieSearch(query.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                let movies = self.search_movies(api_key, query, None).await?;
                let candidates = self.candidates(movies);

                tracing::info!(
                    query = %query,
                    results = candidates.len(),
                    provider = "tmdb",
                    "Movie search completed"
                );

                Ok::<_, AppError>(candidates)
            }
        )
    }

    async fn search_movies(
        &self,
        api_key: &str,
        title: &str,
        year: Option<i32>,
    ) -> AppResult<Vec<TmdbMovie>> {
        let url = format!("{}/search/movie", self.api_url);

        let mut params = vec![
            ("api_key", api_key.to_string()),
            ("query", title.to_string()),
            ("page", "1".to_string()),
        ];
        if let Some(year) = year {
            params.push(("year", year.to_string()));
        }

        let response = self.http_client.get(&url).query(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let search: TmdbSearchResponse = response.json().await?;
        Ok(search.results)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search(&self, query: &str) -> AppResult<Vec<MovieCandidate>> {
        if !is_searchable(query) {
            return Ok(Vec::new());
        }
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };
        let query = query.trim();

        match self.cached_search(api_key, query).await {
            Ok(candidates) => Ok(candidates),
            Err(e) => {
                tracing::warn!(
                    query = %query,
                    error = %e,
                    provider = "tmdb",
                    "Movie search failed, returning no candidates"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn best_match(&self, title: &str, year: Option<i32>) -> AppResult<Option<PosterMatch>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        let movies = self.search_movies(api_key, title.trim(), year).await?;
        let best = movies.first().map(|movie| self.to_poster_match(movie));

        tracing::debug!(
            title = %title,
            year = ?year,
            tmdb_id = ?best.as_ref().map(|m| m.tmdb_id),
            "Resolved best TMDB match"
        );

        Ok(best)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_redis_client;

    async fn create_test_provider(api_key: Option<&str>) -> TmdbProvider {
        let client = create_redis_client("redis://localhost:6379").unwrap();
        let (cache, _handle) = Cache::new(client).await;
        TmdbProvider::new(
            cache,
            api_key.map(str::to_string),
            "http://test.local/3/".to_string(),
            "https://image.tmdb.org/t/p/".to_string(),
        )
    }

    fn movie(poster_path: Option<&str>, release_date: Option<&str>) -> TmdbMovie {
        TmdbMovie {
            id: 27205,
            title: "Inception".to_string(),
            release_date: release_date.map(str::to_string),
            poster_path: poster_path.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_candidate_uses_thumbnail_poster() {
        let provider = create_test_provider(Some("key")).await;
        let candidate = provider.to_candidate(movie(Some("/inception.jpg"), Some("2010-07-15")));

        assert_eq!(
            candidate,
            MovieCandidate {
                tmdb_id: 27205,
                title: "Inception".to_string(),
                year: Some("2010".to_string()),
                poster_url: Some("https://image.tmdb.org/t/p/w185/inception.jpg".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_poster_match_uses_full_size_poster() {
        let provider = create_test_provider(Some("key")).await;
        let best = provider.to_poster_match(&movie(Some("/inception.jpg"), None));

        assert_eq!(best.tmdb_id, 27205);
        assert_eq!(
            best.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/inception.jpg")
        );
    }

    #[tokio::test]
    async fn test_missing_poster_path_yields_no_url() {
        let provider = create_test_provider(Some("key")).await;
        assert_eq!(provider.to_candidate(movie(None, None)).poster_url, None);
        assert_eq!(provider.to_candidate(movie(Some(""), None)).poster_url, None);
    }

    #[tokio::test]
    async fn test_candidates_capped_in_result_order() {
        let provider = create_test_provider(Some("key")).await;
        let movies: Vec<TmdbMovie> = (1..=10)
            .map(|id| TmdbMovie {
                id,
                title: format!("Movie {}", id),
                release_date: None,
                poster_path: None,
            })
            .collect();

        let candidates = provider.candidates(movies);

        assert_eq!(candidates.len(), MAX_CANDIDATES);
        let ids: Vec<i64> = candidates.iter().map(|c| c.tmdb_id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_failed_search_degrades_to_no_candidates() {
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, _handle) = Cache::new(client).await;
        let provider = TmdbProvider::new(
            cache,
            Some("key".to_string()),
            "http://127.0.0.1:1/3".to_string(),
            "https://image.tmdb.org/t/p".to_string(),
        );

        assert!(provider.search("Inception").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_short_query_returns_nothing() {
        let provider = create_test_provider(Some("key")).await;
        assert!(provider.search(" x ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_without_api_key_lookups_are_empty() {
        let provider = create_test_provider(None).await;
        assert!(provider.search("Inception").await.unwrap().is_empty());
        assert_eq!(provider.best_match("Inception", Some(2010)).await.unwrap(), None);
    }

    #[test]
    fn test_search_response_deserialization() {
        let json = r#"{
            "page": 1,
            "results": [
                { "id": 27205, "title": "Inception", "release_date": "2010-07-15", "poster_path": "/inception.jpg" },
                { "id": 64956, "title": "Inception: The Cobol Job", "release_date": "", "poster_path": null }
            ]
        }"#;

        let response: TmdbSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[1].release_year(), None);
        assert_eq!(response.results[1].poster_path, None);
    }
}
