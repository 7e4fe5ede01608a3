/// Movie metadata lookup
///
/// Supplies titles, release years and poster art for the add dialog and for
/// records created without a poster. Only the shape of what comes back matters
/// to the rest of the service; the concrete provider is swappable.
use crate::{
    error::AppResult,
    models::{MovieCandidate, PosterMatch},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Upper bound on candidates returned by a search
pub const MAX_CANDIDATES: usize = 8;

/// Queries shorter than this (after trimming) return no candidates
pub const MIN_QUERY_CHARS: usize = 2;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Candidates for a free-text title search, at most `MAX_CANDIDATES`
    async fn search(&self, query: &str) -> AppResult<Vec<MovieCandidate>>;

    /// Single best match for a title, optionally narrowed by release year
    async fn best_match(&self, title: &str, year: Option<i32>) -> AppResult<Option<PosterMatch>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// True when `query` is long enough to be worth sending to a provider
pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_searchable() {
        assert!(!is_searchable(""));
        assert!(!is_searchable(" a "));
        assert!(is_searchable("Up"));
        assert!(is_searchable("Amélie"));
    }
}
