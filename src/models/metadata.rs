use serde::{Deserialize, Serialize};

/// A film offered by the metadata lookup for the user to pick from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieCandidate {
    pub tmdb_id: i64,
    pub title: String,
    /// Release year as shown to the user ("2010"), when known
    pub year: Option<String>,
    pub poster_url: Option<String>,
}

/// Poster art resolved for a title when a record is created without one
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PosterMatch {
    pub tmdb_id: i64,
    pub poster_url: Option<String>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw response from TMDB `/search/movie`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// One movie entry in a TMDB search response
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl TmdbMovie {
    /// Release year taken from the leading `YYYY` of `release_date`
    pub fn release_year(&self) -> Option<String> {
        self.release_date
            .as_deref()
            .filter(|date| date.len() >= 4)
            .and_then(|date| date.get(..4))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmdb_movie_deserialization_with_missing_fields() {
        let json = r#"{ "id": 27205, "title": "Inception" }"#;
        let movie: TmdbMovie = serde_json::from_str(json).unwrap();

        assert_eq!(movie.id, 27205);
        assert_eq!(movie.release_date, None);
        assert_eq!(movie.poster_path, None);
        assert_eq!(movie.release_year(), None);
    }

    #[test]
    fn test_release_year_from_date() {
        let movie = TmdbMovie {
            id: 27205,
            title: "Inception".to_string(),
            release_date: Some("2010-07-15".to_string()),
            poster_path: None,
        };
        assert_eq!(movie.release_year(), Some("2010".to_string()));
    }

    #[test]
    fn test_release_year_ignores_empty_date() {
        let movie = TmdbMovie {
            id: 1,
            title: "Untitled".to_string(),
            release_date: Some(String::new()),
            poster_path: None,
        };
        assert_eq!(movie.release_year(), None);
    }

    #[test]
    fn test_search_response_without_results() {
        let response: TmdbSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_empty());
    }
}
