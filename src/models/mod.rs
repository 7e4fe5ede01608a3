pub mod metadata;
pub mod watch;

pub use metadata::{MovieCandidate, PosterMatch, TmdbMovie, TmdbSearchResponse};
pub use watch::{NewWatchRecord, WatchRecord, WatchUpdate};
