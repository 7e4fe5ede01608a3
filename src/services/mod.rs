pub mod calendar;
pub mod movies;
pub mod providers;
pub mod timeline;

pub use calendar::{build_month_grid, index_by_day, CalendarCursor, DayIndex, DayKey, GridCell};
pub use providers::MetadataProvider;
pub use timeline::{group_by_date, YearGroup};
