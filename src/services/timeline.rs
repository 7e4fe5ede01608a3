use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use crate::models::WatchRecord;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    #[error("Malformed watch date {0:?}: use YYYY-MM-DD or RFC 3339")]
    MalformedTimestamp(String),
}

/// All records watched in one UTC year, newest month first
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YearGroup<'a> {
    pub year: i32,
    pub months: Vec<MonthGroup<'a>>,
}

/// All records watched in one UTC month, newest day first
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthGroup<'a> {
    /// 0 = January .. 11 = December
    pub month: u32,
    pub month_name: &'static str,
    pub days: Vec<DayGroup<'a>>,
}

/// All records sharing one UTC calendar day, newest first
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayGroup<'a> {
    pub day: u32,
    pub movies: Vec<&'a WatchRecord>,
}

/// English name of a 0-based month
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES.get(month as usize).copied().unwrap_or("")
}

/// Parses a watch date given either as a bare `YYYY-MM-DD` (UTC midnight) or as RFC 3339.
pub fn parse_watch_date(input: &str) -> Result<DateTime<Utc>, TimelineError> {
    let trimmed = input.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| TimelineError::MalformedTimestamp(input.to_string()))
}

/// Newest-first ordering by full timestamp.
///
/// Equal timestamps fall back to ascending id so the result never depends on the
/// order storage happened to return rows in.
pub fn newest_first(a: &WatchRecord, b: &WatchRecord) -> Ordering {
    b.watch_date
        .cmp(&a.watch_date)
        .then_with(|| a.id.cmp(&b.id))
}

/// Working copy of `records` sorted with `newest_first`
pub fn sort_newest_first(records: &[WatchRecord]) -> Vec<&WatchRecord> {
    let mut sorted: Vec<&WatchRecord> = records.iter().collect();
    sorted.sort_by(|a, b| newest_first(a, b));
    sorted
}

/// Groups records into a year → month → day tree, every level newest first.
///
/// One pass over the sorted working copy: descending timestamps make every
/// year, month and day key contiguous, so a bucket only ever needs to be
/// compared with the last one opened at its level.
pub fn group_by_date(records: &[WatchRecord]) -> Vec<YearGroup<'_>> {
    let mut years: Vec<YearGroup<'_>> = Vec::new();

    for record in sort_newest_first(records) {
        let date = record.watch_date.date_naive();
        let (year, month, day) = (date.year(), date.month0(), date.day());

        let year_group = last_or_push(
            &mut years,
            |group| group.year == year,
            || YearGroup {
                year,
                months: Vec::new(),
            },
        );
        let month_group = last_or_push(
            &mut year_group.months,
            |group| group.month == month,
            || MonthGroup {
                month,
                month_name: month_name(month),
                days: Vec::new(),
            },
        );
        let day_group = last_or_push(
            &mut month_group.days,
            |group| group.day == day,
            || DayGroup {
                day,
                movies: Vec::new(),
            },
        );

        day_group.movies.push(record);
    }

    tracing::debug!(
        records = records.len(),
        years = years.len(),
        "Grouped watch records by date"
    );

    years
}

fn last_or_push<T>(
    groups: &mut Vec<T>,
    matches: impl Fn(&T) -> bool,
    create: impl FnOnce() -> T,
) -> &mut T {
    if !groups.last().is_some_and(|group| matches(group)) {
        groups.push(create());
    }
    let last = groups.len() - 1;
    &mut groups[last]
}
