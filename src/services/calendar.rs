use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use crate::models::WatchRecord;
use crate::services::timeline::{month_name, sort_newest_first};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid month {month} for year {year}: expected 0-11")]
    InvalidMonth { year: i32, month: u32 },
}

/// One slot of the 7-column month grid. Serializes as `null` or the day number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GridCell {
    Empty,
    Day(u32),
}

/// Composite calendar-day key in the UTC frame, month 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DayKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DayKey {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Key of the UTC calendar day a timestamp falls on
    pub fn of(timestamp: &DateTime<Utc>) -> Self {
        let date = timestamp.date_naive();
        Self::new(date.year(), date.month0(), date.day())
    }
}

impl Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    if month > 11 {
        return Err(CalendarError::InvalidMonth { year, month });
    }
    NaiveDate::from_ymd_opt(year, month + 1, 1).ok_or(CalendarError::InvalidMonth { year, month })
}

/// Number of days in a 0-based month, taken as "day 0" of the following month
pub fn days_in_month(year: i32, month: u32) -> Result<u32, CalendarError> {
    first_of_month(year, month)?;

    // December always has 31 days, and January of the next year may be past chrono's range
    if month == 11 {
        return Ok(31);
    }

    NaiveDate::from_ymd_opt(year, month + 2, 1)
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .ok_or(CalendarError::InvalidMonth { year, month })
}

/// Builds the display grid for a 0-based month.
///
/// Alignment uses the civil date of the 1st (weekday 0 = Sunday), independent of
/// any UTC conversion; records are keyed separately by UTC day in `index_by_day`.
pub fn build_month_grid(year: i32, month: u32) -> Result<Vec<GridCell>, CalendarError> {
    let first_weekday = first_of_month(year, month)?
        .weekday()
        .num_days_from_sunday() as usize;
    let days = days_in_month(year, month)?;

    let mut cells = vec![GridCell::Empty; first_weekday];
    cells.extend((1..=days).map(GridCell::Day));
    while cells.len() % 7 != 0 {
        cells.push(GridCell::Empty);
    }

    Ok(cells)
}

/// Records of one displayed month, looked up by UTC calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DayIndex<'a> {
    year: i32,
    month: u32,
    days: HashMap<DayKey, Vec<&'a WatchRecord>>,
}

impl<'a> DayIndex<'a> {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Records watched on the given day, empty when there are none
    pub fn lookup(&self, key: &DayKey) -> &[&'a WatchRecord] {
        self.days.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Same as `lookup` for a day of the indexed month
    pub fn records_on(&self, day: u32) -> &[&'a WatchRecord] {
        self.lookup(&DayKey::new(self.year, self.month, day))
    }

    pub fn contains(&self, key: &DayKey) -> bool {
        self.days.contains_key(key)
    }

    /// Number of days that have at least one record
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Consumes the index into a day-number map ordered by day
    pub fn into_days(self) -> BTreeMap<u32, Vec<&'a WatchRecord>> {
        self.days
            .into_iter()
            .map(|(key, records)| (key.day, records))
            .collect()
    }
}

/// Indexes the records of one 0-based month by their UTC calendar day.
///
/// Records outside the month are skipped. Each day's list is newest first.
pub fn index_by_day(records: &[WatchRecord], year: i32, month: u32) -> DayIndex<'_> {
    let mut days: HashMap<DayKey, Vec<&WatchRecord>> = HashMap::new();

    for record in sort_newest_first(records) {
        let key = DayKey::of(&record.watch_date);
        if key.year == year && key.month == month {
            days.entry(key).or_default().push(record);
        }
    }

    DayIndex { year, month, days }
}

/// Year and 0-based month, used for navigation links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

/// Navigation and day-selection state of the calendar view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCursor {
    year: i32,
    month: u32,
    selected: Option<DayKey>,
}

impl CalendarCursor {
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        first_of_month(year, month)?;
        Ok(Self {
            year,
            month,
            selected: None,
        })
    }

    /// Cursor on the UTC month containing `timestamp`
    pub fn containing(timestamp: &DateTime<Utc>) -> Self {
        let key = DayKey::of(timestamp);
        Self {
            year: key.year,
            month: key.month,
            selected: None,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn selected(&self) -> Option<DayKey> {
        self.selected
    }

    pub fn position(&self) -> MonthRef {
        MonthRef {
            year: self.year,
            month: self.month,
        }
    }

    pub fn previous_month(&mut self) {
        if self.month == 0 {
            self.month = 11;
            self.year = self.year.saturating_sub(1);
        } else {
            self.month -= 1;
        }
        self.selected = None;
    }

    pub fn next_month(&mut self) {
        if self.month == 11 {
            self.month = 0;
            self.year = self.year.saturating_add(1);
        } else {
            self.month += 1;
        }
        self.selected = None;
    }

    /// Toggles the selection of a day of the current month.
    ///
    /// Days without records in `index` cannot be selected and leave the state untouched.
    pub fn select_day(&mut self, day: u32, index: &DayIndex<'_>) -> Option<DayKey> {
        let key = DayKey::new(self.year, self.month, day);
        if !index.contains(&key) {
            return self.selected;
        }

        self.selected = if self.selected == Some(key) {
            None
        } else {
            Some(key)
        };
        self.selected
    }

    pub fn grid(&self) -> Result<Vec<GridCell>, CalendarError> {
        build_month_grid(self.year, self.month)
    }
}

/// Everything the calendar view needs to render one month
#[derive(Debug, Clone, Serialize)]
pub struct MonthView<'a> {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub cells: Vec<GridCell>,
    pub days: BTreeMap<u32, Vec<&'a WatchRecord>>,
    pub selected: Option<DayKey>,
    pub selected_movies: Vec<&'a WatchRecord>,
    pub previous: MonthRef,
    pub next: MonthRef,
}

impl<'a> MonthView<'a> {
    pub fn new(cursor: &CalendarCursor, index: DayIndex<'a>) -> Result<Self, CalendarError> {
        let cells = cursor.grid()?;

        let selected_movies = cursor
            .selected()
            .map(|key| index.lookup(&key).to_vec())
            .unwrap_or_default();

        let mut previous = *cursor;
        previous.previous_month();
        let mut next = *cursor;
        next.next_month();

        Ok(Self {
            year: cursor.year(),
            month: cursor.month(),
            month_name: month_name(cursor.month()),
            cells,
            days: index.into_days(),
            selected: cursor.selected(),
            selected_movies,
            previous: previous.position(),
            next: next.position(),
        })
    }
}
