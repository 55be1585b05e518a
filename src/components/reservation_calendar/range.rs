use super::models::NormalizedEntry;
use crate::error::{AppResult, Error};
use chrono::{Datelike, Days, Months, NaiveDate};
use std::fmt;
use tracing::warn;

/// Days shown by a month grid: six Monday-first weeks
pub const GRID_DAYS: i64 = 42;

/// Visible date window, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if start > end {
            return Err(Error::InvalidDate(format!(
                "window start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Build from the strings a rendering surface reports, which may carry a time part
    pub fn from_surface_strs(start: &str, end: &str) -> AppResult<Self> {
        Self::new(parse_date(date_part(start))?, parse_date(date_part(end))?)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every day in the window, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// A calendar month, used to navigate month grids
///
/// Only valid months can be built, so the grid is always defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    first: NaiveDate,
}

impl MonthView {
    /// `None` for a month outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn next(&self) -> Self {
        self.first
            .checked_add_months(Months::new(1))
            .map_or(*self, |first| Self { first })
    }

    pub fn previous(&self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .map_or(*self, |first| Self { first })
    }

    /// The six-week grid that contains this month
    pub fn grid(&self) -> DateWindow {
        let lead = Days::new(u64::from(self.first.weekday().num_days_from_monday()));
        let start = self.first.checked_sub_days(lead).unwrap_or(NaiveDate::MIN);
        let end = start
            .checked_add_days(Days::new(GRID_DAYS as u64 - 1))
            .unwrap_or(NaiveDate::MAX);
        DateWindow { start, end }
    }
}

/// Keep entries dated inside the window; unparseable dates are dropped
pub fn filter_to_window(entries: Vec<NormalizedEntry>, window: &DateWindow) -> Vec<NormalizedEntry> {
    entries
        .into_iter()
        .filter(|entry| match parse_date(&entry.date) {
            Ok(date) => window.contains(date),
            Err(e) => {
                warn!(id = %entry.id, "Dropping entry with malformed date: {}", e);
                false
            }
        })
        .collect()
}

pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| Error::InvalidDate(format!("'{}': {}", value, e)))
}

fn date_part(value: &str) -> &str {
    value.split('T').next().unwrap_or(value)
}
