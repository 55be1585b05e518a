use super::models::NormalizedEntry;
use super::range::DateWindow;
use chrono::NaiveDate;
use rust_i18n::t;
use std::collections::HashMap;

/// Tint for days that can still be booked
pub const AVAILABLE_TINT: &str = "#f8f9fa";

/// Decoration of one day cell in the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub entry_count: usize,
    pub available: bool,
    pub tint: Option<&'static str>,
    pub tooltip: Option<String>,
}

/// Decorate every day of the window; empty days from today on are marked available
pub fn decorate_days(window: &DateWindow, entries: &[NormalizedEntry], today: NaiveDate) -> Vec<DayCell> {
    let mut per_date: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        *per_date.entry(entry.date.as_str()).or_default() += 1;
    }

    window
        .days()
        .map(|date| {
            let key = date.format("%Y-%m-%d").to_string();
            let entry_count = per_date.get(key.as_str()).copied().unwrap_or(0);
            let available = entry_count == 0 && date >= today;
            DayCell {
                date,
                entry_count,
                available,
                tint: available.then_some(AVAILABLE_TINT),
                tooltip: available.then(|| t!("day_available").to_string()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::reservation_calendar::models::{EntryColors, EntryProps};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry_on(date: &str) -> NormalizedEntry {
        NormalizedEntry {
            id: date.to_string(),
            title: "Room".to_string(),
            single_day: true,
            date: date.to_string(),
            colors: EntryColors::default(),
            extended_props: EntryProps::default(),
        }
    }

    #[test]
    fn only_free_days_from_today_are_available() {
        rust_i18n::set_locale("es");
        let window = DateWindow::new(ymd(2024, 3, 10), ymd(2024, 3, 14)).unwrap();
        let entries = vec![entry_on("2024-03-12"), entry_on("2024-03-12"), entry_on("2024-03-13")];

        let cells = decorate_days(&window, &entries, ymd(2024, 3, 11));
        let flags: Vec<_> = cells.iter().map(|c| (c.entry_count, c.available)).collect();
        assert_eq!(
            flags,
            vec![(0, false), (0, true), (2, false), (1, false), (0, true)]
        );

        let today = &cells[1];
        assert_eq!(today.tint, Some(AVAILABLE_TINT));
        assert_eq!(today.tooltip.as_deref(), Some("Día disponible"));
        assert_eq!(cells[0].tooltip, None);
    }
}
