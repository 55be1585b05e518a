use super::days::DayCell;
use super::models::NormalizedEntry;
use super::range::DateWindow;

/// Everything a rendering surface needs to draw one window
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarView {
    /// Request number that produced this view
    pub seq: u64,
    pub window: DateWindow,
    pub space_filter: Option<String>,
    pub entries: Vec<NormalizedEntry>,
    pub cells: Vec<DayCell>,
}

impl CalendarView {
    /// Entries placed on the given cell, in feed order
    pub fn entries_on<'a>(&'a self, cell: &'a DayCell) -> impl Iterator<Item = &'a NormalizedEntry> + 'a {
        let key = cell.date.format("%Y-%m-%d").to_string();
        self.entries.iter().filter(move |e| e.date == key)
    }
}

/// The calendar display the adapter feeds
pub trait RenderSurface: Send + Sync {
    /// Replace whatever is shown with this view
    fn render(&self, view: &CalendarView);

    /// Show a blocking error instead of the calendar
    fn show_error(&self, message: &str);
}
