use crate::components::notifications::panel::PanelItem;
use crate::components::notifications::{Badge, PanelList, PanelState, PanelView};
use crate::components::reservation_calendar::{CalendarView, RenderSurface};
use chrono::Datelike;
use rust_i18n::t;
use std::fmt::Write as _;
use std::io::{self, Write};
use tracing::error;

const CELL_WIDTH: usize = 4;

/// Draw a calendar view as a text grid followed by its entries
pub fn format_calendar(view: &CalendarView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.window);
    if let Some(space) = &view.space_filter {
        let _ = writeln!(out, "[{}]", space);
    }

    for label in t!("weekday_header").split_whitespace() {
        let _ = write!(out, "{:<width$}", label, width = CELL_WIDTH);
    }
    out.push('\n');

    let lead = view
        .cells
        .first()
        .map(|c| c.date.weekday().num_days_from_monday() as usize)
        .unwrap_or(0);
    out.push_str(&" ".repeat(lead * CELL_WIDTH));

    for (i, cell) in view.cells.iter().enumerate() {
        let marker = if cell.entry_count > 0 {
            '*'
        } else if cell.available {
            '+'
        } else {
            ' '
        };
        let _ = write!(out, "{:>2}{} ", cell.date.day(), marker);
        if (lead + i + 1) % 7 == 0 {
            out.push('\n');
        }
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }

    if view.entries.is_empty() {
        let _ = writeln!(out, "{}", t!("calendar_no_reservations"));
    }
    for cell in &view.cells {
        for entry in view.entries_on(cell) {
            let _ = writeln!(out, "{}  {} [{}]", entry.date, entry.title, entry.id);
        }
    }
    out
}

fn format_item(item: &PanelItem) -> String {
    let title = if item.bold {
        format!("\x1b[1m{}\x1b[0m", item.title)
    } else {
        item.title.clone()
    };
    let mut line = format!("{} {} [{}] {}", item.icon, title, item.id, item.message);
    if !item.age.is_empty() {
        let _ = write!(line, " ({})", item.age);
    }
    if item.link != "#" {
        let _ = write!(line, " {}", item.link);
    }
    line
}

/// Draw the notification dropdown: title with badge, then the list body
pub fn format_panel(state: &PanelState) -> String {
    let mut out = t!("notifications_title").to_string();
    if let Badge::Visible(count) = &state.badge {
        let _ = write!(out, " ({})", count);
    }
    out.push('\n');

    match &state.list {
        PanelList::Loading => out.push_str("...\n"),
        PanelList::Empty(message) | PanelList::Error(message) => {
            let _ = writeln!(out, "{}", message);
        }
        PanelList::Items(items) => {
            for item in items {
                let _ = writeln!(out, "{}", format_item(item));
            }
        }
    }
    out
}

/// Console rendering of the calendar and the notification panel
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSurface;

impl TerminalSurface {
    fn emit(&self, text: &str) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
            error!("Failed to write to terminal: {}", e);
        }
    }
}

impl RenderSurface for TerminalSurface {
    fn render(&self, view: &CalendarView) {
        self.emit(&format_calendar(view));
    }

    fn show_error(&self, message: &str) {
        self.emit(&format!("!! {}\n", message));
    }
}

impl PanelView for TerminalSurface {
    fn render_panel(&self, state: &PanelState) {
        self.emit(&format_panel(state));
    }
}
