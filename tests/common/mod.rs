#![allow(dead_code)]

use chrono::NaiveDate;
use reservas::components::notifications::{PanelState, PanelView};
use reservas::components::reservation_calendar::{CalendarView, DateWindow, RenderSurface};
use reservas::config::Config;
use std::sync::Mutex;
use std::time::Duration;

/// Surface that keeps every view and error it was handed
#[derive(Default)]
pub struct RecordingSurface {
    pub views: Mutex<Vec<CalendarView>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingSurface {
    pub fn views(&self) -> Vec<CalendarView> {
        self.views.lock().unwrap().clone()
    }

    pub fn last_view(&self) -> Option<CalendarView> {
        self.views.lock().unwrap().last().cloned()
    }
}

impl RenderSurface for RecordingSurface {
    fn render(&self, view: &CalendarView) {
        self.views.lock().unwrap().push(view.clone());
    }

    fn show_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

/// Panel view that keeps every published state
#[derive(Default)]
pub struct RecordingPanel {
    pub states: Mutex<Vec<PanelState>>,
}

impl RecordingPanel {
    pub fn count(&self) -> usize {
        self.states.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<PanelState> {
        self.states.lock().unwrap().last().cloned()
    }
}

impl PanelView for RecordingPanel {
    fn render_panel(&self, state: &PanelState) {
        self.states.lock().unwrap().push(state.clone());
    }
}

/// Poll `condition` until it holds, failing the test after two seconds
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub fn window(start: &str, end: &str) -> DateWindow {
    DateWindow::new(date(start), date(end)).unwrap()
}

pub fn test_config(backend_url: &str) -> Config {
    Config::from_vars(|key| match key {
        "BACKEND_URL" => Some(backend_url.to_string()),
        _ => None,
    })
    .unwrap()
}
