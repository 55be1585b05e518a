use super::days::decorate_days;
use super::models::NormalizedEntry;
use super::normalize::normalize;
use super::range::{filter_to_window, DateWindow};
use super::source::ReservationSource;
use super::surface::{CalendarView, RenderSurface};
use crate::error::{component_error, AppResult};
use crate::utils::time::today_in;
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Counters describing what the adapter has done so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdapterStats {
    pub latest_seq: u64,
    pub rendered: u64,
    pub stale_discarded: u64,
    pub failed_fetches: u64,
}

/// Adapter state as seen from outside
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdapterSnapshot {
    pub stats: AdapterStats,
    pub window: Option<DateWindow>,
    pub space_filter: Option<String>,
}

/// Commands that can be sent to the calendar actor
pub enum CalendarCommand {
    ChangeWindow(DateWindow),
    SetSpaceFilter(Option<String>),
    LoadWindow(DateWindow, mpsc::Sender<Vec<NormalizedEntry>>),
    FindEntry(String, mpsc::Sender<Option<NormalizedEntry>>),
    Snapshot(mpsc::Sender<AdapterSnapshot>),
    Shutdown,
}

/// Result of a fetch started by a window change
struct FetchCompleted {
    seq: u64,
    window: DateWindow,
    space_filter: Option<String>,
    result: AppResult<Vec<NormalizedEntry>>,
}

/// Handle for communicating with the calendar actor
#[derive(Clone)]
pub struct CalendarActorHandle {
    command_tx: mpsc::Sender<CalendarCommand>,
}

impl CalendarActorHandle {
    async fn send(&self, command: CalendarCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| component_error(&format!("Calendar mailbox error: {}", e)))
    }

    pub async fn change_window(&self, window: DateWindow) -> AppResult<()> {
        self.send(CalendarCommand::ChangeWindow(window)).await
    }

    pub async fn set_space_filter(&self, space_id: Option<String>) -> AppResult<()> {
        self.send(CalendarCommand::SetSpaceFilter(space_id)).await
    }

    pub async fn load_window(&self, window: DateWindow) -> AppResult<Vec<NormalizedEntry>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.send(CalendarCommand::LoadWindow(window, response_tx)).await?;
        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))
    }

    pub async fn find_entry(&self, id: String) -> AppResult<Option<NormalizedEntry>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.send(CalendarCommand::FindEntry(id, response_tx)).await?;
        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))
    }

    pub async fn snapshot(&self) -> AppResult<AdapterSnapshot> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.send(CalendarCommand::Snapshot(response_tx)).await?;
        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))
    }

    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(CalendarCommand::Shutdown).await;
        Ok(())
    }
}

/// The calendar actor; owns the filter selection, the visible window and the request counter
pub struct CalendarActor {
    source: Arc<dyn ReservationSource>,
    surface: Arc<dyn RenderSurface>,
    timezone: Tz,
    space_filter: Option<String>,
    window: Option<DateWindow>,
    shown: Vec<NormalizedEntry>,
    stats: AdapterStats,
    command_rx: mpsc::Receiver<CalendarCommand>,
    completed_tx: mpsc::Sender<FetchCompleted>,
    completed_rx: mpsc::Receiver<FetchCompleted>,
}

impl CalendarActor {
    /// Create a new actor and return its handle
    pub fn new(
        source: Arc<dyn ReservationSource>,
        surface: Arc<dyn RenderSurface>,
        timezone: Tz,
    ) -> (Self, CalendarActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (completed_tx, completed_rx) = mpsc::channel(32);

        let actor = Self {
            source,
            surface,
            timezone,
            space_filter: None,
            window: None,
            shown: Vec::new(),
            stats: AdapterStats::default(),
            command_rx,
            completed_tx,
            completed_rx,
        };

        (actor, CalendarActorHandle { command_tx })
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Calendar actor started");

        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(CalendarCommand::ChangeWindow(window)) => {
                        self.window = Some(window);
                        self.request_refresh(window);
                    }
                    Some(CalendarCommand::SetSpaceFilter(space_id)) => {
                        info!(space = ?space_id, "Space filter changed");
                        self.space_filter = space_id;
                        if let Some(window) = self.window {
                            self.request_refresh(window);
                        }
                    }
                    Some(CalendarCommand::LoadWindow(window, response_tx)) => {
                        let source = Arc::clone(&self.source);
                        let space_filter = self.space_filter.clone();
                        tokio::spawn(async move {
                            let entries = entries_or_empty(
                                fetch_window(source.as_ref(), space_filter.as_deref(), &window).await,
                                &window,
                            );
                            let _ = response_tx.send(entries).await;
                        });
                    }
                    Some(CalendarCommand::FindEntry(id, response_tx)) => {
                        let found = self.shown.iter().find(|e| e.id == id).cloned();
                        let _ = response_tx.send(found).await;
                    }
                    Some(CalendarCommand::Snapshot(response_tx)) => {
                        let _ = response_tx.send(self.snapshot()).await;
                    }
                    Some(CalendarCommand::Shutdown) | None => {
                        info!("Calendar actor shutting down");
                        break;
                    }
                },
                Some(completed) = self.completed_rx.recv() => self.apply(completed),
            }
        }

        info!("Calendar actor shut down");
    }

    fn snapshot(&self) -> AdapterSnapshot {
        AdapterSnapshot {
            stats: self.stats,
            window: self.window,
            space_filter: self.space_filter.clone(),
        }
    }

    /// Issue the next request number and fetch in the background
    fn request_refresh(&mut self, window: DateWindow) {
        self.stats.latest_seq += 1;
        let seq = self.stats.latest_seq;
        let source = Arc::clone(&self.source);
        let space_filter = self.space_filter.clone();
        let completed_tx = self.completed_tx.clone();

        debug!(seq, %window, space = ?space_filter, "Refreshing calendar window");
        tokio::spawn(async move {
            let result = fetch_window(source.as_ref(), space_filter.as_deref(), &window).await;
            let _ = completed_tx
                .send(FetchCompleted {
                    seq,
                    window,
                    space_filter,
                    result,
                })
                .await;
        });
    }

    /// Render a finished fetch unless a newer request has been issued since
    fn apply(&mut self, completed: FetchCompleted) {
        if completed.seq != self.stats.latest_seq {
            debug!(
                seq = completed.seq,
                latest = self.stats.latest_seq,
                "Discarding stale reservations response"
            );
            self.stats.stale_discarded += 1;
            return;
        }

        if completed.result.is_err() {
            self.stats.failed_fetches += 1;
        }
        let entries = entries_or_empty(completed.result, &completed.window);
        let today = today_in(&self.timezone);
        let view = CalendarView {
            seq: completed.seq,
            window: completed.window,
            space_filter: completed.space_filter,
            cells: decorate_days(&completed.window, &entries, today),
            entries,
        };

        self.surface.render(&view);
        self.stats.rendered += 1;
        self.shown = view.entries;
    }
}

/// Fetch, normalize and restrict one window
pub async fn fetch_window(
    source: &dyn ReservationSource,
    space_id: Option<&str>,
    window: &DateWindow,
) -> AppResult<Vec<NormalizedEntry>> {
    let raw = source.fetch_reservations(space_id).await?;
    let normalized = normalize(raw);
    if normalized.report.dropped() > 0 {
        warn!(
            missing_start = normalized.report.dropped_missing_start,
            missing_id = normalized.report.dropped_missing_id,
            "Some reservations could not be placed on the calendar"
        );
    }
    let entries = filter_to_window(normalized.entries, window);
    debug!(%window, count = entries.len(), "Reservations in window");
    Ok(entries)
}

/// Failures become an empty calendar rather than a broken one
fn entries_or_empty(result: AppResult<Vec<NormalizedEntry>>, window: &DateWindow) -> Vec<NormalizedEntry> {
    match result {
        Ok(entries) => entries,
        Err(e) => {
            error!(%window, "Error loading reservations: {}", e);
            Vec::new()
        }
    }
}
