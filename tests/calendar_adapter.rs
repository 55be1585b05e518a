mod common;

use async_trait::async_trait;
use common::{wait_until, window, RecordingSurface};
use reservas::components::reservation_calendar::source::{parse_reservations, ReservationSource};
use reservas::components::reservation_calendar::{CalendarAdapterHandle, RawReservation};
use reservas::error::{backend_error, AppResult};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Mock reservation feed with switchable failure
#[derive(Default)]
struct MockReservationSource {
    records: Vec<Value>,
    fail: AtomicBool,
    calls: Mutex<Vec<Option<String>>>,
}

impl MockReservationSource {
    fn new(records: Value) -> Self {
        Self {
            records: records.as_array().cloned().unwrap_or_default(),
            ..Default::default()
        }
    }

    fn failing() -> Self {
        let source = Self::default();
        source.fail.store(true, Ordering::SeqCst);
        source
    }

    fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReservationSource for MockReservationSource {
    async fn fetch_reservations(&self, space_id: Option<&str>) -> AppResult<Vec<RawReservation>> {
        self.calls.lock().unwrap().push(space_id.map(str::to_string));
        if self.fail.load(Ordering::SeqCst) {
            return Err(backend_error("HTTP 500 - boom"));
        }
        Ok(parse_reservations(self.records.clone()))
    }
}

/// Feed whose responses are held back until released, one gate per space
#[derive(Default)]
struct GatedSource {
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl GatedSource {
    fn gate(&self, space_id: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(space_id.to_string(), rx);
        tx
    }
}

#[async_trait]
impl ReservationSource for GatedSource {
    async fn fetch_reservations(&self, space_id: Option<&str>) -> AppResult<Vec<RawReservation>> {
        let space = space_id.unwrap_or_default().to_string();
        let gate = self.gates.lock().unwrap().remove(&space);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(parse_reservations(vec![json!({
            "id": format!("res-{}", space),
            "start": "2024-03-15T10:00:00",
            "spaceName": space,
        })]))
    }
}

fn march_feed() -> Value {
    json!([
        { "id": 1, "start": "2024-03-15T10:00:00", "spaceName": "Room A", "startTime": "10:00", "endTime": "11:00" },
        { "id": 2, "start": "2024-03-20", "extendedProps": { "spaceName": "Room B", "status": "approved" } },
        { "id": 3, "start": "2024-05-01", "spaceName": "Room C" },
        { "id": 4, "spaceName": "No date" },
    ])
}

fn adapter(source: Arc<dyn ReservationSource>, surface: Arc<RecordingSurface>) -> CalendarAdapterHandle {
    CalendarAdapterHandle::new(source, surface, chrono_tz::Tz::UTC)
}

#[tokio::test]
async fn window_change_renders_entries_inside_the_window() {
    let surface = Arc::new(RecordingSurface::default());
    let handle = adapter(Arc::new(MockReservationSource::new(march_feed())), surface.clone());

    handle.change_window(window("2024-02-26", "2024-04-07")).await.unwrap();
    wait_until(|| !surface.views().is_empty()).await;

    let view = surface.last_view().unwrap();
    let ids: Vec<_> = view.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["1", "2"]);
    assert_eq!(view.cells.len(), 42);
    assert_eq!(view.entries[0].title, "Room A (10:00-11:00)");
    // Dates in the past are never offered as available
    assert!(view.cells.iter().all(|c| !c.available));

    let booked = view.cells.iter().find(|c| c.entry_count > 0).unwrap();
    assert_eq!(view.entries_on(booked).count(), 1);
}

#[tokio::test]
async fn backend_failure_renders_an_empty_calendar() {
    let surface = Arc::new(RecordingSurface::default());
    let handle = adapter(Arc::new(MockReservationSource::failing()), surface.clone());

    handle.change_window(window("2024-03-01", "2024-03-31")).await.unwrap();
    wait_until(|| !surface.views().is_empty()).await;

    let view = surface.last_view().unwrap();
    assert!(view.entries.is_empty());
    assert_eq!(view.cells.len(), 31);
    assert!(surface.errors.lock().unwrap().is_empty());

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.stats.failed_fetches, 1);
    assert_eq!(snapshot.stats.rendered, 1);
}

#[tokio::test]
async fn load_window_never_fails() {
    let surface = Arc::new(RecordingSurface::default());
    let failing = adapter(Arc::new(MockReservationSource::failing()), surface.clone());
    assert!(failing.load_window(window("2024-03-01", "2024-03-31")).await.is_empty());

    let working = adapter(Arc::new(MockReservationSource::new(march_feed())), surface);
    let entries = working.load_window(window("2024-05-01", "2024-05-01")).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "3");
}

#[tokio::test]
async fn space_filter_change_refetches_current_window() {
    let surface = Arc::new(RecordingSurface::default());
    let source = Arc::new(MockReservationSource::new(march_feed()));
    let handle = adapter(source.clone(), surface.clone());

    // No window yet, so nothing to refetch
    handle.set_space_filter(Some("3".to_string())).await.unwrap();
    handle.change_window(window("2024-03-01", "2024-03-31")).await.unwrap();
    wait_until(|| surface.views().len() == 1).await;

    handle.set_space_filter(None).await.unwrap();
    wait_until(|| surface.views().len() == 2).await;

    assert_eq!(source.calls(), [Some("3".to_string()), None]);
    let views = surface.views();
    assert_eq!(views[0].space_filter.as_deref(), Some("3"));
    assert_eq!(views[1].space_filter, None);
}

#[tokio::test]
async fn stale_responses_are_discarded() {
    let surface = Arc::new(RecordingSurface::default());
    let source = Arc::new(GatedSource::default());
    let release_a = source.gate("a");
    let release_b = source.gate("b");
    let handle = adapter(source, surface.clone());

    handle.set_space_filter(Some("a".to_string())).await.unwrap();
    handle.change_window(window("2024-03-01", "2024-03-31")).await.unwrap();
    handle.set_space_filter(Some("b".to_string())).await.unwrap();

    release_b.send(()).unwrap();
    wait_until(|| surface.views().len() == 1).await;
    release_a.send(()).unwrap();

    for _ in 0..200 {
        if handle.snapshot().await.unwrap().stats.stale_discarded == 1 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.stats.latest_seq, 2);
    assert_eq!(snapshot.stats.stale_discarded, 1);
    assert_eq!(snapshot.stats.rendered, 1);

    let views = surface.views();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].seq, 2);
    assert_eq!(views[0].entries[0].id, "res-b");
}

#[tokio::test]
async fn repeating_a_window_fetches_again() {
    let surface = Arc::new(RecordingSurface::default());
    let source = Arc::new(MockReservationSource::new(march_feed()));
    let handle = adapter(source.clone(), surface.clone());

    let march = window("2024-03-01", "2024-03-31");
    handle.change_window(march).await.unwrap();
    wait_until(|| surface.views().len() == 1).await;
    handle.change_window(march).await.unwrap();
    wait_until(|| surface.views().len() == 2).await;

    assert_eq!(source.calls().len(), 2);
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.stats.rendered, 2);
    assert_eq!(snapshot.stats.latest_seq, 2);
}

#[tokio::test]
async fn find_entry_looks_up_shown_entries() {
    let surface = Arc::new(RecordingSurface::default());
    let handle = adapter(Arc::new(MockReservationSource::new(march_feed())), surface.clone());

    handle.change_window(window("2024-03-01", "2024-03-31")).await.unwrap();
    wait_until(|| !surface.views().is_empty()).await;

    let entry = handle.find_entry("2").await.unwrap().unwrap();
    assert_eq!(entry.date, "2024-03-20");
    assert!(handle.find_entry("3").await.unwrap().is_none());

    handle.shutdown().await.unwrap();
}
