use super::range::DateWindow;
use crate::utils::subscription::{listen, Subscription};
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// View controls: the visible window and the selected space
#[derive(Clone)]
pub struct CalendarControls {
    window_tx: Arc<watch::Sender<Option<DateWindow>>>,
    filter_tx: Arc<watch::Sender<Option<Option<String>>>>,
}

impl Default for CalendarControls {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarControls {
    pub fn new() -> Self {
        let (window_tx, _) = watch::channel(None);
        let (filter_tx, _) = watch::channel(None);
        Self {
            window_tx: Arc::new(window_tx),
            filter_tx: Arc::new(filter_tx),
        }
    }

    /// Announce a new visible window
    pub fn navigate(&self, window: DateWindow) {
        self.window_tx.send_replace(Some(window));
    }

    /// Select a space, or `None` to show every space
    pub fn select_space(&self, space_id: Option<String>) {
        self.filter_tx.send_replace(Some(space_id));
    }

    pub fn current_window(&self) -> Option<DateWindow> {
        *self.window_tx.borrow()
    }

    pub fn current_space(&self) -> Option<String> {
        self.filter_tx.borrow().clone().flatten()
    }

    /// Call `handler` with the current window and every later one
    pub fn on_window_change<F, Fut>(&self, handler: F) -> Subscription
    where
        F: Fn(DateWindow) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        listen(
            "window",
            self.window_tx.subscribe(),
            Arc::new(move |window| handler(window).boxed()),
        )
    }

    /// Call `handler` with the current selection and every later one
    pub fn on_filter_change<F, Fut>(&self, handler: F) -> Subscription
    where
        F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        listen(
            "space filter",
            self.filter_tx.subscribe(),
            Arc::new(move |space_id| handler(space_id).boxed()),
        )
    }
}
