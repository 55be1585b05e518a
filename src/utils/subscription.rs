use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Async callback invoked with each new value of a watched channel
pub type Handler<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;

/// Disposer for a listener task; dropping it also stops delivery
#[derive(Debug)]
pub struct Subscription {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Stop delivery and wait for the listener task to finish
    pub async fn dispose(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled() && self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Run `handler` for the current value (if any) and for every later change
pub fn listen<T>(name: &'static str, mut rx: watch::Receiver<Option<T>>, handler: Handler<T>) -> Subscription
where
    T: Clone + Send + Sync + 'static,
{
    let token = CancellationToken::new();
    let child = token.clone();

    let task = tokio::spawn(async move {
        let initial = rx.borrow_and_update().clone();
        if let Some(value) = initial {
            handler(value).await;
        }

        loop {
            tokio::select! {
                _ = child.cancelled() => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let value = rx.borrow_and_update().clone();
                    if let Some(value) = value {
                        handler(value).await;
                    }
                }
            }
        }
        debug!("{} listener stopped", name);
    });

    Subscription {
        token,
        task: Some(task),
    }
}
