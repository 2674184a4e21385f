use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Collapses bursts of events into one callback with the latest value, fired
/// once `delay` passes without a new event.
///
/// Must be created inside a tokio runtime. Dropping the debouncer cancels any
/// pending callback.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(delay: Duration, mut callback: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        let task = tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                loop {
                    tokio::select! {
                        next = rx.recv() => match next {
                            Some(value) => latest = value,
                            None => return,
                        },
                        _ = tokio::time::sleep(delay) => {
                            callback(latest);
                            break;
                        }
                    }
                }
            }
        });

        Self { tx, task }
    }

    /// Restarts the quiet window with `value` as the pending event.
    pub fn trigger(&self, value: T) {
        if self.tx.send(value).is_err() {
            trace!("Debounce task already stopped, event dropped");
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
