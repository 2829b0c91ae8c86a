//! Trailing-edge debouncing for search input.
//!
//! Every keystroke is pushed into a [`Debouncer`]; the handler runs once,
//! with the latest value, after the input has been quiet for the configured
//! delay. Search is debounced only: there is no extra immediate run per
//! keystroke.

use crate::client::PeopleClient;
use crate::transport::Transport;
use crate::view::PeopleView;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct Debouncer<V> {
    tx: mpsc::UnboundedSender<V>,
    task: JoinHandle<()>,
}

impl<V: Send + 'static> Debouncer<V> {
    /// Spawns the debouncing task on the current runtime.
    pub fn spawn<F, Fut>(delay: Duration, mut handler: F) -> Self
    where
        F: FnMut(V) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<V>();
        let task = tokio::spawn(async move {
            let mut pending: Option<V> = None;
            loop {
                match pending.take() {
                    None => match rx.recv().await {
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                    Some(value) => {
                        tokio::select! {
                            next = rx.recv() => match next {
                                Some(newer) => pending = Some(newer),
                                None => {
                                    // Input closed mid-wait: flush the last value.
                                    handler(value).await;
                                    break;
                                }
                            },
                            _ = tokio::time::sleep(delay) => handler(value).await,
                        }
                    }
                }
            }
        });
        Self { tx, task }
    }

    /// Queues a value. Returns false once the task has stopped.
    pub fn push(&self, value: V) -> bool {
        self.tx.send(value).is_ok()
    }

    /// Stops accepting input, flushes any pending value and waits for the
    /// task to finish.
    pub async fn finish(self) {
        drop(self.tx);
        let _ = self.task.await;
    }
}

pub fn spawn_debounced<V, F, Fut>(delay: Duration, handler: F) -> Debouncer<V>
where
    V: Send + 'static,
    F: FnMut(V) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Debouncer::spawn(delay, handler)
}

/// Debounced search box: each settled term is applied to the client and the
/// resulting view handed to `repaint`.
pub fn search_debouncer<T, R>(
    client: Arc<PeopleClient<T>>,
    delay: Duration,
    mut repaint: R,
) -> Debouncer<String>
where
    T: Transport + 'static,
    R: FnMut(PeopleView) + Send + 'static,
{
    Debouncer::spawn(delay, move |term: String| {
        client.set_search(&term);
        repaint(client.view());
        std::future::ready(())
    })
}
