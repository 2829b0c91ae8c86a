//! Background refresh: reloads the collection on a fixed interval so changes
//! made by other clients eventually show up.
//!
//! The poller shares the client with user-triggered actions and takes no
//! lock around its reload; see the snapshot notes in [`crate::client`].

use crate::client::PeopleClient;
use crate::error::Result;
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Stops the poller when shut down or dropped.
pub struct PollerHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
    }
}

pub fn spawn_poller<T>(client: Arc<PeopleClient<T>>, every: Duration) -> PollerHandle
where
    T: Transport + 'static,
{
    spawn_poller_with(client, every, |_| {})
}

/// Like [`spawn_poller`], calling `on_reload` after every attempt. Failed
/// reloads were already reported by the API layer; the loop keeps going.
pub fn spawn_poller_with<T, F>(
    client: Arc<PeopleClient<T>>,
    every: Duration,
    mut on_reload: F,
) -> PollerHandle
where
    T: Transport + 'static,
    F: FnMut(Result<usize>) + Send + 'static,
{
    let (shutdown, mut stop) = oneshot::channel::<()>();

    info!(interval_secs = every.as_secs(), "starting poller");
    let task = tokio::spawn(async move {
        // First reload happens one full interval after start.
        let mut ticker = interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut stop => break,
                _ = ticker.tick() => {
                    let result = client.reload().await;
                    if let Ok(count) = &result {
                        debug!(count, "poll reload");
                    }
                    on_reload(result);
                }
            }
        }
        debug!("poller stopped");
    });

    PollerHandle { shutdown, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PersonInput;
    use crate::notify::Notifications;
    use crate::transport::memory::MemoryTransport;
    use tokio::sync::mpsc;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn picks_up_changes_from_other_clients() {
        let backend = Arc::new(MemoryTransport::new());
        let ours = Arc::new(PeopleClient::new(
            Arc::clone(&backend),
            "pessoas",
            Notifications::default(),
        ));
        let theirs = PeopleClient::new(Arc::clone(&backend), "pessoas", Notifications::default());

        ours.reload().await.unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let poller = spawn_poller_with(Arc::clone(&ours), DEFAULT_POLL_INTERVAL, move |r| {
            let _ = tx.send(r.ok());
        });

        theirs.create(&PersonInput::new("Ana", 30)).await.unwrap();
        assert!(ours.people().is_empty());

        sleep(Duration::from_secs(29)).await;
        assert!(rx.try_recv().is_err());
        assert!(ours.people().is_empty());

        sleep(Duration::from_secs(2)).await;
        assert_eq!(rx.try_recv().unwrap(), Some(1));
        assert_eq!(ours.people()[0].nome, "Ana");

        poller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_polling_after_failures() {
        let client = Arc::new(PeopleClient::new(
            MemoryTransport::new(),
            "pessoas",
            Notifications::default(),
        ));
        client.api().transport().fail_next(1);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let poller = spawn_poller_with(Arc::clone(&client), Duration::from_secs(30), move |r| {
            let _ = tx.send(r.is_ok());
        });

        sleep(Duration::from_secs(61)).await;
        assert!(!rx.try_recv().unwrap());
        assert!(rx.try_recv().unwrap());
        assert_eq!(client.notifications().active().len(), 1);

        poller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_loop() {
        let client = Arc::new(PeopleClient::new(
            MemoryTransport::new(),
            "pessoas",
            Notifications::default(),
        ));
        let poller = spawn_poller(Arc::clone(&client), Duration::from_secs(30));
        let PollerHandle { shutdown, task } = poller;
        drop(shutdown);
        task.await.unwrap();
        assert!(client.api().transport().requests().is_empty());
    }
}
