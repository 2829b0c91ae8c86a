//! Transient user notifications ("toasts").
//!
//! Toasts stack in insertion order, expire after a fixed TTL and can be
//! dismissed individually. There is no cap and no deduplication: every
//! `push` appends a new toast.
//!
//! Expiry is lazy: a toast past its TTL stays in the stack until someone
//! calls [`Notifications::expire`]. Long-running frontends run
//! [`spawn_expiry`] so toasts leave the screen on time even when nothing
//! else repaints.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(5);

/// How often [`spawn_expiry`] sweeps in the terminal frontend.
pub const EXPIRY_TICK: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub created_at: Instant,
}

#[derive(Default)]
struct Stack {
    toasts: Vec<Toast>,
    next_id: u64,
}

/// Shared handle to the toast stack. Clones point at the same stack.
#[derive(Clone)]
pub struct Notifications {
    ttl: Duration,
    stack: Arc<Mutex<Stack>>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            stack: Arc::new(Mutex::new(Stack::default())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let mut stack = self.lock();
        stack.next_id += 1;
        let id = stack.next_id;
        stack.toasts.push(Toast {
            id,
            kind,
            message: message.into(),
            created_at: Instant::now(),
        });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Info, message)
    }

    /// Click-to-dismiss. Returns false if the toast was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut stack = self.lock();
        let before = stack.toasts.len();
        stack.toasts.retain(|t| t.id != id);
        stack.toasts.len() != before
    }

    /// Drops every toast whose TTL has elapsed at `now`. Returns how many went.
    pub fn expire_at(&self, now: Instant) -> usize {
        let ttl = self.ttl;
        let mut stack = self.lock();
        let before = stack.toasts.len();
        stack
            .toasts
            .retain(|t| now.saturating_duration_since(t.created_at) < ttl);
        before - stack.toasts.len()
    }

    pub fn expire(&self) -> usize {
        self.expire_at(Instant::now())
    }

    /// Snapshot of the live toasts, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        self.lock().toasts.clone()
    }

    /// Removes and returns every toast. The CLI prints each once.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut self.lock().toasts)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Stack> {
        self.stack.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Stops the expiry sweep when shut down or dropped.
pub struct ExpiryHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ExpiryHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
    }
}

/// Sweeps `notifications` every `every`, handing `on_tick` the number of
/// toasts that expired on that tick (often zero).
pub fn spawn_expiry<F>(notifications: Notifications, every: Duration, mut on_tick: F) -> ExpiryHandle
where
    F: FnMut(usize) + Send + 'static,
{
    let (shutdown, mut stop) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut stop => break,
                _ = ticker.tick() => {
                    let expired = notifications.expire();
                    if expired > 0 {
                        debug!(expired, "toasts expired");
                    }
                    on_tick(expired);
                }
            }
        }
    });

    ExpiryHandle { shutdown, task }
}
