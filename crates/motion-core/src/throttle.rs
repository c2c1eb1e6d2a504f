//! Coalescing of redraw requests.
//!
//! Layout passes and data updates tend to ask for redraws in bursts. An
//! [`ActionThrottler`] turns a burst into one delayed run of its action.

use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use motion_config::ThrottleConfig;

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type Action = dyn Fn() -> BoxFuture + Send + Sync;

struct Inner {
    action: Box<Action>,
    delay: Duration,
    pending: Mutex<bool>,
}

/// Runs an async action at most once per delay window.
///
/// Cloning yields another handle to the same throttler.
#[derive(Clone)]
pub struct ActionThrottler {
    inner: Arc<Inner>,
}

impl ActionThrottler {
    pub fn new<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                action: Box::new(move || Box::pin(action()) as BoxFuture),
                delay,
                pending: Mutex::new(false),
            }),
        }
    }

    pub fn from_config<F, Fut>(config: &ThrottleConfig, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::new(Duration::from_millis(config.delay_ms), action)
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    /// Whether a delayed run is waiting.
    pub fn is_pending(&self) -> bool {
        *self.inner.pending.lock()
    }

    /// Run the action after the delay, unless a run is already pending.
    ///
    /// Returns once the action has finished, or immediately when coalesced.
    /// Dropping the future before the delay elapses releases the window.
    pub async fn call(&self) {
        if let Some(run) = self.begin() {
            run.finish().await;
        }
    }

    /// Spawn [`call`](Self::call) on the current runtime.
    ///
    /// The pending flag is taken before spawning, so `None` means the request
    /// was coalesced into a run that is already scheduled.
    pub fn schedule(&self) -> Option<JoinHandle<()>> {
        let run = self.begin()?;
        Some(tokio::spawn(run.finish()))
    }

    /// Run the action now, ignoring any pending run.
    pub async fn force_call(&self) {
        debug!("throttled action forced");
        (self.inner.action)().await;
    }

    fn begin(&self) -> Option<PendingRun> {
        let mut pending = self.inner.pending.lock();
        if *pending {
            return None;
        }
        *pending = true;
        Some(PendingRun {
            inner: Arc::clone(&self.inner),
        })
    }
}

/// Holds the pending flag of one delayed run and clears it on drop.
struct PendingRun {
    inner: Arc<Inner>,
}

impl PendingRun {
    async fn finish(self) {
        let inner = Arc::clone(&self.inner);
        tokio::time::sleep(inner.delay).await;
        // Cleared before the action so it can schedule the next run itself
        drop(self);
        debug!(delay = ?inner.delay, "throttled action running");
        (inner.action)().await;
    }
}

impl Drop for PendingRun {
    fn drop(&mut self) {
        *self.inner.pending.lock() = false;
    }
}

impl std::fmt::Debug for ActionThrottler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionThrottler")
            .field("delay", &self.inner.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

static_assertions::assert_impl_all!(ActionThrottler: Send, Sync);
