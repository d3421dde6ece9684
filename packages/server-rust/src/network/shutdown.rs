//! Health state and graceful shutdown for the endpoint host.
//!
//! The health state lives in an `ArcSwap` so health checks read it without locking.
//! Event requests hold an [`InFlightGuard`] while they run, which lets shutdown
//! wait until the scheduler calls they started have finished.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::sync::watch;

/// Lifecycle of the host: `Starting -> Ready -> Draining -> Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    /// Routes are being assembled; the listener is not serving yet.
    Starting,
    /// Accepting event requests.
    Ready,
    /// Shutdown requested; in-flight event requests are finishing.
    Draining,
    /// Every in-flight request has completed.
    Stopped,
}

impl HealthState {
    /// Lower-case name used in the `/health` document.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        }
    }

    /// Whether new event requests should still be dispatched.
    #[must_use]
    pub fn accepts_events(self) -> bool {
        matches!(self, Self::Starting | Self::Ready)
    }
}

/// Coordinates readiness, the shutdown signal and in-flight tracking.
#[derive(Debug)]
pub struct ShutdownController {
    signal: watch::Sender<bool>,
    in_flight: Arc<AtomicU64>,
    state: ArcSwap<HealthState>,
}

impl ShutdownController {
    /// Creates a controller in the `Starting` state.
    #[must_use]
    pub fn new() -> Self {
        let (signal, _rx) = watch::channel(false);
        Self {
            signal,
            in_flight: Arc::new(AtomicU64::new(0)),
            state: ArcSwap::from_pointee(HealthState::Starting),
        }
    }

    /// Moves `Starting` to `Ready`. Has no effect once shutdown has begun.
    pub fn set_ready(&self) {
        self.transition(HealthState::Starting, HealthState::Ready);
    }

    /// Atomically replaces the state with `to` when it currently equals `from`.
    fn transition(&self, from: HealthState, to: HealthState) {
        self.state
            .rcu(|current| if **current == from { Arc::new(to) } else { Arc::clone(current) });
    }

    /// Receiver flipped to `true` once shutdown is triggered.
    #[must_use]
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.signal.subscribe()
    }

    /// Resolves once [`trigger_shutdown`](Self::trigger_shutdown) has been called.
    pub async fn shutdown_requested(&self) {
        let mut rx = self.shutdown_receiver();
        // The sender lives in `self`, so `wait_for` only fails if it is dropped.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }

    /// Moves to `Draining` and notifies every receiver. Idempotent.
    pub fn trigger_shutdown(&self) {
        self.state.rcu(|current| {
            if current.accepts_events() {
                Arc::new(HealthState::Draining)
            } else {
                Arc::clone(current)
            }
        });
        self.signal.send_replace(true);
    }

    #[must_use]
    pub fn health_state(&self) -> HealthState {
        **self.state.load()
    }

    /// Marks one request as in flight until the returned guard is dropped.
    ///
    /// Drop runs during unwinding too, so a panicking handler still releases it.
    #[must_use]
    pub fn in_flight_guard(&self) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    #[must_use]
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Waits up to `timeout` for the in-flight count to reach zero.
    ///
    /// On success a `Draining` state becomes `Stopped` and `true` is
    /// returned. On timeout the state stays `Draining`.
    pub async fn wait_for_drain(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if self.in_flight_count() == 0 {
                self.transition(HealthState::Draining, HealthState::Stopped);
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the in-flight counter when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    in_flight: Arc<AtomicU64>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}
