// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graceful shutdown coordination with signal handling.
//!
//! A termination notification is a single [`CancellationToken`]. The signal
//! listener only cancels it; the drain sequence is driven separately by
//! [`ShutdownCoordinator::drain`], which runs exactly once no matter how many
//! callers ask for it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tokio_util::task::task_tracker::TaskTrackerToken;
use tracing::{debug, info, warn};
use wharf_core::{LifecycleState, WharfError};

use crate::lifecycle::Lifecycle;

/// Bounds on how long a drain may wait for in-flight work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainPolicy {
    /// How long in-flight work may run after termination before it is force-cancelled.
    pub grace_period: Duration,
    /// How long force-cancelled work may take to unwind before it is abandoned.
    pub force_timeout: Duration,
}

impl Default for DrainPolicy {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_millis(5000),
            force_timeout: Duration::from_millis(1000),
        }
    }
}

/// How a drain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every unit of work completed within the grace period.
    Drained,
    /// Work outstanding at the end of the grace period was cancelled and unwound.
    ForceCancelled { cancelled: usize },
    /// Work was still outstanding after force cancellation.
    Abandoned { remaining: usize },
}

/// Result of the single drain sequence, shared by every caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Tracked work outstanding when the drain began.
    pub in_flight: usize,
    pub outcome: DrainOutcome,
}

impl DrainReport {
    /// True when no work was left running at exit.
    pub fn is_complete(&self) -> bool {
        !matches!(self.outcome, DrainOutcome::Abandoned { .. })
    }
}

struct Inner {
    lifecycle: Lifecycle,
    terminate: CancellationToken,
    force: CancellationToken,
    tracker: TaskTracker,
    drained: OnceCell<DrainReport>,
    policy: DrainPolicy,
}

/// Turns a termination notification into one deterministic drain.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ShutdownCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownCoordinator")
            .field("state", &self.inner.lifecycle.state())
            .field("triggered", &self.inner.terminate.is_cancelled())
            .field("in_flight", &self.inner.tracker.len())
            .field("policy", &self.inner.policy)
            .finish()
    }
}

impl ShutdownCoordinator {
    pub fn new(policy: DrainPolicy) -> Self {
        Self::with_lifecycle(Lifecycle::new(), policy)
    }

    pub fn with_lifecycle(lifecycle: Lifecycle, policy: DrainPolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                lifecycle,
                terminate: CancellationToken::new(),
                force: CancellationToken::new(),
                tracker: TaskTracker::new(),
                drained: OnceCell::new(),
                policy,
            }),
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.inner.lifecycle
    }

    pub fn policy(&self) -> DrainPolicy {
        self.inner.policy
    }

    /// The termination token. Cancelling it is equivalent to [`trigger`](Self::trigger).
    pub fn token(&self) -> CancellationToken {
        self.inner.terminate.clone()
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.terminate.is_cancelled()
    }

    /// Request shutdown. Idempotent.
    pub fn trigger(&self) {
        if !self.inner.terminate.is_cancelled() {
            info!("shutdown triggered");
        }
        self.inner.terminate.cancel();
    }

    /// Number of tracked units of work still running.
    pub fn in_flight(&self) -> usize {
        self.inner.tracker.len()
    }

    /// Run `fut` as tracked in-flight work.
    ///
    /// The task yields `Some(output)` if it completes and `None` if it was
    /// force-cancelled during drain. Rejected once drain has begun.
    pub fn spawn<F>(&self, fut: F) -> Result<JoinHandle<Option<F::Output>>, WharfError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let token = self.admit()?;
        let force = self.inner.force.clone();
        Ok(tokio::spawn(async move {
            let _token = token;
            tokio::select! {
                biased;
                output = fut => Some(output),
                _ = force.cancelled() => None,
            }
        }))
    }

    /// Count work the caller drives itself as in-flight until the guard drops.
    pub fn track(&self) -> Result<InFlight, WharfError> {
        Ok(InFlight {
            _token: self.admit()?,
            force: self.inner.force.clone(),
        })
    }

    fn admit(&self) -> Result<TaskTrackerToken, WharfError> {
        let token = self.inner.tracker.token();
        // Checked after taking the token so a concurrent close cannot miss it.
        if self.inner.tracker.is_closed() {
            return Err(WharfError::ShuttingDown);
        }
        Ok(token)
    }

    /// Drain all in-flight work. Runs once; every caller gets the same report.
    pub async fn drain(&self) -> DrainReport {
        *self.inner.drained.get_or_init(|| self.run_drain()).await
    }

    async fn run_drain(&self) -> DrainReport {
        let inner = &self.inner;
        if let Err(e) = inner.lifecycle.advance(LifecycleState::ShuttingDown) {
            debug!(error = %e, "drain started outside running state");
        }
        inner.terminate.cancel();
        inner.tracker.close();

        let in_flight = inner.tracker.len();
        info!(in_flight, "drain started");

        let outcome = if tokio::time::timeout(inner.policy.grace_period, inner.tracker.wait())
            .await
            .is_ok()
        {
            info!("all in-flight work completed");
            DrainOutcome::Drained
        } else {
            let cancelled = inner.tracker.len();
            warn!(
                remaining = cancelled,
                grace_ms = inner.policy.grace_period.as_millis() as u64,
                "grace period elapsed, force-cancelling in-flight work"
            );
            inner.force.cancel();

            if tokio::time::timeout(inner.policy.force_timeout, inner.tracker.wait())
                .await
                .is_ok()
            {
                DrainOutcome::ForceCancelled { cancelled }
            } else {
                let remaining = inner.tracker.len();
                warn!(remaining, "in-flight work did not unwind, abandoning");
                DrainOutcome::Abandoned { remaining }
            }
        };

        if let Err(e) = inner.lifecycle.advance(LifecycleState::Stopped) {
            debug!(error = %e, "lifecycle already stopped");
        }
        info!(?outcome, "drain complete");
        DrainReport { in_flight, outcome }
    }

    /// Block until the drain has finished. All waiters unblock together.
    pub async fn wait(&self) {
        self.inner.lifecycle.reached(LifecycleState::Stopped).await;
    }

    /// Trigger shutdown and drive the drain to completion.
    pub async fn shutdown_with_wait(&self) -> DrainReport {
        self.trigger();
        self.drain().await
    }
}

/// Guard counting one unit of caller-driven work as in-flight.
#[derive(Debug)]
pub struct InFlight {
    _token: TaskTrackerToken,
    force: CancellationToken,
}

impl InFlight {
    /// Completes when the drain force-cancels outstanding work.
    pub async fn cancelled(&self) {
        self.force.cancelled().await;
    }

    pub fn is_cancelled(&self) -> bool {
        self.force.is_cancelled()
    }
}

/// Cancel `token` on SIGTERM or SIGINT (Ctrl+C).
///
/// The listener exits early if the token is cancelled some other way.
pub fn listen_for_signals(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {
                debug!("shutdown signal listener stopped");
                return;
            }
            _ = termination() => {}
        }
        token.cancel();
    })
}

#[cfg(unix)]
async fn termination() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!(error = %e, "failed to install SIGTERM handler, listening for Ctrl+C only");
            ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = ctrl_c() => {}
        _ = sigterm.recv() => {
            info!("received SIGTERM, initiating shutdown");
        }
    }
}

#[cfg(not(unix))]
async fn termination() {
    ctrl_c().await;
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received SIGINT (Ctrl+C), initiating shutdown"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
