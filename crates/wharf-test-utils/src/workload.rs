// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data plane that simulates outstanding operations.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use wharf_core::WharfError;
use wharf_runtime::{DataPlane, PlaneContext};

/// Spawns one tracked operation per duration, then idles until shutdown.
pub struct WorkloadPlane {
    durations: Vec<Duration>,
    completed: Arc<AtomicUsize>,
    started: watch::Sender<bool>,
}

/// Observes a [`WorkloadPlane`] from the test.
#[derive(Clone)]
pub struct WorkloadProbe {
    completed: Arc<AtomicUsize>,
    started: watch::Receiver<bool>,
}

impl WorkloadPlane {
    pub fn new(durations: impl IntoIterator<Item = Duration>) -> (Self, WorkloadProbe) {
        let completed = Arc::new(AtomicUsize::new(0));
        let (started, started_rx) = watch::channel(false);
        let plane = Self {
            durations: durations.into_iter().collect(),
            completed: completed.clone(),
            started,
        };
        let probe = WorkloadProbe {
            completed,
            started: started_rx,
        };
        (plane, probe)
    }
}

#[async_trait]
impl DataPlane for WorkloadPlane {
    async fn serve(self, ctx: PlaneContext) -> Result<(), WharfError> {
        for (i, duration) in self.durations.into_iter().enumerate() {
            let completed = self.completed.clone();
            ctx.coordinator().spawn(async move {
                tokio::time::sleep(duration).await;
                completed.fetch_add(1, Ordering::SeqCst);
                debug!(operation = i, "simulated operation completed");
            })?;
        }
        self.started.send_replace(true);

        ctx.shutdown_token().cancelled().await;
        Ok(())
    }
}

impl WorkloadProbe {
    /// Operations that ran to completion.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Wait until every operation has been spawned.
    pub async fn started(&mut self) {
        let _ = self.started.wait_for(|started| *started).await;
    }
}

/// Data plane that returns an internal error carrying its message as soon as it starts.
pub struct FailingPlane(pub String);

#[async_trait]
impl DataPlane for FailingPlane {
    async fn serve(self, _ctx: PlaneContext) -> Result<(), WharfError> {
        Err(WharfError::Internal(self.0))
    }
}
