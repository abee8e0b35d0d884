// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Monotonic host lifecycle state.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;
use wharf_core::{LifecycleState, WharfError};

/// Shared handle on the host's lifecycle state.
///
/// Transitions only move forward; waiters observe every change.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    tx: Arc<watch::Sender<LifecycleState>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(LifecycleState::Initialized);
        Self { tx: Arc::new(tx) }
    }

    pub fn state(&self) -> LifecycleState {
        *self.tx.borrow()
    }

    /// Move to `to`, returning the previous state.
    ///
    /// Fails with [`WharfError::InvalidTransition`] unless `to` is strictly
    /// later than the current state.
    pub fn advance(&self, to: LifecycleState) -> Result<LifecycleState, WharfError> {
        let mut outcome = Err(WharfError::InvalidTransition { from: to, to });
        self.tx.send_if_modified(|current| {
            if to > *current {
                outcome = Ok(*current);
                *current = to;
                true
            } else {
                outcome = Err(WharfError::InvalidTransition { from: *current, to });
                false
            }
        });
        if let Ok(from) = &outcome {
            info!(from = %from, to = %to, "lifecycle transition");
        }
        outcome
    }

    /// Wait until the state reaches `target` or later.
    pub async fn reached(&self, target: LifecycleState) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|state| *state >= target).await;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_forward_only() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), LifecycleState::Initialized);

        assert_eq!(
            lifecycle.advance(LifecycleState::Running).unwrap(),
            LifecycleState::Initialized
        );
        assert!(matches!(
            lifecycle.advance(LifecycleState::Running),
            Err(WharfError::InvalidTransition {
                from: LifecycleState::Running,
                to: LifecycleState::Running
            })
        ));
        assert!(lifecycle.advance(LifecycleState::Initialized).is_err());
        assert_eq!(lifecycle.state(), LifecycleState::Running);
    }

    #[test]
    fn stopped_is_terminal() {
        let lifecycle = Lifecycle::new();
        lifecycle.advance(LifecycleState::Stopped).unwrap();
        for state in [
            LifecycleState::Initialized,
            LifecycleState::Running,
            LifecycleState::ShuttingDown,
            LifecycleState::Stopped,
        ] {
            assert!(lifecycle.advance(state).is_err());
        }
    }

    #[tokio::test]
    async fn waiters_wake_on_transition() {
        let lifecycle = Lifecycle::new();
        let waiter = {
            let lifecycle = lifecycle.clone();
            tokio::spawn(async move { lifecycle.reached(LifecycleState::Stopped).await })
        };

        lifecycle.advance(LifecycleState::Running).unwrap();
        assert!(!waiter.is_finished());
        lifecycle.advance(LifecycleState::Stopped).unwrap();
        waiter.await.unwrap();
    }
}
