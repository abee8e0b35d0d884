// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The seam between the host and the service that handles application requests.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use wharf_core::{LifecycleState, SharedDeps, WharfError};
use wharf_registry::Registries;

use crate::host::Resolver;
use crate::pipeline::Pipeline;
use crate::shutdown::ShutdownCoordinator;

/// A service driven by [`Host::run`](crate::Host::run).
///
/// Implementations should return once [`PlaneContext::shutdown_token`] is
/// cancelled, after finishing the requests they have accepted.
#[async_trait]
pub trait DataPlane: Send + 'static {
    async fn serve(self, ctx: PlaneContext) -> Result<(), WharfError>;
}

/// Everything the data plane may use from the host.
#[derive(Debug, Clone)]
pub struct PlaneContext {
    resolver: Resolver,
    pipeline: Pipeline,
    coordinator: ShutdownCoordinator,
}

impl PlaneContext {
    pub(crate) fn new(
        resolver: Resolver,
        pipeline: Pipeline,
        coordinator: ShutdownCoordinator,
    ) -> Self {
        Self {
            resolver,
            pipeline,
            coordinator,
        }
    }

    pub fn components(&self) -> &Registries {
        self.resolver.registries()
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn deps(&self) -> &SharedDeps {
        self.resolver.deps()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn coordinator(&self) -> &ShutdownCoordinator {
        &self.coordinator
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.coordinator.token()
    }

    pub fn state(&self) -> LifecycleState {
        self.coordinator.lifecycle().state()
    }
}

/// A data plane that serves nothing and returns on shutdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePlane;

#[async_trait]
impl DataPlane for IdlePlane {
    async fn serve(self, ctx: PlaneContext) -> Result<(), WharfError> {
        ctx.shutdown_token().cancelled().await;
        Ok(())
    }
}
