// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness that composes a host from mock registrations.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use wharf_core::{Category, Metadata, SharedDeps, WharfError};
use wharf_registry::Registries;
use wharf_runtime::{DataPlane, DrainPolicy, DrainReport, Host, HostOptions, PipelineEntry};

use crate::mock_component::register_mock;

/// Builder for a host composed from mock components.
pub struct TestHarnessBuilder {
    registries: Registries,
    app_id: String,
    options: HostOptions,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            registries: Registries::new(),
            app_id: "test-app".to_string(),
            options: HostOptions::default(),
        }
    }

    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    /// Register a [`MockComponent`](crate::MockComponent) in `category`.
    pub fn with_mock(mut self, category: Category, name: &str) -> Result<Self, WharfError> {
        register_mock(&mut self.registries, category, name)?;
        Ok(self)
    }

    /// Mutate the registries directly.
    pub fn register(
        mut self,
        f: impl FnOnce(&mut Registries) -> Result<(), WharfError>,
    ) -> Result<Self, WharfError> {
        f(&mut self.registries)?;
        Ok(self)
    }

    /// Append a middleware stage to the pipeline.
    pub fn pipeline_stage(mut self, name: &str, metadata: Metadata) -> Self {
        self.options.pipeline.push(PipelineEntry::new(name, metadata));
        self
    }

    pub fn drain_policy(mut self, grace_period: Duration, force_timeout: Duration) -> Self {
        self.options.drain = DrainPolicy {
            grace_period,
            force_timeout,
        };
        self
    }

    pub fn build(self) -> Result<TestHarness, WharfError> {
        let host = Host::compose(
            self.registries,
            SharedDeps::new(self.app_id),
            self.options,
        )?;
        Ok(TestHarness {
            host: Arc::new(host),
        })
    }
}

/// A composed host shared between the test body and its run task.
pub struct TestHarness {
    host: Arc<Host>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn host(&self) -> &Arc<Host> {
        &self.host
    }

    /// Run `plane` on a background task.
    pub fn spawn_run<P: DataPlane>(&self, plane: P) -> JoinHandle<Result<DrainReport, WharfError>> {
        let host = self.host.clone();
        tokio::spawn(async move { host.run(plane).await })
    }

    /// Yield until the host has left Initialized.
    pub async fn running(&self) {
        self.host
            .coordinator()
            .lifecycle()
            .reached(wharf_core::LifecycleState::Running)
            .await;
    }
}
