// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime host: composes registries, shared dependencies, and the HTTP
//! pipeline, then drives the data plane through the lifecycle.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use wharf_core::{
    Category, ConfigurationStore, InputBinding, LifecycleState, Metadata, Middleware,
    NameResolver, OutputBinding, PubSub, SecretStore, SharedDeps, StateStore, WharfError,
};
use wharf_registry::Registries;

use crate::pipeline::{Pipeline, PipelineEntry};
use crate::plane::{DataPlane, PlaneContext};
use crate::shutdown::{DrainPolicy, DrainReport, ShutdownCoordinator};

/// Composition-time options.
#[derive(Debug, Clone, Default)]
pub struct HostOptions {
    /// HTTP middleware stages, outermost first.
    pub pipeline: Vec<PipelineEntry>,
    pub drain: DrainPolicy,
}

/// The composed host. Registries are read-only from here on.
#[derive(Debug)]
pub struct Host {
    resolver: Resolver,
    pipeline: Pipeline,
    coordinator: ShutdownCoordinator,
}

impl Host {
    /// Validate every registration and assemble the HTTP pipeline.
    ///
    /// No component instance is constructed. Any failure is returned as
    /// [`WharfError::FatalStartup`] and the host never exists.
    pub fn compose(
        registries: Registries,
        deps: SharedDeps,
        options: HostOptions,
    ) -> Result<Self, WharfError> {
        Self::try_compose(registries, deps, options).map_err(|e| {
            error!(error = %e, "host composition failed");
            WharfError::FatalStartup(Box::new(e))
        })
    }

    fn try_compose(
        registries: Registries,
        deps: SharedDeps,
        options: HostOptions,
    ) -> Result<Self, WharfError> {
        for (category, descriptor) in registries.descriptors() {
            descriptor
                .validate()
                .map_err(|reason| WharfError::Config {
                    category,
                    name: descriptor.name.clone(),
                    reason,
                })?;
        }

        let pipeline = Pipeline::assemble(registries.http_middleware(), &options.pipeline, &deps)?;

        info!(
            app_id = deps.app_id(),
            components = registries.len(),
            pipeline = pipeline.len(),
            "host composed"
        );

        Ok(Self {
            resolver: Resolver {
                registries: Arc::new(registries),
                deps,
            },
            pipeline,
            coordinator: ShutdownCoordinator::new(options.drain),
        })
    }

    pub fn components(&self) -> &Registries {
        self.resolver.registries()
    }

    pub fn deps(&self) -> &SharedDeps {
        self.resolver.deps()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn coordinator(&self) -> &ShutdownCoordinator {
        &self.coordinator
    }

    pub fn state(&self) -> LifecycleState {
        self.coordinator.lifecycle().state()
    }

    /// The context handed to a data plane.
    pub fn plane_context(&self) -> PlaneContext {
        PlaneContext::new(
            self.resolver.clone(),
            self.pipeline.clone(),
            self.coordinator.clone(),
        )
    }

    /// Enter Running, serve `plane` until shutdown, then drain.
    ///
    /// Blocks for the service lifetime. The plane exiting on its own also
    /// triggers shutdown; a plane error is returned after the drain.
    pub async fn run<P: DataPlane>(&self, plane: P) -> Result<DrainReport, WharfError> {
        self.coordinator
            .lifecycle()
            .advance(LifecycleState::Running)?;
        info!(app_id = self.deps().app_id(), "host running");

        let mut plane_task = self.coordinator.spawn(plane.serve(self.plane_context()))?;
        let token = self.coordinator.token();

        let exited = tokio::select! {
            joined = &mut plane_task => {
                info!("data plane exited, initiating shutdown");
                self.coordinator.trigger();
                Some(joined)
            }
            _ = token.cancelled() => None,
        };

        let report = self.coordinator.drain().await;

        let joined = match exited {
            Some(joined) => Some(joined),
            None if plane_task.is_finished() => Some(plane_task.await),
            None => {
                warn!("data plane still running after drain, aborting");
                plane_task.abort();
                None
            }
        };

        match joined {
            Some(Ok(Some(Err(e)))) => {
                error!(error = %e, "data plane failed");
                Err(e)
            }
            Some(Err(e)) if e.is_panic() => {
                error!("data plane panicked");
                Err(WharfError::Internal("data plane panicked".to_string()))
            }
            _ => Ok(report),
        }
    }

    /// Request shutdown. Idempotent.
    pub fn shutdown(&self) {
        self.coordinator.trigger();
    }

    /// Block until the host reaches Stopped.
    pub async fn wait_stopped(&self) {
        self.coordinator.wait().await;
    }
}

/// Name-based lookup of fresh component instances.
///
/// Each call invokes the registered factory with the host's shared
/// dependencies; instances are never cached or shared.
#[derive(Clone)]
pub struct Resolver {
    registries: Arc<Registries>,
    deps: SharedDeps,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("app_id", &self.deps.app_id())
            .field("components", &self.registries.len())
            .finish()
    }
}

impl Resolver {
    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    pub fn deps(&self) -> &SharedDeps {
        &self.deps
    }

    pub fn secret_store(&self, name: &str) -> Result<Box<dyn SecretStore>, WharfError> {
        trace_lookup(
            Category::SecretStore,
            name,
            self.registries.secret_stores().create(name, &self.deps),
        )
    }

    pub fn state_store(&self, name: &str) -> Result<Box<dyn StateStore>, WharfError> {
        trace_lookup(
            Category::StateStore,
            name,
            self.registries.state_stores().create(name, &self.deps),
        )
    }

    pub fn configuration_store(
        &self,
        name: &str,
    ) -> Result<Box<dyn ConfigurationStore>, WharfError> {
        trace_lookup(
            Category::ConfigurationStore,
            name,
            self.registries.configuration_stores().create(name, &self.deps),
        )
    }

    pub fn pubsub(&self, name: &str) -> Result<Box<dyn PubSub>, WharfError> {
        trace_lookup(
            Category::PubSub,
            name,
            self.registries.pubsubs().create(name, &self.deps),
        )
    }

    pub fn name_resolver(&self, name: &str) -> Result<Box<dyn NameResolver>, WharfError> {
        trace_lookup(
            Category::NameResolution,
            name,
            self.registries.name_resolvers().create(name, &self.deps),
        )
    }

    pub fn input_binding(&self, name: &str) -> Result<Box<dyn InputBinding>, WharfError> {
        trace_lookup(
            Category::InputBinding,
            name,
            self.registries.input_bindings().create(name, &self.deps),
        )
    }

    pub fn output_binding(&self, name: &str) -> Result<Box<dyn OutputBinding>, WharfError> {
        trace_lookup(
            Category::OutputBinding,
            name,
            self.registries.output_bindings().create(name, &self.deps),
        )
    }

    pub fn middleware(&self, name: &str, metadata: &Metadata) -> Result<Middleware, WharfError> {
        trace_lookup(
            Category::HttpMiddleware,
            name,
            self.registries
                .http_middleware()
                .build(name, metadata, &self.deps),
        )
    }
}

fn trace_lookup<T>(
    category: Category,
    name: &str,
    result: Result<T, WharfError>,
) -> Result<T, WharfError> {
    match &result {
        Ok(_) => debug!(category = %category, name, "component resolved"),
        Err(e) => debug!(category = %category, name, error = %e, "component lookup failed"),
    }
    result
}
