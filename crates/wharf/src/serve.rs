// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wharf run` command implementation.
//!
//! Registers the built-in components, composes the host, activates the
//! declared components, and serves until a termination signal arrives.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use wharf_config::model::WharfConfig;
use wharf_core::{SharedDeps, WharfError};
use wharf_registry::Registries;
use wharf_runtime::{
    DrainPolicy, DrainReport, Host, HostOptions, IdlePlane, PipelineEntry, listen_for_signals,
};

use crate::active::ActiveComponents;
use crate::api::HttpPlane;

/// Compose a host from `config`. Nothing is bound or started.
pub fn compose(config: &WharfConfig) -> Result<Host, WharfError> {
    let mut registries = Registries::new();
    wharf_components::register_builtins(&mut registries)?;

    let options = HostOptions {
        pipeline: config
            .pipeline
            .handlers
            .iter()
            .map(|handler| PipelineEntry::new(handler.name.clone(), handler.metadata.clone()))
            .collect(),
        drain: DrainPolicy {
            grace_period: config.shutdown.grace_period(),
            force_timeout: config.shutdown.force_timeout(),
        },
    };

    Host::compose(registries, SharedDeps::new(config.host.app_id.clone()), options)
}

/// Runs the `wharf run` command.
///
/// Returns once the host has drained and stopped. Startup failures are
/// returned as [`WharfError::FatalStartup`] before the host enters Running.
pub async fn run_serve(config: WharfConfig) -> Result<DrainReport, WharfError> {
    init_tracing(&config.host.log_level);

    let host = compose(&config)?;

    let components = ActiveComponents::activate(host.resolver(), &config.components)
        .await
        .map_err(|e| {
            error!(error = %e, "component activation failed");
            WharfError::FatalStartup(Box::new(e))
        })?;
    let components = Arc::new(components);

    let listener = if config.http.enabled {
        let addr = format!("{}:{}", config.http.bind_address, config.http.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            error!(addr = addr.as_str(), error = %e, "failed to bind http listener");
            WharfError::FatalStartup(Box::new(e.into()))
        })?;
        Some(listener)
    } else {
        None
    };

    let signals = listen_for_signals(host.coordinator().token());

    let result = match listener {
        Some(listener) => host.run(HttpPlane::new(listener, components.clone())).await,
        None => {
            info!("http disabled, idling until shutdown");
            host.run(IdlePlane).await
        }
    };

    signals.abort();
    components.close_all().await;

    match &result {
        Ok(report) => info!(
            in_flight = report.in_flight,
            outcome = ?report.outcome,
            "wharf shutdown complete"
        ),
        Err(e) => error!(error = %e, "wharf stopped with error"),
    }
    result
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wharf={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
