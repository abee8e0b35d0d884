// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Wharf host.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key fails
//! startup instead of being ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use wharf_core::{Category, Metadata};

/// Top-level Wharf configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WharfConfig {
    /// Host identity and logging.
    #[serde(default)]
    pub host: HostConfig,

    /// Drain bounds applied on shutdown.
    #[serde(default)]
    pub shutdown: ShutdownConfig,

    /// HTTP data plane listener.
    #[serde(default)]
    pub http: HttpConfig,

    /// Ordered HTTP middleware pipeline.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Components this deployment references.
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
}

/// Host identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// Identifier of the application served by this host.
    #[serde(default = "default_app_id")]
    pub app_id: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            app_id: default_app_id(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_id() -> String {
    "wharf".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Bounds on the shutdown drain.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShutdownConfig {
    /// How long in-flight work may run after termination before it is cancelled.
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,

    /// How long cancelled work may take to unwind before it is abandoned.
    #[serde(default = "default_force_timeout_ms")]
    pub force_timeout_ms: u64,
}

impl ShutdownConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn force_timeout(&self) -> Duration {
        Duration::from_millis(self.force_timeout_ms)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: default_grace_period_ms(),
            force_timeout_ms: default_force_timeout_ms(),
        }
    }
}

fn default_grace_period_ms() -> u64 {
    5_000
}

fn default_force_timeout_ms() -> u64 {
    1_000
}

/// HTTP data plane configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Serve HTTP at all. When false the host idles until shutdown.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Address to bind.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3500
}

/// HTTP middleware pipeline.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Middleware applied to every request; the first entry runs first.
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

/// One middleware stage in the pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerConfig {
    /// Registered middleware name.
    pub name: String,

    /// Metadata passed to the middleware factory.
    #[serde(default)]
    pub metadata: Metadata,
}

/// A component referenced by this deployment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentConfig {
    /// Category the component belongs to.
    pub category: Category,

    /// Registered component name.
    pub name: String,

    /// Metadata passed to the component's `init`.
    #[serde(default)]
    pub metadata: Metadata,
}
