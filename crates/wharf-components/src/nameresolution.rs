// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Name resolvers mapping an app id to a reachable address.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;
use wharf_core::{Category, Component, Metadata, NameResolver, WharfError};

pub const STATIC: &str = "static";
pub const DNS: &str = "dns";

const DEFAULT_PORT: u16 = 3500;

/// Resolves from a fixed table given as `<appId> = <host:port>` metadata pairs.
#[derive(Debug, Default)]
pub struct StaticResolver {
    table: HashMap<String, String>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Component for StaticResolver {
    fn kind(&self) -> &str {
        STATIC
    }

    fn category(&self) -> Category {
        Category::NameResolution
    }

    async fn init(&mut self, metadata: &Metadata) -> Result<(), WharfError> {
        self.table = metadata
            .iter()
            .map(|(app_id, address)| (app_id.to_string(), address.to_string()))
            .collect();
        Ok(())
    }
}

#[async_trait]
impl NameResolver for StaticResolver {
    async fn resolve(&self, app_id: &str) -> Result<String, WharfError> {
        self.table.get(app_id).cloned().ok_or_else(|| {
            WharfError::component(
                Category::NameResolution,
                format!("no address configured for app `{app_id}`"),
            )
        })
    }
}

/// Resolves an app id as a host name through the system resolver.
///
/// The optional `port` metadata key sets the port appended to every app id.
#[derive(Debug)]
pub struct DnsResolver {
    port: u16,
}

impl DnsResolver {
    pub fn new() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

impl Default for DnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Component for DnsResolver {
    fn kind(&self) -> &str {
        DNS
    }

    fn category(&self) -> Category {
        Category::NameResolution
    }

    async fn init(&mut self, metadata: &Metadata) -> Result<(), WharfError> {
        if metadata.get("port").is_some() {
            self.port = metadata
                .require_parsed("port")
                .map_err(|e| WharfError::Config {
                    category: Category::NameResolution,
                    name: DNS.to_string(),
                    reason: e.reason,
                })?;
        }
        Ok(())
    }
}

#[async_trait]
impl NameResolver for DnsResolver {
    async fn resolve(&self, app_id: &str) -> Result<String, WharfError> {
        let mut addrs = tokio::net::lookup_host((app_id, self.port))
            .await
            .map_err(|e| WharfError::Component {
                category: Category::NameResolution,
                message: format!("failed to resolve `{app_id}`"),
                source: Some(Box::new(e)),
            })?;
        let addr = addrs.next().ok_or_else(|| {
            WharfError::component(
                Category::NameResolution,
                format!("`{app_id}` resolved to no addresses"),
            )
        })?;
        debug!(app_id, %addr, "app id resolved");
        Ok(addr.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_table_lookup() {
        let mut resolver = StaticResolver::new();
        resolver
            .init(&Metadata::from([("orders", "10.0.0.5:3500")]))
            .await
            .unwrap();

        assert_eq!(resolver.resolve("orders").await.unwrap(), "10.0.0.5:3500");
        assert!(resolver.resolve("payments").await.is_err());
    }

    #[tokio::test]
    async fn dns_resolves_literal_addresses() {
        let mut resolver = DnsResolver::new();
        resolver
            .init(&Metadata::from([("port", "8080")]))
            .await
            .unwrap();
        assert_eq!(resolver.resolve("127.0.0.1").await.unwrap(), "127.0.0.1:8080");
    }

    #[tokio::test]
    async fn dns_rejects_bad_port() {
        let mut resolver = DnsResolver::new();
        let err = resolver
            .init(&Metadata::from([("port", "http")]))
            .await
            .unwrap_err();
        assert!(matches!(err, WharfError::Config { .. }));
    }
}
