// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in component catalog.
//!
//! Registers every component compiled into the Wharf binary. No input
//! bindings ship by default.

use wharf_core::{
    ConfigurationStore, NameResolver, OutputBinding, PubSub, SecretStore, SharedDeps, StateStore,
    WharfError,
};
use wharf_registry::{ComponentDescriptor, Registries};

use crate::bindings::{self, LogBinding};
use crate::configuration::{self, InMemoryConfigurationStore};
use crate::middleware;
use crate::nameresolution::{self, DnsResolver, StaticResolver};
use crate::pubsub::{self, InMemoryPubSub};
use crate::secretstores::{self, EnvSecretStore, FileSecretStore};
use crate::state::{self, InMemoryStateStore};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn descriptor(name: &str, description: &str) -> ComponentDescriptor {
    ComponentDescriptor::new(name)
        .version(VERSION)
        .description(description)
}

/// Register all built-in components into `registries`.
///
/// Fails with [`WharfError::DuplicateName`] if any name is already taken.
pub fn register_builtins(registries: &mut Registries) -> Result<(), WharfError> {
    let secrets = registries.secret_stores_mut();
    secrets.register_with(
        descriptor(secretstores::LOCAL_ENV, "Secrets from the process environment")
            .optional_key("prefix"),
        |_: &SharedDeps| -> Box<dyn SecretStore> { Box::new(EnvSecretStore::new()) },
    )?;
    secrets.register_with(
        descriptor(secretstores::LOCAL_FILE, "Secrets from a local JSON file")
            .required_key("secretsFile")
            .optional_key("nestedSeparator"),
        |_: &SharedDeps| -> Box<dyn SecretStore> { Box::new(FileSecretStore::new()) },
    )?;

    registries.state_stores_mut().register_with(
        descriptor(state::IN_MEMORY, "Process-local key/value state with ETags"),
        |_: &SharedDeps| -> Box<dyn StateStore> { Box::new(InMemoryStateStore::new()) },
    )?;

    registries.configuration_stores_mut().register_with(
        descriptor(configuration::IN_MEMORY, "Configuration items seeded from metadata"),
        |_: &SharedDeps| -> Box<dyn ConfigurationStore> {
            Box::new(InMemoryConfigurationStore::new())
        },
    )?;

    registries.pubsubs_mut().register_with(
        descriptor(pubsub::IN_MEMORY, "In-process broadcast broker")
            .optional_key("capacity"),
        |_: &SharedDeps| -> Box<dyn PubSub> { Box::new(InMemoryPubSub::new()) },
    )?;

    let resolvers = registries.name_resolvers_mut();
    resolvers.register_with(
        descriptor(nameresolution::STATIC, "Fixed app id to address table"),
        |_: &SharedDeps| -> Box<dyn NameResolver> { Box::new(StaticResolver::new()) },
    )?;
    resolvers.register_with(
        descriptor(nameresolution::DNS, "System DNS lookup of the app id")
            .optional_key("port"),
        |_: &SharedDeps| -> Box<dyn NameResolver> { Box::new(DnsResolver::new()) },
    )?;

    registries.output_bindings_mut().register_with(
        descriptor(bindings::LOG, "Writes invocations to the host log"),
        |deps: &SharedDeps| -> Box<dyn OutputBinding> { Box::new(LogBinding::new(deps)) },
    )?;

    let http = registries.http_middleware_mut();
    http.register_with(
        descriptor(middleware::UPPERCASE, "Uppercases request bodies"),
        middleware::uppercase,
    )?;
    http.register_with(
        descriptor(middleware::RATELIMIT, "Fixed-window request rate limit")
            .required_key("maxRequests"),
        middleware::ratelimit,
    )?;
    http.register_with(
        descriptor(middleware::BEARER, "Static bearer token check")
            .required_key("token"),
        middleware::bearer,
    )?;

    tracing::debug!(count = registries.len(), "built-in components registered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use wharf_core::Category;

    use super::*;

    #[test]
    fn registers_expected_names() {
        let mut registries = Registries::new();
        register_builtins(&mut registries).unwrap();

        assert_eq!(
            registries.names(Category::SecretStore),
            vec!["local.env", "local.file"]
        );
        assert_eq!(registries.names(Category::StateStore), vec!["in-memory"]);
        assert_eq!(
            registries.names(Category::ConfigurationStore),
            vec!["in-memory"]
        );
        assert_eq!(registries.names(Category::PubSub), vec!["in-memory"]);
        assert_eq!(
            registries.names(Category::NameResolution),
            vec!["dns", "static"]
        );
        assert!(registries.names(Category::InputBinding).is_empty());
        assert_eq!(registries.names(Category::OutputBinding), vec!["log"]);
        assert_eq!(
            registries.names(Category::HttpMiddleware),
            vec!["bearer", "ratelimit", "uppercase"]
        );
    }

    #[test]
    fn descriptors_are_valid() {
        let mut registries = Registries::new();
        register_builtins(&mut registries).unwrap();
        for (category, descriptor) in registries.descriptors() {
            assert!(
                descriptor.validate().is_ok(),
                "{category}/{} is invalid",
                descriptor.name
            );
        }
    }

    #[test]
    fn registering_twice_is_a_duplicate() {
        let mut registries = Registries::new();
        register_builtins(&mut registries).unwrap();
        assert!(matches!(
            register_builtins(&mut registries),
            Err(WharfError::DuplicateName { .. })
        ));
    }
}
