// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Components declared in `[[components]]`, resolved and initialized at startup.

use std::collections::HashMap;

use tracing::{info, warn};
use wharf_config::model::ComponentConfig;
use wharf_core::{
    Category, Component, ConfigurationStore, InputBinding, Metadata, NameResolver, OutputBinding,
    PubSub, SecretStore, StateStore, WharfError,
};
use wharf_runtime::Resolver;

/// Live instances keyed by their declared name, one map per category.
#[derive(Default)]
pub struct ActiveComponents {
    secret_stores: HashMap<String, Box<dyn SecretStore>>,
    state_stores: HashMap<String, Box<dyn StateStore>>,
    configuration_stores: HashMap<String, Box<dyn ConfigurationStore>>,
    pubsubs: HashMap<String, Box<dyn PubSub>>,
    name_resolvers: HashMap<String, Box<dyn NameResolver>>,
    input_bindings: HashMap<String, Box<dyn InputBinding>>,
    output_bindings: HashMap<String, Box<dyn OutputBinding>>,
    declared: Vec<(Category, String)>,
}

async fn init<T>(mut instance: Box<T>, metadata: &Metadata) -> Result<Box<T>, WharfError>
where
    T: Component + ?Sized,
{
    instance.init(metadata).await?;
    Ok(instance)
}

impl ActiveComponents {
    /// Resolve and initialize every declared component.
    ///
    /// The first unresolvable or failing entry aborts activation.
    pub async fn activate(
        resolver: &Resolver,
        declared: &[ComponentConfig],
    ) -> Result<Self, WharfError> {
        let mut active = Self::default();

        for entry in declared {
            let name = entry.name.clone();
            let metadata = &entry.metadata;
            match entry.category {
                Category::SecretStore => {
                    let instance = init(resolver.secret_store(&name)?, metadata).await?;
                    active.secret_stores.insert(name.clone(), instance);
                }
                Category::StateStore => {
                    let instance = init(resolver.state_store(&name)?, metadata).await?;
                    active.state_stores.insert(name.clone(), instance);
                }
                Category::ConfigurationStore => {
                    let instance = init(resolver.configuration_store(&name)?, metadata).await?;
                    active.configuration_stores.insert(name.clone(), instance);
                }
                Category::PubSub => {
                    let instance = init(resolver.pubsub(&name)?, metadata).await?;
                    active.pubsubs.insert(name.clone(), instance);
                }
                Category::NameResolution => {
                    let instance = init(resolver.name_resolver(&name)?, metadata).await?;
                    active.name_resolvers.insert(name.clone(), instance);
                }
                Category::InputBinding => {
                    let instance = init(resolver.input_binding(&name)?, metadata).await?;
                    active.input_bindings.insert(name.clone(), instance);
                }
                Category::OutputBinding => {
                    let instance = init(resolver.output_binding(&name)?, metadata).await?;
                    active.output_bindings.insert(name.clone(), instance);
                }
                // Middleware is built by the pipeline; here it only has to exist.
                Category::HttpMiddleware => {
                    resolver.middleware(&name, metadata)?;
                }
            }
            info!(category = %entry.category, name = name.as_str(), "component initialized");
            active.declared.push((entry.category, name));
        }

        Ok(active)
    }

    /// Declared `(category, name)` pairs in activation order.
    pub fn declared(&self) -> &[(Category, String)] {
        &self.declared
    }

    pub fn secret_store(&self, name: &str) -> Option<&dyn SecretStore> {
        self.secret_stores.get(name).map(Box::as_ref)
    }

    pub fn state_store(&self, name: &str) -> Option<&dyn StateStore> {
        self.state_stores.get(name).map(Box::as_ref)
    }

    pub fn configuration_store(&self, name: &str) -> Option<&dyn ConfigurationStore> {
        self.configuration_stores.get(name).map(Box::as_ref)
    }

    pub fn pubsub(&self, name: &str) -> Option<&dyn PubSub> {
        self.pubsubs.get(name).map(Box::as_ref)
    }

    pub fn name_resolver(&self, name: &str) -> Option<&dyn NameResolver> {
        self.name_resolvers.get(name).map(Box::as_ref)
    }

    pub fn output_binding(&self, name: &str) -> Option<&dyn OutputBinding> {
        self.output_bindings.get(name).map(Box::as_ref)
    }

    /// Close every instance, logging failures.
    pub async fn close_all(&self) {
        macro_rules! close {
            ($map:expr, $category:expr) => {
                for (name, instance) in &$map {
                    if let Err(e) = instance.close().await {
                        warn!(category = %$category, name = name.as_str(), error = %e, "component close failed");
                    }
                }
            };
        }

        close!(self.secret_stores, Category::SecretStore);
        close!(self.state_stores, Category::StateStore);
        close!(self.configuration_stores, Category::ConfigurationStore);
        close!(self.pubsubs, Category::PubSub);
        close!(self.name_resolvers, Category::NameResolution);
        close!(self.input_bindings, Category::InputBinding);
        close!(self.output_bindings, Category::OutputBinding);
    }
}
