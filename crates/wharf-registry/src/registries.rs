// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The aggregate of one registry per category.
//!
//! `Registries` is an ordinary value: it is populated during composition,
//! handed to the host by value, and only read from then on. Nothing here is
//! process-global, so several hosts can coexist in one test binary.

use std::collections::BTreeMap;

use serde::Serialize;
use wharf_core::{
    Category, ConfigurationStore, InputBinding, NameResolver, OutputBinding, PubSub, SecretStore,
    StateStore,
};

use crate::descriptor::ComponentDescriptor;
use crate::registry::{InstanceRegistry, MiddlewareFactory, Registry, RegistryView};

/// One registry per component category.
pub struct Registries {
    secret_stores: InstanceRegistry<dyn SecretStore>,
    state_stores: InstanceRegistry<dyn StateStore>,
    configuration_stores: InstanceRegistry<dyn ConfigurationStore>,
    pubsubs: InstanceRegistry<dyn PubSub>,
    name_resolvers: InstanceRegistry<dyn NameResolver>,
    input_bindings: InstanceRegistry<dyn InputBinding>,
    output_bindings: InstanceRegistry<dyn OutputBinding>,
    http_middleware: Registry<MiddlewareFactory>,
}

impl Registries {
    /// Create a set of empty registries.
    pub fn new() -> Self {
        Self {
            secret_stores: Registry::new(Category::SecretStore),
            state_stores: Registry::new(Category::StateStore),
            configuration_stores: Registry::new(Category::ConfigurationStore),
            pubsubs: Registry::new(Category::PubSub),
            name_resolvers: Registry::new(Category::NameResolution),
            input_bindings: Registry::new(Category::InputBinding),
            output_bindings: Registry::new(Category::OutputBinding),
            http_middleware: Registry::new(Category::HttpMiddleware),
        }
    }

    pub fn secret_stores(&self) -> &InstanceRegistry<dyn SecretStore> {
        &self.secret_stores
    }

    pub fn secret_stores_mut(&mut self) -> &mut InstanceRegistry<dyn SecretStore> {
        &mut self.secret_stores
    }

    pub fn state_stores(&self) -> &InstanceRegistry<dyn StateStore> {
        &self.state_stores
    }

    pub fn state_stores_mut(&mut self) -> &mut InstanceRegistry<dyn StateStore> {
        &mut self.state_stores
    }

    pub fn configuration_stores(&self) -> &InstanceRegistry<dyn ConfigurationStore> {
        &self.configuration_stores
    }

    pub fn configuration_stores_mut(&mut self) -> &mut InstanceRegistry<dyn ConfigurationStore> {
        &mut self.configuration_stores
    }

    pub fn pubsubs(&self) -> &InstanceRegistry<dyn PubSub> {
        &self.pubsubs
    }

    pub fn pubsubs_mut(&mut self) -> &mut InstanceRegistry<dyn PubSub> {
        &mut self.pubsubs
    }

    pub fn name_resolvers(&self) -> &InstanceRegistry<dyn NameResolver> {
        &self.name_resolvers
    }

    pub fn name_resolvers_mut(&mut self) -> &mut InstanceRegistry<dyn NameResolver> {
        &mut self.name_resolvers
    }

    pub fn input_bindings(&self) -> &InstanceRegistry<dyn InputBinding> {
        &self.input_bindings
    }

    pub fn input_bindings_mut(&mut self) -> &mut InstanceRegistry<dyn InputBinding> {
        &mut self.input_bindings
    }

    pub fn output_bindings(&self) -> &InstanceRegistry<dyn OutputBinding> {
        &self.output_bindings
    }

    pub fn output_bindings_mut(&mut self) -> &mut InstanceRegistry<dyn OutputBinding> {
        &mut self.output_bindings
    }

    pub fn http_middleware(&self) -> &Registry<MiddlewareFactory> {
        &self.http_middleware
    }

    pub fn http_middleware_mut(&mut self) -> &mut Registry<MiddlewareFactory> {
        &mut self.http_middleware
    }

    /// Category-agnostic view of the registry for `category`.
    pub fn view(&self, category: Category) -> &dyn RegistryView {
        match category {
            Category::SecretStore => &self.secret_stores,
            Category::StateStore => &self.state_stores,
            Category::ConfigurationStore => &self.configuration_stores,
            Category::PubSub => &self.pubsubs,
            Category::NameResolution => &self.name_resolvers,
            Category::InputBinding => &self.input_bindings,
            Category::OutputBinding => &self.output_bindings,
            Category::HttpMiddleware => &self.http_middleware,
        }
    }

    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.view(category).contains(name)
    }

    /// Registered names in `category`, sorted.
    pub fn names(&self, category: Category) -> Vec<&str> {
        self.view(category).names()
    }

    /// Every descriptor across all categories, in category then name order.
    pub fn descriptors(&self) -> Vec<(Category, &ComponentDescriptor)> {
        Category::ALL
            .into_iter()
            .flat_map(|c| self.view(c).descriptors().into_iter().map(move |d| (c, d)))
            .collect()
    }

    /// Total number of registrations across all categories.
    pub fn len(&self) -> usize {
        Category::ALL.into_iter().map(|c| self.view(c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-category sorted names, including empty categories.
    pub fn summary(&self) -> RegistrySummary {
        RegistrySummary(
            Category::ALL
                .into_iter()
                .map(|c| {
                    let names = self.names(c).into_iter().map(str::to_string).collect();
                    (c, names)
                })
                .collect(),
        )
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable listing of registered component names per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RegistrySummary(pub BTreeMap<Category, Vec<String>>);

impl RegistrySummary {
    pub fn get(&self, category: Category) -> &[String] {
        self.0.get(&category).map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wharf_core::handler::middleware_fn;
    use wharf_core::{Metadata, SharedDeps};

    use super::*;

    #[test]
    fn names_are_scoped_per_category() {
        let mut registries = Registries::new();
        registries
            .http_middleware_mut()
            .register("redis", |_: &Metadata, _: &SharedDeps| {
                Ok(middleware_fn(|next| next))
            })
            .unwrap();

        assert!(registries.contains(Category::HttpMiddleware, "redis"));
        assert!(!registries.contains(Category::StateStore, "redis"));
        assert_eq!(registries.len(), 1);
    }

    #[test]
    fn summary_lists_every_category() {
        let registries = Registries::new();
        let summary = registries.summary();
        assert_eq!(summary.0.len(), Category::ALL.len());
        assert!(summary.get(Category::InputBinding).is_empty());

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("state-store").is_some());
    }

    #[test]
    fn registries_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registries>();
        let _shared = Arc::new(Registries::new());
    }
}
