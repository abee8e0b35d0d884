// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Name-keyed factory table for a single component category.
//!
//! A `Registry<F>` maps a unique name to a factory of type `F`. Data-store
//! categories use [`Factory<T>`], which builds a boxed capability from the
//! shared dependencies; HTTP middleware uses [`MiddlewareFactory`], which also
//! takes pipeline metadata and can fail.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use wharf_core::{Category, Metadata, Middleware, MiddlewareConfigError, SharedDeps, WharfError};

use crate::descriptor::ComponentDescriptor;

/// Deferred constructor for one instance of a capability `T`.
pub type Factory<T> = dyn Fn(&SharedDeps) -> Box<T> + Send + Sync;

/// Deferred constructor for an HTTP middleware, parameterized by pipeline metadata.
pub type MiddlewareFactory =
    dyn Fn(&Metadata, &SharedDeps) -> Result<Middleware, MiddlewareConfigError> + Send + Sync;

/// Registry of instance factories for capability `T`.
pub type InstanceRegistry<T> = Registry<Factory<T>>;

/// A single entry in a registry.
pub struct Registration<F: ?Sized> {
    descriptor: ComponentDescriptor,
    factory: Arc<F>,
}

impl<F: ?Sized> Registration<F> {
    pub fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
    }
}

impl<F: ?Sized> std::fmt::Debug for Registration<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Per-category mapping from name to factory.
pub struct Registry<F: ?Sized> {
    category: Category,
    entries: HashMap<String, Registration<F>>,
}

impl<F: ?Sized> Registry<F> {
    /// Create an empty registry for `category`.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            entries: HashMap::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Insert a factory under `descriptor.name`.
    ///
    /// Fails with [`WharfError::DuplicateName`] if the name is taken; the
    /// existing entry is left untouched.
    pub fn insert(
        &mut self,
        descriptor: ComponentDescriptor,
        factory: Arc<F>,
    ) -> Result<(), WharfError> {
        if self.entries.contains_key(&descriptor.name) {
            return Err(WharfError::DuplicateName {
                category: self.category,
                name: descriptor.name,
            });
        }
        debug!(category = %self.category, name = descriptor.name.as_str(), "component registered");
        self.entries.insert(
            descriptor.name.clone(),
            Registration {
                descriptor,
                factory,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Registration<F>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn descriptor(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.entries.get(name).map(|r| &r.descriptor)
    }

    /// All descriptors, sorted by name.
    pub fn descriptors(&self) -> Vec<&ComponentDescriptor> {
        let mut descriptors: Vec<&ComponentDescriptor> =
            self.entries.values().map(|r| &r.descriptor).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn factory(&self, name: &str) -> Result<&Arc<F>, WharfError> {
        self.entries
            .get(name)
            .map(|r| &r.factory)
            .ok_or_else(|| WharfError::NotFound {
                category: self.category,
                name: name.to_string(),
            })
    }
}

impl<T: ?Sized + 'static> Registry<Factory<T>> {
    /// Register `factory` under `name` with a default descriptor.
    pub fn register<C>(&mut self, name: impl Into<String>, factory: C) -> Result<(), WharfError>
    where
        C: Fn(&SharedDeps) -> Box<T> + Send + Sync + 'static,
    {
        self.register_with(ComponentDescriptor::new(name), factory)
    }

    /// Register `factory` with an explicit descriptor.
    pub fn register_with<C>(
        &mut self,
        descriptor: ComponentDescriptor,
        factory: C,
    ) -> Result<(), WharfError>
    where
        C: Fn(&SharedDeps) -> Box<T> + Send + Sync + 'static,
    {
        let factory: Arc<Factory<T>> = Arc::new(factory);
        self.insert(descriptor, factory)
    }

    /// Construct a fresh instance of the component registered as `name`.
    ///
    /// Every call invokes the factory again; instances are never cached.
    pub fn create(&self, name: &str, deps: &SharedDeps) -> Result<Box<T>, WharfError> {
        let factory = self.factory(name)?;
        Ok(factory(deps))
    }
}

impl Registry<MiddlewareFactory> {
    /// Register a middleware factory under `name` with a default descriptor.
    pub fn register<C>(&mut self, name: impl Into<String>, factory: C) -> Result<(), WharfError>
    where
        C: Fn(&Metadata, &SharedDeps) -> Result<Middleware, MiddlewareConfigError>
            + Send
            + Sync
            + 'static,
    {
        self.register_with(ComponentDescriptor::new(name), factory)
    }

    /// Register a middleware factory with an explicit descriptor.
    pub fn register_with<C>(
        &mut self,
        descriptor: ComponentDescriptor,
        factory: C,
    ) -> Result<(), WharfError>
    where
        C: Fn(&Metadata, &SharedDeps) -> Result<Middleware, MiddlewareConfigError>
            + Send
            + Sync
            + 'static,
    {
        let factory: Arc<MiddlewareFactory> = Arc::new(factory);
        self.insert(descriptor, factory)
    }

    /// Build the middleware registered as `name` for the given pipeline metadata.
    pub fn build(
        &self,
        name: &str,
        metadata: &Metadata,
        deps: &SharedDeps,
    ) -> Result<Middleware, WharfError> {
        let factory = self.factory(name)?;
        factory(metadata, deps).map_err(|source| WharfError::MiddlewareConfig {
            name: name.to_string(),
            source,
        })
    }
}

/// Category-agnostic read access to a registry.
pub trait RegistryView: Send + Sync {
    fn category(&self) -> Category;
    fn contains(&self, name: &str) -> bool;
    fn names(&self) -> Vec<&str>;
    fn descriptors(&self) -> Vec<&ComponentDescriptor>;
    fn len(&self) -> usize;
}

impl<F: ?Sized + Send + Sync> RegistryView for Registry<F> {
    fn category(&self) -> Category {
        Registry::category(self)
    }

    fn contains(&self, name: &str) -> bool {
        Registry::contains(self, name)
    }

    fn names(&self) -> Vec<&str> {
        Registry::names(self)
    }

    fn descriptors(&self) -> Vec<&ComponentDescriptor> {
        Registry::descriptors(self)
    }

    fn len(&self) -> usize {
        Registry::len(self)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use wharf_core::handler::middleware_fn;
    use wharf_core::types::{SetRequest, StateItem};
    use wharf_core::{Component, StateStore};

    use super::*;

    struct Tagged {
        tag: &'static str,
    }

    impl Component for Tagged {
        fn kind(&self) -> &str {
            self.tag
        }

        fn category(&self) -> Category {
            Category::StateStore
        }
    }

    #[async_trait]
    impl StateStore for Tagged {
        async fn get(&self, _key: &str) -> Result<Option<StateItem>, WharfError> {
            Ok(None)
        }

        async fn set(&self, _request: SetRequest) -> Result<String, WharfError> {
            Ok("1".to_string())
        }

        async fn delete(&self, _key: &str, _etag: Option<&str>) -> Result<(), WharfError> {
            Ok(())
        }
    }

    fn deps() -> SharedDeps {
        SharedDeps::new("test")
    }

    #[test]
    fn register_then_create_invokes_factory() {
        let mut registry = InstanceRegistry::<dyn StateStore>::new(Category::StateStore);
        registry
            .register("redis", |_: &SharedDeps| Box::new(Tagged { tag: "redis" }))
            .unwrap();

        let store = registry.create("redis", &deps()).unwrap();
        assert_eq!(store.kind(), "redis");
    }

    #[test]
    fn create_unknown_name_is_not_found() {
        let registry = InstanceRegistry::<dyn StateStore>::new(Category::StateStore);
        let err = registry.create("redis", &deps()).err().unwrap();
        assert!(matches!(
            err,
            WharfError::NotFound { category: Category::StateStore, ref name } if name == "redis"
        ));
    }

    #[test]
    fn duplicate_keeps_first_registration() {
        let mut registry = InstanceRegistry::<dyn StateStore>::new(Category::StateStore);
        registry
            .register("redis", |_: &SharedDeps| Box::new(Tagged { tag: "first" }))
            .unwrap();

        let err = registry
            .register("redis", |_: &SharedDeps| Box::new(Tagged { tag: "second" }))
            .unwrap_err();
        assert!(matches!(err, WharfError::DuplicateName { .. }));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.create("redis", &deps()).unwrap().kind(), "first");
    }

    #[test]
    fn create_does_not_cache_instances() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut registry = InstanceRegistry::<dyn StateStore>::new(Category::StateStore);
        registry
            .register("redis", move |_: &SharedDeps| {
                counter.fetch_add(1, Ordering::SeqCst);
                Box::new(Tagged { tag: "redis" })
            })
            .unwrap();

        let _a = registry.create("redis", &deps()).unwrap();
        let _b = registry.create("redis", &deps()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn middleware_build_maps_factory_errors() {
        let mut registry = Registry::<MiddlewareFactory>::new(Category::HttpMiddleware);
        registry
            .register("ratelimit", |md: &Metadata, _: &SharedDeps| {
                md.require("maxRequests")?;
                Ok(middleware_fn(|next| next))
            })
            .unwrap();

        let err = registry
            .build("ratelimit", &Metadata::new(), &deps())
            .err()
            .unwrap();
        assert!(matches!(err, WharfError::MiddlewareConfig { ref name, .. } if name == "ratelimit"));

        let md = Metadata::from([("maxRequests", "5")]);
        assert!(registry.build("ratelimit", &md, &deps()).is_ok());
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = InstanceRegistry::<dyn StateStore>::new(Category::StateStore);
        for name in ["zeta", "alpha", "mid"] {
            registry
                .register(name, |_: &SharedDeps| Box::new(Tagged { tag: "x" }))
                .unwrap();
        }
        assert_eq!(registry.names(), vec!["alpha", "mid", "zeta"]);
        assert_eq!(registry.descriptors()[0].name, "alpha");
    }

    #[test]
    fn registry_view_is_object_safe() {
        let registry = InstanceRegistry::<dyn StateStore>::new(Category::StateStore);
        let view: &dyn RegistryView = &registry;
        assert_eq!(view.category(), Category::StateStore);
        assert_eq!(view.len(), 0);
    }
}
