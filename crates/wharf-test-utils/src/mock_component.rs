// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock component implementing every capability contract.
//!
//! Each `MockComponent` owns its own key/value map, so two instances from the
//! same factory never observe each other's writes.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use tokio::sync::Mutex;

use wharf_core::handler::middleware_fn;
use wharf_core::traits::{BindingEventStream, MessageStream};
use wharf_core::types::{
    BindingRequest, BindingResponse, ConfigurationItem, PubSubMessage, SetRequest, StateItem,
};
use wharf_core::{
    Category, Component, ConfigurationStore, InputBinding, Metadata, NameResolver,
    OutputBinding, PubSub, SecretStore, SharedDeps, StateStore, WharfError,
};
use wharf_registry::Registries;

/// A component usable in any category.
pub struct MockComponent {
    kind: String,
    category: Category,
    values: Mutex<HashMap<String, Bytes>>,
    published: Mutex<Vec<PubSubMessage>>,
    closed: AtomicUsize,
}

impl MockComponent {
    pub fn new(category: Category, kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            category,
            values: Mutex::new(HashMap::new()),
            published: Mutex::new(Vec::new()),
            closed: AtomicUsize::new(0),
        }
    }

    /// Messages captured by `publish`.
    pub async fn published(&self) -> Vec<PubSubMessage> {
        self.published.lock().await.clone()
    }

    pub fn close_count(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Component for MockComponent {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn category(&self) -> Category {
        self.category
    }

    async fn init(&mut self, metadata: &Metadata) -> Result<(), WharfError> {
        let values = self.values.get_mut();
        for (key, value) in metadata.iter() {
            values.insert(key.to_string(), Bytes::copy_from_slice(value.as_bytes()));
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), WharfError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl StateStore for MockComponent {
    async fn get(&self, key: &str) -> Result<Option<StateItem>, WharfError> {
        Ok(self.values.lock().await.get(key).map(|value| StateItem {
            key: key.to_string(),
            value: value.clone(),
            etag: None,
        }))
    }

    async fn set(&self, request: SetRequest) -> Result<String, WharfError> {
        let mut values = self.values.lock().await;
        values.insert(request.key, request.value);
        Ok(values.len().to_string())
    }

    async fn delete(&self, key: &str, _etag: Option<&str>) -> Result<(), WharfError> {
        self.values.lock().await.remove(key);
        Ok(())
    }
}

#[async_trait]
impl SecretStore for MockComponent {
    async fn get_secret(
        &self,
        name: &str,
        _metadata: &Metadata,
    ) -> Result<HashMap<String, String>, WharfError> {
        let values = self.values.lock().await;
        let value = values
            .get(name)
            .ok_or_else(|| WharfError::component(self.category, format!("secret `{name}` not found")))?;
        Ok(HashMap::from([(
            name.to_string(),
            String::from_utf8_lossy(value).into_owned(),
        )]))
    }

    async fn bulk_get_secret(
        &self,
        _metadata: &Metadata,
    ) -> Result<HashMap<String, HashMap<String, String>>, WharfError> {
        let values = self.values.lock().await;
        Ok(values
            .iter()
            .map(|(k, v)| {
                let inner = HashMap::from([(k.clone(), String::from_utf8_lossy(v).into_owned())]);
                (k.clone(), inner)
            })
            .collect())
    }
}

#[async_trait]
impl ConfigurationStore for MockComponent {
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, ConfigurationItem>, WharfError> {
        let values = self.values.lock().await;
        Ok(values
            .iter()
            .filter(|(k, _)| keys.is_empty() || keys.contains(k))
            .map(|(k, v)| {
                let item = ConfigurationItem {
                    value: String::from_utf8_lossy(v).into_owned(),
                    version: "1".to_string(),
                    metadata: HashMap::new(),
                };
                (k.clone(), item)
            })
            .collect())
    }
}

#[async_trait]
impl PubSub for MockComponent {
    async fn publish(&self, message: PubSubMessage) -> Result<(), WharfError> {
        self.published.lock().await.push(message);
        Ok(())
    }

    async fn subscribe(&self, _topic: &str) -> Result<MessageStream, WharfError> {
        Ok(Box::pin(stream::empty()))
    }
}

#[async_trait]
impl NameResolver for MockComponent {
    async fn resolve(&self, app_id: &str) -> Result<String, WharfError> {
        Ok(format!("{app_id}.mock:3500"))
    }
}

#[async_trait]
impl InputBinding for MockComponent {
    async fn read(&self) -> Result<BindingEventStream, WharfError> {
        Ok(Box::pin(stream::empty()))
    }
}

#[async_trait]
impl OutputBinding for MockComponent {
    fn operations(&self) -> Vec<String> {
        vec!["create".to_string()]
    }

    async fn invoke(&self, request: BindingRequest) -> Result<BindingResponse, WharfError> {
        Ok(BindingResponse {
            data: request.data,
            metadata: request.metadata,
        })
    }
}

/// Register a [`MockComponent`] under `name` in `category`.
///
/// HTTP middleware gets a pass-through middleware instead.
pub fn register_mock(
    registries: &mut Registries,
    category: Category,
    name: &str,
) -> Result<(), WharfError> {
    macro_rules! mock {
        ($registry:ident, $capability:ident) => {{
            let kind = name.to_string();
            registries
                .$registry()
                .register(name, move |_: &SharedDeps| -> Box<dyn $capability> {
                    Box::new(MockComponent::new(category, kind.clone()))
                })
        }};
    }

    match category {
        Category::SecretStore => mock!(secret_stores_mut, SecretStore),
        Category::StateStore => mock!(state_stores_mut, StateStore),
        Category::ConfigurationStore => mock!(configuration_stores_mut, ConfigurationStore),
        Category::PubSub => mock!(pubsubs_mut, PubSub),
        Category::NameResolution => mock!(name_resolvers_mut, NameResolver),
        Category::InputBinding => mock!(input_bindings_mut, InputBinding),
        Category::OutputBinding => mock!(output_bindings_mut, OutputBinding),
        Category::HttpMiddleware => registries
            .http_middleware_mut()
            .register(name, |_: &Metadata, _: &SharedDeps| {
                Ok(middleware_fn(|next| next))
            }),
    }
}

/// Register a state-store factory that counts its invocations.
pub fn register_counting_state_store(
    registries: &mut Registries,
    name: &str,
) -> Result<Arc<AtomicUsize>, WharfError> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let kind = name.to_string();
    registries
        .state_stores_mut()
        .register(name, move |_: &SharedDeps| -> Box<dyn StateStore> {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(MockComponent::new(Category::StateStore, kind.clone()))
        })?;
    Ok(calls)
}

/// Register a middleware factory that fails unless `key` is present.
pub fn register_requiring_middleware(
    registries: &mut Registries,
    name: &str,
    key: &'static str,
) -> Result<(), WharfError> {
    registries
        .http_middleware_mut()
        .register(name, move |metadata: &Metadata, _: &SharedDeps| {
            metadata.require(key)?;
            Ok(middleware_fn(|next| next))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn instances_keep_separate_state() {
        let a = MockComponent::new(Category::StateStore, "mock");
        let b = MockComponent::new(Category::StateStore, "mock");
        a.set(SetRequest {
            key: "k".into(),
            value: Bytes::from_static(b"v"),
            etag: None,
        })
        .await
        .unwrap();

        assert!(StateStore::get(&a, "k").await.unwrap().is_some());
        assert!(StateStore::get(&b, "k").await.unwrap().is_none());
    }

    #[test]
    fn registers_in_every_category() {
        let mut registries = Registries::new();
        for category in Category::ALL {
            register_mock(&mut registries, category, "mock").unwrap();
        }
        assert_eq!(registries.len(), Category::ALL.len());
    }
}
