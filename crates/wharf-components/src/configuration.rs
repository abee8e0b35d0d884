// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory configuration store seeded from component metadata.

use std::collections::HashMap;

use async_trait::async_trait;
use wharf_core::types::ConfigurationItem;
use wharf_core::{Category, Component, ConfigurationStore, Metadata, WharfError};

pub const IN_MEMORY: &str = "in-memory";

const INITIAL_VERSION: &str = "1";

/// Serves the metadata pairs it was initialized with as version `1` items.
#[derive(Debug, Default)]
pub struct InMemoryConfigurationStore {
    items: HashMap<String, ConfigurationItem>,
}

impl InMemoryConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Component for InMemoryConfigurationStore {
    fn kind(&self) -> &str {
        IN_MEMORY
    }

    fn category(&self) -> Category {
        Category::ConfigurationStore
    }

    async fn init(&mut self, metadata: &Metadata) -> Result<(), WharfError> {
        self.items = metadata
            .iter()
            .map(|(key, value)| {
                let item = ConfigurationItem {
                    value: value.to_string(),
                    version: INITIAL_VERSION.to_string(),
                    metadata: HashMap::new(),
                };
                (key.to_string(), item)
            })
            .collect();
        Ok(())
    }
}

#[async_trait]
impl ConfigurationStore for InMemoryConfigurationStore {
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, ConfigurationItem>, WharfError> {
        if keys.is_empty() {
            return Ok(self.items.clone());
        }
        Ok(keys
            .iter()
            .filter_map(|key| self.items.get(key).map(|item| (key.clone(), item.clone())))
            .collect())
    }
}
