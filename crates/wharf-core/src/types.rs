// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the registries, the capability traits, and the host.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::MiddlewareConfigError;

/// The closed set of pluggable component categories.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    SecretStore,
    StateStore,
    ConfigurationStore,
    PubSub,
    NameResolution,
    InputBinding,
    OutputBinding,
    HttpMiddleware,
}

impl Category {
    /// Every category, in registry order.
    pub const ALL: [Category; 8] = [
        Category::SecretStore,
        Category::StateStore,
        Category::ConfigurationStore,
        Category::PubSub,
        Category::NameResolution,
        Category::InputBinding,
        Category::OutputBinding,
        Category::HttpMiddleware,
    ];
}

/// Host lifecycle state. Ordered so that transitions only move forward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleState {
    Initialized,
    Running,
    ShuttingDown,
    Stopped,
}

/// String key/value metadata handed to components and middleware factories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value for `key`, or a [`MiddlewareConfigError`] naming it.
    pub fn require(&self, key: &str) -> Result<&str, MiddlewareConfigError> {
        self.get(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| MiddlewareConfigError::missing_key(key))
    }

    /// Parses a required key into `T`.
    pub fn require_parsed<T>(&self, key: &str) -> Result<T, MiddlewareConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.require(key)?;
        raw.trim().parse().map_err(|e| {
            MiddlewareConfigError::new(format!("metadata key `{key}` = `{raw}` is invalid: {e}"))
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Metadata {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

// --- State store ---

/// A stored value with its concurrency tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateItem {
    pub key: String,
    pub value: Bytes,
    pub etag: Option<String>,
}

/// A write to a state store. When `etag` is set, the write only succeeds if it matches.
#[derive(Debug, Clone)]
pub struct SetRequest {
    pub key: String,
    pub value: Bytes,
    pub etag: Option<String>,
}

// --- Configuration store ---

/// A versioned configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationItem {
    pub value: String,
    pub version: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

// --- Pub/sub ---

/// A message published to, or delivered from, a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubSubMessage {
    pub topic: String,
    pub data: Bytes,
    pub metadata: Metadata,
}

// --- Bindings ---

/// An event produced by an input binding.
#[derive(Debug, Clone)]
pub struct BindingEvent {
    pub data: Bytes,
    pub metadata: Metadata,
}

/// A request sent through an output binding.
#[derive(Debug, Clone)]
pub struct BindingRequest {
    pub operation: String,
    pub data: Bytes,
    pub metadata: Metadata,
}

/// The result of an output binding invocation.
#[derive(Debug, Clone, Default)]
pub struct BindingResponse {
    pub data: Bytes,
    pub metadata: Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_blank_values() {
        let md = Metadata::from([("maxRequests", "  ")]);
        let err = md.require("maxRequests").unwrap_err();
        assert!(err.reason.contains("maxRequests"));
    }

    #[test]
    fn require_parsed_reports_bad_numbers() {
        let md = Metadata::from([("maxRequests", "ten")]);
        let err = md.require_parsed::<u32>("maxRequests").unwrap_err();
        assert!(err.reason.contains("ten"), "got: {}", err.reason);

        let md = Metadata::from([("maxRequests", "10")]);
        assert_eq!(md.require_parsed::<u32>("maxRequests").unwrap(), 10);
    }

    #[test]
    fn metadata_deserializes_as_plain_table() {
        let md: Metadata = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        assert_eq!(md.get("token"), Some("abc"));
    }
}
