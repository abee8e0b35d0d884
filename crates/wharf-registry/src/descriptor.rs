// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Component descriptors: the declared structure of a registration.
//!
//! A descriptor names the component, carries a version and description for
//! listings, and declares which metadata keys the component understands.
//! Composition checks descriptors before any instance is constructed.

use std::collections::HashSet;

use serde::Serialize;

/// Declared structure of one registered component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentDescriptor {
    /// Registered name (e.g. "redis", "local.env").
    pub name: String,
    /// Semantic version string.
    pub version: String,
    /// Human-readable description.
    pub description: String,
    /// Metadata keys the component reads.
    pub metadata_keys: Vec<String>,
    /// Keys from `metadata_keys` that must be supplied.
    pub required_keys: Vec<String>,
}

impl ComponentDescriptor {
    /// A descriptor with version `0.1.0` and no declared metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "0.1.0".to_string(),
            description: String::new(),
            metadata_keys: Vec::new(),
            required_keys: Vec::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declares an optional metadata key.
    pub fn optional_key(mut self, key: impl Into<String>) -> Self {
        self.metadata_keys.push(key.into());
        self
    }

    /// Declares a metadata key that must be present.
    pub fn required_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.metadata_keys.push(key.clone());
        self.required_keys.push(key);
        self
    }

    /// Checks that the declared structure is self-consistent.
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }

        semver::Version::parse(&self.version)
            .map_err(|e| format!("version `{}` is not valid semver: {e}", self.version))?;

        let mut seen = HashSet::new();
        for key in &self.metadata_keys {
            if key.trim().is_empty() {
                return Err("metadata keys must not be empty".to_string());
            }
            if !seen.insert(key.as_str()) {
                return Err(format!("metadata key `{key}` is declared twice"));
            }
        }

        if let Some(key) = self
            .required_keys
            .iter()
            .find(|k| !seen.contains(k.as_str()))
        {
            return Err(format!("required key `{key}` is not a declared metadata key"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_declares_required_keys_as_metadata() {
        let d = ComponentDescriptor::new("ratelimit")
            .description("Fixed-window request limiter")
            .required_key("maxRequests");
        assert_eq!(d.metadata_keys, vec!["maxRequests"]);
        assert_eq!(d.required_keys, vec!["maxRequests"]);
        assert!(d.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_name() {
        let err = ComponentDescriptor::new("  ").validate().unwrap_err();
        assert!(err.contains("name"));
    }

    #[test]
    fn validate_rejects_bad_version() {
        let err = ComponentDescriptor::new("redis")
            .version("one")
            .validate()
            .unwrap_err();
        assert!(err.contains("semver"), "got: {err}");
    }

    #[test]
    fn validate_rejects_duplicate_keys() {
        let err = ComponentDescriptor::new("redis")
            .optional_key("host")
            .optional_key("host")
            .validate()
            .unwrap_err();
        assert!(err.contains("declared twice"));
    }

    #[test]
    fn validate_rejects_undeclared_required_key() {
        let mut d = ComponentDescriptor::new("redis");
        d.required_keys.push("password".to_string());
        let err = d.validate().unwrap_err();
        assert!(err.contains("password"));
    }
}
