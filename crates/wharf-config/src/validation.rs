// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation.
//!
//! Checks constraints serde cannot express. All problems are collected and
//! returned together.

use std::collections::HashSet;
use std::net::IpAddr;

use crate::diagnostic::ConfigError;
use crate::model::WharfConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
pub fn validate_config(config: &WharfConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.host.app_id.trim().is_empty() {
        fail("host.app_id must not be empty".to_string());
    }

    let level = config.host.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "host.log_level `{}` is not one of {}",
            config.host.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.shutdown.grace_period_ms == 0 {
        fail("shutdown.grace_period_ms must be greater than zero".to_string());
    }
    if config.shutdown.force_timeout_ms == 0 {
        fail("shutdown.force_timeout_ms must be greater than zero".to_string());
    }

    let addr = config.http.bind_address.trim();
    if addr.is_empty() {
        fail("http.bind_address must not be empty".to_string());
    } else if addr.parse::<IpAddr>().is_err()
        && !addr.chars().all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!(
            "http.bind_address `{addr}` is not a valid IP address or hostname"
        ));
    }

    for (i, handler) in config.pipeline.handlers.iter().enumerate() {
        if handler.name.trim().is_empty() {
            fail(format!("pipeline.handlers[{i}].name must not be empty"));
        }
    }

    let mut seen = HashSet::new();
    for (i, component) in config.components.iter().enumerate() {
        if component.name.trim().is_empty() {
            fail(format!("components[{i}].name must not be empty"));
        } else if !seen.insert((component.category, component.name.as_str())) {
            fail(format!(
                "duplicate {} component `{}` in [[components]]",
                component.category, component.name
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use wharf_core::{Category, Metadata};

    use super::*;
    use crate::model::{ComponentConfig, HandlerConfig};

    fn messages(result: Result<(), Vec<ConfigError>>) -> Vec<String> {
        result
            .err()
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&WharfConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_problem() {
        let mut config = WharfConfig::default();
        config.host.app_id = " ".to_string();
        config.host.log_level = "loud".to_string();
        config.shutdown.grace_period_ms = 0;

        let msgs = messages(validate_config(&config));
        assert_eq!(msgs.len(), 3, "got: {msgs:?}");
    }

    #[test]
    fn rejects_zero_force_timeout() {
        let mut config = WharfConfig::default();
        config.shutdown.force_timeout_ms = 0;
        let msgs = messages(validate_config(&config));
        assert_eq!(msgs.len(), 1, "got: {msgs:?}");
        assert!(msgs[0].contains("shutdown.force_timeout_ms"));
    }

    #[test]
    fn rejects_bad_bind_address() {
        let mut config = WharfConfig::default();
        config.http.bind_address = "not an address!".to_string();
        let msgs = messages(validate_config(&config));
        assert!(msgs[0].contains("bind_address"));
    }

    #[test]
    fn rejects_duplicate_components_within_category_only() {
        let component = |category, name: &str| ComponentConfig {
            category,
            name: name.to_string(),
            metadata: Metadata::new(),
        };

        let mut config = WharfConfig::default();
        config.components = vec![
            component(Category::StateStore, "redis"),
            component(Category::PubSub, "redis"),
        ];
        assert!(validate_config(&config).is_ok());

        config.components.push(component(Category::StateStore, "redis"));
        let msgs = messages(validate_config(&config));
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("duplicate state-store component `redis`"));
    }

    #[test]
    fn rejects_unnamed_handler() {
        let mut config = WharfConfig::default();
        config.pipeline.handlers.push(HandlerConfig {
            name: String::new(),
            metadata: Metadata::new(),
        });
        let msgs = messages(validate_config(&config));
        assert!(msgs[0].contains("pipeline.handlers[0].name"));
    }
}
