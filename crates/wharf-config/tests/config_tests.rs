// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Wharf configuration system.

use std::io::Write;

use wharf_config::diagnostic::ConfigError;
use wharf_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};
use wharf_core::Category;

/// A complete config with every section deserializes.
#[test]
fn full_config_deserializes() {
    let toml = r#"
[host]
app_id = "checkout"
log_level = "debug"

[shutdown]
grace_period_ms = 2000
force_timeout_ms = 500

[http]
enabled = false
bind_address = "0.0.0.0"
port = 3600

[[pipeline.handlers]]
name = "ratelimit"
metadata = { maxRequests = "10" }

[[pipeline.handlers]]
name = "uppercase"

[[components]]
category = "state-store"
name = "in-memory"

[[components]]
category = "secret-store"
name = "local.file"
metadata = { secretsFile = "/run/secrets.json" }
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.host.app_id, "checkout");
    assert_eq!(config.host.log_level, "debug");
    assert_eq!(config.shutdown.grace_period().as_millis(), 2000);
    assert_eq!(config.shutdown.force_timeout().as_millis(), 500);
    assert!(!config.http.enabled);
    assert_eq!(config.http.port, 3600);

    let handlers: Vec<&str> = config
        .pipeline
        .handlers
        .iter()
        .map(|h| h.name.as_str())
        .collect();
    assert_eq!(handlers, vec!["ratelimit", "uppercase"]);
    assert_eq!(
        config.pipeline.handlers[0].metadata.get("maxRequests"),
        Some("10")
    );
    assert!(config.pipeline.handlers[1].metadata.is_empty());

    assert_eq!(config.components.len(), 2);
    assert_eq!(config.components[0].category, Category::StateStore);
    assert_eq!(
        config.components[1].metadata.get("secretsFile"),
        Some("/run/secrets.json")
    );
}

/// An empty document yields the compiled defaults.
#[test]
fn empty_config_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    assert_eq!(config.host.app_id, "wharf");
    assert_eq!(config.host.log_level, "info");
    assert_eq!(config.shutdown.grace_period_ms, 5000);
    assert_eq!(config.shutdown.force_timeout_ms, 1000);
    assert!(config.http.enabled);
    assert_eq!(config.http.bind_address, "127.0.0.1");
    assert!(config.pipeline.handlers.is_empty());
    assert!(config.components.is_empty());
}

/// A misspelled key is reported with a suggestion.
#[test]
fn unknown_key_gets_suggestion() {
    let toml = "[host]\napp_di = \"x\"\n";
    let errors = load_and_validate_str(toml).expect_err("unknown key should fail");
    assert_eq!(errors.len(), 1);

    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "app_di");
            assert_eq!(suggestion.as_deref(), Some("app_id"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// An unknown category name is rejected at load time.
#[test]
fn unknown_category_is_rejected() {
    let toml = r#"
[[components]]
category = "blob-store"
name = "s3"
"#;
    let errors = load_and_validate_str(toml).expect_err("bad category should fail");
    assert!(
        errors
            .iter()
            .any(|e| e.to_string().contains("blob-store")),
        "got: {errors:?}"
    );
}

/// A component entry without a name is a missing-key error.
#[test]
fn component_without_name_is_missing_key() {
    let toml = r#"
[[components]]
category = "state-store"
"#;
    let errors = load_and_validate_str(toml).expect_err("missing name should fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::MissingKey { key } if key.ends_with("name"))),
        "got: {errors:?}"
    );
}

/// Wrong value types are reported as invalid types.
#[test]
fn wrong_type_is_reported() {
    let toml = "[http]\nport = \"eighty\"\n";
    let errors = load_and_validate_str(toml).expect_err("string port should fail");
    assert!(
        matches!(&errors[0], ConfigError::InvalidType { key, .. } if key.ends_with("port")),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after a successful load.
#[test]
fn validation_errors_surface_through_loader() {
    let toml = r#"
[shutdown]
grace_period_ms = 0
"#;
    let errors = load_and_validate_str(toml).expect_err("zero grace should fail");
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

/// Loading from an explicit path reads that file.
#[test]
fn explicit_path_is_loaded() {
    // Inside a jail so env overrides from other tests cannot leak in.
    figment::Jail::expect_with(|_jail| {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[host]\napp_id = \"from-file\"").unwrap();

        let config = load_and_validate_path(file.path()).expect("file config is valid");
        assert_eq!(config.host.app_id, "from-file");
        Ok(())
    });
}

/// `WHARF_*` variables override values from the file.
#[test]
fn env_overrides_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("wharf.toml", "[host]\napp_id = \"from-file\"\n")?;
        jail.set_env("WHARF_HOST_APP_ID", "from-env");
        jail.set_env("WHARF_SHUTDOWN_GRACE_PERIOD_MS", "750");

        let config = load_and_validate_path(std::path::Path::new("wharf.toml"))
            .expect("env overrides are valid");
        assert_eq!(config.host.app_id, "from-env");
        assert_eq!(config.shutdown.grace_period_ms, 750);
        Ok(())
    });
}
