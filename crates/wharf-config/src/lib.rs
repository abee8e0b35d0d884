// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Wharf host.
//!
//! Provides layered TOML configuration with strict key checking
//! (`deny_unknown_fields`), environment overrides, post-load validation,
//! and miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! let config = wharf_config::load_and_validate().expect("config errors");
//! println!("app id: {}", config.host.app_id);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::WharfConfig;

/// Load configuration from the standard hierarchy and validate it.
pub fn load_and_validate() -> Result<WharfConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from a single file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<WharfConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Load configuration from an inline TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<WharfConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

#[allow(clippy::result_large_err)]
fn finish(
    loaded: Result<WharfConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<WharfConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Contents of every config file in the hierarchy that exists, for span lookup.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|d| d.join(loader::LOCAL_CONFIG))
        .unwrap_or_else(|_| loader::LOCAL_CONFIG.into());

    [
        Some(local),
        loader::user_config_path(),
        Some(loader::SYSTEM_CONFIG.into()),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| read_source(&path))
    .collect()
}

fn read_source(path: &Path) -> Option<(String, String)> {
    std::fs::read_to_string(path)
        .ok()
        .map(|content| (path.display().to_string(), content))
}
