// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order (later overrides earlier): compiled defaults,
//! `/etc/wharf/wharf.toml`, `~/.config/wharf/wharf.toml`, `./wharf.toml`,
//! then `WHARF_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::WharfConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/wharf/wharf.toml";
pub(crate) const LOCAL_CONFIG: &str = "wharf.toml";

/// Path of the per-user config file, if a config directory exists.
pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("wharf").join("wharf.toml"))
}

/// Build the Figment for the standard file hierarchy plus env overrides.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(WharfConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment.merge(Toml::file(LOCAL_CONFIG)).merge(env_provider())
}

/// Load configuration from the standard hierarchy.
pub fn load_config() -> Result<WharfConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from one file, with env overrides, skipping the hierarchy.
pub fn load_config_from_path(path: &Path) -> Result<WharfConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WharfConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Load configuration from an inline TOML string (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<WharfConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WharfConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// `WHARF_<SECTION>_<KEY>` maps to `<section>.<key>`.
///
/// Uses `Env::map()` rather than `Env::split("_")` so keys that contain
/// underscores (`app_id`, `grace_period_ms`) stay intact.
fn env_provider() -> Env {
    Env::prefixed("WHARF_").map(|key| {
        // Keys arrive with their original case (`HOST_APP_ID`).
        let key = key.as_str().to_ascii_lowercase();
        ["host_", "shutdown_", "http_"]
            .iter()
            .find_map(|section| {
                key.strip_prefix(section)
                    .map(|rest| format!("{}.{rest}", section.trim_end_matches('_')))
            })
            .unwrap_or(key)
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("WHARF_HOST_APP_ID", "checkout");
            jail.set_env("WHARF_SHUTDOWN_GRACE_PERIOD_MS", "250");
            jail.set_env("WHARF_HTTP_PORT", "8080");

            let config = load_config_from_path(Path::new("missing.toml"))?;
            assert_eq!(config.host.app_id, "checkout");
            assert_eq!(config.shutdown.grace_period_ms, 250);
            assert_eq!(config.http.port, 8080);
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG,
                r#"
[host]
log_level = "debug"
"#,
            )?;

            let config = load_config()?;
            assert_eq!(config.host.log_level, "debug");
            assert_eq!(config.host.app_id, "wharf");
            Ok(())
        });
    }
}
