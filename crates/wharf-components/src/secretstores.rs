// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local secret stores: process environment and a JSON file.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use wharf_core::{Category, Component, Metadata, SecretStore, WharfError};

pub const LOCAL_ENV: &str = "local.env";
pub const LOCAL_FILE: &str = "local.file";

const DEFAULT_NESTED_SEPARATOR: &str = ":";

type SecretMap = HashMap<String, String>;

fn not_found(name: &str) -> WharfError {
    WharfError::component(Category::SecretStore, format!("secret `{name}` not found"))
}

/// Reads secrets from the process environment.
///
/// With a `prefix` metadata key, only variables starting with it are visible
/// and the prefix is stripped from their names.
#[derive(Debug, Default)]
pub struct EnvSecretStore {
    prefix: Option<String>,
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn visible(&self) -> impl Iterator<Item = (String, String)> + '_ {
        std::env::vars().filter_map(|(key, value)| match &self.prefix {
            Some(prefix) => key.strip_prefix(prefix.as_str()).map(|k| (k.to_string(), value)),
            None => Some((key, value)),
        })
    }
}

#[async_trait]
impl Component for EnvSecretStore {
    fn kind(&self) -> &str {
        LOCAL_ENV
    }

    fn category(&self) -> Category {
        Category::SecretStore
    }

    async fn init(&mut self, metadata: &Metadata) -> Result<(), WharfError> {
        self.prefix = metadata
            .get("prefix")
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        Ok(())
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_secret(&self, name: &str, _metadata: &Metadata) -> Result<SecretMap, WharfError> {
        let key = match &self.prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_string(),
        };
        let value = std::env::var(&key).map_err(|_| not_found(name))?;
        Ok(HashMap::from([(name.to_string(), value)]))
    }

    async fn bulk_get_secret(
        &self,
        _metadata: &Metadata,
    ) -> Result<HashMap<String, SecretMap>, WharfError> {
        Ok(self
            .visible()
            .map(|(key, value)| (key.clone(), HashMap::from([(key, value)])))
            .collect())
    }
}

/// Reads secrets from a JSON file loaded at init.
///
/// Nested objects are flattened, joining keys with `nestedSeparator`
/// (default `:`), so `{"db": {"password": "x"}}` yields `db:password`.
#[derive(Debug, Default)]
pub struct FileSecretStore {
    secrets: SecretMap,
}

impl FileSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn config_error(reason: impl Into<String>) -> WharfError {
        WharfError::Config {
            category: Category::SecretStore,
            name: LOCAL_FILE.to_string(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Component for FileSecretStore {
    fn kind(&self) -> &str {
        LOCAL_FILE
    }

    fn category(&self) -> Category {
        Category::SecretStore
    }

    async fn init(&mut self, metadata: &Metadata) -> Result<(), WharfError> {
        let path = metadata
            .require("secretsFile")
            .map(PathBuf::from)
            .map_err(|e| Self::config_error(e.reason))?;
        let separator = metadata
            .get("nestedSeparator")
            .unwrap_or(DEFAULT_NESTED_SEPARATOR);

        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
            Self::config_error(format!("cannot read `{}`: {e}", path.display()))
        })?;
        let document: Value = serde_json::from_str(&raw).map_err(|e| {
            Self::config_error(format!("`{}` is not valid JSON: {e}", path.display()))
        })?;
        if !document.is_object() {
            return Err(Self::config_error(format!(
                "`{}` must contain a JSON object at the top level",
                path.display()
            )));
        }

        let mut secrets = HashMap::new();
        flatten(&document, None, separator, &mut secrets);
        debug!(count = secrets.len(), path = %path.display(), "secrets file loaded");
        self.secrets = secrets;
        Ok(())
    }
}

fn flatten(value: &Value, prefix: Option<&str>, separator: &str, out: &mut SecretMap) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = match prefix {
                    Some(p) => format!("{p}{separator}{key}"),
                    None => key.clone(),
                };
                flatten(child, Some(&path), separator, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.unwrap_or_default().to_string(), s.clone());
        }
        other => {
            out.insert(prefix.unwrap_or_default().to_string(), other.to_string());
        }
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get_secret(&self, name: &str, _metadata: &Metadata) -> Result<SecretMap, WharfError> {
        let value = self.secrets.get(name).ok_or_else(|| not_found(name))?;
        Ok(HashMap::from([(name.to_string(), value.clone())]))
    }

    async fn bulk_get_secret(
        &self,
        _metadata: &Metadata,
    ) -> Result<HashMap<String, SecretMap>, WharfError> {
        Ok(self
            .secrets
            .iter()
            .map(|(k, v)| (k.clone(), HashMap::from([(k.clone(), v.clone())])))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;

    use super::*;

    #[tokio::test]
    #[serial]
    async fn env_store_reads_prefixed_variables() {
        // SAFETY: serialized with every other test touching the environment.
        unsafe {
            std::env::set_var("WHARF_TEST_SECRET_DB", "hunter2");
        }

        let mut store = EnvSecretStore::new();
        store
            .init(&Metadata::from([("prefix", "WHARF_TEST_SECRET_")]))
            .await
            .unwrap();

        let secret = store.get_secret("DB", &Metadata::new()).await.unwrap();
        assert_eq!(secret.get("DB").map(String::as_str), Some("hunter2"));

        let all = store.bulk_get_secret(&Metadata::new()).await.unwrap();
        assert!(all.contains_key("DB"));
        assert!(all.keys().all(|k| !k.starts_with("WHARF_TEST_SECRET_")));

        unsafe {
            std::env::remove_var("WHARF_TEST_SECRET_DB");
        }
    }

    #[tokio::test]
    #[serial]
    async fn env_store_missing_secret_is_an_error() {
        let store = EnvSecretStore::new();
        let err = store
            .get_secret("WHARF_TEST_DEFINITELY_UNSET", &Metadata::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WharfError::Component {
                category: Category::SecretStore,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn file_store_flattens_nested_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"api": "k1", "db": {{"user": "admin", "port": 5432}}}}"#
        )
        .unwrap();

        let mut store = FileSecretStore::new();
        let metadata = Metadata::from([
            ("secretsFile", file.path().to_str().unwrap()),
            ("nestedSeparator", "."),
        ]);
        store.init(&metadata).await.unwrap();

        let user = store.get_secret("db.user", &Metadata::new()).await.unwrap();
        assert_eq!(user["db.user"], "admin");
        let port = store.get_secret("db.port", &Metadata::new()).await.unwrap();
        assert_eq!(port["db.port"], "5432");
        assert_eq!(store.bulk_get_secret(&Metadata::new()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn file_store_rejects_non_object_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#""just-a-string""#).unwrap();

        let mut store = FileSecretStore::new();
        let err = store
            .init(&Metadata::from([("secretsFile", file.path().to_str().unwrap())]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WharfError::Config { ref reason, .. } if reason.contains("JSON object")
        ));
        assert!(store.bulk_get_secret(&Metadata::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_store_requires_secrets_file() {
        let mut store = FileSecretStore::new();
        let err = store.init(&Metadata::new()).await.unwrap_err();
        assert!(matches!(err, WharfError::Config { ref name, .. } if name == LOCAL_FILE));
    }
}
