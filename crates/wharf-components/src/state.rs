// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory state store with per-key ETags.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use wharf_core::types::{SetRequest, StateItem};
use wharf_core::{Category, Component, StateStore, WharfError};

pub const IN_MEMORY: &str = "in-memory";

#[derive(Debug)]
struct Stored {
    value: Bytes,
    etag: String,
}

/// Concurrent map of keys to values. Every write issues a fresh ETag.
#[derive(Debug)]
pub struct InMemoryStateStore {
    items: DashMap<String, Stored>,
    next_etag: AtomicU64,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
            next_etag: AtomicU64::new(1),
        }
    }

    fn issue_etag(&self) -> String {
        self.next_etag.fetch_add(1, Ordering::Relaxed).to_string()
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

fn etag_mismatch(key: &str) -> WharfError {
    WharfError::EtagMismatch {
        key: key.to_string(),
    }
}

#[async_trait]
impl Component for InMemoryStateStore {
    fn kind(&self) -> &str {
        IN_MEMORY
    }

    fn category(&self) -> Category {
        Category::StateStore
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<StateItem>, WharfError> {
        Ok(self.items.get(key).map(|stored| StateItem {
            key: key.to_string(),
            value: stored.value.clone(),
            etag: Some(stored.etag.clone()),
        }))
    }

    async fn set(&self, request: SetRequest) -> Result<String, WharfError> {
        let etag = self.issue_etag();
        let stored = Stored {
            value: request.value,
            etag: etag.clone(),
        };

        match self.items.entry(request.key) {
            Entry::Occupied(mut entry) => {
                if let Some(expected) = &request.etag {
                    if *expected != entry.get().etag {
                        return Err(etag_mismatch(entry.key()));
                    }
                }
                entry.insert(stored);
            }
            Entry::Vacant(entry) => {
                if request.etag.is_some() {
                    return Err(etag_mismatch(entry.key()));
                }
                entry.insert(stored);
            }
        }
        Ok(etag)
    }

    async fn delete(&self, key: &str, etag: Option<&str>) -> Result<(), WharfError> {
        match etag {
            None => {
                self.items.remove(key);
                Ok(())
            }
            Some(expected) => self
                .items
                .remove_if(key, |_, stored| stored.etag == expected)
                .map(drop)
                .ok_or_else(|| etag_mismatch(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(key: &str, value: &'static str, etag: Option<String>) -> SetRequest {
        SetRequest {
            key: key.to_string(),
            value: Bytes::from_static(value.as_bytes()),
            etag,
        }
    }

    #[tokio::test]
    async fn writes_issue_new_etags() {
        let store = InMemoryStateStore::new();
        let first = store.set(set("k", "a", None)).await.unwrap();
        let second = store.set(set("k", "b", None)).await.unwrap();
        assert_ne!(first, second);

        let item = store.get("k").await.unwrap().unwrap();
        assert_eq!(item.value.as_ref(), b"b");
        assert_eq!(item.etag.as_deref(), Some(second.as_str()));
    }

    #[tokio::test]
    async fn stale_etag_is_rejected() {
        let store = InMemoryStateStore::new();
        let stale = store.set(set("k", "a", None)).await.unwrap();
        let fresh = store.set(set("k", "b", Some(stale.clone()))).await.unwrap();

        assert!(matches!(
            store.set(set("k", "c", Some(stale.clone()))).await,
            Err(WharfError::EtagMismatch { .. })
        ));
        assert!(matches!(
            store.delete("k", Some(&stale)).await,
            Err(WharfError::EtagMismatch { .. })
        ));
        store.delete("k", Some(&fresh)).await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn etag_on_missing_key_is_rejected() {
        let store = InMemoryStateStore::new();
        assert!(matches!(
            store.set(set("k", "a", Some("7".into()))).await,
            Err(WharfError::EtagMismatch { .. })
        ));
        assert!(matches!(
            store.delete("k", Some("7")).await,
            Err(WharfError::EtagMismatch { .. })
        ));
        store.delete("k", None).await.unwrap();
    }
}
