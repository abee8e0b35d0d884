// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! State store capability.

use async_trait::async_trait;

use crate::error::WharfError;
use crate::traits::component::Component;
use crate::types::{SetRequest, StateItem};

/// Key/value persistence with optimistic concurrency via ETags.
#[async_trait]
pub trait StateStore: Component {
    async fn get(&self, key: &str) -> Result<Option<StateItem>, WharfError>;

    /// Writes a value and returns its new ETag.
    async fn set(&self, request: SetRequest) -> Result<String, WharfError>;

    /// Deletes a key. With `etag`, only deletes when the stored tag matches.
    async fn delete(&self, key: &str, etag: Option<&str>) -> Result<(), WharfError>;
}
