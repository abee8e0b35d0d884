// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Name resolution capability.

use async_trait::async_trait;

use crate::error::WharfError;
use crate::traits::component::Component;

/// Resolves an application id to a `host:port` address.
#[async_trait]
pub trait NameResolver: Component {
    async fn resolve(&self, app_id: &str) -> Result<String, WharfError>;
}
