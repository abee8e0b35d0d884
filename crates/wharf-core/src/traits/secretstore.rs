// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret store capability.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::WharfError;
use crate::traits::component::Component;
use crate::types::Metadata;

/// Read-only access to named secrets. A secret may hold several key/value pairs.
#[async_trait]
pub trait SecretStore: Component {
    async fn get_secret(
        &self,
        name: &str,
        metadata: &Metadata,
    ) -> Result<HashMap<String, String>, WharfError>;

    async fn bulk_get_secret(
        &self,
        metadata: &Metadata,
    ) -> Result<HashMap<String, HashMap<String, String>>, WharfError>;
}
