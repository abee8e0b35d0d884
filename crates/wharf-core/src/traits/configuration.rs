// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration store capability.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::WharfError;
use crate::traits::component::Component;
use crate::types::ConfigurationItem;

#[async_trait]
pub trait ConfigurationStore: Component {
    /// Fetches the given keys; an empty slice fetches everything.
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, ConfigurationItem>, WharfError>;
}
