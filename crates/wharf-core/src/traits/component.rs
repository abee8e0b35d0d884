// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait shared by every component instance.

use async_trait::async_trait;

use crate::error::WharfError;
use crate::types::{Category, Metadata};

/// Identity and lifecycle hooks common to all component instances.
#[async_trait]
pub trait Component: Send + Sync + 'static {
    /// The registered name this instance was created under (e.g. `"in-memory"`).
    fn kind(&self) -> &str;

    /// The category whose capability contract this instance implements.
    fn category(&self) -> Category;

    /// Applies deployment metadata. Called once, before first use.
    async fn init(&mut self, _metadata: &Metadata) -> Result<(), WharfError> {
        Ok(())
    }

    /// Releases held resources.
    async fn close(&self) -> Result<(), WharfError> {
        Ok(())
    }
}
