// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input and output binding capabilities.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::WharfError;
use crate::traits::component::Component;
use crate::types::{BindingEvent, BindingRequest, BindingResponse};

/// Events produced by an input binding.
pub type BindingEventStream = Pin<Box<dyn Stream<Item = Result<BindingEvent, WharfError>> + Send>>;

/// Receives events from an external system.
#[async_trait]
pub trait InputBinding: Component {
    async fn read(&self) -> Result<BindingEventStream, WharfError>;
}

/// Sends requests to an external system.
#[async_trait]
pub trait OutputBinding: Component {
    /// Operations this binding accepts (e.g. `"create"`).
    fn operations(&self) -> Vec<String>;

    async fn invoke(&self, request: BindingRequest) -> Result<BindingResponse, WharfError>;
}
