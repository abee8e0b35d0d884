// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Publish/subscribe broker capability.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::WharfError;
use crate::traits::component::Component;
use crate::types::PubSubMessage;

/// Messages delivered to one subscription.
pub type MessageStream = Pin<Box<dyn Stream<Item = Result<PubSubMessage, WharfError>> + Send>>;

#[async_trait]
pub trait PubSub: Component {
    async fn publish(&self, message: PubSubMessage) -> Result<(), WharfError>;

    /// Subscribes to a topic. Messages published before the call are not delivered.
    async fn subscribe(&self, topic: &str) -> Result<MessageStream, WharfError>;
}
