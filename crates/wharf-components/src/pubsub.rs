// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process publish/subscribe broker.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use futures::stream;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};
use wharf_core::traits::MessageStream;
use wharf_core::types::PubSubMessage;
use wharf_core::{Category, Component, Metadata, PubSub, WharfError};

pub const IN_MEMORY: &str = "in-memory";

const DEFAULT_CAPACITY: usize = 1024;

type Topics = Arc<DashMap<String, broadcast::Sender<PubSubMessage>>>;

/// One broadcast channel per topic. Slow subscribers skip lagged messages.
///
/// A topic exists only while it has subscribers.
#[derive(Debug)]
pub struct InMemoryPubSub {
    topics: Topics,
    capacity: usize,
}

impl InMemoryPubSub {
    pub fn new() -> Self {
        Self {
            topics: Arc::new(DashMap::new()),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Removes the topic once its last receiver is gone.
struct PruneTopic {
    topics: Topics,
    topic: String,
}

impl Drop for PruneTopic {
    fn drop(&mut self) {
        let removed = self
            .topics
            .remove_if(&self.topic, |_, tx| tx.receiver_count() == 0);
        if removed.is_some() {
            debug!(topic = self.topic.as_str(), "topic removed after last subscriber");
        }
    }
}

/// Field order matters: the receiver is dropped before the prune runs.
struct Subscription {
    rx: broadcast::Receiver<PubSubMessage>,
    _prune: PruneTopic,
}

impl Default for InMemoryPubSub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Component for InMemoryPubSub {
    fn kind(&self) -> &str {
        IN_MEMORY
    }

    fn category(&self) -> Category {
        Category::PubSub
    }

    async fn init(&mut self, metadata: &Metadata) -> Result<(), WharfError> {
        if metadata.get("capacity").is_some() {
            self.capacity = metadata
                .require_parsed::<std::num::NonZeroUsize>("capacity")
                .map_err(|e| WharfError::Config {
                    category: Category::PubSub,
                    name: IN_MEMORY.to_string(),
                    reason: e.reason,
                })?
                .get();
        }
        Ok(())
    }
}

#[async_trait]
impl PubSub for InMemoryPubSub {
    async fn publish(&self, message: PubSubMessage) -> Result<(), WharfError> {
        let topic = message.topic.clone();
        let sent = self
            .topics
            .get(&topic)
            .and_then(|tx| tx.send(message).ok());
        match sent {
            Some(receivers) => debug!(topic = topic.as_str(), receivers, "message published"),
            None => debug!(topic = topic.as_str(), "message published with no subscribers"),
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<MessageStream, WharfError> {
        // Subscribing under the entry lock keeps a concurrent prune from
        // removing the channel before this receiver exists.
        let rx = self
            .topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();
        let subscription = Subscription {
            rx,
            _prune: PruneTopic {
                topics: self.topics.clone(),
                topic: topic.to_string(),
            },
        };

        let messages = stream::unfold(subscription, |mut sub| async move {
            loop {
                match sub.rx.recv().await {
                    Ok(message) => return Some((Ok::<_, WharfError>(message), sub)),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "pubsub subscriber lagged, messages dropped");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        });
        Ok(Box::pin(messages))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use futures::StreamExt;

    use super::*;

    fn message(topic: &str, data: &'static str) -> PubSubMessage {
        PubSubMessage {
            topic: topic.to_string(),
            data: Bytes::from_static(data.as_bytes()),
            metadata: Metadata::new(),
        }
    }

    #[tokio::test]
    async fn subscribers_receive_only_their_topic() {
        let broker = InMemoryPubSub::new();
        let mut orders = broker.subscribe("orders").await.unwrap();

        broker.publish(message("payments", "ignored")).await.unwrap();
        broker.publish(message("orders", "o-1")).await.unwrap();

        let received = orders.next().await.unwrap().unwrap();
        assert_eq!(received.topic, "orders");
        assert_eq!(received.data.as_ref(), b"o-1");
    }

    #[tokio::test]
    async fn publish_without_subscribers_succeeds() {
        let broker = InMemoryPubSub::new();
        broker.publish(message("orders", "o-1")).await.unwrap();

        let mut late = broker.subscribe("orders").await.unwrap();
        broker.publish(message("orders", "o-2")).await.unwrap();
        assert_eq!(late.next().await.unwrap().unwrap().data.as_ref(), b"o-2");
    }

    #[tokio::test]
    async fn topic_is_removed_with_its_last_subscriber() {
        let broker = InMemoryPubSub::new();
        let first = broker.subscribe("orders").await.unwrap();
        let second = broker.subscribe("orders").await.unwrap();
        assert_eq!(broker.topics.len(), 1);

        drop(first);
        assert_eq!(broker.topics.len(), 1);
        drop(second);
        assert!(broker.topics.is_empty());

        broker.publish(message("orders", "o-1")).await.unwrap();
        assert!(broker.topics.is_empty());
    }

    #[tokio::test]
    async fn zero_capacity_is_rejected() {
        let mut broker = InMemoryPubSub::new();
        let err = broker
            .init(&Metadata::from([("capacity", "0")]))
            .await
            .unwrap_err();
        assert!(matches!(err, WharfError::Config { category: Category::PubSub, .. }));
    }
}
