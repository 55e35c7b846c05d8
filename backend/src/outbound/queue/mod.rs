//! In-process card status channel.
//!
//! [`ChannelNotificationSink`] implements the `NotificationSink` port over a
//! bounded tokio channel. Publishing never waits: a full channel rejects the
//! message and a dropped consumer makes the sink unavailable. The
//! [`CardStatusConsumer`] drains the channel on a spawned task and logs each
//! update, standing in for a broker subscriber on the same topic.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::info;

use crate::domain::ports::{NotificationError, NotificationSink};

/// One message carried on the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardStatusMessage {
    pub topic: Arc<str>,
    pub payload: String,
}

/// Build a connected sink and consumer pair.
///
/// `capacity` is clamped to at least one slot.
///
/// ```
/// use client_card::outbound::queue::card_status_channel;
///
/// let (sink, consumer) = card_status_channel("card-status-topic", 16);
/// assert_eq!(sink.topic(), "card-status-topic");
/// drop(consumer);
/// ```
pub fn card_status_channel(
    topic: impl Into<Arc<str>>,
    capacity: usize,
) -> (ChannelNotificationSink, CardStatusConsumer) {
    let topic = topic.into();
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (
        ChannelNotificationSink {
            topic: Arc::clone(&topic),
            sender,
        },
        CardStatusConsumer { topic, receiver },
    )
}

/// Publishing half of the card status channel.
#[derive(Debug, Clone)]
pub struct ChannelNotificationSink {
    topic: Arc<str>,
    sender: mpsc::Sender<CardStatusMessage>,
}

impl ChannelNotificationSink {
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl NotificationSink for ChannelNotificationSink {
    async fn publish(&self, message: &str) -> Result<(), NotificationError> {
        let envelope = CardStatusMessage {
            topic: Arc::clone(&self.topic),
            payload: message.to_owned(),
        };
        self.sender.try_send(envelope).map_err(|err| match err {
            TrySendError::Full(_) => {
                NotificationError::rejected(format!("topic {} is full", self.topic))
            }
            TrySendError::Closed(_) => {
                NotificationError::unavailable(format!("topic {} has no consumer", self.topic))
            }
        })
    }
}

/// Receiving half of the card status channel.
#[derive(Debug)]
pub struct CardStatusConsumer {
    topic: Arc<str>,
    receiver: mpsc::Receiver<CardStatusMessage>,
}

impl CardStatusConsumer {
    /// Wait for the next message; `None` once every sink is dropped.
    pub async fn recv(&mut self) -> Option<CardStatusMessage> {
        self.receiver.recv().await
    }

    /// Log every message until the channel closes, returning how many were
    /// consumed.
    pub async fn run(mut self) -> usize {
        let mut consumed = 0_usize;
        while let Some(message) = self.recv().await {
            consumed += 1;
            info!(
                topic = %message.topic,
                message = %message.payload,
                "Received card status update"
            );
        }
        info!(topic = %self.topic, consumed, "card status consumer stopped");
        consumed
    }

    /// Run the consumer on a background task.
    pub fn spawn(self) -> JoinHandle<usize> {
        tokio::spawn(self.run())
    }
}
