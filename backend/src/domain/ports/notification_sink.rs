//! Port for the fire-and-forget outcome notification channel.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by notification adapters.
    pub enum NotificationError {
        /// The channel is closed or its consumer has gone away.
        Unavailable { message: String } => "notification channel is unavailable: {message}",
        /// The channel refused the message, for example because it is full.
        Rejected { message: String } => "notification was rejected: {message}",
    }
}

/// Publishes outcome notifications at most once.
///
/// Implementations must not block on slow consumers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Publish one message.
    async fn publish(&self, message: &str) -> Result<(), NotificationError>;
}

/// Sink that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotificationSink;

#[async_trait]
impl NotificationSink for NullNotificationSink {
    async fn publish(&self, _message: &str) -> Result<(), NotificationError> {
        Ok(())
    }
}
