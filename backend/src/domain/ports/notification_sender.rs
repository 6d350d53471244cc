//! Port for delivering rendered customer notifications.

use async_trait::async_trait;

use crate::domain::OrderNotification;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification delivery adapters.
    pub enum NotificationSenderError {
        /// Temporary failure; delivery may succeed on retry.
        Transient { message: String } =>
            "notification delivery failed temporarily: {message}",
        /// The provider refused the message; retrying will not help.
        Rejected { message: String } =>
            "notification was rejected: {message}",
    }
}

impl NotificationSenderError {
    /// Whether the dispatcher should retry after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver one message.
    async fn send(&self, notification: &OrderNotification) -> Result<(), NotificationSenderError>;
}
