//! Domain port describing queue dispatch semantics for notification jobs.
use async_trait::async_trait;

use crate::domain::OrderNotification;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the queue/dispatcher adapter.
    pub enum JobDispatchError {
        /// Queue infrastructure is unavailable.
        Unavailable { message: String } => "notification queue is unavailable: {message}",
        /// The job could not be accepted.
        Rejected { message: String } => "notification job was rejected: {message}",
    }
}

/// Hands notifications to background delivery without waiting for them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    /// Enqueue a rendered notification for delivery.
    async fn enqueue(&self, notification: &OrderNotification) -> Result<(), JobDispatchError>;
}
