use async_trait::async_trait;
use tracing::info;

use crate::domain::OrderNotification;
use crate::domain::ports::{NotificationSender, NotificationSenderError};

/// Sender that records each message as a structured log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotificationSender;

#[async_trait]
impl NotificationSender for LoggingNotificationSender {
    async fn send(&self, notification: &OrderNotification) -> Result<(), NotificationSenderError> {
        info!(
            to = %notification.to,
            from = %notification.from,
            subject = %notification.subject,
            template = notification.template.as_str(),
            order_number = %notification.order_number,
            "order notification (logging sender)"
        );
        Ok(())
    }
}
