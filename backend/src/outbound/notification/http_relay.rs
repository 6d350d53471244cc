//! JSON mail-relay adapter for the [`NotificationSender`] port.
//!
//! This adapter owns transport details only: payload shape, timeout, and the
//! mapping of HTTP statuses onto retryable and permanent failures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::OrderNotification;
use crate::domain::ports::{NotificationSender, NotificationSenderError};

/// Body posted to the relay.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MailRelayPayload<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub subject: &'a str,
    pub text: &'a str,
    pub html: &'a str,
    pub template: &'static str,
    pub order_number: &'a str,
}

impl<'a> From<&'a OrderNotification> for MailRelayPayload<'a> {
    fn from(notification: &'a OrderNotification) -> Self {
        Self {
            from: notification.from.as_str(),
            to: notification.to.as_str(),
            subject: notification.subject.as_str(),
            text: notification.text.as_str(),
            html: notification.html.as_str(),
            template: notification.template.as_str(),
            order_number: notification.order_number.as_str(),
        }
    }
}

/// Posts notifications to an HTTP mail relay.
#[derive(Debug, Clone)]
pub struct HttpMailRelay {
    client: Client,
    endpoint: Url,
}

impl HttpMailRelay {
    /// Build a relay client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl NotificationSender for HttpMailRelay {
    async fn send(&self, notification: &OrderNotification) -> Result<(), NotificationSenderError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&MailRelayPayload::from(notification))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, &body))
    }
}

fn map_transport_error(error: reqwest::Error) -> NotificationSenderError {
    if error.is_builder() {
        NotificationSenderError::rejected(error.to_string())
    } else {
        NotificationSenderError::transient(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &str) -> NotificationSenderError {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let preview: String = body
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PREVIEW_CHAR_LIMIT)
        .collect();
    let message = if preview.is_empty() {
        format!("relay returned status {}", status.as_u16())
    } else {
        format!("relay returned status {}: {preview}", status.as_u16())
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::REQUEST_TIMEOUT => {
            NotificationSenderError::transient(message)
        }
        _ if status.is_client_error() => NotificationSenderError::rejected(message),
        _ => NotificationSenderError::transient(message),
    }
}
