//! Runtime settings loaded via OrthoConfig.
//!
//! Every value can come from the command line (`--database-url`), the
//! environment (`STOREFRONT_DATABASE_URL`), or a configuration file. Unset
//! values fall back to the defaults below.

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DeliveryPolicy;
use crate::domain::notification::DEFAULT_SENDER;
use crate::outbound::payment::DEFAULT_PAYMENT_DELAY;
use crate::outbound::queue::DEFAULT_QUEUE_CAPACITY;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Storefront server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STOREFRONT")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// PostgreSQL URL. Without one the server keeps everything in memory.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub database_pool_size: Option<u32>,
    /// Simulated payment processing delay in milliseconds.
    pub payment_delay_ms: Option<u64>,
    /// Mail relay endpoint. Without one notifications are only logged.
    pub mail_relay_url: Option<String>,
    /// Mail relay request timeout in milliseconds.
    pub mail_relay_timeout_ms: Option<u64>,
    /// `From` address on customer notifications.
    pub notification_sender: Option<String>,
    /// Delivery attempts per notification, including the first.
    pub notification_attempts: Option<u32>,
    /// Capacity of the in-process notification queue.
    pub queue_capacity: Option<usize>,
}

impl AppSettings {
    /// Socket address assembled from `host` and `port`.
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when the host is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let port = self.port.unwrap_or(DEFAULT_PORT);
        format!("{host}:{port}")
            .parse()
            .or_else(|_| format!("[{host}]:{port}").parse())
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn payment_delay(&self) -> Duration {
        self.payment_delay_ms
            .map_or(DEFAULT_PAYMENT_DELAY, Duration::from_millis)
    }

    /// Mail relay URL, ignoring blank values.
    pub fn mail_relay_url(&self) -> Option<&str> {
        self.mail_relay_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn mail_relay_timeout(&self) -> Duration {
        self.mail_relay_timeout_ms
            .map_or(DEFAULT_RELAY_TIMEOUT, Duration::from_millis)
    }

    pub fn notification_sender(&self) -> &str {
        self.notification_sender
            .as_deref()
            .unwrap_or(DEFAULT_SENDER)
    }

    /// Retry policy with the configured attempt budget.
    pub fn delivery_policy(&self) -> DeliveryPolicy {
        let defaults = DeliveryPolicy::default();
        DeliveryPolicy {
            max_attempts: self
                .notification_attempts
                .unwrap_or(defaults.max_attempts)
                .max(1),
            ..defaults
        }
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY)
    }
}
