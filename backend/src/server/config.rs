//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use storefront::domain::DeliveryPolicy;
use storefront::domain::notification::DEFAULT_SENDER;
use storefront::outbound::payment::DEFAULT_PAYMENT_DELAY;
use storefront::outbound::persistence::DbPool;
use storefront::outbound::queue::DEFAULT_QUEUE_CAPACITY;
use url::Url;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Where customer notifications are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailTransport {
    /// Log notifications instead of sending them.
    Logging,
    /// POST notifications to an HTTP mail relay.
    Relay { endpoint: Url, timeout: Duration },
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) payment_delay: Duration,
    pub(crate) mail: MailTransport,
    pub(crate) notification_sender: String,
    pub(crate) delivery_policy: DeliveryPolicy,
    pub(crate) queue_capacity: usize,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a configuration with in-memory stores and logged mail.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            payment_delay: DEFAULT_PAYMENT_DELAY,
            mail: MailTransport::Logging,
            notification_sender: DEFAULT_SENDER.to_owned(),
            delivery_policy: DeliveryPolicy::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, products and orders are stored in PostgreSQL instead of
    /// process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the simulated payment processing delay.
    #[must_use]
    pub fn with_payment_delay(mut self, delay: Duration) -> Self {
        self.payment_delay = delay;
        self
    }

    /// Choose how notifications leave the process.
    #[must_use]
    pub fn with_mail_transport(mut self, mail: MailTransport) -> Self {
        self.mail = mail;
        self
    }

    #[must_use]
    pub fn with_notification_sender(mut self, sender: impl Into<String>) -> Self {
        self.notification_sender = sender.into();
        self
    }

    #[must_use]
    pub fn with_delivery_policy(mut self, policy: DeliveryPolicy) -> Self {
        self.delivery_policy = policy;
        self
    }

    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
