//! Background delivery of customer notifications.
//!
//! The dispatcher owns the retry policy (jittered exponential backoff) and
//! stops early when the sender reports a permanent rejection. It runs off the
//! request path; callers only learn about failures through logs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use rand::Rng;
use tracing::{info, warn};

use crate::domain::OrderNotification;
use crate::domain::ports::{NotificationSender, NotificationSenderError};

/// Retry policy for notification delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// Maximum send attempts per notification (including the first).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound on the un-jittered delay.
    pub max_backoff: Duration,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// Async sleeping abstraction for retries.
#[async_trait]
pub trait RetrySleeper: Send + Sync {
    /// Suspend execution for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Retry backoff jitter abstraction.
pub trait BackoffJitter: Send + Sync {
    /// Return a jittered delay from the exponential base delay.
    fn jittered_delay(&self, base: Duration, attempt: u32, now: DateTime<Utc>) -> Duration;
}

/// Tokio-based sleeper implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl RetrySleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Adds up to a quarter of the base delay, drawn from the thread RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl BackoffJitter for RandomJitter {
    fn jittered_delay(&self, base: Duration, _attempt: u32, _now: DateTime<Utc>) -> Duration {
        let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
        let max_extra = (base_ms / 4).max(1);
        let extra = rand::thread_rng().gen_range(0..=max_extra);
        Duration::from_millis(base_ms.saturating_add(extra))
    }
}

/// Runtime helpers used by the retry policy.
pub struct DispatcherRuntime {
    pub sleeper: Arc<dyn RetrySleeper>,
    pub jitter: Arc<dyn BackoffJitter>,
}

impl Default for DispatcherRuntime {
    fn default() -> Self {
        Self {
            sleeper: Arc::new(TokioSleeper),
            jitter: Arc::new(RandomJitter),
        }
    }
}

/// Why delivery gave up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("notification rejected after {attempts} attempt(s): {source}")]
    Rejected {
        attempts: u32,
        source: NotificationSenderError,
    },
    #[error("notification delivery exhausted {attempts} attempt(s): {source}")]
    Exhausted {
        attempts: u32,
        source: NotificationSenderError,
    },
}

/// Delivers notifications through a [`NotificationSender`] with retries.
pub struct NotificationDispatcher {
    sender: Arc<dyn NotificationSender>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn RetrySleeper>,
    jitter: Arc<dyn BackoffJitter>,
    policy: DeliveryPolicy,
}

impl NotificationDispatcher {
    /// Build a dispatcher with default runtime dependencies.
    pub fn new(
        sender: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
        policy: DeliveryPolicy,
    ) -> Self {
        Self::with_runtime(sender, clock, DispatcherRuntime::default(), policy)
    }

    /// Build a dispatcher with injected runtime abstractions.
    pub fn with_runtime(
        sender: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
        runtime: DispatcherRuntime,
        policy: DeliveryPolicy,
    ) -> Self {
        Self {
            sender,
            clock,
            sleeper: runtime.sleeper,
            jitter: runtime.jitter,
            policy,
        }
    }

    /// Deliver one notification, returning the number of attempts used.
    pub async fn deliver(&self, notification: &OrderNotification) -> Result<u32, DeliveryError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.sender.send(notification).await {
                Ok(()) => {
                    info!(
                        order_number = %notification.order_number,
                        template = notification.template.as_str(),
                        attempts = attempt,
                        "order notification delivered"
                    );
                    return Ok(attempt);
                }
                Err(source) if !source.is_retryable() => {
                    return Err(DeliveryError::Rejected {
                        attempts: attempt,
                        source,
                    });
                }
                Err(source) if attempt >= max_attempts => {
                    return Err(DeliveryError::Exhausted {
                        attempts: attempt,
                        source,
                    });
                }
                Err(source) => {
                    let delay = self.jitter.jittered_delay(
                        self.retry_base_delay(attempt),
                        attempt,
                        self.clock.utc(),
                    );
                    warn!(
                        error = %source,
                        order_number = %notification.order_number,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "notification delivery failed, retrying"
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn retry_base_delay(&self, attempt: u32) -> Duration {
        let exponent = 2_u32.saturating_pow(attempt.saturating_sub(1));
        let base_ms = u64::try_from(self.policy.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.policy.max_backoff.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(base_ms.saturating_mul(u64::from(exponent)).min(max_ms))
    }
}
