//! Simulated payment gateway.
//!
//! No network call is made. After a fixed delay each charge draws a number in
//! `[0, 1)`: above 0.95 is a processing error, above 0.8 a decline, anything
//! else an approval.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::info;

use crate::domain::ports::PaymentGateway;
use crate::domain::{
    ChargeReceipt, Money, PaymentInstrument, PaymentOutcome, RetrySleeper, TokioSleeper,
};

const ERROR_THRESHOLD: f64 = 0.95;
const DECLINE_THRESHOLD: f64 = 0.8;

/// Default simulated processing delay.
pub const DEFAULT_PAYMENT_DELAY: Duration = Duration::from_millis(1500);

/// Source of the uniform draw that decides each outcome.
pub trait OutcomeDraw: Send + Sync {
    /// Return a value in `[0, 1)`.
    fn draw(&self) -> f64;
}

/// Draws from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngDraw;

impl OutcomeDraw for ThreadRngDraw {
    fn draw(&self) -> f64 {
        rand::thread_rng().r#gen::<f64>()
    }
}

/// Map a draw onto the outcome distribution.
pub fn outcome_for(draw: f64) -> PaymentOutcome {
    if draw > ERROR_THRESHOLD {
        PaymentOutcome::Error
    } else if draw > DECLINE_THRESHOLD {
        PaymentOutcome::Declined
    } else {
        PaymentOutcome::Approved
    }
}

/// Gateway that approves roughly 80% of charges.
pub struct SimulatedPaymentGateway {
    delay: Duration,
    draw: Arc<dyn OutcomeDraw>,
    sleeper: Arc<dyn RetrySleeper>,
}

impl SimulatedPaymentGateway {
    /// Gateway with the thread RNG and a Tokio sleep of `delay`.
    pub fn new(delay: Duration) -> Self {
        Self::with_runtime(delay, Arc::new(ThreadRngDraw), Arc::new(TokioSleeper))
    }

    /// Gateway with injected randomness and sleeping.
    pub fn with_runtime(
        delay: Duration,
        draw: Arc<dyn OutcomeDraw>,
        sleeper: Arc<dyn RetrySleeper>,
    ) -> Self {
        Self {
            delay,
            draw,
            sleeper,
        }
    }
}

impl Default for SimulatedPaymentGateway {
    fn default() -> Self {
        Self::new(DEFAULT_PAYMENT_DELAY)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    async fn charge(&self, amount: Money, instrument: &PaymentInstrument) -> ChargeReceipt {
        if !self.delay.is_zero() {
            self.sleeper.sleep(self.delay).await;
        }
        let outcome = outcome_for(self.draw.draw());
        info!(
            amount = %amount,
            card_last_four = %instrument.last_four(),
            %outcome,
            "simulated charge processed"
        );
        ChargeReceipt::new(outcome, amount)
    }
}
