//! Port for charging a payment instrument.
//!
//! A gateway never fails at the transport level from the workflow's point of
//! view: provider faults are reported as [`PaymentOutcome::Error`] inside the
//! receipt.
//!
//! [`PaymentOutcome::Error`]: crate::domain::PaymentOutcome::Error

use async_trait::async_trait;

use crate::domain::{ChargeReceipt, Money, PaymentInstrument};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge `amount` against `instrument`.
    async fn charge(&self, amount: Money, instrument: &PaymentInstrument) -> ChargeReceipt;
}
