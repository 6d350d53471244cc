//! Driving port for order lookup.

use async_trait::async_trait;

use crate::domain::{Error, Order, OrderNumber};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// Fetch a persisted order or fail with `not_found`.
    async fn get_order(&self, order_number: OrderNumber) -> Result<Order, Error>;
}
