//! Port for order persistence.
//!
//! Orders are append-only. Adapters enforce order-number uniqueness and report
//! collisions as [`OrderRepositoryError::DuplicateOrderNumber`] so the workflow
//! can regenerate.

use async_trait::async_trait;

use crate::domain::{Order, OrderNumber};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "order repository query failed: {message}",
        /// Another order already uses this number.
        DuplicateOrderNumber { order_number: String } =>
            "order number already exists: {order_number}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a newly placed order.
    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError>;

    /// Look up an order by its number.
    async fn find_by_number(
        &self,
        order_number: &OrderNumber,
    ) -> Result<Option<Order>, OrderRepositoryError>;
}
