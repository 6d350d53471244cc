//! Driving port for checkout.
//!
//! Inbound adapters translate a checkout submission into a
//! [`PlaceOrderRequest`] and call [`OrderCommand::place_order`].

use async_trait::async_trait;

use crate::domain::{
    CustomerDetails, Error, Money, OrderNumber, PaymentInstrument, PaymentOutcome, ProductId,
    VariantSelection,
};

/// Product selection as presented to the buyer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price shown to the buyer; must match the catalog price.
    pub unit_price: Money,
    pub variant: VariantSelection,
}

/// Checkout submission.
#[derive(Debug, Clone)]
pub struct PlaceOrderRequest {
    pub line: OrderLine,
    pub customer: CustomerDetails,
    pub payment: PaymentInstrument,
}

/// Result returned to the buyer once the order is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrderResponse {
    pub order_number: OrderNumber,
    /// Raw payment outcome.
    pub status: PaymentOutcome,
    pub message: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderCommand: Send + Sync {
    /// Validate, reserve stock, charge, and record an order.
    ///
    /// # Errors
    ///
    /// - `invalid_request` when input fails validation or the presented price
    ///   differs from the catalog.
    /// - `not_available` when the product is missing or short of stock.
    /// - `conflict` when no unique order number could be allocated.
    /// - `service_unavailable` when a store cannot be reached.
    async fn place_order(&self, request: PlaceOrderRequest) -> Result<PlaceOrderResponse, Error>;
}
