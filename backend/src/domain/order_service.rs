//! Checkout and order lookup service.
//!
//! Placement runs as one linear sequence:
//!
//! 1. validate the submission before touching any store;
//! 2. check the catalog (existence, stock, presented price);
//! 3. reserve stock with a conditional decrement;
//! 4. charge the payment gateway;
//! 5. release the reservation unless the charge was approved;
//! 6. persist the order under a fresh order number;
//! 7. settle the reservation of an approved order;
//! 8. enqueue the customer notification.
//!
//! Inventory therefore drops by the ordered quantity iff the charge is
//! approved, and two buyers racing for the last unit cannot both reserve it.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::catalog_service::map_product_repository_error;
use crate::domain::ports::{
    NotificationQueue, OrderCommand, OrderLine, OrderQuery, OrderRepository,
    OrderRepositoryError, PaymentGateway, PlaceOrderRequest, PlaceOrderResponse,
    ProductRepository, StockReservation,
};
use crate::domain::{
    CustomerDetails, Error, Order, OrderNotification, OrderNumber, PaymentOutcome, Product,
    ProductId, ProductSnapshot, notification::DEFAULT_SENDER,
};

/// Tunables for order placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderServiceConfig {
    /// Order numbers tried before giving up with `conflict`.
    pub order_number_attempts: u32,
    /// Sender address stamped on customer notifications.
    pub notification_sender: String,
}

impl Default for OrderServiceConfig {
    fn default() -> Self {
        Self {
            order_number_attempts: 5,
            notification_sender: DEFAULT_SENDER.to_owned(),
        }
    }
}

/// Port bundle required by [`OrderService`].
#[derive(Clone)]
pub struct OrderServicePorts {
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub payments: Arc<dyn PaymentGateway>,
    pub notifications: Arc<dyn NotificationQueue>,
}

/// Order service implementing [`OrderCommand`] and [`OrderQuery`].
#[derive(Clone)]
pub struct OrderService {
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    payments: Arc<dyn PaymentGateway>,
    notifications: Arc<dyn NotificationQueue>,
    clock: Arc<dyn Clock>,
    config: OrderServiceConfig,
}

impl OrderService {
    /// Build the service from its ports.
    pub fn new(ports: OrderServicePorts, clock: Arc<dyn Clock>, config: OrderServiceConfig) -> Self {
        Self {
            products: ports.products,
            orders: ports.orders,
            payments: ports.payments,
            notifications: ports.notifications,
            clock,
            config,
        }
    }

    async fn load_available_product(&self, line: &OrderLine) -> Result<Product, Error> {
        let product = self
            .products
            .find_by_id(&line.product_id)
            .await
            .map_err(map_product_repository_error)?
            .ok_or_else(|| not_available(line.product_id, line.quantity, None))?;

        let available = product.details().inventory();
        if available < line.quantity {
            return Err(not_available(line.product_id, line.quantity, Some(available)));
        }
        if product.details().price() != line.unit_price {
            return Err(Error::invalid_request(
                "Presented price does not match the catalog price",
            )
            .with_details(json!({
                "field": "product.price",
                "code": "price_mismatch",
                "catalogPrice": product.details().price().as_major(),
            })));
        }
        validate_variant_choice(line, &product)?;
        Ok(product)
    }

    async fn reserve(&self, line: &OrderLine) -> Result<(), Error> {
        let reservation = self
            .products
            .reserve_stock(&line.product_id, line.quantity)
            .await
            .map_err(map_product_repository_error)?;
        match reservation {
            StockReservation::Reserved(_) => Ok(()),
            StockReservation::Insufficient { available } => Err(not_available(
                line.product_id,
                line.quantity,
                Some(available),
            )),
            StockReservation::Missing => Err(not_available(line.product_id, line.quantity, None)),
        }
    }

    async fn release(&self, product_id: ProductId, quantity: u32) {
        if let Err(err) = self.products.release_stock(&product_id, quantity).await {
            error!(
                error = %err,
                product_id = %product_id,
                quantity,
                "failed to release reserved stock"
            );
        }
    }

    async fn settle(&self, product_id: ProductId, quantity: u32) {
        if let Err(err) = self.products.settle_stock(&product_id, quantity).await {
            error!(
                error = %err,
                product_id = %product_id,
                quantity,
                "failed to settle reserved stock"
            );
        }
    }

    async fn persist(
        &self,
        snapshot: ProductSnapshot,
        customer: CustomerDetails,
        card_last_four: String,
        outcome: PaymentOutcome,
    ) -> Result<Order, Error> {
        let attempts = self.config.order_number_attempts.max(1);
        for attempt in 1..=attempts {
            let now = self.clock.utc();
            let order = Order::place(
                OrderNumber::generate(now, rand::random::<u16>()),
                snapshot.clone(),
                customer.clone(),
                card_last_four.clone(),
                outcome,
                now,
            )
            .map_err(|err| Error::internal(format!("order assembly failed: {err}")))?;

            match self.orders.insert(&order).await {
                Ok(()) => return Ok(order),
                Err(OrderRepositoryError::DuplicateOrderNumber { order_number }) => {
                    warn!(%order_number, attempt, "order number collision, regenerating");
                }
                Err(OrderRepositoryError::Connection { message }) => {
                    return Err(Error::service_unavailable(format!(
                        "order repository unavailable: {message}"
                    )));
                }
                Err(OrderRepositoryError::Query { message }) => {
                    return Err(Error::internal(format!("order repository error: {message}")));
                }
            }
        }
        Err(Error::conflict("Could not allocate a unique order number")
            .with_details(json!({ "attempts": attempts })))
    }

    async fn notify(&self, order: &Order) {
        let message = OrderNotification::render(order, &self.config.notification_sender);
        if let Err(err) = self.notifications.enqueue(&message).await {
            warn!(
                error = %err,
                order_number = %order.order_number(),
                "failed to enqueue order notification"
            );
        }
    }
}

fn not_available(product_id: ProductId, requested: u32, available: Option<u32>) -> Error {
    Error::not_available("Product not available in requested quantity").with_details(json!({
        "productId": product_id.to_string(),
        "requested": requested,
        "available": available,
    }))
}

fn field_error(field: &str, code: &str, message: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

fn validate_submission(line: &OrderLine, customer: &CustomerDetails) -> Result<(), Error> {
    if line.quantity == 0 {
        return Err(field_error(
            "product.quantity",
            "invalid_quantity",
            "quantity must be at least 1",
        ));
    }
    let required = [
        ("customer.fullName", customer.full_name.as_str()),
        ("customer.email", customer.email.as_str()),
        ("customer.phone", customer.phone.as_str()),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(field_error(field, "required", &format!("{field} must not be empty")));
        }
    }
    if !customer.email.contains('@') {
        return Err(field_error(
            "customer.email",
            "invalid_email",
            "customer.email must be an email address",
        ));
    }
    Ok(())
}

fn validate_variant_choice(line: &OrderLine, product: &Product) -> Result<(), Error> {
    let offered = product.details().variants();
    for (option, value) in &line.variant {
        let known = offered
            .get(option)
            .is_some_and(|values| values.iter().any(|candidate| candidate == value));
        if !known {
            return Err(Error::invalid_request(format!(
                "{option} '{value}' is not offered for this product"
            ))
            .with_details(json!({
                "field": format!("product.selectedVariant.{option}"),
                "code": "invalid_variant",
            })));
        }
    }
    Ok(())
}

#[async_trait]
impl OrderCommand for OrderService {
    async fn place_order(&self, request: PlaceOrderRequest) -> Result<PlaceOrderResponse, Error> {
        let PlaceOrderRequest {
            line,
            customer,
            payment,
        } = request;
        validate_submission(&line, &customer)?;

        let product = self.load_available_product(&line).await?;
        let amount = line
            .unit_price
            .checked_times(line.quantity)
            .ok_or_else(|| field_error("product.quantity", "total_overflow", "order total is too large"))?;

        self.reserve(&line).await?;

        let receipt = self.payments.charge(amount, &payment).await;
        let approved = receipt.outcome.is_approved();
        if !approved {
            self.release(line.product_id, line.quantity).await;
        }

        let snapshot = ProductSnapshot {
            id: line.product_id,
            name: product.details().title().to_owned(),
            variant: line.variant,
            quantity: line.quantity,
            price: line.unit_price,
        };
        let order = match self
            .persist(snapshot, customer, payment.last_four(), receipt.outcome)
            .await
        {
            Ok(order) => order,
            Err(err) => {
                if approved {
                    self.release(line.product_id, line.quantity).await;
                }
                return Err(err);
            }
        };

        if approved {
            self.settle(line.product_id, line.quantity).await;
        }
        info!(
            order_number = %order.order_number(),
            product_id = %line.product_id,
            quantity = line.quantity,
            outcome = %receipt.outcome,
            "order placed"
        );
        self.notify(&order).await;

        Ok(PlaceOrderResponse {
            order_number: order.order_number().clone(),
            status: receipt.outcome,
            message: receipt.message,
        })
    }
}

#[async_trait]
impl OrderQuery for OrderService {
    async fn get_order(&self, order_number: OrderNumber) -> Result<Order, Error> {
        let found = self
            .orders
            .find_by_number(&order_number)
            .await
            .map_err(|err| match err {
                OrderRepositoryError::Connection { message } => Error::service_unavailable(
                    format!("order repository unavailable: {message}"),
                ),
                other => Error::internal(format!("order repository error: {other}")),
            })?;
        found.ok_or_else(|| {
            Error::not_found("Order not found")
                .with_details(json!({ "orderNumber": order_number.as_str() }))
        })
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;
