//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are called by inbound adapters.
//! Driven ports (repositories, gateway, sender, queue) are implemented by
//! outbound adapters and return per-port error enums.

mod macros;
pub(crate) use macros::define_port_error;

mod catalog_command;
mod catalog_query;
mod notification_queue;
mod notification_sender;
mod order_command;
mod order_query;
mod order_repository;
mod payment_gateway;
mod product_repository;

pub use catalog_command::CatalogCommand;
#[cfg(test)]
pub use catalog_command::MockCatalogCommand;
pub use catalog_query::CatalogQuery;
#[cfg(test)]
pub use catalog_query::MockCatalogQuery;
#[cfg(test)]
pub use notification_queue::MockNotificationQueue;
pub use notification_queue::{JobDispatchError, NotificationQueue};
#[cfg(test)]
pub use notification_sender::MockNotificationSender;
pub use notification_sender::{NotificationSender, NotificationSenderError};
#[cfg(test)]
pub use order_command::MockOrderCommand;
pub use order_command::{OrderCommand, OrderLine, PlaceOrderRequest, PlaceOrderResponse};
#[cfg(test)]
pub use order_query::MockOrderQuery;
pub use order_query::OrderQuery;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::PaymentGateway;
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{ProductRepository, ProductRepositoryError, StockReservation};
