//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the storefront's strongly typed entities (products, orders,
//! payments, notifications) and the services that implement the driving
//! ports. Nothing here knows about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Product, ProductDetails, ProductDraft, ProductFilter: catalog entities.
//! - Order, OrderNumber, ProductSnapshot, CustomerDetails: placed orders.
//! - PaymentInstrument, PaymentOutcome, ChargeReceipt: payment primitives.
//! - StockLevels: available and held units behind checkout reservations.
//! - CatalogService, OrderService, NotificationDispatcher: domain services.

pub mod catalog_service;
pub mod error;
pub mod money;
pub mod notification;
pub mod notification_dispatcher;
pub mod order;
pub mod order_service;
pub mod payment;
pub mod ports;
pub mod product;
pub mod stock;
pub mod trace_id;

pub use self::catalog_service::CatalogService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::money::{Money, MoneyError};
pub use self::notification::{NotificationTemplate, OrderNotification, escape_html};
pub use self::notification_dispatcher::{
    BackoffJitter, DeliveryError, DeliveryPolicy, DispatcherRuntime, NotificationDispatcher,
    RandomJitter, RetrySleeper, TokioSleeper,
};
pub use self::order::{
    CustomerDetails, Order, OrderInvariantError, OrderNumber, OrderNumberParseError, OrderStatus,
    PaymentStatus, PaymentSummary, PostalAddress, ProductSnapshot, UnknownStatusError,
    VariantSelection,
};
pub use self::order_service::{OrderService, OrderServiceConfig, OrderServicePorts};
pub use self::payment::{
    ChargeReceipt, PaymentInstrument, PaymentInstrumentValidationError, PaymentOutcome,
};
pub use self::product::{
    Product, ProductDetails, ProductDraft, ProductFilter, ProductId, ProductIdParseError,
    ProductValidationError, Variants, default_variants,
};
pub use self::stock::StockLevels;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
