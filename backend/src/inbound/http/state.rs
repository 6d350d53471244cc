//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CatalogCommand, CatalogQuery, OrderCommand, OrderQuery};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub catalog: Arc<dyn CatalogCommand>,
    pub catalog_query: Arc<dyn CatalogQuery>,
    pub orders: Arc<dyn OrderCommand>,
    pub orders_query: Arc<dyn OrderQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalog: Arc<dyn CatalogCommand>,
    pub catalog_query: Arc<dyn CatalogQuery>,
    pub orders: Arc<dyn OrderCommand>,
    pub orders_query: Arc<dyn OrderQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use storefront::domain::{
    ///     CatalogService, DeliveryPolicy, NotificationDispatcher, OrderService,
    ///     OrderServiceConfig, OrderServicePorts,
    /// };
    /// use storefront::inbound::http::state::{HttpState, HttpStatePorts};
    /// use storefront::outbound::memory::{InMemoryOrderRepository, InMemoryProductRepository};
    /// use storefront::outbound::notification::LoggingNotificationSender;
    /// use storefront::outbound::payment::SimulatedPaymentGateway;
    /// use storefront::outbound::queue::notification_channel;
    ///
    /// let products = Arc::new(InMemoryProductRepository::new());
    /// let catalog = Arc::new(CatalogService::new(products.clone(), Arc::new(DefaultClock)));
    /// let (queue, _jobs) = notification_channel(16);
    /// let orders = Arc::new(OrderService::new(
    ///     OrderServicePorts {
    ///         products,
    ///         orders: Arc::new(InMemoryOrderRepository::new()),
    ///         payments: Arc::new(SimulatedPaymentGateway::default()),
    ///         notifications: Arc::new(queue),
    ///     },
    ///     Arc::new(DefaultClock),
    ///     OrderServiceConfig::default(),
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     catalog: catalog.clone(),
    ///     catalog_query: catalog,
    ///     orders: orders.clone(),
    ///     orders_query: orders,
    /// });
    /// let _catalog = state.catalog.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            catalog,
            catalog_query,
            orders,
            orders_query,
        } = ports;
        Self {
            catalog,
            catalog_query,
            orders,
            orders_query,
        }
    }
}
