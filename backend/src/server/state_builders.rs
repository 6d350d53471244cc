//! Builders wiring repositories, adapters, and domain services into
//! [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tokio::task::JoinHandle;
use tracing::info;

use storefront::domain::ports::{NotificationSender, OrderRepository, ProductRepository};
use storefront::domain::{
    CatalogService, NotificationDispatcher, OrderService, OrderServiceConfig, OrderServicePorts,
};
use storefront::inbound::http::state::{HttpState, HttpStatePorts};
use storefront::outbound::memory::{InMemoryOrderRepository, InMemoryProductRepository};
use storefront::outbound::notification::{HttpMailRelay, LoggingNotificationSender};
use storefront::outbound::payment::SimulatedPaymentGateway;
use storefront::outbound::persistence::{DieselOrderRepository, DieselProductRepository};
use storefront::outbound::queue::{notification_channel, spawn_notification_worker};

use super::ServerConfig;
use super::config::MailTransport;

/// HTTP state plus the background notification worker it feeds.
pub(crate) struct StorefrontRuntime {
    pub(crate) http_state: web::Data<HttpState>,
    pub(crate) notification_worker: JoinHandle<usize>,
}

fn build_sender(mail: &MailTransport) -> std::io::Result<Arc<dyn NotificationSender>> {
    match mail {
        MailTransport::Logging => Ok(Arc::new(LoggingNotificationSender)),
        MailTransport::Relay { endpoint, timeout } => {
            let relay = HttpMailRelay::new(endpoint.clone(), *timeout)
                .map_err(|err| std::io::Error::other(format!("mail relay client: {err}")))?;
            Ok(Arc::new(relay))
        }
    }
}

fn wire_services<P>(
    config: &ServerConfig,
    products: Arc<P>,
    orders: Arc<dyn OrderRepository>,
) -> std::io::Result<StorefrontRuntime>
where
    P: ProductRepository + 'static,
{
    let clock = Arc::new(DefaultClock);
    let (queue, jobs) = notification_channel(config.queue_capacity);
    let dispatcher = Arc::new(NotificationDispatcher::new(
        build_sender(&config.mail)?,
        clock.clone(),
        config.delivery_policy.clone(),
    ));
    let notification_worker = spawn_notification_worker(jobs, dispatcher);

    let catalog = Arc::new(CatalogService::new(products.clone(), clock.clone()));
    let order_service = Arc::new(OrderService::new(
        OrderServicePorts {
            products,
            orders,
            payments: Arc::new(SimulatedPaymentGateway::new(config.payment_delay)),
            notifications: Arc::new(queue),
        },
        clock,
        OrderServiceConfig {
            notification_sender: config.notification_sender.clone(),
            ..OrderServiceConfig::default()
        },
    ));

    let http_state = web::Data::new(HttpState::new(HttpStatePorts {
        catalog: catalog.clone(),
        catalog_query: catalog,
        orders: order_service.clone(),
        orders_query: order_service,
    }));
    Ok(StorefrontRuntime {
        http_state,
        notification_worker,
    })
}

/// Build handler state, choosing PostgreSQL or in-memory stores.
///
/// Must run inside a Tokio runtime: the notification worker is spawned here.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the mail relay client cannot be built.
pub(crate) fn build_runtime(config: &ServerConfig) -> std::io::Result<StorefrontRuntime> {
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL storage");
            wire_services(
                config,
                Arc::new(DieselProductRepository::new(pool.clone())),
                Arc::new(DieselOrderRepository::new(pool.clone())),
            )
        }
        None => {
            info!("no database configured, using in-memory storage");
            wire_services(
                config,
                Arc::new(InMemoryProductRepository::new()),
                Arc::new(InMemoryOrderRepository::new()),
            )
        }
    }
}
