//! Shared wiring for the HTTP integration suites.
//!
//! Everything runs against the in-memory stores with a zero-delay payment
//! gateway whose outcome draw is fixed per test.

#![allow(dead_code, reason = "each suite uses a different subset of helpers")]

use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::DefaultClock;
use serde_json::{Value, json};
use storefront::Trace;
use storefront::domain::{CatalogService, OrderService, OrderServiceConfig, OrderServicePorts, TokioSleeper};
use storefront::inbound::http::orders::{get_order, place_order};
use storefront::inbound::http::products::{
    create_product, delete_product, get_product, list_products, replace_product,
};
use storefront::inbound::http::state::{HttpState, HttpStatePorts};
use storefront::inbound::http::validation::{json_config, query_config};
use storefront::outbound::memory::{InMemoryOrderRepository, InMemoryProductRepository};
use storefront::outbound::payment::{OutcomeDraw, SimulatedPaymentGateway};
use storefront::outbound::queue::{NotificationJobReceiver, notification_channel};

/// Draw below the decline threshold.
pub const APPROVE: f64 = 0.10;
/// Draw between the decline and error thresholds.
pub const DECLINE: f64 = 0.90;
/// Draw above the error threshold.
pub const FAIL: f64 = 0.99;

/// Payment draw that always returns the same value.
pub struct FixedDraw(pub f64);

impl OutcomeDraw for FixedDraw {
    fn draw(&self) -> f64 {
        self.0
    }
}

/// Services and stores behind one test app.
pub struct Storefront {
    pub products: Arc<InMemoryProductRepository>,
    pub orders: Arc<InMemoryOrderRepository>,
    pub catalog: Arc<CatalogService<InMemoryProductRepository>>,
    pub order_service: Arc<OrderService>,
    pub jobs: NotificationJobReceiver,
}

impl Storefront {
    /// Wire a storefront whose payments resolve from `draw` immediately.
    pub fn with_draw(draw: f64) -> Self {
        Self::with_payment(draw, Duration::ZERO)
    }

    /// Wire a storefront whose payments resolve from `draw` after `delay`.
    pub fn with_payment(draw: f64, delay: Duration) -> Self {
        let products = Arc::new(InMemoryProductRepository::new());
        let orders = Arc::new(InMemoryOrderRepository::new());
        let (queue, jobs) = notification_channel(16);
        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&products),
            Arc::new(DefaultClock),
        ));
        let order_service = Arc::new(OrderService::new(
            OrderServicePorts {
                products: products.clone(),
                orders: orders.clone(),
                payments: Arc::new(SimulatedPaymentGateway::with_runtime(
                    delay,
                    Arc::new(FixedDraw(draw)),
                    Arc::new(TokioSleeper),
                )),
                notifications: Arc::new(queue),
            },
            Arc::new(DefaultClock),
            OrderServiceConfig::default(),
        ));
        Self {
            products,
            orders,
            catalog,
            order_service,
            jobs,
        }
    }

    pub fn http_state(&self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            catalog: self.catalog.clone(),
            catalog_query: self.catalog.clone(),
            orders: self.order_service.clone(),
            orders_query: self.order_service.clone(),
        }))
    }
}

/// Build the `/api/v1` app around `state`.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(json_config())
        .app_data(query_config())
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .service(place_order)
                .service(get_order)
                .service(create_product)
                .service(list_products)
                .service(get_product)
                .service(replace_product)
                .service(delete_product),
        )
}

/// Admin payload for the mouse used across suites.
pub fn mouse_payload() -> Value {
    json!({
        "title": "Mouse",
        "description": "Wireless optical mouse",
        "price": 20.0,
        "inventory": 2,
        "image": "/images/mouse.png",
        "variants": { "color": ["Black", "White"], "size": ["S", "M", "L"] }
    })
}

/// Checkout payload for `quantity` units of `product_id` at `price`.
pub fn checkout_payload(product_id: &str, quantity: u32, price: f64) -> Value {
    json!({
        "product": {
            "id": product_id,
            "title": "Mouse",
            "quantity": quantity,
            "price": price,
            "selectedVariant": { "color": "Black", "size": "M" }
        },
        "customer": {
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "555-0100",
            "address": {
                "street": "1 Analytical Way",
                "city": "London",
                "state": "LDN",
                "zipCode": "N1 9GU"
            }
        },
        "payment": {
            "cardNumber": "4242 4242 4242 4242",
            "expiryDate": "12/30",
            "cvv": "123"
        }
    })
}
