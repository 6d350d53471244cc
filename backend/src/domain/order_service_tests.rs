//! Tests for checkout and order lookup.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    JobDispatchError, MockNotificationQueue, MockOrderRepository, MockPaymentGateway,
    MockProductRepository, ProductRepositoryError,
};
use crate::domain::{
    ChargeReceipt, ErrorCode, Money, NotificationTemplate, OrderStatus, PaymentInstrument,
    PaymentStatus, PostalAddress, ProductDetails, ProductDraft,
};

struct FixtureClock(DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn price() -> Money {
    Money::from_major(20.0).expect("valid price")
}

#[fixture]
fn product() -> Product {
    let details = ProductDetails::new(ProductDraft {
        title: "Mouse".into(),
        description: "Wireless mouse".into(),
        price: price(),
        inventory: 2,
        image: "mouse.png".into(),
        variants: None,
    })
    .expect("valid draft");
    Product::new(
        ProductId::random(),
        details,
        fixture_timestamp(),
        fixture_timestamp(),
    )
}

fn request_for(product: &Product, quantity: u32) -> PlaceOrderRequest {
    PlaceOrderRequest {
        line: OrderLine {
            product_id: product.id(),
            quantity,
            unit_price: price(),
            variant: BTreeMap::from([
                ("color".to_owned(), "Black".to_owned()),
                ("size".to_owned(), "M".to_owned()),
            ]),
        },
        customer: CustomerDetails {
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "555-0100".into(),
            address: PostalAddress {
                street: "1 Analytical Way".into(),
                city: "London".into(),
                state: "LDN".into(),
                zip_code: "N1".into(),
            },
        },
        payment: PaymentInstrument::try_from_parts("4242424242424242", "12/30", "123")
            .expect("valid card"),
    }
}

/// Mocks wired for the happy path; tests override expectations as needed.
struct Harness {
    products: MockProductRepository,
    orders: MockOrderRepository,
    payments: MockPaymentGateway,
    notifications: MockNotificationQueue,
    inserted: Arc<Mutex<Vec<Order>>>,
    enqueued: Arc<Mutex<Vec<OrderNotification>>>,
    settled: Arc<Mutex<Vec<(ProductId, u32)>>>,
}

impl Harness {
    fn new() -> Self {
        Self {
            products: MockProductRepository::new(),
            orders: MockOrderRepository::new(),
            payments: MockPaymentGateway::new(),
            notifications: MockNotificationQueue::new(),
            inserted: Arc::new(Mutex::new(Vec::new())),
            enqueued: Arc::new(Mutex::new(Vec::new())),
            settled: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn with_catalog(mut self, product: &Product) -> Self {
        let stored = product.clone();
        self.products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        let reserved = product.clone();
        self.products
            .expect_reserve_stock()
            .returning(move |_, _| Ok(StockReservation::Reserved(reserved.clone())));
        let settled = Arc::clone(&self.settled);
        self.products
            .expect_settle_stock()
            .returning(move |id, quantity| {
                settled.lock().expect("settled mutex").push((*id, quantity));
                Ok(())
            });
        self
    }

    fn with_outcome(mut self, outcome: PaymentOutcome) -> Self {
        self.payments
            .expect_charge()
            .times(1)
            .returning(move |amount, _| ChargeReceipt::new(outcome, amount));
        self
    }

    fn recording_orders(mut self) -> Self {
        let inserted = Arc::clone(&self.inserted);
        self.orders.expect_insert().returning(move |order| {
            inserted.lock().expect("orders mutex").push(order.clone());
            Ok(())
        });
        self
    }

    fn recording_notifications(mut self) -> Self {
        let enqueued = Arc::clone(&self.enqueued);
        self.notifications.expect_enqueue().returning(move |message| {
            enqueued.lock().expect("queue mutex").push(message.clone());
            Ok(())
        });
        self
    }

    fn build(self) -> (OrderService, Arc<Mutex<Vec<Order>>>, Arc<Mutex<Vec<OrderNotification>>>) {
        let service = OrderService::new(
            OrderServicePorts {
                products: Arc::new(self.products),
                orders: Arc::new(self.orders),
                payments: Arc::new(self.payments),
                notifications: Arc::new(self.notifications),
            },
            Arc::new(FixtureClock(fixture_timestamp())),
            OrderServiceConfig::default(),
        );
        (service, self.inserted, self.enqueued)
    }
}

#[rstest]
#[tokio::test]
async fn approved_order_keeps_reservation_and_is_processing(product: Product) {
    let mut harness = Harness::new()
        .with_catalog(&product)
        .with_outcome(PaymentOutcome::Approved)
        .recording_orders()
        .recording_notifications();
    harness.products.expect_release_stock().times(0);
    let settled = Arc::clone(&harness.settled);
    let (service, inserted, enqueued) = harness.build();

    let response = service
        .place_order(request_for(&product, 2))
        .await
        .expect("order placed");

    assert_eq!(
        *settled.lock().expect("settled mutex"),
        vec![(product.id(), 2)]
    );

    assert_eq!(response.status, PaymentOutcome::Approved);
    assert_eq!(response.message, "Payment approved");
    let orders = inserted.lock().expect("orders mutex");
    let order = orders.first().expect("order inserted");
    assert_eq!(order.order_number(), &response.order_number);
    assert_eq!(order.status(), OrderStatus::Processing);
    assert_eq!(order.payment().status, PaymentStatus::Approved);
    assert_eq!(order.payment().card_last_four, "4242");
    assert_eq!(order.total().minor_units(), 4000);
    assert_eq!(order.created_at(), fixture_timestamp());
    let messages = enqueued.lock().expect("queue mutex");
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages.first().map(|m| m.template),
        Some(NotificationTemplate::OrderConfirmation)
    );
}

#[rstest]
#[case(PaymentOutcome::Declined, PaymentStatus::Declined, "Payment declined")]
#[case(PaymentOutcome::Error, PaymentStatus::Error, "Payment processing error")]
#[tokio::test]
async fn unapproved_order_releases_stock_and_is_cancelled(
    product: Product,
    #[case] outcome: PaymentOutcome,
    #[case] payment_status: PaymentStatus,
    #[case] message: &str,
) {
    let product_id = product.id();
    let mut harness = Harness::new()
        .with_catalog(&product)
        .with_outcome(outcome)
        .recording_orders()
        .recording_notifications();
    harness
        .products
        .expect_release_stock()
        .withf(move |id, quantity| *id == product_id && *quantity == 2)
        .times(1)
        .returning(|_, _| Ok(()));
    let settled = Arc::clone(&harness.settled);
    let (service, inserted, enqueued) = harness.build();

    let response = service
        .place_order(request_for(&product, 2))
        .await
        .expect("order recorded");

    assert_eq!(response.status, outcome);
    assert_eq!(response.message, message);
    assert!(settled.lock().expect("settled mutex").is_empty());
    let orders = inserted.lock().expect("orders mutex");
    let order = orders.first().expect("order inserted");
    assert_eq!(order.status(), OrderStatus::Cancelled);
    assert_eq!(order.payment().status, payment_status);
    assert_eq!(
        enqueued
            .lock()
            .expect("queue mutex")
            .first()
            .map(|m| m.template),
        Some(NotificationTemplate::OrderDeclined)
    );
}

#[rstest]
#[tokio::test]
async fn quantity_above_inventory_fails_before_any_write(product: Product) {
    let stored = product.clone();
    let mut harness = Harness::new();
    harness
        .products
        .expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    harness.products.expect_reserve_stock().times(0);
    harness.payments.expect_charge().times(0);
    harness.orders.expect_insert().times(0);
    let (service, _, _) = harness.build();

    let err = service
        .place_order(request_for(&product, 3))
        .await
        .expect_err("insufficient stock");

    assert_eq!(err.code(), ErrorCode::NotAvailable);
}

#[rstest]
#[tokio::test]
async fn missing_product_is_not_available(product: Product) {
    let mut harness = Harness::new();
    harness.products.expect_find_by_id().returning(|_| Ok(None));
    harness.payments.expect_charge().times(0);
    let (service, _, _) = harness.build();

    let err = service
        .place_order(request_for(&product, 1))
        .await
        .expect_err("missing product");

    assert_eq!(err.code(), ErrorCode::NotAvailable);
}

#[rstest]
#[tokio::test]
async fn losing_the_reservation_race_is_not_available(product: Product) {
    let stored = product.clone();
    let mut harness = Harness::new();
    harness
        .products
        .expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    harness
        .products
        .expect_reserve_stock()
        .returning(|_, _| Ok(StockReservation::Insufficient { available: 0 }));
    harness.payments.expect_charge().times(0);
    harness.orders.expect_insert().times(0);
    let (service, _, _) = harness.build();

    let err = service
        .place_order(request_for(&product, 1))
        .await
        .expect_err("reservation lost");

    assert_eq!(err.code(), ErrorCode::NotAvailable);
}

#[rstest]
#[tokio::test]
async fn price_mismatch_is_rejected(product: Product) {
    let stored = product.clone();
    let mut harness = Harness::new();
    harness
        .products
        .expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    harness.products.expect_reserve_stock().times(0);
    let (service, _, _) = harness.build();
    let mut request = request_for(&product, 1);
    request.line.unit_price = Money::from_major(1.0).expect("valid price");

    let err = service
        .place_order(request)
        .await
        .expect_err("price mismatch");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().map(|d| d["code"].clone()),
        Some(serde_json::json!("price_mismatch"))
    );
}

#[rstest]
#[tokio::test]
async fn unknown_variant_is_rejected(product: Product) {
    let stored = product.clone();
    let mut harness = Harness::new();
    harness
        .products
        .expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    harness.products.expect_reserve_stock().times(0);
    let (service, _, _) = harness.build();
    let mut request = request_for(&product, 1);
    request
        .line
        .variant
        .insert("color".to_owned(), "Purple".to_owned());

    let err = service
        .place_order(request)
        .await
        .expect_err("unknown variant");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case::zero_quantity(|r: &mut PlaceOrderRequest| r.line.quantity = 0)]
#[case::blank_name(|r: &mut PlaceOrderRequest| r.customer.full_name = " ".into())]
#[case::blank_phone(|r: &mut PlaceOrderRequest| r.customer.phone = String::new())]
#[case::bad_email(|r: &mut PlaceOrderRequest| r.customer.email = "nobody".into())]
#[tokio::test]
async fn invalid_submissions_fail_before_lookup(
    product: Product,
    #[case] mutate: fn(&mut PlaceOrderRequest),
) {
    let mut harness = Harness::new();
    harness.products.expect_find_by_id().times(0);
    let (service, _, _) = harness.build();
    let mut request = request_for(&product, 1);
    mutate(&mut request);

    let err = service
        .place_order(request)
        .await
        .expect_err("invalid submission");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn order_number_collision_is_regenerated(product: Product) {
    let mut harness = Harness::new()
        .with_catalog(&product)
        .with_outcome(PaymentOutcome::Approved)
        .recording_notifications();
    let mut seq = mockall::Sequence::new();
    harness
        .orders
        .expect_insert()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|order| {
            Err(OrderRepositoryError::duplicate_order_number(
                order.order_number().as_str(),
            ))
        });
    harness
        .orders
        .expect_insert()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    let (service, _, _) = harness.build();

    let response = service
        .place_order(request_for(&product, 1))
        .await
        .expect("second number accepted");

    assert_eq!(response.status, PaymentOutcome::Approved);
}

#[rstest]
#[tokio::test]
async fn exhausted_order_numbers_conflict_and_release_stock(product: Product) {
    let mut harness = Harness::new()
        .with_catalog(&product)
        .with_outcome(PaymentOutcome::Approved);
    harness.orders.expect_insert().times(5).returning(|order| {
        Err(OrderRepositoryError::duplicate_order_number(
            order.order_number().as_str(),
        ))
    });
    harness
        .products
        .expect_release_stock()
        .times(1)
        .returning(|_, _| Ok(()));
    harness.notifications.expect_enqueue().times(0);
    let (service, _, _) = harness.build();

    let err = service
        .place_order(request_for(&product, 1))
        .await
        .expect_err("no unique number");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn persistence_outage_after_approval_releases_stock(product: Product) {
    let mut harness = Harness::new()
        .with_catalog(&product)
        .with_outcome(PaymentOutcome::Approved);
    harness
        .orders
        .expect_insert()
        .returning(|_| Err(OrderRepositoryError::connection("refused")));
    harness
        .products
        .expect_release_stock()
        .times(1)
        .returning(|_, _| Ok(()));
    let settled = Arc::clone(&harness.settled);
    let (service, _, _) = harness.build();

    let err = service
        .place_order(request_for(&product, 1))
        .await
        .expect_err("store down");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert!(settled.lock().expect("settled mutex").is_empty());
}

#[rstest]
#[tokio::test]
async fn catalog_outage_is_service_unavailable(product: Product) {
    let mut harness = Harness::new();
    harness
        .products
        .expect_find_by_id()
        .returning(|_| Err(ProductRepositoryError::connection("refused")));
    let (service, _, _) = harness.build();

    let err = service
        .place_order(request_for(&product, 1))
        .await
        .expect_err("store down");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn enqueue_failure_does_not_fail_the_order(product: Product) {
    let mut harness = Harness::new()
        .with_catalog(&product)
        .with_outcome(PaymentOutcome::Approved)
        .recording_orders();
    harness
        .notifications
        .expect_enqueue()
        .returning(|_| Err(JobDispatchError::rejected("queue full")));
    let (service, inserted, _) = harness.build();

    let response = service
        .place_order(request_for(&product, 1))
        .await
        .expect("order placed");

    assert_eq!(response.status, PaymentOutcome::Approved);
    assert_eq!(inserted.lock().expect("orders mutex").len(), 1);
}

#[rstest]
#[tokio::test]
async fn get_order_reports_unknown_numbers() {
    let mut harness = Harness::new();
    harness.orders.expect_find_by_number().returning(|_| Ok(None));
    let (service, _, _) = harness.build();

    let err = service
        .get_order(OrderNumber::generate(fixture_timestamp(), 1))
        .await
        .expect_err("unknown order");

    assert_eq!(err.code(), ErrorCode::NotFound);
}
