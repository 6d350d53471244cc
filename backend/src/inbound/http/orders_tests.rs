//! Tests for checkout and order lookup handlers.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{Money, PaymentOutcome, ProductId, ProductSnapshot};
use crate::inbound::http::test_utils::MockPorts;
use crate::inbound::http::validation::json_config;

const PRODUCT_UUID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn test_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(ports.into_state())
        .app_data(json_config())
        .service(
            web::scope("/api/v1")
                .service(place_order)
                .service(get_order),
        )
}

fn checkout_payload() -> Value {
    json!({
        "product": {
            "id": PRODUCT_UUID,
            "title": "Mouse",
            "quantity": 1,
            "price": 20.0,
            "selectedVariant": { "color": "Black" }
        },
        "customer": {
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "555-0100",
            "address": {
                "street": "1 Analytical Way",
                "city": "London",
                "state": "LDN",
                "zipCode": "N1"
            }
        },
        "payment": {
            "cardNumber": "4242 4242 4242 4242",
            "expiryDate": "12/30",
            "cvv": "123"
        }
    })
}

fn order_number() -> OrderNumber {
    let at = Utc
        .timestamp_millis_opt(1_700_000_000_000)
        .single()
        .expect("valid timestamp");
    OrderNumber::generate(at, 0xBEEF)
}

fn sample_order() -> Order {
    let at = Utc
        .timestamp_millis_opt(1_700_000_000_000)
        .single()
        .expect("valid timestamp");
    Order::place(
        order_number(),
        ProductSnapshot {
            id: PRODUCT_UUID.parse::<ProductId>().expect("uuid"),
            name: "Mouse".into(),
            variant: VariantSelection::from([("color".to_owned(), "Black".to_owned())]),
            quantity: 2,
            price: Money::from_major(20.0).expect("price"),
        },
        CustomerDetails {
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
        "4242".into(),
        PaymentOutcome::Approved,
        at,
    )
    .expect("valid order")
}

#[actix_web::test]
async fn place_order_returns_created_with_outcome() {
    let mut ports = MockPorts::default();
    ports
        .orders
        .expect_place_order()
        .withf(|request| {
            request.line.quantity == 1
                && request.line.variant.get("color").map(String::as_str) == Some("Black")
                && request.customer.address.zip_code == "N1"
                && request.payment.last_four() == "4242"
        })
        .times(1)
        .returning(|_| {
            Ok(PlaceOrderResponse {
                order_number: order_number(),
                status: PaymentOutcome::Declined,
                message: PaymentOutcome::Declined.message().to_owned(),
            })
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/orders")
        .set_json(checkout_payload())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["orderNumber"], "ORD-1700000000000-BEEF");
    assert_eq!(body["status"], "declined");
    assert!(body["message"].is_string());
}

#[rstest]
#[case("/product/id", "product.id")]
#[case("/product/quantity", "product.quantity")]
#[case("/customer/email", "customer.email")]
#[case("/payment/cardNumber", "payment.cardNumber")]
#[case("/customer", "customer")]
#[actix_web::test]
async fn place_order_reports_missing_fields(#[case] pointer: &str, #[case] field: &str) {
    let mut ports = MockPorts::default();
    ports.orders.expect_place_order().times(0);
    let app = actix_test::init_service(test_app(ports)).await;

    let mut payload = checkout_payload();
    let (parent, key) = pointer.rsplit_once('/').expect("pointer has a key");
    payload
        .pointer_mut(parent)
        .and_then(Value::as_object_mut)
        .expect("parent object")
        .remove(key);
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/orders")
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[case(json!(0))]
#[case(json!(-3))]
#[actix_web::test]
async fn place_order_rejects_non_positive_quantity(#[case] quantity: Value) {
    let mut ports = MockPorts::default();
    ports.orders.expect_place_order().times(0);
    let app = actix_test::init_service(test_app(ports)).await;

    let mut payload = checkout_payload();
    payload["product"]["quantity"] = quantity;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/orders")
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_quantity");
}

#[actix_web::test]
async fn place_order_surfaces_not_available_as_bad_request() {
    let mut ports = MockPorts::default();
    ports.orders.expect_place_order().returning(|_| {
        Err(Error::not_available(
            "Product not available in requested quantity",
        ))
    });
    let app = actix_test::init_service(test_app(ports)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/orders")
        .set_json(checkout_payload())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "not_available");
}

#[actix_web::test]
async fn get_order_renders_the_stored_document() {
    let mut ports = MockPorts::default();
    ports
        .orders_query
        .expect_get_order()
        .withf(|number| number.as_str() == "ORD-1700000000000-BEEF")
        .returning(|_| Ok(sample_order()));
    let app = actix_test::init_service(test_app(ports)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/orders/ORD-1700000000000-BEEF")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["orderNumber"], "ORD-1700000000000-BEEF");
    assert_eq!(body["product"]["name"], "Mouse");
    assert_eq!(body["product"]["variant"]["color"], "Black");
    assert_eq!(body["customer"]["address"]["zipCode"], "N1");
    assert_eq!(body["payment"]["cardLastFour"], "4242");
    assert_eq!(body["payment"]["status"], "approved");
    assert_eq!(body["payment"]["amount"], 40.0);
    assert_eq!(body["status"], "processing");
    assert_eq!(body["total"], 40.0);
    assert!(body["payment"].get("cardNumber").is_none());
}

#[actix_web::test]
async fn get_order_treats_malformed_numbers_as_not_found() {
    let mut ports = MockPorts::default();
    ports.orders_query.expect_get_order().times(0);
    let app = actix_test::init_service(test_app(ports)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/orders/nope")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "Order not found");
}
