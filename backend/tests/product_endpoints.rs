//! Catalog administration and browsing over HTTP.

mod support;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::{Value, json};
use support::{APPROVE, Storefront, mouse_payload, test_app};

async fn send<S>(app: &S, request: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = actix_test::call_service(app, request).await;
    let status = response.status();
    let body: Value = actix_test::read_body_json(response).await;
    (status, body)
}

async fn create<S>(app: &S, payload: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/products")
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

#[actix_web::test]
async fn created_products_read_back_unchanged() {
    let store = Storefront::with_draw(APPROVE);
    let app = actix_test::init_service(test_app(store.http_state())).await;

    let mut payload = mouse_payload();
    payload["variants"] = json!({ "color": ["Red"], "dpi": ["800", "1600"] });
    let created = create(&app, payload).await;
    let id = created["id"].as_str().expect("id");

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/products/{id}"))
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let fetched = &body["data"];
    assert_eq!(fetched["title"], "Mouse");
    assert_eq!(fetched["price"], 20.0);
    assert_eq!(fetched["inventory"], 2);
    assert_eq!(
        fetched["variants"],
        json!({ "color": ["Red"], "dpi": ["800", "1600"] })
    );
    assert_eq!(fetched["createdAt"], created["createdAt"]);
}

#[actix_web::test]
async fn listing_filters_and_pages_newest_first() {
    let store = Storefront::with_draw(APPROVE);
    let app = actix_test::init_service(test_app(store.http_state())).await;
    for (title, price) in [("Mouse", 20.0), ("Mouse Pad", 5.0), ("Keyboard", 45.0)] {
        let mut payload = mouse_payload();
        payload["title"] = json!(title);
        payload["price"] = json!(price);
        create(&app, payload).await;
    }

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/products?title=mouse&limit=1&page=1")
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["pages"], 2);
    assert_eq!(body["count"], 1);

    let (_, priced) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/products?minPrice=10&maxPrice=50")
            .to_request(),
    )
    .await;
    let mut titles: Vec<&str> = priced["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|product| product["title"].as_str())
        .collect();
    titles.sort_unstable();
    assert_eq!(titles, ["Keyboard", "Mouse"]);
}

#[actix_web::test]
async fn replace_then_delete_lifecycle() {
    let store = Storefront::with_draw(APPROVE);
    let app = actix_test::init_service(test_app(store.http_state())).await;
    let created = create(&app, mouse_payload()).await;
    let id = created["id"].as_str().expect("id").to_owned();

    let mut replacement = mouse_payload();
    replacement["inventory"] = json!(9);
    replacement["price"] = json!(18.5);
    let (status, body) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/products/{id}"))
            .set_json(replacement)
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["inventory"], 9);
    assert_eq!(body["data"]["price"], 18.5);

    let (status, body) = send(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/products/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/products/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn negative_inventory_is_rejected() {
    let store = Storefront::with_draw(APPROVE);
    let app = actix_test::init_service(test_app(store.http_state())).await;
    let mut payload = mouse_payload();
    payload["inventory"] = json!(-1);

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/products")
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "inventory");
}
