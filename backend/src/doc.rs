//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every catalog, order, and health endpoint together
//! with the request, response, and error schemas. The document backs Swagger
//! UI in debug builds and is exported by `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::health::ProbeReport;
use crate::inbound::http::orders::{
    AddressResponse, CheckoutAddress, CheckoutCustomer, CheckoutPayment, CheckoutProduct,
    CheckoutRequest, CheckoutResponse, CustomerResponse, OrderProductResponse, OrderResponse,
    PaymentResponse,
};
use crate::inbound::http::products::{
    MessageEnvelope, ProductEnvelope, ProductListEnvelope, ProductRequest, ProductResponse,
};

/// OpenAPI document for the storefront REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        description = "Catalog administration, checkout, and order lookup for a single-product storefront."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::replace_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::orders::place_order,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        ProductRequest,
        ProductResponse,
        ProductEnvelope,
        ProductListEnvelope,
        MessageEnvelope,
        CheckoutRequest,
        CheckoutProduct,
        CheckoutCustomer,
        CheckoutAddress,
        CheckoutPayment,
        CheckoutResponse,
        OrderResponse,
        OrderProductResponse,
        CustomerResponse,
        AddressResponse,
        PaymentResponse,
        ProbeReport,
    )),
    tags(
        (name = "products", description = "Catalog administration and browsing"),
        (name = "orders", description = "Checkout and order lookup"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Schema and path registration checks.

    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn schema_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        match components.schemas.get(name).expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected object schema for {name}"),
        }
    }

    #[rstest]
    #[case("Error", &["code", "message", "traceId", "details"])]
    #[case("CheckoutResponse", &["orderNumber", "status", "message"])]
    #[case("ProductListEnvelope", &["success", "count", "total", "page", "pages", "data"])]
    #[case("OrderResponse", &["orderNumber", "product", "customer", "payment", "status", "total", "createdAt"])]
    fn schemas_expose_wire_fields(#[case] name: &str, #[case] expected: &[&str]) {
        let fields = schema_fields(name);
        for field in expected {
            assert!(
                fields.iter().any(|candidate| candidate == field),
                "{name} should expose {field}, got {fields:?}"
            );
        }
    }

    #[rstest]
    #[case("/api/v1/products")]
    #[case("/api/v1/products/{id}")]
    #[case("/api/v1/orders")]
    #[case("/api/v1/orders/{orderNumber}")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }
}
