//! Checkout and order lookup HTTP handlers.
//!
//! ```text
//! POST /api/v1/orders
//! GET  /api/v1/orders/{orderNumber}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{OrderLine, PlaceOrderRequest, PlaceOrderResponse};
use crate::domain::{
    CustomerDetails, Error, Order, OrderNumber, PaymentInstrument, PostalAddress,
    VariantSelection,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, field_error, parse_money, parse_product_id, require, require_text,
};

const PRODUCT: FieldName = FieldName::new("product");
const PRODUCT_ID: FieldName = FieldName::new("product.id");
const PRODUCT_QUANTITY: FieldName = FieldName::new("product.quantity");
const PRODUCT_PRICE: FieldName = FieldName::new("product.price");
const CUSTOMER: FieldName = FieldName::new("customer");
const CUSTOMER_NAME: FieldName = FieldName::new("customer.fullName");
const CUSTOMER_EMAIL: FieldName = FieldName::new("customer.email");
const CUSTOMER_PHONE: FieldName = FieldName::new("customer.phone");
const PAYMENT: FieldName = FieldName::new("payment");
const CARD_NUMBER: FieldName = FieldName::new("payment.cardNumber");

/// Product selection as shown at checkout.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutProduct {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Option<String>,
    /// Display title only; orders store the catalog title.
    pub title: Option<String>,
    #[schema(example = 1)]
    pub quantity: Option<i64>,
    #[schema(example = 20.0)]
    pub price: Option<f64>,
    #[schema(value_type = Option<Object>)]
    pub selected_variant: Option<VariantSelection>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutCustomer {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<CheckoutAddress>,
}

/// Card-like payment input. Expiry and CVV are passed through unvalidated.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayment {
    #[schema(example = "4242 4242 4242 4242")]
    pub card_number: Option<String>,
    #[schema(example = "12/30")]
    pub expiry_date: Option<String>,
    #[schema(example = "123")]
    pub cvv: Option<String>,
}

impl std::fmt::Debug for CheckoutPayment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutPayment").finish_non_exhaustive()
    }
}

/// Checkout submission.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CheckoutRequest {
    pub product: Option<CheckoutProduct>,
    pub customer: Option<CheckoutCustomer>,
    pub payment: Option<CheckoutPayment>,
}

/// Result of a checkout.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    #[schema(example = "ORD-1700000000000-BEEF")]
    pub order_number: String,
    /// Payment outcome: `approved`, `declined`, or `error`.
    #[schema(example = "approved")]
    pub status: String,
    #[schema(example = "Payment approved")]
    pub message: String,
}

impl From<PlaceOrderResponse> for CheckoutResponse {
    fn from(value: PlaceOrderResponse) -> Self {
        Self {
            order_number: value.order_number.as_str().to_owned(),
            status: value.status.as_str().to_owned(),
            message: value.message,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderProductResponse {
    pub id: String,
    pub name: String,
    #[schema(value_type = Object)]
    pub variant: VariantSelection,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: AddressResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub card_last_four: String,
    pub amount: f64,
    /// `pending`, `approved`, `declined`, or `error`.
    pub status: String,
}

/// Persisted order document.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_number: String,
    pub product: OrderProductResponse,
    pub customer: CustomerResponse,
    pub payment: PaymentResponse,
    /// Fulfilment state: `processing` or `cancelled` when placed.
    pub status: String,
    pub total: f64,
    pub created_at: String,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        let product = order.product();
        let customer = order.customer();
        let payment = order.payment();
        Self {
            order_number: order.order_number().as_str().to_owned(),
            product: OrderProductResponse {
                id: product.id.to_string(),
                name: product.name.clone(),
                variant: product.variant.clone(),
                quantity: product.quantity,
                price: product.price.as_major(),
            },
            customer: CustomerResponse {
                full_name: customer.full_name.clone(),
                email: customer.email.clone(),
                phone: customer.phone.clone(),
                address: AddressResponse {
                    street: customer.address.street.clone(),
                    city: customer.address.city.clone(),
                    state: customer.address.state.clone(),
                    zip_code: customer.address.zip_code.clone(),
                },
            },
            payment: PaymentResponse {
                card_last_four: payment.card_last_four.clone(),
                amount: payment.amount.as_major(),
                status: payment.status.as_str().to_owned(),
            },
            status: order.status().as_str().to_owned(),
            total: order.total().as_major(),
            created_at: order.created_at().to_rfc3339(),
        }
    }
}

fn parse_quantity(raw: i64) -> Result<u32, Error> {
    u32::try_from(raw)
        .ok()
        .filter(|quantity| *quantity >= 1)
        .ok_or_else(|| {
            field_error(
                PRODUCT_QUANTITY,
                "invalid_quantity",
                "quantity must be at least 1",
            )
        })
}

fn parse_line(product: CheckoutProduct) -> Result<OrderLine, Error> {
    let raw_id = require_text(product.id, PRODUCT_ID)?;
    Ok(OrderLine {
        product_id: parse_product_id(&raw_id)?,
        quantity: parse_quantity(require(product.quantity, PRODUCT_QUANTITY)?)?,
        unit_price: parse_money(require(product.price, PRODUCT_PRICE)?, PRODUCT_PRICE)?,
        variant: product.selected_variant.unwrap_or_default(),
    })
}

fn parse_customer(customer: CheckoutCustomer) -> Result<CustomerDetails, Error> {
    let address = customer.address.unwrap_or_default();
    Ok(CustomerDetails {
        full_name: require_text(customer.full_name, CUSTOMER_NAME)?,
        email: require_text(customer.email, CUSTOMER_EMAIL)?,
        phone: require_text(customer.phone, CUSTOMER_PHONE)?,
        address: PostalAddress {
            street: address.street.unwrap_or_default(),
            city: address.city.unwrap_or_default(),
            state: address.state.unwrap_or_default(),
            zip_code: address.zip_code.unwrap_or_default(),
        },
    })
}

fn parse_payment(payment: CheckoutPayment) -> Result<PaymentInstrument, Error> {
    let card_number = require_text(payment.card_number, CARD_NUMBER)?;
    PaymentInstrument::try_from_parts(
        &card_number,
        payment.expiry_date.as_deref().unwrap_or_default(),
        payment.cvv.as_deref().unwrap_or_default(),
    )
    .map_err(|err| field_error(CARD_NUMBER, "invalid_card_number", err.to_string()))
}

fn parse_checkout(payload: CheckoutRequest) -> Result<PlaceOrderRequest, Error> {
    Ok(PlaceOrderRequest {
        line: parse_line(require(payload.product, PRODUCT)?)?,
        customer: parse_customer(require(payload.customer, CUSTOMER)?)?,
        payment: parse_payment(require(payload.payment, PAYMENT)?)?,
    })
}

/// Place an order for one product line.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order recorded; status carries the payment outcome", body = CheckoutResponse),
        (status = 400, description = "Invalid request or product not available", body = Error),
        (status = 409, description = "Order number could not be allocated", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "placeOrder"
)]
#[post("/orders")]
pub async fn place_order(
    state: web::Data<HttpState>,
    payload: web::Json<CheckoutRequest>,
) -> ApiResult<HttpResponse> {
    let request = parse_checkout(payload.into_inner())?;
    let placed = state.orders.place_order(request).await?;
    Ok(HttpResponse::Created().json(CheckoutResponse::from(placed)))
}

/// Fetch a placed order by its number.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{orderNumber}",
    params(("orderNumber" = String, Path, description = "Order number, e.g. ORD-1700000000000-BEEF")),
    responses(
        (status = 200, description = "Order document", body = OrderResponse),
        (status = 404, description = "Order not found", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{order_number}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<OrderResponse>> {
    let raw = path.into_inner();
    let order_number: OrderNumber = raw.parse().map_err(|_| {
        Error::not_found("Order not found").with_details(json!({ "orderNumber": raw }))
    })?;
    let order = state.orders_query.get_order(order_number).await?;
    Ok(web::Json(OrderResponse::from(&order)))
}

#[cfg(test)]
#[path = "orders_tests.rs"]
mod tests;
