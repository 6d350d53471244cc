//! Catalog HTTP handlers.
//!
//! ```text
//! POST   /api/v1/products
//! GET    /api/v1/products?page=&limit=&title=&minPrice=&maxPrice=
//! GET    /api/v1/products/{id}
//! PUT    /api/v1/products/{id}
//! DELETE /api/v1/products/{id}
//! ```
//!
//! Successful responses use the `{success, data}` envelope; listings add
//! `count`, `total`, `page`, and `pages`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::{PageRequest, PaginationError};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, Product, ProductDraft, ProductFilter, Variants};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, field_error, parse_money, parse_product_id, require, require_text,
};

const TITLE: FieldName = FieldName::new("title");
const DESCRIPTION: FieldName = FieldName::new("description");
const PRICE: FieldName = FieldName::new("price");
const INVENTORY: FieldName = FieldName::new("inventory");
const IMAGE: FieldName = FieldName::new("image");
const MIN_PRICE: FieldName = FieldName::new("minPrice");
const MAX_PRICE: FieldName = FieldName::new("maxPrice");

/// Create or full-replace payload.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[schema(example = "Wireless Mouse")]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = 20.0)]
    pub price: Option<f64>,
    #[schema(example = 2)]
    pub inventory: Option<i64>,
    #[schema(example = "/images/mouse.png")]
    pub image: Option<String>,
    /// Option lists per variant name; defaults to colour and size when absent.
    #[schema(value_type = Option<Object>)]
    pub variants: Option<Variants>,
}

/// Product as returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub inventory: u32,
    pub image: String,
    #[schema(value_type = Object)]
    pub variants: Variants,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        let details = product.details();
        Self {
            id: product.id().to_string(),
            title: details.title().to_owned(),
            description: details.description().to_owned(),
            price: details.price().as_major(),
            inventory: details.inventory(),
            image: details.image().to_owned(),
            variants: details.variants().clone(),
            created_at: product.created_at().to_rfc3339(),
            updated_at: product.updated_at().to_rfc3339(),
        }
    }
}

/// `{success, data}` envelope around one product.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductEnvelope {
    pub success: bool,
    pub data: ProductResponse,
}

impl From<&Product> for ProductEnvelope {
    fn from(product: &Product) -> Self {
        Self {
            success: true,
            data: ProductResponse::from(product),
        }
    }
}

/// Paginated listing envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductListEnvelope {
    pub success: bool,
    pub count: usize,
    pub total: u64,
    pub page: u32,
    pub pages: u64,
    pub data: Vec<ProductResponse>,
}

/// `{success, message}` envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageEnvelope {
    pub success: bool,
    pub message: String,
}

/// Listing query string.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// 1-based page number (default 1).
    pub page: Option<u32>,
    /// Page size (default 10, max 100).
    pub limit: Option<u32>,
    /// Case-insensitive title substring.
    pub title: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

fn parse_draft(payload: ProductRequest) -> Result<ProductDraft, Error> {
    Ok(ProductDraft {
        title: require_text(payload.title, TITLE)?,
        description: require_text(payload.description, DESCRIPTION)?,
        price: parse_money(require(payload.price, PRICE)?, PRICE)?,
        inventory: require(payload.inventory, INVENTORY)?,
        image: require_text(payload.image, IMAGE)?,
        variants: payload.variants,
    })
}

fn pagination_error(error: PaginationError) -> Error {
    let field = match error {
        PaginationError::ZeroPage => FieldName::new("page"),
        PaginationError::LimitOutOfRange { .. } => FieldName::new("limit"),
    };
    field_error(field, "invalid_pagination", error.to_string())
}

fn parse_list_query(query: ProductListQuery) -> Result<(ProductFilter, PageRequest), Error> {
    let page = PageRequest::new(query.page, query.limit).map_err(pagination_error)?;
    let filter = ProductFilter {
        title: query
            .title
            .map(|title| title.trim().to_owned())
            .filter(|title| !title.is_empty()),
        min_price: query
            .min_price
            .map(|value| parse_money(value, MIN_PRICE))
            .transpose()?,
        max_price: query
            .max_price
            .map(|value| parse_money(value, MAX_PRICE))
            .transpose()?,
    };
    Ok((filter, page))
}

/// Create a product.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["products"],
    operation_id = "createProduct"
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    payload: web::Json<ProductRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_draft(payload.into_inner())?;
    let product = state.catalog.create_product(draft).await?;
    Ok(HttpResponse::Created().json(ProductEnvelope::from(&product)))
}

/// List products, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Product page", body = ProductListEnvelope),
        (status = 400, description = "Invalid query", body = Error)
    ),
    tags = ["products"],
    operation_id = "listProducts"
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    query: web::Query<ProductListQuery>,
) -> ApiResult<web::Json<ProductListEnvelope>> {
    let (filter, request) = parse_list_query(query.into_inner())?;
    debug!(?filter, page = request.page(), limit = request.limit(), "listing products");
    let page = state.catalog_query.list_products(filter, request).await?;
    Ok(web::Json(ProductListEnvelope {
        success: true,
        count: page.count(),
        total: page.total(),
        page: page.request().page(),
        pages: page.pages(),
        data: page.items().iter().map(ProductResponse::from).collect(),
    }))
}

/// Fetch one product.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product", body = ProductEnvelope),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "getProduct"
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProductEnvelope>> {
    let id = parse_product_id(&path.into_inner())?;
    let product = state.catalog_query.get_product(id).await?;
    Ok(web::Json(ProductEnvelope::from(&product)))
}

/// Replace every attribute of a product.
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product UUID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductEnvelope),
        (status = 400, description = "Invalid request or id", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "replaceProduct"
)]
#[put("/products/{id}")]
pub async fn replace_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ProductRequest>,
) -> ApiResult<web::Json<ProductEnvelope>> {
    let id = parse_product_id(&path.into_inner())?;
    let draft = parse_draft(payload.into_inner())?;
    let product = state.catalog.replace_product(id, draft).await?;
    Ok(web::Json(ProductEnvelope::from(&product)))
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product deleted", body = MessageEnvelope),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "deleteProduct"
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageEnvelope>> {
    let id = parse_product_id(&path.into_inner())?;
    state.catalog.delete_product(id).await?;
    Ok(web::Json(MessageEnvelope {
        success: true,
        message: "Product deleted successfully".to_owned(),
    }))
}

#[cfg(test)]
#[path = "products_tests.rs"]
mod tests;
