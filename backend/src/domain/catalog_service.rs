//! Catalog domain service.
//!
//! Implements the catalog driving ports on top of a [`ProductRepository`],
//! validating admin drafts and translating repository failures into domain
//! errors.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use serde_json::json;
use tracing::info;

use crate::domain::ports::{CatalogCommand, CatalogQuery, ProductRepository, ProductRepositoryError};
use crate::domain::{
    Error, Product, ProductDetails, ProductDraft, ProductFilter, ProductId, ProductValidationError,
};

/// Catalog service implementing [`CatalogCommand`] and [`CatalogQuery`].
#[derive(Clone)]
pub struct CatalogService<R> {
    products: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> CatalogService<R> {
    /// Create a new service over the given repository.
    pub fn new(products: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { products, clock }
    }
}

pub(crate) fn map_product_repository_error(error: ProductRepositoryError) -> Error {
    match error {
        ProductRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("product repository unavailable: {message}"))
        }
        ProductRepositoryError::Query { message } => {
            Error::internal(format!("product repository error: {message}"))
        }
    }
}

fn validation_error(error: &ProductValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": "invalid_product",
    }))
}

fn product_not_found(id: ProductId) -> Error {
    Error::not_found("Product not found").with_details(json!({ "productId": id.to_string() }))
}

fn validate_filter(filter: &ProductFilter) -> Result<(), Error> {
    let inverted = matches!((filter.min_price, filter.max_price), (Some(min), Some(max)) if min > max);
    if inverted {
        return Err(
            Error::invalid_request("minPrice must not exceed maxPrice").with_details(json!({
                "field": "minPrice",
                "code": "invalid_price_range",
            })),
        );
    }
    Ok(())
}

#[async_trait]
impl<R> CatalogCommand for CatalogService<R>
where
    R: ProductRepository,
{
    async fn create_product(&self, draft: ProductDraft) -> Result<Product, Error> {
        let details = ProductDetails::new(draft).map_err(|err| validation_error(&err))?;
        let now = self.clock.utc();
        let product = Product::new(ProductId::random(), details, now, now);
        self.products
            .insert(&product)
            .await
            .map_err(map_product_repository_error)?;
        info!(product_id = %product.id(), "product created");
        Ok(product)
    }

    async fn replace_product(&self, id: ProductId, draft: ProductDraft) -> Result<Product, Error> {
        let details = ProductDetails::new(draft).map_err(|err| validation_error(&err))?;
        let updated = self
            .products
            .replace(&id, &details, self.clock.utc())
            .await
            .map_err(map_product_repository_error)?;
        updated.ok_or_else(|| product_not_found(id))
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), Error> {
        let deleted = self
            .products
            .delete(&id)
            .await
            .map_err(map_product_repository_error)?;
        if !deleted {
            return Err(product_not_found(id));
        }
        info!(product_id = %id, "product deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> CatalogQuery for CatalogService<R>
where
    R: ProductRepository,
{
    async fn get_product(&self, id: ProductId) -> Result<Product, Error> {
        self.products
            .find_by_id(&id)
            .await
            .map_err(map_product_repository_error)?
            .ok_or_else(|| product_not_found(id))
    }

    async fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, Error> {
        validate_filter(&filter)?;
        self.products
            .list(&filter, page)
            .await
            .map_err(map_product_repository_error)
    }
}

#[cfg(test)]
#[path = "catalog_service_tests.rs"]
mod tests;
