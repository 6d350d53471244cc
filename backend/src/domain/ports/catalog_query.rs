//! Driving port for catalog reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, Product, ProductFilter, ProductId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// Fetch one product or fail with `not_found`.
    async fn get_product(&self, id: ProductId) -> Result<Product, Error>;

    /// List products matching `filter`, newest first.
    async fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, Error>;
}
