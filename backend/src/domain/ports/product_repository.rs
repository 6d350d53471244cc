//! Port for catalog product persistence.
//!
//! Besides CRUD, the repository owns the stock holds used by checkout.
//! [`ProductRepository::reserve_stock`] moves units from sale into a hold only
//! when enough remain, as one atomic step. Each hold is later either settled
//! or released. Held units are tracked apart from inventory (see
//! [`StockLevels`](crate::domain::StockLevels)) so `replace` sets on-hand
//! stock without a pending release adding to it afterwards.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::{Product, ProductDetails, ProductFilter, ProductId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "product repository query failed: {message}",
    }
}

/// Result of a conditional stock decrement.
#[derive(Debug, Clone, PartialEq)]
pub enum StockReservation {
    /// Units moved into a hold; carries the product after the update.
    Reserved(Product),
    /// The product exists but holds fewer units than requested.
    Insufficient { available: u32 },
    /// No product has the given identifier.
    Missing,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product.
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError>;

    /// Fetch one product.
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError>;

    /// List products matching `filter`, newest first.
    async fn list(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, ProductRepositoryError>;

    /// Replace every mutable attribute. Returns `None` when the id is unknown.
    ///
    /// `details.inventory()` is the new on-hand figure; outstanding holds are
    /// counted against it.
    async fn replace(
        &self,
        id: &ProductId,
        details: &ProductDetails,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Product>, ProductRepositoryError>;

    /// Delete a product. Returns `false` when the id is unknown.
    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError>;

    /// Atomically move `quantity` units from inventory into a hold iff at
    /// least `quantity` units remain.
    async fn reserve_stock(
        &self,
        id: &ProductId,
        quantity: u32,
    ) -> Result<StockReservation, ProductRepositoryError>;

    /// Return up to `quantity` held units to inventory.
    async fn release_stock(
        &self,
        id: &ProductId,
        quantity: u32,
    ) -> Result<(), ProductRepositoryError>;

    /// Drop a hold of `quantity` units whose charge was approved.
    async fn settle_stock(
        &self,
        id: &ProductId,
        quantity: u32,
    ) -> Result<(), ProductRepositoryError>;
}
