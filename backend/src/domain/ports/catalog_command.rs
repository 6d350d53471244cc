//! Driving port for catalog mutations.

use async_trait::async_trait;

use crate::domain::{Error, Product, ProductDraft, ProductId};

/// Driving port for admin catalog writes.
///
/// Drafts are validated by the implementation; validation failures surface as
/// [`crate::domain::ErrorCode::InvalidRequest`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogCommand: Send + Sync {
    /// Create a product, applying default variants when none are given.
    async fn create_product(&self, draft: ProductDraft) -> Result<Product, Error>;

    /// Replace every mutable attribute of an existing product.
    async fn replace_product(&self, id: ProductId, draft: ProductDraft) -> Result<Product, Error>;

    /// Delete a product.
    async fn delete_product(&self, id: ProductId) -> Result<(), Error>;
}
