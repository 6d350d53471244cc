//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between internal row structs (`models.rs`) and
//! domain types; the Diesel schema and rows never leak past this module.
//! Connections come from a `bb8` pool over `diesel-async`, and every database
//! failure is mapped to the owning port's `Connection` or `Query` error.
//!
//! # Example
//!
//! ```ignore
//! use storefront::outbound::persistence::{DbPool, DieselProductRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/shop")).await?;
//! let products = DieselProductRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_order_repository;
mod diesel_product_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_product_repository::DieselProductRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
