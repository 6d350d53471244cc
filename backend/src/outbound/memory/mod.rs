//! Process-local stores used when no database URL is configured and by the
//! integration suites.
//!
//! Each store guards its map with a single mutex, so stock reservation is a
//! check-and-decrement under one lock and concurrent buyers serialize.

mod order_repository;
mod product_repository;

pub use order_repository::InMemoryOrderRepository;
pub use product_repository::InMemoryProductRepository;
