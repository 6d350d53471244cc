//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    MockCatalogCommand, MockCatalogQuery, MockOrderCommand, MockOrderQuery,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Mock ports wired into handlers under test.
///
/// Every mock starts without expectations, so an unexpected call panics.
#[derive(Default)]
pub struct MockPorts {
    pub catalog: MockCatalogCommand,
    pub catalog_query: MockCatalogQuery,
    pub orders: MockOrderCommand,
    pub orders_query: MockOrderQuery,
}

impl MockPorts {
    /// Freeze the configured mocks into shared handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            catalog: Arc::new(self.catalog),
            catalog_query: Arc::new(self.catalog_query),
            orders: Arc::new(self.orders),
            orders_query: Arc::new(self.orders_query),
        }))
    }
}
