//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: mutex-guarded stores for database-less runs and tests
//! - **payment**: the simulated payment gateway
//! - **notification**: mail relay and logging senders
//! - **queue**: in-process notification queue and its worker
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business rules.

pub mod memory;
pub mod notification;
pub mod payment;
pub mod persistence;
pub mod queue;
