//! Internal Diesel row structs for the storefront tables.
//!
//! These types never leave the persistence layer. Conversions to domain
//! types live in the repositories that use them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{orders, products};

/// Row struct for reading from the products table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub inventory: i32,
    pub reserved: i32,
    pub image: String,
    pub variants: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new product records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub price_cents: i64,
    pub inventory: i32,
    pub image: &'a str,
    pub variants: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full-replace changeset for product records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = products)]
pub(crate) struct ProductUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub price_cents: i64,
    pub inventory: i32,
    pub reserved: i32,
    pub image: &'a str,
    pub variants: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for orders; used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub order_number: String,
    pub product_id: Uuid,
    pub product_name: String,
    pub selected_variant: serde_json::Value,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub customer_full_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub address_street: String,
    pub address_city: String,
    pub address_state: String,
    pub address_zip_code: String,
    pub card_last_four: String,
    pub payment_amount_cents: i64,
    pub payment_status: String,
    pub status: String,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}
