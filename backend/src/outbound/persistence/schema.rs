//! Diesel table definitions for the storefront schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Catalog products. Prices are stored in minor units (cents).
    products (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Text,
        price_cents -> Int8,
        /// Units on sale. Never negative; enforced by a CHECK constraint.
        inventory -> Int4,
        /// Units held by in-flight checkout charges.
        reserved -> Int4,
        image -> Varchar,
        /// Variant name to offered options, e.g. `{"color": ["Black"]}`.
        variants -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Placed orders, keyed by their public order number.
    orders (order_number) {
        order_number -> Varchar,
        product_id -> Uuid,
        product_name -> Varchar,
        selected_variant -> Jsonb,
        quantity -> Int4,
        unit_price_cents -> Int8,
        customer_full_name -> Varchar,
        customer_email -> Varchar,
        customer_phone -> Varchar,
        address_street -> Varchar,
        address_city -> Varchar,
        address_state -> Varchar,
        address_zip_code -> Varchar,
        card_last_four -> Varchar,
        payment_amount_cents -> Int8,
        payment_status -> Varchar,
        status -> Varchar,
        total_cents -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(orders, products);
