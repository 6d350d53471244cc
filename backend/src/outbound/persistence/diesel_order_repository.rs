//! PostgreSQL-backed `OrderRepository` using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{
    CustomerDetails, Money, Order, OrderNumber, OrderStatus, PaymentStatus, PaymentSummary,
    PostalAddress, ProductId, ProductSnapshot, VariantSelection,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::OrderRow;
use super::pool::{DbPool, PoolError};
use super::schema::orders;

/// Diesel-backed order store. Order numbers are the primary key, so a
/// collision surfaces as [`OrderRepositoryError::DuplicateOrderNumber`].
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    map_basic_pool_error(error, OrderRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> OrderRepositoryError {
    map_basic_diesel_error(
        error,
        OrderRepositoryError::query,
        OrderRepositoryError::connection,
    )
}

fn corrupt(what: &str) -> OrderRepositoryError {
    OrderRepositoryError::query(format!("stored order has invalid {what}"))
}

fn order_to_row(order: &Order) -> Result<OrderRow, OrderRepositoryError> {
    let product = order.product();
    let customer = order.customer();
    let payment = order.payment();
    let selected_variant = serde_json::to_value(&product.variant)
        .map_err(|err| OrderRepositoryError::query(format!("variant encoding failed: {err}")))?;
    let quantity = i32::try_from(product.quantity)
        .map_err(|_| OrderRepositoryError::query("quantity exceeds storable range"))?;

    Ok(OrderRow {
        order_number: order.order_number().as_str().to_owned(),
        product_id: *product.id.as_uuid(),
        product_name: product.name.clone(),
        selected_variant,
        quantity,
        unit_price_cents: product.price.minor_units(),
        customer_full_name: customer.full_name.clone(),
        customer_email: customer.email.clone(),
        customer_phone: customer.phone.clone(),
        address_street: customer.address.street.clone(),
        address_city: customer.address.city.clone(),
        address_state: customer.address.state.clone(),
        address_zip_code: customer.address.zip_code.clone(),
        card_last_four: payment.card_last_four.clone(),
        payment_amount_cents: payment.amount.minor_units(),
        payment_status: payment.status.as_str().to_owned(),
        status: order.status().as_str().to_owned(),
        total_cents: order.total().minor_units(),
        created_at: order.created_at(),
    })
}

fn row_to_order(row: OrderRow) -> Result<Order, OrderRepositoryError> {
    let order_number: OrderNumber = row
        .order_number
        .parse()
        .map_err(|_| corrupt("order number"))?;
    let variant: VariantSelection =
        serde_json::from_value(row.selected_variant).map_err(|_| corrupt("variant selection"))?;
    let quantity = u32::try_from(row.quantity).map_err(|_| corrupt("quantity"))?;
    let price = Money::from_minor(row.unit_price_cents).map_err(|_| corrupt("unit price"))?;
    let amount = Money::from_minor(row.payment_amount_cents).map_err(|_| corrupt("amount"))?;
    let payment_status: PaymentStatus = row
        .payment_status
        .parse()
        .map_err(|_| corrupt("payment status"))?;
    let status: OrderStatus = row.status.parse().map_err(|_| corrupt("status"))?;

    Order::from_parts(
        order_number,
        ProductSnapshot {
            id: ProductId::from_uuid(row.product_id),
            name: row.product_name,
            variant,
            quantity,
            price,
        },
        CustomerDetails {
            full_name: row.customer_full_name,
            email: row.customer_email,
            phone: row.customer_phone,
            address: PostalAddress {
                street: row.address_street,
                city: row.address_city,
                state: row.address_state,
                zip_code: row.address_zip_code,
            },
        },
        PaymentSummary {
            card_last_four: row.card_last_four,
            amount,
            status: payment_status,
        },
        status,
        row.created_at,
    )
    .map_err(|err| OrderRepositoryError::query(format!("stored order is inconsistent: {err}")))
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        let row = order_to_row(order)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        match diesel::insert_into(orders::table)
            .values(&row)
            .execute(&mut conn)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(OrderRepositoryError::duplicate_order_number(row.order_number))
            }
            Err(err) => Err(map_diesel_error(err)),
        }
    }

    async fn find_by_number(
        &self,
        order_number: &OrderNumber,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<OrderRow> = orders::table
            .filter(orders::order_number.eq(order_number.as_str()))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_order).transpose()
    }
}
