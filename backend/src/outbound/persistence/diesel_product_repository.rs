//! PostgreSQL-backed `ProductRepository` using Diesel.
//!
//! Reservations are single conditional `UPDATE` statements, so concurrent
//! buyers of the last units serialize on the row lock and never drive
//! inventory below zero. Settling, releasing and replacing lock the row,
//! apply the [`StockLevels`] rules and write both counters back in one
//! transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{ProductRepository, ProductRepositoryError, StockReservation};
use crate::domain::{
    Money, Product, ProductDetails, ProductFilter, ProductId, StockLevels, Variants,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewProductRow, ProductRow, ProductUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::products;

/// Apply the optional title and price filters to a boxed products query.
macro_rules! filtered {
    ($query:expr, $filter:expr) => {{
        let mut query = $query;
        if let Some(title) = $filter.title.as_deref() {
            query = query.filter(products::title.ilike(like_pattern(title)));
        }
        if let Some(min) = $filter.min_price {
            query = query.filter(products::price_cents.ge(min.minor_units()));
        }
        if let Some(max) = $filter.max_price {
            query = query.filter(products::price_cents.le(max.minor_units()));
        }
        query
    }};
}

/// Diesel-backed catalog store.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn adjust_stock(
        &self,
        id: &ProductId,
        change: impl FnOnce(StockLevels) -> StockLevels + Send,
    ) -> Result<(), ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *id.as_uuid();
        conn.transaction(|conn| {
            async move {
                let Some(levels) = lock_levels(conn, id).await? else {
                    return Ok(());
                };
                let levels = change(levels);
                diesel::update(products::table.find(id))
                    .set((
                        products::inventory.eq(count_to_column(levels.available())),
                        products::reserved.eq(count_to_column(levels.reserved())),
                    ))
                    .execute(conn)
                    .await
                    .map(|_| ())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

fn map_pool_error(error: PoolError) -> ProductRepositoryError {
    map_basic_pool_error(error, ProductRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ProductRepositoryError {
    map_basic_diesel_error(
        error,
        ProductRepositoryError::query,
        ProductRepositoryError::connection,
    )
}

/// Substring pattern for `ILIKE`, escaping the wildcard characters.
fn like_pattern(raw: &str) -> String {
    let mut pattern = String::with_capacity(raw.len() + 2);
    pattern.push('%');
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn inventory_to_db(inventory: u32) -> Result<i32, ProductRepositoryError> {
    i32::try_from(inventory)
        .map_err(|_| ProductRepositoryError::query("inventory exceeds storable range"))
}

/// Counter value for a column already bounded by validated inventory.
fn count_to_column(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

fn column_to_count(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Read both stock counters under a row lock.
async fn lock_levels(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> QueryResult<Option<StockLevels>> {
    let counts: Option<(i32, i32)> = products::table
        .find(id)
        .select((products::inventory, products::reserved))
        .for_update()
        .first(conn)
        .await
        .optional()?;
    Ok(counts.map(|(inventory, reserved)| {
        StockLevels::new(column_to_count(inventory), column_to_count(reserved))
    }))
}

fn variants_to_db(variants: &Variants) -> Result<serde_json::Value, ProductRepositoryError> {
    serde_json::to_value(variants)
        .map_err(|err| ProductRepositoryError::query(format!("variants encoding failed: {err}")))
}

fn row_to_product(row: ProductRow) -> Result<Product, ProductRepositoryError> {
    let price = Money::from_minor(row.price_cents)
        .map_err(|err| ProductRepositoryError::query(format!("stored price is invalid: {err}")))?;
    let inventory = u32::try_from(row.inventory)
        .map_err(|_| ProductRepositoryError::query("stored inventory is negative"))?;
    let variants: Variants = serde_json::from_value(row.variants).map_err(|err| {
        ProductRepositoryError::query(format!("stored variants are invalid: {err}"))
    })?;
    let details = ProductDetails::from_stored(
        row.title,
        row.description,
        price,
        inventory,
        row.image,
        variants,
    );
    Ok(Product::new(
        ProductId::from_uuid(row.id),
        details,
        row.created_at,
        row.updated_at,
    ))
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = product.details();
        let row = NewProductRow {
            id: *product.id().as_uuid(),
            title: details.title(),
            description: details.description(),
            price_cents: details.price().minor_units(),
            inventory: inventory_to_db(details.inventory())?,
            image: details.image(),
            variants: variants_to_db(details.variants())?,
            created_at: product.created_at(),
            updated_at: product.updated_at(),
        };

        diesel::insert_into(products::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProductRow> = products::table
            .filter(products::id.eq(id.as_uuid()))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_product).transpose()
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered!(products::table.count().into_boxed(), filter)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let offset = i64::try_from(page.offset())
            .map_err(|_| ProductRepositoryError::query("page offset is too large"))?;
        let rows: Vec<ProductRow> = filtered!(
            products::table
                .select(ProductRow::as_select())
                .into_boxed(),
            filter
        )
        .order((products::created_at.desc(), products::id.asc()))
        .offset(offset)
        .limit(i64::from(page.limit()))
        .load(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(row_to_product)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, u64::try_from(total).unwrap_or(0), page))
    }

    async fn replace(
        &self,
        id: &ProductId,
        details: &ProductDetails,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // The new on-hand figure must fit the column before the row is locked.
        inventory_to_db(details.inventory())?;
        let variants = variants_to_db(details.variants())?;
        let id = *id.as_uuid();

        let row: Option<ProductRow> = conn
            .transaction(|conn| {
                async move {
                    let Some(levels) = lock_levels(conn, id).await? else {
                        return Ok(None);
                    };
                    let levels = levels.restock(details.inventory());
                    let update = ProductUpdate {
                        title: details.title(),
                        description: details.description(),
                        price_cents: details.price().minor_units(),
                        inventory: count_to_column(levels.available()),
                        reserved: count_to_column(levels.reserved()),
                        image: details.image(),
                        variants,
                        updated_at,
                    };
                    diesel::update(products::table.find(id))
                        .set(&update)
                        .returning(ProductRow::as_returning())
                        .get_result(conn)
                        .await
                        .map(Some)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        row.map(row_to_product).transpose()
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(products::table.filter(products::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn reserve_stock(
        &self,
        id: &ProductId,
        quantity: u32,
    ) -> Result<StockReservation, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let reserved: Option<ProductRow> = match i32::try_from(quantity) {
            Ok(quantity) => diesel::update(products::table)
                .filter(products::id.eq(id.as_uuid()))
                .filter(products::inventory.ge(quantity))
                .set((
                    products::inventory.eq(products::inventory - quantity),
                    products::reserved.eq(products::reserved + quantity),
                ))
                .returning(ProductRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?,
            Err(_) => None,
        };
        if let Some(row) = reserved {
            return row_to_product(row).map(StockReservation::Reserved);
        }

        let available: Option<i32> = products::table
            .filter(products::id.eq(id.as_uuid()))
            .select(products::inventory)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(match available {
            Some(available) => StockReservation::Insufficient {
                available: u32::try_from(available).unwrap_or(0),
            },
            None => StockReservation::Missing,
        })
    }

    async fn release_stock(
        &self,
        id: &ProductId,
        quantity: u32,
    ) -> Result<(), ProductRepositoryError> {
        self.adjust_stock(id, move |levels| levels.release(quantity))
            .await
    }

    async fn settle_stock(
        &self,
        id: &ProductId,
        quantity: u32,
    ) -> Result<(), ProductRepositoryError> {
        self.adjust_stock(id, move |levels| levels.settle(quantity))
            .await
    }
}
