use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::ports::{ProductRepository, ProductRepositoryError, StockReservation};
use crate::domain::{Product, ProductDetails, ProductFilter, ProductId, StockLevels};

/// A product plus the units held by in-flight charges.
#[derive(Debug, Clone)]
struct StockedProduct {
    product: Product,
    reserved: u32,
}

impl StockedProduct {
    fn levels(&self) -> StockLevels {
        StockLevels::new(self.product.details().inventory(), self.reserved)
    }

    fn apply(&mut self, levels: StockLevels) {
        self.product.details_mut().set_inventory(levels.available());
        self.reserved = levels.reserved();
    }
}

/// In-memory catalog store.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: Mutex<HashMap<ProductId, StockedProduct>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, HashMap<ProductId, StockedProduct>> {
        self.products.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn adjust(&self, id: &ProductId, change: impl FnOnce(StockLevels) -> StockLevels) {
        if let Some(stocked) = self.guard().get_mut(id) {
            let levels = change(stocked.levels());
            stocked.apply(levels);
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        self.guard().insert(
            product.id(),
            StockedProduct {
                product: product.clone(),
                reserved: 0,
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        Ok(self.guard().get(id).map(|stocked| stocked.product.clone()))
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, ProductRepositoryError> {
        let mut matching: Vec<Product> = self
            .guard()
            .values()
            .map(|stocked| &stocked.product)
            .filter(|product| filter.matches(product))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });

        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let items = matching.into_iter().skip(skip).take(take).collect();
        Ok(Page::new(items, total, page))
    }

    async fn replace(
        &self,
        id: &ProductId,
        details: &ProductDetails,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        let mut products = self.guard();
        Ok(products.get_mut(id).map(|stocked| {
            let levels = stocked.levels().restock(details.inventory());
            stocked.product.replace(details.clone(), updated_at);
            stocked.apply(levels);
            stocked.product.clone()
        }))
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError> {
        Ok(self.guard().remove(id).is_some())
    }

    async fn reserve_stock(
        &self,
        id: &ProductId,
        quantity: u32,
    ) -> Result<StockReservation, ProductRepositoryError> {
        let mut products = self.guard();
        let Some(stocked) = products.get_mut(id) else {
            return Ok(StockReservation::Missing);
        };
        let levels = stocked.levels();
        let Some(held) = levels.reserve(quantity) else {
            return Ok(StockReservation::Insufficient {
                available: levels.available(),
            });
        };
        stocked.apply(held);
        Ok(StockReservation::Reserved(stocked.product.clone()))
    }

    async fn release_stock(
        &self,
        id: &ProductId,
        quantity: u32,
    ) -> Result<(), ProductRepositoryError> {
        self.adjust(id, |levels| levels.release(quantity));
        Ok(())
    }

    async fn settle_stock(
        &self,
        id: &ProductId,
        quantity: u32,
    ) -> Result<(), ProductRepositoryError> {
        self.adjust(id, |levels| levels.settle(quantity));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use chrono::Duration;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{Money, ProductDraft};

    fn product(title: &str, price: f64, inventory: i64, minutes: i64) -> Product {
        let at = DateTime::<Utc>::UNIX_EPOCH + Duration::minutes(minutes);
        Product::new(
            ProductId::random(),
            ProductDetails::new(ProductDraft {
                title: title.into(),
                description: "desc".into(),
                price: Money::from_major(price).expect("valid price"),
                inventory,
                image: "img.png".into(),
                variants: None,
            })
            .expect("valid draft"),
            at,
            at,
        )
    }

    #[fixture]
    async fn seeded() -> InMemoryProductRepository {
        let repo = InMemoryProductRepository::new();
        for (index, (title, price)) in [("Mouse", 20.0), ("Keyboard", 45.0), ("Mouse Pad", 8.0)]
            .into_iter()
            .enumerate()
        {
            let minutes = i64::try_from(index).expect("small index");
            repo.insert(&product(title, price, 3, minutes))
                .await
                .expect("insert");
        }
        repo
    }

    #[rstest]
    #[tokio::test]
    async fn list_orders_newest_first_and_filters(#[future] seeded: InMemoryProductRepository) {
        let repo = seeded.await;
        let filter = ProductFilter {
            title: Some("mouse".into()),
            ..ProductFilter::default()
        };
        let page = repo
            .list(&filter, PageRequest::default())
            .await
            .expect("list");

        let titles: Vec<_> = page
            .items()
            .iter()
            .map(|p| p.details().title().to_owned())
            .collect();
        assert_eq!(titles, vec!["Mouse Pad", "Mouse"]);
        assert_eq!(page.total(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn list_windows_results(#[future] seeded: InMemoryProductRepository) {
        let repo = seeded.await;
        let request = PageRequest::new(Some(2), Some(2)).expect("valid window");
        let page = repo
            .list(&ProductFilter::default(), request)
            .await
            .expect("list");

        assert_eq!(page.count(), 1);
        assert_eq!(page.total(), 3);
        assert_eq!(page.pages(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn reserve_reports_shortfall_and_missing() {
        let repo = InMemoryProductRepository::new();
        let item = product("Mouse", 20.0, 2, 0);
        repo.insert(&item).await.expect("insert");

        let short = repo.reserve_stock(&item.id(), 3).await.expect("reserve");
        assert_eq!(short, StockReservation::Insufficient { available: 2 });

        let missing = repo
            .reserve_stock(&ProductId::random(), 1)
            .await
            .expect("reserve");
        assert_eq!(missing, StockReservation::Missing);
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reservations_never_oversell() {
        let repo = Arc::new(InMemoryProductRepository::new());
        let item = product("Mouse", 20.0, 5, 0);
        repo.insert(&item).await.expect("insert");

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let repo = Arc::clone(&repo);
                let id = item.id();
                tokio::spawn(async move { repo.reserve_stock(&id, 1).await })
            })
            .collect();
        let mut reserved = 0;
        for handle in handles {
            if let StockReservation::Reserved(_) = handle.await.expect("join").expect("reserve") {
                reserved += 1;
            }
        }

        assert_eq!(reserved, 5);
        let stored = repo
            .find_by_id(&item.id())
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.details().inventory(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn release_restores_inventory() {
        let repo = InMemoryProductRepository::new();
        let item = product("Mouse", 20.0, 2, 0);
        repo.insert(&item).await.expect("insert");

        repo.reserve_stock(&item.id(), 2).await.expect("reserve");
        repo.release_stock(&item.id(), 2).await.expect("release");

        let stored = repo
            .find_by_id(&item.id())
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.details().inventory(), 2);
    }

    #[rstest]
    #[case::declined(false, 5)]
    #[case::approved(true, 3)]
    #[tokio::test]
    async fn replace_during_a_hold_sets_on_hand_stock(
        #[case] approved: bool,
        #[case] expected: u32,
    ) {
        let repo = InMemoryProductRepository::new();
        let item = product("Mouse", 20.0, 2, 0);
        repo.insert(&item).await.expect("insert");
        repo.reserve_stock(&item.id(), 2).await.expect("reserve");

        let restocked = repo
            .replace(
                &item.id(),
                &product("Mouse", 20.0, 5, 0).details().clone(),
                Utc::now(),
            )
            .await
            .expect("replace")
            .expect("present");
        assert_eq!(restocked.details().inventory(), 3);

        if approved {
            repo.settle_stock(&item.id(), 2).await.expect("settle");
        } else {
            repo.release_stock(&item.id(), 2).await.expect("release");
        }

        let stored = repo
            .find_by_id(&item.id())
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.details().inventory(), expected);
    }
}
