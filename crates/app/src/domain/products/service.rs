//! Products service.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, info, instrument};

use crate::{
    cache::{
        BestEffortCache,
        keys::{SEARCH_PREFIX, search_key},
    },
    database::Db,
    domain::{
        inventory::PgInventoryRepository,
        products::{
            errors::ProductsServiceError,
            models::{NewProduct, Product, ProductPage, ProductSearch},
            repository::PgProductsRepository,
            search::{PageWindow, SearchRequest, contains_pattern},
        },
    },
};

/// Longest accepted product name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Products stored in `PostgreSQL`, with search pages cached.
#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    cache: BestEffortCache,
    cache_ttl: Duration,
    repository: PgProductsRepository,
    inventory: PgInventoryRepository,
}

impl PgProductsService {
    /// Keep cached search pages for `cache_ttl`.
    #[must_use]
    pub fn new(db: Db, cache: BestEffortCache, cache_ttl: Duration) -> Self {
        Self {
            db,
            cache,
            cache_ttl,
            repository: PgProductsRepository::new(),
            inventory: PgInventoryRepository::new(),
        }
    }
}

/// Trim and check a new product before it reaches the database.
pub(crate) fn validate(product: NewProduct) -> Result<NewProduct, ProductsServiceError> {
    let name = product.name.trim();

    if name.is_empty() {
        return Err(ProductsServiceError::InvalidInput(
            "name must not be empty".to_string(),
        ));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ProductsServiceError::InvalidInput(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }

    if product.initial_quantity < 0 {
        return Err(ProductsServiceError::InvalidInput(format!(
            "initial quantity must not be negative, got {}",
            product.initial_quantity
        )));
    }

    Ok(NewProduct {
        name: name.to_string(),
        ..product
    })
}

#[async_trait]
impl ProductsService for PgProductsService {
    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        let product = validate(product)?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self
            .repository
            .create_product(&mut tx, &product.name, &product.description, product.price)
            .await?;

        self.inventory
            .create_inventory(&mut tx, created.id, product.initial_quantity)
            .await?;

        tx.commit().await?;

        info!(product_id = %created.id, quantity = product.initial_quantity, "product created");

        self.cache.delete_prefix(SEARCH_PREFIX).await;

        Ok(created)
    }

    #[instrument(skip(self))]
    async fn search_products(
        &self,
        search: ProductSearch,
    ) -> Result<ProductPage, ProductsServiceError> {
        let request = SearchRequest::try_from(search)?;
        let key = search_key(&request.query, request.page, request.per_page);

        if let Some(page) = self.cache.get_json::<ProductPage>(&key).await {
            debug!("search cache hit");

            return Ok(page);
        }

        let pattern = contains_pattern(&request.query);

        let mut tx = self.db.begin_transaction().await?;

        let total_items = u64::try_from(self.repository.count_products(&mut *tx, &pattern).await?)?;
        let window = PageWindow::locate(request.page, request.per_page, total_items);

        let products = self
            .repository
            .search_products(
                &mut *tx,
                &pattern,
                i64::from(window.limit),
                i64::try_from(window.offset)?,
            )
            .await?;

        tx.commit().await?;

        let page = ProductPage {
            products,
            current_page: window.current_page,
            total_pages: window.total_pages,
            total_items,
        };

        self.cache.set_json(&key, &page, self.cache_ttl).await;

        Ok(page)
    }
}

/// Product operations offered to request adapters.
#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Creates a product together with its inventory row.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Case-insensitive name search, one page at a time.
    async fn search_products(
        &self,
        search: ProductSearch,
    ) -> Result<ProductPage, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::inventory::{InventoryService, storage::InventoryStorage},
        test::TestContext,
    };

    use super::*;

    fn new_product(name: &str, initial_quantity: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: String::new(),
            price: 1999,
            initial_quantity,
        }
    }

    #[test]
    fn validate_trims_name() -> TestResult {
        let product = validate(new_product("  Widget  ", 3))?;

        assert_eq!(product.name, "Widget");

        Ok(())
    }

    #[test]
    fn validate_rejects_blank_and_overlong_names() {
        let overlong = "x".repeat(MAX_NAME_LENGTH + 1);

        for name in ["", "   ", overlong.as_str()] {
            assert!(
                matches!(
                    validate(new_product(name, 0)),
                    Err(ProductsServiceError::InvalidInput(_))
                ),
                "name {name:?} should be rejected"
            );
        }
    }

    #[test]
    fn validate_rejects_negative_initial_quantity() {
        assert!(matches!(
            validate(new_product("Widget", -1)),
            Err(ProductsServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn create_product_creates_inventory_row() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.products.create_product(new_product("Widget", 12)).await?;
        let record = ctx.storage.get_inventory(product.id).await?;

        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, 1999);
        assert_eq!(record.quantity, 12);

        Ok(())
    }

    #[tokio::test]
    async fn search_matches_case_insensitively_and_paginates() -> TestResult {
        let ctx = TestContext::new().await;

        for name in ["Blue Widget", "Red widget", "Gadget", "WIDGET XL"] {
            ctx.products.create_product(new_product(name, 1)).await?;
        }

        let page = ctx
            .products
            .search_products(ProductSearch {
                query: "widget".to_string(),
                page: Some(2),
                per_page: Some(2),
            })
            .await?;

        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.products.len(), 1);
        assert_eq!(
            page.products.first().map(|p| p.name.as_str()),
            Some("WIDGET XL")
        );

        Ok(())
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.products.create_product(new_product("100% Cotton", 1)).await?;
        ctx.products.create_product(new_product("100 Cotton", 1)).await?;

        let page = ctx
            .products
            .search_products(ProductSearch {
                query: "100%".to_string(),
                ..ProductSearch::default()
            })
            .await?;

        assert_eq!(page.total_items, 1);
        assert_eq!(
            page.products.first().map(|p| p.name.as_str()),
            Some("100% Cotton")
        );

        Ok(())
    }

    #[tokio::test]
    async fn search_reflects_reservations() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.products.create_product(new_product("Widget", 5)).await?;

        let search = ProductSearch {
            query: "widget".to_string(),
            ..ProductSearch::default()
        };

        let before = ctx.products.search_products(search.clone()).await?;

        assert_eq!(before.products.first().map(|p| p.inventory), Some(5));

        ctx.inventory.reserve_inventory(product.id, 2).await?;

        let after = ctx.products.search_products(search).await?;

        assert_eq!(after.products.first().map(|p| p.inventory), Some(3));

        Ok(())
    }
}
