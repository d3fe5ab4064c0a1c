//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgExecutor, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

use crate::domain::products::models::{Product, ProductId, ProductSummary};

const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const COUNT_PRODUCTS_SQL: &str = include_str!("sql/count_products.sql");
const SEARCH_PRODUCTS_SQL: &str = include_str!("sql/search_products.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        description: &str,
        price: u64,
    ) -> Result<Product, sqlx::Error> {
        let price_i64 = i64::try_from(price).map_err(|e| sqlx::Error::ColumnDecode {
            index: "price".to_string(),
            source: Box::new(e),
        })?;

        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(name)
            .bind(description)
            .bind(price_i64)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn count_products<'c>(
        &self,
        executor: impl PgExecutor<'c>,
        pattern: &str,
    ) -> Result<i64, sqlx::Error> {
        query_scalar::<Postgres, i64>(COUNT_PRODUCTS_SQL)
            .bind(pattern)
            .fetch_one(executor)
            .await
    }

    pub(crate) async fn search_products<'c>(
        &self,
        executor: impl PgExecutor<'c>,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductSummary>, sqlx::Error> {
        query_as::<Postgres, ProductSummary>(SEARCH_PRODUCTS_SQL)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }
}

fn unsigned(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let value: i64 = row.try_get(column)?;

    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: ProductId::from_db(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: unsigned(row, "price")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProductSummary {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: ProductId::from_db(row.try_get("id")?),
            name: row.try_get("name")?,
            price: unsigned(row, "price")?,
            inventory: unsigned(row, "inventory")?,
        })
    }
}
