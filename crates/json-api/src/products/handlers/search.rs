//! Product Search Handler

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use stockroom_app::domain::products::models::{ProductPage, ProductSearch, ProductSummary};

use crate::{extensions::*, products::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductSummaryResponse {
    /// The product's ID
    pub id: i64,

    /// The product's name
    pub name: String,

    /// Price in minor currency units
    pub price: u64,

    /// Units currently in stock
    pub inventory: u64,
}

impl From<ProductSummary> for ProductSummaryResponse {
    fn from(summary: ProductSummary) -> Self {
        ProductSummaryResponse {
            id: summary.id.into_inner(),
            name: summary.name,
            price: summary.price,
            inventory: summary.inventory,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductPageResponse {
    /// Matching products on this page
    pub products: Vec<ProductSummaryResponse>,

    /// The page returned, starting at 1
    pub current_page: u32,

    /// Number of pages for this query
    pub total_pages: u32,

    /// Number of products matching the query
    pub total_items: u64,
}

impl From<ProductPage> for ProductPageResponse {
    fn from(page: ProductPage) -> Self {
        ProductPageResponse {
            products: page.products.into_iter().map(Into::into).collect(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_items: page.total_items,
        }
    }
}

/// Product Search Handler
///
/// Case-insensitive substring search over product names, one page at a time.
#[endpoint(
    tags("products"),
    summary = "Search Products",
    responses(
        (status_code = StatusCode::OK, description = "One page of matches"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid paging parameters"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Temporarily unavailable"),
    ),
)]
pub(crate) async fn handler(
    query: QueryParam<String, false>,
    page: QueryParam<i64, false>,
    per_page: QueryParam<i64, false>,
    depot: &mut Depot,
) -> Result<Json<ProductPageResponse>, StatusError> {
    let search = ProductSearch {
        query: query.into_inner().unwrap_or_default(),
        page: page.into_inner(),
        per_page: per_page.into_inner(),
    };

    let page = depot
        .state_or_500()?
        .app
        .products
        .search_products(search)
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use stockroom_app::domain::products::{
        MockProductsService, ProductsServiceError, models::ProductId,
    };

    use crate::test_helpers::products_service;

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        products_service(products, Router::with_path("products/search").get(handler))
    }

    #[tokio::test]
    async fn search_passes_parameters_and_returns_page() -> TestResult {
        let widget = ProductId::new(3)?;

        let mut products = MockProductsService::new();

        products
            .expect_search_products()
            .once()
            .withf(|search| {
                search.query == "wid" && search.page == Some(2) && search.per_page == Some(1)
            })
            .return_once(move |_| {
                Ok(ProductPage {
                    products: vec![ProductSummary {
                        id: widget,
                        name: "Widget".to_string(),
                        price: 1_999,
                        inventory: 4,
                    }],
                    current_page: 2,
                    total_pages: 3,
                    total_items: 3,
                })
            });

        products.expect_create_product().never();

        let response: ProductPageResponse =
            TestClient::get("http://example.com/products/search?query=wid&page=2&per_page=1")
                .send(&make_service(products))
                .await
                .take_json()
                .await?;

        assert_eq!(response.current_page, 2);
        assert_eq!(response.total_pages, 3);
        assert_eq!(response.total_items, 3);
        assert_eq!(response.products.len(), 1);
        assert_eq!(
            response.products.first().map(|p| (p.id, p.inventory)),
            Some((3, 4))
        );

        Ok(())
    }

    #[tokio::test]
    async fn missing_parameters_use_defaults() {
        let mut products = MockProductsService::new();

        products
            .expect_search_products()
            .once()
            .withf(|search| *search == ProductSearch::default())
            .return_once(|_| {
                Ok(ProductPage {
                    products: vec![],
                    current_page: 1,
                    total_pages: 1,
                    total_items: 0,
                })
            });

        products.expect_create_product().never();

        let res = TestClient::get("http://example.com/products/search")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn invalid_paging_returns_400() {
        let mut products = MockProductsService::new();

        products
            .expect_search_products()
            .once()
            .return_once(|_| {
                Err(ProductsServiceError::InvalidInput(
                    "per_page must be between 1 and 100, got 0".to_string(),
                ))
            });

        products.expect_create_product().never();

        let res = TestClient::get("http://example.com/products/search?per_page=0")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn non_numeric_page_returns_400_without_calling_the_service() {
        let mut products = MockProductsService::new();

        products.expect_search_products().never();
        products.expect_create_product().never();

        let res = TestClient::get("http://example.com/products/search?page=two")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
