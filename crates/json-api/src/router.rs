//! App Router

use salvo::Router;

use crate::{healthcheck, inventory, observability, products};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(
            Router::with_path("inventory")
                .push(Router::with_path("reserve").post(inventory::reserve::handler))
                .push(Router::with_path("{product_id}").get(inventory::get::handler)),
        )
        .push(Router::with_path("products/search").get(products::search::handler))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::{
        affix_state::inject,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use serde_json::json;
    use testresult::TestResult;

    use stockroom_app::{
        cache::{BestEffortCache, DEFAULT_OPERATION_TIMEOUT, MemoryStore},
        domain::{
            inventory::{CachedInventoryService, InMemoryInventoryStorage, InventorySettings},
            products::{MockProductsService, models::ProductId},
        },
    };

    use crate::{
        inventory::{get::InventoryResponse, reserve::ReservationResponse},
        test_helpers::state,
    };

    use super::*;

    fn make_service(storage: InMemoryInventoryStorage) -> Service {
        let cache = BestEffortCache::new(
            Arc::new(MemoryStore::new()),
            DEFAULT_OPERATION_TIMEOUT,
        );

        let inventory =
            CachedInventoryService::new(Arc::new(storage), cache, InventorySettings::default());

        let mut products = MockProductsService::new();

        products.expect_create_product().never();
        products.expect_search_products().never();

        Service::new(
            Router::new()
                .hoop(inject(state(Arc::new(inventory), Arc::new(products))))
                .push(app_router()),
        )
    }

    #[tokio::test]
    async fn reservations_are_visible_to_later_reads() -> TestResult {
        let storage = InMemoryInventoryStorage::new();
        storage.insert(ProductId::new(1)?, 10);

        let service = make_service(storage);

        let before: InventoryResponse = TestClient::get("http://example.com/inventory/1")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(before.quantity, 10);

        let reservation: ReservationResponse =
            TestClient::post("http://example.com/inventory/reserve")
                .json(&json!({ "product_id": 1, "quantity": 3 }))
                .send(&service)
                .await
                .take_json()
                .await?;

        assert_eq!(reservation.reserved, 3);
        assert_eq!(reservation.remaining, 7);

        let after: InventoryResponse = TestClient::get("http://example.com/inventory/1")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(after.quantity, 7);

        Ok(())
    }

    #[tokio::test]
    async fn oversized_reservation_leaves_stock_untouched() -> TestResult {
        let storage = InMemoryInventoryStorage::new();
        storage.insert(ProductId::new(1)?, 5);

        let service = make_service(storage);

        let res = TestClient::post("http://example.com/inventory/reserve")
            .json(&json!({ "product_id": 1, "quantity": 6 }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let after: InventoryResponse = TestClient::get("http://example.com/inventory/1")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(after.quantity, 5);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_and_bad_quantity_are_reported() -> TestResult {
        let storage = InMemoryInventoryStorage::new();
        storage.insert(ProductId::new(1)?, 5);

        let service = make_service(storage);

        let missing = TestClient::post("http://example.com/inventory/reserve")
            .json(&json!({ "product_id": 2, "quantity": 1 }))
            .send(&service)
            .await;

        assert_eq!(missing.status_code, Some(StatusCode::NOT_FOUND));

        let zero = TestClient::post("http://example.com/inventory/reserve")
            .json(&json!({ "product_id": 1, "quantity": 0 }))
            .send(&service)
            .await;

        assert_eq!(zero.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
