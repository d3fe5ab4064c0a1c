//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};

use stockroom_app::{
    context::AppContext,
    domain::{
        inventory::{InventoryService, MockInventoryService},
        products::{MockProductsService, ProductsService},
    },
};

use crate::state::State;

fn strict_inventory_mock() -> MockInventoryService {
    let mut inventory = MockInventoryService::new();

    inventory.expect_get_inventory().never();
    inventory.expect_reserve_inventory().never();

    inventory
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_create_product().never();
    products.expect_search_products().never();

    products
}

pub(crate) fn state(
    inventory: Arc<dyn InventoryService>,
    products: Arc<dyn ProductsService>,
) -> Arc<State> {
    State::from_app_context(AppContext {
        inventory,
        products,
    })
}

pub(crate) fn inventory_service(inventory: MockInventoryService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(
                Arc::new(inventory),
                Arc::new(strict_products_mock()),
            )))
            .push(route),
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(
                Arc::new(strict_inventory_mock()),
                Arc::new(products),
            )))
            .push(route),
    )
}
