//! Get Inventory Handler

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use stockroom_app::domain::inventory::models::InventoryView;

use crate::{extensions::*, inventory::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InventoryResponse {
    /// The product the stock belongs to
    pub product_id: i64,

    /// Units currently in stock
    pub quantity: u64,

    /// When the stock last changed
    pub updated_at: String,
}

impl From<InventoryView> for InventoryResponse {
    fn from(view: InventoryView) -> Self {
        InventoryResponse {
            product_id: view.product_id.into_inner(),
            quantity: view.quantity,
            updated_at: view.updated_at.to_string(),
        }
    }
}

/// Get Inventory Handler
///
/// Returns the current stock of a product. May be served from cache.
#[endpoint(
    tags("inventory"),
    summary = "Get Inventory",
    responses(
        (status_code = StatusCode::OK, description = "Current stock"),
        (status_code = StatusCode::BAD_REQUEST, description = "Malformed product id"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Temporarily unavailable"),
    ),
)]
pub(crate) async fn handler(
    product_id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<InventoryResponse>, StatusError> {
    let product = product_id.into_product_id()?;

    let view = depot
        .state_or_500()?
        .app
        .inventory
        .get_inventory(product)
        .await
        .map_err(into_status_error)?;

    Ok(Json(view.into()))
}
