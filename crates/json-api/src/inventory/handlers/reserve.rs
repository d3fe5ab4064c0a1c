//! Reserve Inventory Handler

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use stockroom_app::domain::{inventory::models::Reservation, products::models::ProductId};

use crate::{
    extensions::*,
    inventory::errors::{into_status_error, outcome_of},
    observability::{ReservationOutcome, observe_reservation},
};

/// Reserve Inventory Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReserveRequest {
    pub product_id: i64,
    pub quantity: i64,
}

/// Reservation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReservationResponse {
    /// The product reserved
    pub product_id: i64,

    /// Units taken out of stock
    pub reserved: u64,

    /// Units left after the reservation
    pub remaining: u64,
}

/// Reserve Inventory Handler
///
/// Takes units of a product out of stock. Never sells more than is in stock.
#[endpoint(
    tags("inventory"),
    summary = "Reserve Inventory",
    responses(
        (status_code = StatusCode::OK, description = "Stock reserved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid input or insufficient stock"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::CONFLICT, description = "Concurrent update, the request may be retried"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Temporarily unavailable"),
    ),
)]
#[instrument(skip_all)]
pub(crate) async fn handler(
    json: JsonBody<ReserveRequest>,
    depot: &mut Depot,
) -> Result<Json<ReservationResponse>, StatusError> {
    let request = json.into_inner();

    let product = ProductId::new(request.product_id)
        .or_400("product_id must be a positive integer")
        .inspect_err(|_rejected| observe_reservation(ReservationOutcome::Rejected))?;

    let outcome = depot
        .state_or_500()?
        .app
        .inventory
        .reserve_inventory(product, request.quantity)
        .await
        .map_err(|error| {
            observe_reservation(outcome_of(&error));

            into_status_error(error)
        })?;

    match outcome {
        Reservation::Reserved {
            product_id,
            reserved,
            remaining,
        } => {
            observe_reservation(ReservationOutcome::Reserved);

            Ok(Json(ReservationResponse {
                product_id: product_id.into_inner(),
                reserved,
                remaining,
            }))
        }
        Reservation::InsufficientStock {
            requested,
            available,
            ..
        } => {
            observe_reservation(ReservationOutcome::InsufficientStock);

            Err(StatusError::bad_request()
                .brief("Insufficient stock")
                .detail(format!("requested {requested}, available {available}")))
        }
    }
}
