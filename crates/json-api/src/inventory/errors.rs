//! Inventory Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use stockroom_app::domain::inventory::InventoryServiceError;

use crate::observability::ReservationOutcome;

pub(crate) fn into_status_error(error: InventoryServiceError) -> StatusError {
    match error {
        InventoryServiceError::InvalidInput(message) => StatusError::bad_request()
            .brief("Invalid inventory request")
            .detail(message),
        InventoryServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        InventoryServiceError::Conflict(source) => {
            warn!("inventory transaction conflict: {source}");

            StatusError::conflict().brief("Inventory is busy, retry the request")
        }
        InventoryServiceError::Unavailable(source) => {
            error!("inventory storage unavailable: {source}");

            StatusError::service_unavailable().brief("Temporarily unavailable, try again later")
        }
    }
}

pub(crate) fn outcome_of(error: &InventoryServiceError) -> ReservationOutcome {
    match error {
        InventoryServiceError::InvalidInput(_) => ReservationOutcome::Rejected,
        InventoryServiceError::NotFound => ReservationOutcome::NotFound,
        InventoryServiceError::Conflict(_) => ReservationOutcome::Conflict,
        InventoryServiceError::Unavailable(_) => ReservationOutcome::Unavailable,
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use stockroom_app::domain::inventory::{ConflictReason, StorageError};

    use super::*;

    #[test]
    fn errors_map_to_distinct_statuses() {
        let cases = [
            (
                InventoryServiceError::InvalidInput("quantity".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (InventoryServiceError::NotFound, StatusCode::NOT_FOUND),
            (
                InventoryServiceError::Conflict(StorageError::Conflict(ConflictReason::Deadlock)),
                StatusCode::CONFLICT,
            ),
            (
                InventoryServiceError::Unavailable(StorageError::Unavailable("down".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(into_status_error(error).code, expected);
        }
    }
}
