//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use stockroom_app::domain::products::ProductsServiceError;

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::InvalidInput(message) => StatusError::bad_request()
            .brief("Invalid product request")
            .detail(message),
        ProductsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid product payload")
        }
        ProductsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Product already exists")
        }
        ProductsServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        ProductsServiceError::Sql(source) => {
            error!("product storage failed: {source}");

            StatusError::service_unavailable().brief("Temporarily unavailable, try again later")
        }
        ProductsServiceError::OutOfRange(source) => {
            error!("product value out of range: {source}");

            StatusError::internal_server_error()
        }
    }
}
