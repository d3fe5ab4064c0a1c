//! Product ID path parameter parsing.

use salvo::{oapi::extract::PathParam, prelude::StatusError};
use stockroom_app::domain::products::models::ProductId;

use crate::extensions::*;

pub(crate) trait ProductIdExt {
    fn into_product_id(self) -> Result<ProductId, StatusError>;
}

impl ProductIdExt for PathParam<String> {
    fn into_product_id(self) -> Result<ProductId, StatusError> {
        self.into_inner()
            .parse::<ProductId>()
            .or_400("product id must be a positive integer")
    }
}
