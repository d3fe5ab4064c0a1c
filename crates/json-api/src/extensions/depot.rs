//! Depot helper extensions.

use std::sync::Arc;

use salvo::prelude::{Depot, StatusError};
use tracing::error;

use crate::state::State;

/// Helpers for pulling shared state out of the depot.
pub(crate) trait DepotExt {
    /// The injected [`State`], or a logged internal server error when missing.
    fn state_or_500(&self) -> Result<&Arc<State>, StatusError>;
}

impl DepotExt for Depot {
    fn state_or_500(&self) -> Result<&Arc<State>, StatusError> {
        self.obtain::<Arc<State>>().map_err(|_missing| {
            error!("application state missing from depot");

            StatusError::internal_server_error()
        })
    }
}
