//! Inventory storage and service errors.

use std::{borrow::Cow, error::Error as StdError, num::TryFromIntError};

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// SQLSTATE raised when `lock_timeout` expires.
const LOCK_NOT_AVAILABLE: &str = "55P03";

/// SQLSTATE raised when the server breaks a deadlock.
const DEADLOCK_DETECTED: &str = "40P01";

/// SQLSTATE raised on serialization failures.
const SERIALIZATION_FAILURE: &str = "40001";

/// Why a transaction lost out to a concurrent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConflictReason {
    /// The row lock was not granted before the deadline.
    #[error("lock wait timed out")]
    LockTimeout,

    /// The database aborted this transaction to break a deadlock.
    #[error("deadlock detected")]
    Deadlock,

    /// The database could not serialize this transaction.
    #[error("serialization failure")]
    SerializationFailure,
}

/// Failures reported by an [`InventoryStorage`](super::storage::InventoryStorage).
#[derive(Debug, Error)]
pub enum StorageError {
    /// No inventory row for the product.
    #[error("inventory record not found")]
    NotFound,

    /// Lost to a concurrent transaction; retrying may succeed.
    #[error("transaction conflict: {0}")]
    Conflict(ConflictReason),

    /// A decrement used a handle from another transaction.
    #[error("inventory row is not locked by this transaction")]
    NotLocked,

    /// The stored quantity guard rejected the write.
    #[error("inventory quantity would become negative")]
    NegativeQuantity,

    /// A stored or requested quantity does not fit the target integer.
    #[error("quantity out of range")]
    QuantityOutOfRange(#[from] TryFromIntError),

    /// Connection, pool or I/O failure.
    #[error("storage unavailable")]
    Unavailable(#[source] Box<dyn StdError + Send + Sync>),
}

impl StorageError {
    /// Whether retrying the whole transaction may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<Error> for StorageError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        let code = error
            .as_database_error()
            .and_then(DatabaseError::code)
            .map(Cow::into_owned);

        match code.as_deref() {
            Some(LOCK_NOT_AVAILABLE) => return Self::Conflict(ConflictReason::LockTimeout),
            Some(DEADLOCK_DETECTED) => return Self::Conflict(ConflictReason::Deadlock),
            Some(SERIALIZATION_FAILURE) => {
                return Self::Conflict(ConflictReason::SerializationFailure);
            }
            _ => {}
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::CheckViolation) => Self::NegativeQuantity,
            _ => Self::Unavailable(Box::new(error)),
        }
    }
}

/// Failures of an [`InventoryService`](super::InventoryService) operation.
#[derive(Debug, Error)]
pub enum InventoryServiceError {
    /// The request was rejected before touching storage.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No inventory for the product.
    #[error("inventory not found")]
    NotFound,

    /// Lost to a concurrent reservation or ran past the deadline.
    #[error("transaction conflict, the request may be retried")]
    Conflict(#[source] StorageError),

    /// Storage failed in a way retrying will not fix.
    #[error("inventory storage unavailable")]
    Unavailable(#[source] StorageError),
}

impl From<StorageError> for InventoryServiceError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound => Self::NotFound,
            StorageError::Conflict(_) => Self::Conflict(error),
            StorageError::NotLocked
            | StorageError::NegativeQuantity
            | StorageError::QuantityOutOfRange(_)
            | StorageError::Unavailable(_) => Self::Unavailable(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            StorageError::from(Error::RowNotFound),
            StorageError::NotFound
        ));
    }

    #[test]
    fn pool_failures_map_to_unavailable() {
        assert!(matches!(
            StorageError::from(Error::PoolTimedOut),
            StorageError::Unavailable(_)
        ));
        assert!(matches!(
            StorageError::from(Error::Protocol("unexpected message".to_string())),
            StorageError::Unavailable(_)
        ));
    }

    #[test]
    fn service_errors_keep_the_storage_kind() {
        assert!(matches!(
            InventoryServiceError::from(StorageError::NotFound),
            InventoryServiceError::NotFound
        ));
        assert!(matches!(
            InventoryServiceError::from(StorageError::Conflict(ConflictReason::Deadlock)),
            InventoryServiceError::Conflict(_)
        ));
        assert!(matches!(
            InventoryServiceError::from(StorageError::Unavailable("down".into())),
            InventoryServiceError::Unavailable(_)
        ));
    }

    #[test]
    fn only_conflicts_are_retryable() {
        assert!(StorageError::Conflict(ConflictReason::LockTimeout).is_retryable());
        assert!(!StorageError::NotFound.is_retryable());
    }
}
