//! Inventory

pub mod errors;
mod memory;
pub mod models;
mod repository;
pub mod service;
pub mod storage;

pub use errors::{ConflictReason, InventoryServiceError, StorageError};
pub use memory::{InMemoryInventoryStorage, InMemoryTransaction};
pub(crate) use repository::PgInventoryRepository;
pub use repository::{PgInventoryStorage, PgInventoryTransaction};
pub use service::*;
