//! Products

pub mod errors;
pub mod models;
mod repository;
pub mod search;
pub mod service;

pub use errors::ProductsServiceError;
pub use service::*;
