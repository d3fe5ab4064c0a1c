//! Stockroom Domain Concerns

pub mod inventory;
pub mod products;
