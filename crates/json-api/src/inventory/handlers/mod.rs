//! Inventory Handlers

pub(crate) mod get;
pub(crate) mod reserve;
