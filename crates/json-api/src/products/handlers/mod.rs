//! Product Handlers

pub(crate) mod search;
