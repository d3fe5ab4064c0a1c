//! Cache key namespace.
//!
//! Other components share this namespace: anything caching a view that embeds
//! stock counts must live under [`SEARCH_PREFIX`] so reservations can drop it.

use std::fmt::Display;

/// Prefix of single-record inventory views.
pub const INVENTORY_PREFIX: &str = "inventory:";

/// Prefix of cached product search pages.
pub const SEARCH_PREFIX: &str = "search:";

/// `inventory:{product_id}`
pub fn inventory_key(product: impl Display) -> String {
    format!("{INVENTORY_PREFIX}{product}")
}

/// `search:{query}:{page}:{per_page}`
pub fn search_key(query: &str, page: u32, per_page: u32) -> String {
    format!("{SEARCH_PREFIX}{query}:{page}:{per_page}")
}
