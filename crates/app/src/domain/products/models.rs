//! Product Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::ids::TypedId;

/// Product ID
pub type ProductId = TypedId<Product>;

/// Product Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Database identifier.
    pub id: ProductId,

    /// Display name, trimmed.
    pub name: String,

    /// Free-form description, possibly empty.
    pub description: String,

    /// Price in minor currency units.
    pub price: u64,

    /// When the product was created.
    pub created_at: Timestamp,

    /// When the product last changed.
    pub updated_at: Timestamp,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    /// Display name, at most 100 characters after trimming.
    pub name: String,

    /// Free-form description.
    pub description: String,

    /// Price in minor currency units.
    pub price: u64,

    /// Units in stock at creation; must not be negative.
    pub initial_quantity: i64,
}

/// A search hit, carrying the product's current stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Database identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Price in minor currency units.
    pub price: u64,

    /// Units currently in stock.
    pub inventory: u64,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Matches on this page, ordered by id.
    pub products: Vec<ProductSummary>,

    /// The page returned, starting at 1.
    pub current_page: u32,

    /// Number of pages; at least 1.
    pub total_pages: u32,

    /// Number of matches across all pages.
    pub total_items: u64,
}

/// Search request as received, before normalisation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductSearch {
    /// Substring to look for in product names.
    pub query: String,

    /// Requested page, 1 when absent.
    pub page: Option<i64>,

    /// Page size, 10 when absent.
    pub per_page: Option<i64>,
}
