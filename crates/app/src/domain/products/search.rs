//! Search normalisation and pagination.

use crate::domain::products::{errors::ProductsServiceError, models::ProductSearch};

/// Page size when the request names none.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Largest accepted page size.
pub const MAX_PER_PAGE: u32 = 100;

/// A search request with its page size validated and page number floored at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Trimmed search text.
    pub query: String,

    /// Requested page, at least 1.
    pub page: u32,

    /// Page size within `1..=MAX_PER_PAGE`.
    pub per_page: u32,
}

impl TryFrom<ProductSearch> for SearchRequest {
    type Error = ProductsServiceError;

    fn try_from(search: ProductSearch) -> Result<Self, Self::Error> {
        let per_page = match search.per_page {
            None => DEFAULT_PER_PAGE,
            Some(per_page) => u32::try_from(per_page)
                .ok()
                .filter(|per_page| (1..=MAX_PER_PAGE).contains(per_page))
                .ok_or_else(|| {
                    ProductsServiceError::InvalidInput(format!(
                        "per_page must be between 1 and {MAX_PER_PAGE}, got {per_page}"
                    ))
                })?,
        };

        let page = search
            .page
            .map_or(1, |page| u32::try_from(page.max(1)).unwrap_or(u32::MAX));

        Ok(Self {
            query: search.query.trim().to_string(),
            page,
            per_page,
        })
    }
}

/// Where a page falls once the total number of matches is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// The page actually served.
    pub current_page: u32,

    /// Number of pages; at least 1.
    pub total_pages: u32,

    /// Rows to skip.
    pub offset: u64,

    /// Rows to fetch.
    pub limit: u32,
}

impl PageWindow {
    /// Clamp `page` into `1..=total_pages`. No matches still yields one empty page.
    #[must_use]
    pub fn locate(page: u32, per_page: u32, total_items: u64) -> Self {
        let per_page = per_page.max(1);

        let total_pages = total_items
            .div_ceil(u64::from(per_page))
            .max(1)
            .try_into()
            .unwrap_or(u32::MAX);

        let current_page = page.clamp(1, total_pages);

        Self {
            current_page,
            total_pages,
            offset: u64::from(current_page - 1) * u64::from(per_page),
            limit: per_page,
        }
    }
}

/// `ILIKE` pattern matching `query` anywhere, with its own wildcards taken literally.
#[must_use]
pub fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);

    pattern.push('%');

    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }

        pattern.push(c);
    }

    pattern.push('%');

    pattern
}
