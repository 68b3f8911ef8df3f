//! Page request descriptor.

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Caller-supplied paging, sorting and filtering request.
///
/// `page` and `page_size` are clamped to at least 1 on construction so the
/// derived offset can never go negative. `order_by` is only ever used as a
/// lookup key into an allow-list (see [`crate::db::SortKey`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page: i64,
    page_size: i64,
    order_by: String,
    search_text: String,
}

impl Pager {
    pub fn new(
        page: i64,
        page_size: i64,
        order_by: impl Into<String>,
        search_text: impl Into<String>,
    ) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            order_by: order_by.into(),
            search_text: search_text.into(),
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn order_by(&self) -> &str {
        &self.order_by
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Number of rows to skip before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE, "", "")
    }
}
