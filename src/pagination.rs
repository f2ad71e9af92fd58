use serde::{Deserialize, Serialize};

/// Page size used when the client does not ask for one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Upper bound for client-requested page sizes.
pub const MAX_ITEMS_PER_PAGE: usize = 100;

/// Page window applied to list queries (1-based page numbers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Number of rows to skip for this page. Saturates for absurd page numbers,
    /// which then simply yield an empty page.
    pub fn offset(&self) -> i64 {
        let skipped = (self.page.max(1) - 1).saturating_mul(self.per_page);
        i64::try_from(skipped).unwrap_or(i64::MAX)
    }

    /// Number of rows to load for this page.
    pub fn limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }
}

/// `page` / `limit` query parameters accepted by every list endpoint.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl PageQuery {
    /// Resolve the requested page, clamping the page size into `1..=MAX_ITEMS_PER_PAGE`.
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page.unwrap_or(1).max(1),
            per_page: self
                .limit
                .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
                .clamp(1, MAX_ITEMS_PER_PAGE),
        }
    }
}

/// One page of results together with the information needed to navigate.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    /// Total number of items across all pages.
    pub count: usize,
    /// Current page (1-based).
    pub page: usize,
    pub total_pages: usize,
    pub items: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, count: usize, pagination: Pagination) -> Self {
        Self {
            count,
            page: pagination.page.max(1),
            total_pages: count.div_ceil(pagination.per_page.max(1)),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_defaults_and_clamps() {
        let query = PageQuery::default();
        assert_eq!(
            query.pagination(),
            Pagination {
                page: 1,
                per_page: DEFAULT_ITEMS_PER_PAGE
            }
        );

        let query = PageQuery {
            page: Some(0),
            limit: Some(10_000),
        };
        let pagination = query.pagination();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.per_page, MAX_ITEMS_PER_PAGE);
    }

    #[test]
    fn paginated_counts_pages() {
        let pagination = Pagination {
            page: 3,
            per_page: 10,
        };
        let page = Paginated::new(vec![1, 2, 3], 23, pagination);

        assert_eq!(page.count, 23);
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(pagination.offset(), 20);
        assert_eq!(pagination.limit(), 10);
    }

    #[test]
    fn huge_page_number_saturates_offset() {
        let pagination = PageQuery {
            page: Some(usize::MAX),
            limit: Some(MAX_ITEMS_PER_PAGE),
        }
        .pagination();

        assert_eq!(pagination.offset(), i64::MAX);
        assert_eq!(pagination.limit(), MAX_ITEMS_PER_PAGE as i64);

        let page = Paginated::<i32>::new(Vec::new(), 5, pagination);
        assert_eq!(page.page, usize::MAX);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn paginated_handles_empty_results() {
        let page = Paginated::<i32>::new(Vec::new(), 0, PageQuery::default().pagination());
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }
}
