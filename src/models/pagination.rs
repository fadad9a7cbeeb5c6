//! `page` / `per_page` query parameters and the list envelope.

use serde::{Deserialize, Serialize};

const DEFAULT_PER_PAGE: i64 = 20;
const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    /// 1-based page number; anything below 1 reads as the first page.
    pub fn current_page(&self) -> i64 {
        self.page.map_or(1, |p| p.max(1))
    }

    pub fn limit(&self) -> i64 {
        self.per_page
            .map_or(DEFAULT_PER_PAGE, |n| n.clamp(1, MAX_PER_PAGE))
    }

    pub fn offset(&self) -> i64 {
        (self.current_page() - 1).saturating_mul(self.limit())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T: Serialize> PagedResult<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: &Pagination) -> Self {
        let per_page = pagination.limit();
        Self {
            items,
            total,
            page: pagination.current_page(),
            per_page,
            total_pages: (total.max(0) + per_page - 1) / per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        let p = Pagination::default();
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.limit(), 20);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn per_page_is_clamped() {
        assert_eq!(Pagination::new(1, 1000).limit(), 100);
        assert_eq!(Pagination::new(1, 0).limit(), 1);
    }

    #[test]
    fn negative_page_reads_as_first() {
        let p = Pagination::new(-3, 10);
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(Pagination::new(4, 15).offset(), 45);
    }

    #[test]
    fn total_pages_rounds_up_and_handles_empty() {
        let p = Pagination::new(2, 10);
        let result = PagedResult::new(vec!["Gol", "Uno"], 12, &p);
        assert_eq!(result.total_pages, 2);
        assert_eq!(result.page, 2);

        let empty = PagedResult::<&str>::new(vec![], 0, &p);
        assert_eq!(empty.total_pages, 0);
    }
}
