// src/models/pagination.rs
// DOCUMENTATION: Shared pagination for listing endpoints
// PURPOSE: Clamp page/limit query values and wrap results with metadata

use serde::Serialize;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;
/// Highest page whose offset still fits in an i64
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// Normalized page request (1-based page, limit in 1..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        PageParams {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Paginated response
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    /// Items on this page
    pub data: Vec<T>,

    /// Total number of matches (regardless of pagination)
    pub total_count: i64,

    pub page: i64,
    pub limit: i64,

    /// Whether more results exist on next page
    pub has_more: bool,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total_count: i64, params: PageParams) -> Self {
        Paginated {
            data,
            total_count,
            page: params.page,
            limit: params.limit,
            has_more: total_count > params.page * params.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PageParams::new(None, None);
        assert_eq!(params, PageParams { page: 1, limit: 20 });
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(PageParams::new(Some(0), Some(0)), PageParams { page: 1, limit: 1 });
        assert_eq!(PageParams::new(Some(-3), Some(500)), PageParams { page: 1, limit: 100 });
        assert_eq!(PageParams::new(Some(3), Some(25)).offset(), 50);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let params = PageParams::new(Some(i64::MAX), Some(100));
        assert_eq!(params.page, MAX_PAGE);
        assert!(params.offset() > 0);

        let page = Paginated::new(Vec::<i64>::new(), 5, params);
        assert!(!page.has_more);
    }

    #[test]
    fn test_has_more() {
        let params = PageParams::new(Some(2), Some(10));
        assert!(Paginated::new(vec![0; 10], 21, params).has_more);
        assert!(!Paginated::new(vec![0; 10], 20, params).has_more);
    }
}
