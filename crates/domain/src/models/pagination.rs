//! Page-based pagination types shared by list endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: i32 = 50;
pub const MAX_PER_PAGE: i32 = 200;

/// Pagination info carried in list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Pagination {
    pub page: i32,
    pub per_page: i32,
    pub total: i64,
    pub total_pages: i32,
}

impl Pagination {
    pub fn new(page: i32, per_page: i32, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            ((total + per_page as i64 - 1) / per_page as i64) as i32
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Clamps optional query parameters to sane page/per_page values.
pub fn clamp_page_params(page: Option<i32>, per_page: Option<i32>) -> (i32, i32) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    (page, per_page)
}

/// Computes the SQL offset for a page.
pub fn page_offset(page: i32, per_page: i32) -> i64 {
    ((page - 1) as i64) * (per_page as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(Pagination::new(1, 50, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 50, 50).total_pages, 1);
        assert_eq!(Pagination::new(1, 50, 51).total_pages, 2);
    }

    #[test]
    fn test_clamp_page_params() {
        assert_eq!(clamp_page_params(None, None), (1, DEFAULT_PER_PAGE));
        assert_eq!(clamp_page_params(Some(0), Some(0)), (1, 1));
        assert_eq!(clamp_page_params(Some(3), Some(1000)), (3, MAX_PER_PAGE));
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 50), 0);
        assert_eq!(page_offset(3, 50), 100);
    }
}
