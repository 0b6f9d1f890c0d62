use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// `?page=` (1-based) and `?page_size=` query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct Pagination {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl Pagination {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size())
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * i64::from(self.page_size())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Paginated<T> {
    pub count: i64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(count: i64, pagination: &Pagination, results: Vec<T>) -> Self {
        Self {
            count,
            page: pagination.page(),
            page_size: pagination.page_size(),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Pagination::default();
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(p.limit(), 20);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_offset_math() {
        let p = Pagination {
            page: Some(3),
            page_size: Some(25),
        };
        assert_eq!(p.limit(), 25);
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn test_bounds_clamped() {
        let p = Pagination {
            page: Some(0),
            page_size: Some(0),
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), 1);

        let p = Pagination {
            page: None,
            page_size: Some(10_000),
        };
        assert_eq!(p.page_size(), MAX_PAGE_SIZE);
    }
}
