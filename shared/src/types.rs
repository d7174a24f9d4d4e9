//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Largest page the history endpoint will serve
pub const MAX_PAGE_SIZE: u32 = 500;

/// Default page size when only a page number is given
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// One page of the harvest history, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Result<Self, &'static str> {
        if page == 0 {
            return Err("page must be at least 1");
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err("page_size must be between 1 and 500");
        }
        Ok(Self { page, page_size })
    }

    /// Number of records to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offsets() {
        let first = PageRequest::new(1, 50).unwrap();
        assert_eq!(first.offset(), 0);
        assert_eq!(first.limit(), 50);

        let third = PageRequest::new(3, 20).unwrap();
        assert_eq!(third.offset(), 40);
    }

    #[test]
    fn test_page_request_bounds() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert!(PageRequest::new(1, MAX_PAGE_SIZE + 1).is_err());
        assert!(PageRequest::new(1, MAX_PAGE_SIZE).is_ok());
    }
}
