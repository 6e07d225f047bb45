// file: src/models/search_result.rs
// description: Paged result view over engine hits
// reference: Used for paginated paragraph listings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items on the current page
    pub items: Vec<T>,

    /// 1-based page number
    pub page: usize,

    pub page_size: usize,

    /// Total matches reported by the engine
    pub total_count: u64,

    pub page_count: u64,
}

impl<T> PagedResult<T> {
    /// Create a new paged result
    pub fn new(items: Vec<T>, page: usize, page_size: usize, total_count: u64) -> Self {
        let page_count = if page_size == 0 {
            0
        } else {
            total_count.div_ceil(page_size as u64)
        };

        Self {
            items,
            page,
            page_size,
            total_count,
            page_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    pub fn has_next(&self) -> bool {
        (self.page as u64) < self.page_count
    }

    /// Convert items while keeping the pagination data
    pub fn map<U, F>(self, f: F) -> PagedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            page_count: self.page_count,
        }
    }

    /// 1-based position of the first item on this page
    pub fn first_position(&self) -> usize {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .saturating_add(1)
    }

    /// Format as a summary line for display
    pub fn format_summary(&self) -> String {
        if self.is_empty() {
            return "Nothing found".to_string();
        }

        let first = self.first_position();
        let last = first.saturating_add(self.items.len().saturating_sub(1));
        format!(
            "Showing {}-{} of {} (page {} of {})",
            first, last, self.total_count, self.page, self.page_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        let result = PagedResult::new(vec![1, 2, 3], 1, 20, 41);
        assert_eq!(result.page_count, 3);
        assert!(result.has_next());

        let last = PagedResult::new(vec![1], 3, 20, 41);
        assert!(!last.has_next());
    }

    #[test]
    fn test_empty_result() {
        let result: PagedResult<u8> = PagedResult::new(vec![], 1, 20, 0);
        assert!(result.is_empty());
        assert_eq!(result.page_count, 0);
        assert_eq!(result.format_summary(), "Nothing found");
    }

    #[test]
    fn test_map_keeps_pagination() {
        let result = PagedResult::new(vec![1, 2], 2, 2, 5).map(|n| n * 10);
        assert_eq!(result.items, vec![10, 20]);
        assert_eq!(result.page, 2);
        assert_eq!(result.page_count, 3);
        assert_eq!(result.format_summary(), "Showing 3-4 of 5 (page 2 of 3)");
    }

    #[test]
    fn test_summary_of_out_of_range_page() {
        let result = PagedResult::new(vec![1], usize::MAX, 20, 5);
        assert_eq!(result.first_position(), usize::MAX);
        assert!(result.format_summary().starts_with(&format!("Showing {}-", usize::MAX)));

        let zero: PagedResult<u8> = PagedResult::new(vec![7], 0, 20, 1);
        assert_eq!(zero.first_position(), 1);
    }
}
