//! Offset pagination shared by every list endpoint

use serde::{Deserialize, Serialize};

/// Page size used when resolving names and walking full listings
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Request for one page of a list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Number of items to skip
    pub offset: u32,
    /// Maximum number of items to return
    pub page_size: u32,
}

impl PageRequest {
    /// First page with the given size
    pub fn new(page_size: u32) -> Self {
        Self {
            offset: 0,
            page_size: page_size.max(1),
        }
    }

    /// The page following this one
    pub fn next(self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.page_size),
            ..self
        }
    }

    /// Query parameters understood by the platform
    pub fn query(&self) -> [(&'static str, String); 2] {
        [
            ("pageOffset", self.offset.to_string()),
            ("pageSize", self.page_size.to_string()),
        ]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_item_count: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            total_item_count: None,
        }
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total_item_count = Some(total);
        self
    }

    /// Whether another page should be requested after `request`
    ///
    /// An empty page always ends the walk. With a known total, more pages
    /// exist while fewer items than the total have been seen; without one,
    /// a full page suggests there may be more.
    pub fn has_more(&self, request: &PageRequest) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let seen = u64::from(request.offset) + self.items.len() as u64;
        match self.total_item_count {
            Some(total) => seen < total,
            None => self.items.len() as u64 >= u64::from(request.page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_sequence() {
        let first = PageRequest::new(2);
        let second = first.next();
        assert_eq!(second.offset, 2);
        assert_eq!(second.next().offset, 4);
        assert_eq!(PageRequest::new(0).page_size, 1);
    }

    #[test]
    fn test_query_params() {
        let request = PageRequest::new(50).next();
        assert_eq!(
            request.query(),
            [("pageOffset", "50".to_string()), ("pageSize", "50".to_string())]
        );
    }

    #[test]
    fn test_has_more_with_total() {
        let request = PageRequest::new(2);
        assert!(Page::new(vec![1, 2]).with_total(5).has_more(&request));
        assert!(!Page::new(vec![1, 2]).with_total(2).has_more(&request));
        assert!(!Page::new(vec![5]).with_total(5).has_more(&request.next().next()));
    }

    #[test]
    fn test_has_more_without_total() {
        let request = PageRequest::new(2);
        assert!(Page::new(vec![1, 2]).has_more(&request));
        assert!(!Page::new(vec![1]).has_more(&request));
    }

    #[test]
    fn test_empty_page_ends_walk() {
        let page: Page<u8> = Page::new(Vec::new()).with_total(100);
        assert!(!page.has_more(&PageRequest::new(10)));
    }

    #[test]
    fn test_page_deserialization() {
        let page: Page<String> =
            serde_json::from_str(r#"{"items": ["a", "b"], "totalItemCount": 7}"#).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_item_count, Some(7));

        let page: Page<String> = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
    }
}
