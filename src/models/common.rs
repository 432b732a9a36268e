//! Shared wire types: pages and error payloads.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One page of results, as returned by the backend's paged endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page
    #[serde(default)]
    pub content: Vec<T>,
    /// Total number of items across all pages
    #[serde(default)]
    pub total_elements: u64,
    /// Total number of pages
    #[serde(default)]
    pub total_pages: u32,
    /// Zero-based index of this page
    #[serde(default)]
    pub number: u32,
    /// Requested page size
    #[serde(default)]
    pub size: u32,
}

impl<T> Page<T> {
    /// Build a page from its parts. Mostly useful in tests and benches.
    pub fn new(content: Vec<T>, number: u32, size: u32, total_elements: u64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            total_elements.div_ceil(u64::from(size)) as u32
        };
        Self {
            content,
            total_elements,
            total_pages,
            number,
            size,
        }
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// One-based page number for display. Widened so the last `u32` page
    /// still has a successor.
    pub fn display_number(&self) -> u64 {
        u64::from(self.number) + 1
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    pub fn has_next(&self) -> bool {
        self.display_number() < u64::from(self.total_pages)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.content.iter()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            number: 0,
            size: 0,
        }
    }
}

/// Page coordinates sent as `?page=&size=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Query-string pairs for this page.
    pub fn query(&self) -> [(&'static str, String); 2] {
        [("page", self.page.to_string()), ("size", self.size.to_string())]
    }

    /// The page after this one.
    pub fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self
        }
    }

    /// The page before this one, saturating at zero.
    pub fn previous(self) -> Self {
        Self {
            page: self.page.saturating_sub(1),
            ..self
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: crate::DEFAULT_PAGE_SIZE,
        }
    }
}

/// Error payload produced by the backend's exception handlers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: Option<String>,
    pub message: Option<String>,
    pub path: Option<String>,
    pub timestamp: Option<String>,
    pub validation_errors: Option<HashMap<String, String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_navigation_flags() {
        let first: Page<u8> = Page::new(vec![1, 2, 3], 0, 3, 7);
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_previous());
        assert!(first.has_next());
        assert_eq!(first.display_number(), 1);

        let last: Page<u8> = Page::new(vec![7], 2, 3, 7);
        assert!(last.has_previous());
        assert!(!last.has_next());
    }

    #[test]
    fn test_page_decodes_with_missing_fields() {
        let page: Page<serde_json::Value> =
            serde_json::from_str(r#"{"content":[{"id":"a"}],"totalElements":1}"#).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_page_request_moves() {
        let request = PageRequest::new(0, 10);
        assert_eq!(request.previous().page, 0);
        assert_eq!(request.next().page, 1);
        assert_eq!(PageRequest::new(u32::MAX, 10).next().page, u32::MAX);
        assert_eq!(request.query()[1], ("size", "10".to_string()));
    }
}
