//! Offset paging shared by folder and card listings.

use serde::{Deserialize, Serialize};

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    pub page: u32,
    pub size: u32,
}

impl PageSpec {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Clamps `size` into `1..=max_size`.
    pub fn clamped(self, max_size: u32) -> Self {
        Self {
            page: self.page,
            size: self.size.clamp(1, max_size.max(1)),
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size.max(1))
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * self.limit()
    }
}

/// One page of results plus the totals a client needs to render paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    pub number: u32,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, spec: PageSpec, total_elements: u64) -> Self {
        let size = spec.size.max(1);
        let total_pages = u32::try_from(total_elements.div_ceil(u64::from(size))).unwrap_or(u32::MAX);
        Self {
            content,
            total_elements,
            total_pages,
            size,
            number: spec.page,
            first: spec.page == 0,
            last: spec.page.saturating_add(1) >= total_pages,
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            size: self.size,
            number: self.number,
            first: self.first,
            last: self.last,
        }
    }
}
