//! Pagination and sort-specifier types.

use serde::{Deserialize, Serialize};

/// Generic sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    Desc,
    Asc,
}

/// Pagination parameters shared across all list endpoints.
///
/// - `page`: 0-based, default 0
/// - `size`: 1–100, default 10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u64,
}

fn default_size() -> u64 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: default_size(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self { page, size }.clamped()
    }

    /// Clamp `size` to the valid range 1–100.
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page,
            size: self.size.clamp(1, 100),
        }
    }

    pub fn offset(self) -> u64 {
        self.page * self.size
    }
}

/// A `"field,direction"` sort parameter, e.g. `"revision,desc"`.
///
/// A missing direction segment means ascending, matching the source API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: Sort,
}

impl SortSpec {
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.splitn(2, ',');
        let field = parts.next().unwrap_or_default().trim().to_owned();
        let direction = match parts.next().map(str::trim) {
            Some(dir) if dir.eq_ignore_ascii_case("desc") => Sort::Desc,
            _ => Sort::Asc,
        };
        Self { field, direction }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: "revision".to_owned(),
            direction: Sort::Desc,
        }
    }
}

/// One page of results plus the paging envelope the API returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    #[serde(rename = "totalElements")]
    pub total_elements: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn empty(request: PageRequest) -> Self {
        Self {
            content: Vec::new(),
            page: request.page,
            size: request.size,
            total_elements: 0,
            total_pages: 0,
        }
    }

    /// Build a page from an already-fetched full result set by slicing
    /// `[offset, offset + size)`. An offset past the end yields empty content
    /// while keeping the true total.
    pub fn slice_of(records: Vec<T>, request: PageRequest) -> Self {
        let total = records.len() as u64;
        let start = request.offset();
        let content: Vec<T> = records
            .into_iter()
            .skip(start as usize)
            .take(request.size as usize)
            .collect();
        Self::with_total(content, request, total)
    }

    /// Build a page around content the repository already limited, given the
    /// unpaged total.
    pub fn with_total(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages: total_elements.div_ceil(request.size.max(1)),
        }
    }
}
