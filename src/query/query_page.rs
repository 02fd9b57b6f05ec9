use serde::{Deserialize, Serialize};

use super::error::QueryError;

/// A validated 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
}

impl PageRequest {
    pub fn new(page_number: i64, page_size: i64) -> Result<Self, QueryError> {
        if page_number < 1 {
            return Err(QueryError::InvalidArgument(format!(
                "Page number must be at least 1, got {}",
                page_number
            )));
        }
        if page_size <= 0 {
            return Err(QueryError::InvalidArgument(format!(
                "Page size must be positive, got {}",
                page_size
            )));
        }
        let page_number = u32::try_from(page_number)
            .map_err(|_| QueryError::InvalidArgument(format!("Page number {} is too large", page_number)))?;
        let page_size = u32::try_from(page_size)
            .map_err(|_| QueryError::InvalidArgument(format!("Page size {} is too large", page_size)))?;
        Ok(Self { page_number, page_size })
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Rows before the window: `(page_number - 1) * page_size`.
    pub fn skip(&self) -> u64 {
        (self.page_number as u64 - 1) * self.page_size as u64
    }

    pub fn take(&self) -> u64 {
        self.page_size as u64
    }
}

/// Pagination summary sent to clients in the `X-Pagination` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetaData {
    pub current_page: u32,
    pub total_pages: u64,
    pub page_size: u32,
    pub total_count: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl MetaData {
    pub fn new(page: &PageRequest, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(page.take());
        let current_page = page.page_number();
        Self {
            current_page,
            total_pages,
            page_size: page.page_size(),
            total_count,
            has_previous: current_page > 1,
            has_next: (current_page as u64) < total_pages,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub meta_data: MetaData,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total_count: u64, page: &PageRequest) -> Self {
        Self { items, meta_data: MetaData::new(page, total_count) }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            meta_data: self.meta_data,
        }
    }
}

/// Takes one page window out of an already filtered and ordered source.
/// The returned count covers the whole source, not just the window.
pub fn paginate<I>(
    source: I,
    page_number: i64,
    page_size: i64,
) -> Result<(Vec<I::Item>, u64), QueryError>
where
    I: IntoIterator,
{
    let page = PageRequest::new(page_number, page_size)?;
    Ok(paginate_with(source, &page))
}

pub fn paginate_with<I>(source: I, page: &PageRequest) -> (Vec<I::Item>, u64)
where
    I: IntoIterator,
{
    window(source, page.skip(), page.take())
}

/// Keeps items `skip..skip + take` of `source` and counts all of them.
pub fn window<I>(source: I, skip: u64, take: u64) -> (Vec<I::Item>, u64)
where
    I: IntoIterator,
{
    let end = skip.saturating_add(take);
    let mut total = 0u64;
    let mut items = Vec::new();
    for item in source {
        if total >= skip && total < end {
            items.push(item);
        }
        total += 1;
    }
    (items, total)
}
