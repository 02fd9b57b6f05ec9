use serde::Deserialize;

use crate::config::PagingConfig;

/// Raw `/employees` query string, camelCase as clients send it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeQueryParams {
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
    pub order_by: Option<String>,
    pub search_term: Option<String>,
    pub fields: Option<String>,
}

/// Request-scoped employee listing parameters. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeParameters {
    min_age: u32,
    max_age: u32,
    page_number: i64,
    page_size: i64,
    order_by: Option<String>,
    search_term: Option<String>,
    fields: Option<String>,
}

impl EmployeeParameters {
    pub fn new(query: EmployeeQueryParams, paging: &PagingConfig) -> Self {
        let page_size = match query.page_size {
            Some(size) if size > paging.max_page_size as i64 => {
                tracing::debug!("Page size {} exceeds max {}, capping to max", size, paging.max_page_size);
                paging.max_page_size as i64
            }
            Some(size) => size,
            None => paging.default_page_size as i64,
        };

        Self {
            min_age: query.min_age.unwrap_or(0),
            max_age: query.max_age.unwrap_or(u32::MAX),
            page_number: query.page_number.unwrap_or(1),
            page_size,
            order_by: query.order_by,
            search_term: query.search_term,
            fields: query.fields,
        }
    }

    pub fn valid_age_range(&self) -> bool {
        self.min_age <= self.max_age
    }

    pub fn min_age(&self) -> u32 {
        self.min_age
    }

    pub fn max_age(&self) -> u32 {
        self.max_age
    }

    pub fn page_number(&self) -> i64 {
        self.page_number
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Client ordering, if any. The field registry supplies the default.
    pub fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn fields(&self) -> Option<&str> {
        self.fields.as_deref()
    }
}
