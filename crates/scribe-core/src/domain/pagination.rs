//! In-memory pagination over an already fetched, sorted result set.

use crate::error::DomainError;

/// A validated, 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Both parameters are required and must be at least 1.
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Result<Self, DomainError> {
        let (Some(page), Some(per_page)) = (page, per_page) else {
            return Err(DomainError::Validation(
                "please specify the page and perPage parameters".to_string(),
            ));
        };

        if page == 0 || per_page == 0 {
            return Err(DomainError::Validation(
                "page and perPage must be greater than zero".to_string(),
            ));
        }

        Ok(Self { page, per_page })
    }

    fn offset(&self) -> usize {
        let offset = (self.page - 1).saturating_mul(self.per_page);
        usize::try_from(offset).unwrap_or(usize::MAX)
    }

    fn limit(&self) -> usize {
        usize::try_from(self.per_page).unwrap_or(usize::MAX)
    }
}

/// One page of results plus the totals of the whole result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub total_pages: u64,
    pub page: u64,
    pub per_page: u64,
    pub number_of_elements: u64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Slice `[(page-1)*per_page, page*per_page)` out of `items`.
    pub fn paginate(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len() as u64;
        let results = items
            .into_iter()
            .skip(request.offset())
            .take(request.limit())
            .collect();

        Self {
            total_pages: total.div_ceil(request.per_page),
            page: request.page,
            per_page: request.per_page,
            number_of_elements: total,
            results,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total_pages: self.total_pages,
            page: self.page,
            per_page: self.per_page,
            number_of_elements: self.number_of_elements,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
