//! Page-number pagination primitives shared by vidhub listing endpoints.
//!
//! Listing endpoints accept a [`PageRequest`] (1-based page number plus a
//! bounded page size) and answer with a [`Page`] envelope carrying the slice
//! of items together with the totals clients need to render pagers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 20;
/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// Validation failures raised while building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Page numbers start at one.
    #[error("page must be at least 1, got {page}")]
    PageOutOfRange {
        /// Rejected page number.
        page: u32,
    },
    /// Page size must be between one and [`MAX_LIMIT`].
    #[error("limit must be between 1 and {max}, got {limit}")]
    LimitOutOfRange {
        /// Rejected page size.
        limit: u32,
        /// Upper bound accepted by the request.
        max: u32,
    },
}

/// Validated page selection.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 25).expect("valid request");
/// assert_eq!(request.offset(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Validate an explicit page number and page size.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when either value is out of range.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange { page });
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PageRequestError::LimitOutOfRange {
                limit,
                max: MAX_LIMIT,
            });
        }
        Ok(Self { page, limit })
    }

    /// Build a request from optional query parameters, applying defaults.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when a supplied value is out of range.
    pub const fn from_params(
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Self, PageRequestError> {
        let page_number = match page {
            Some(value) => value,
            None => 1,
        };
        let page_size = match limit {
            Some(value) => value,
            None => DEFAULT_LIMIT,
        };
        Self::new(page_number, page_size)
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items preceding this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

/// Ordering applied to the selected sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest (or newest) first.
    #[default]
    Desc,
}

/// Error returned when a sort direction string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("sort direction must be asc or desc, got {0}")]
pub struct ParseSortDirectionError(pub String);

impl FromStr for SortDirection {
    type Err = ParseSortDirectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ParseSortDirectionError(value.to_owned())),
        }
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, already ordered.
    pub items: Vec<T>,
    /// 1-based page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// Number of matching items across all pages.
    pub total: u64,
    /// Number of pages needed to show `total` items.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Wrap an already-sliced set of items.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page(),
            limit: request.limit(),
            total,
            total_pages: total.div_ceil(u64::from(request.limit())),
        }
    }

    /// Slice a fully materialised, ordered collection.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    ///
    /// let request = PageRequest::new(2, 2).expect("valid request");
    /// let page = Page::from_ordered(vec![1, 2, 3, 4, 5], request);
    /// assert_eq!(page.items, vec![3, 4]);
    /// assert_eq!(page.total_pages, 3);
    /// ```
    #[must_use]
    pub fn from_ordered(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        let items = all.into_iter().skip(skip).take(take).collect();
        Self::new(items, request, total)
    }

    /// Convert every item while keeping the paging metadata.
    #[must_use]
    pub fn map<U, F>(self, convert: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(convert).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for page validation and slicing.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, DEFAULT_LIMIT)]
    #[case(Some(4), None, 4, DEFAULT_LIMIT)]
    #[case(None, Some(5), 1, 5)]
    #[case(Some(2), Some(MAX_LIMIT), 2, MAX_LIMIT)]
    fn from_params_applies_defaults(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::from_params(page, limit).expect("valid params");
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[rstest]
    #[case(0, 10, PageRequestError::PageOutOfRange { page: 0 })]
    #[case(1, 0, PageRequestError::LimitOutOfRange { limit: 0, max: MAX_LIMIT })]
    #[case(1, 101, PageRequestError::LimitOutOfRange { limit: 101, max: MAX_LIMIT })]
    fn new_rejects_out_of_range_values(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(page, limit), Err(expected));
    }

    #[rstest]
    fn from_ordered_handles_pages_past_the_end() {
        let request = PageRequest::new(5, 10).expect("valid request");
        let page = Page::from_ordered(vec![1, 2, 3], request);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 1);
    }

    #[rstest]
    fn empty_collection_has_zero_pages() {
        let page = Page::<u8>::from_ordered(Vec::new(), PageRequest::default());
        assert_eq!(page.total_pages, 0);
    }

    #[rstest]
    #[case("asc", SortDirection::Asc)]
    #[case("DESC", SortDirection::Desc)]
    fn sort_direction_parses_case_insensitively(
        #[case] raw: &str,
        #[case] expected: SortDirection,
    ) {
        assert_eq!(raw.parse::<SortDirection>(), Ok(expected));
    }

    #[rstest]
    fn sort_direction_rejects_unknown_values() {
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[rstest]
    fn page_serialises_in_camel_case() {
        let page = Page::from_ordered(vec!["a"], PageRequest::default());
        let value = serde_json::to_value(&page).expect("serialise page");
        assert_eq!(value["totalPages"], 1);
        assert_eq!(value["items"][0], "a");
    }
}
