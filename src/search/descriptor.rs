//! Structured query descriptors.
//!
//! A [`QueryDescriptor`] captures filters, sort and pagination independently
//! of any engine syntax. Descriptors are immutable once built and canonical:
//! filter clauses are kept sorted, so two descriptors assembled from the same
//! clauses in any order compare equal and fingerprint identically. That
//! canonical form is what makes query-keyed caching correct.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("page_number must be at least 1, got {0}")]
    PageNumber(u32),
    #[error("page_size must be at least 1, got {0}")]
    PageSize(u32),
}

/// 1-based page window. Construction validates instead of clamping: a page
/// number below 1 is a caller bug and silently fixing it would hide it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    number: u32,
    size: u32,
}

impl PageSpec {
    pub const DEFAULT_SIZE: u32 = 50;

    pub fn new(number: u32, size: u32) -> Result<Self, DescriptorError> {
        if number < 1 {
            return Err(DescriptorError::PageNumber(number));
        }
        if size < 1 {
            return Err(DescriptorError::PageSize(size));
        }
        Ok(Self { number, size })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Zero-based offset of the first document in the window.
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }

    pub fn limit(&self) -> u32 {
        self.size
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            number: 1,
            size: Self::DEFAULT_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort clause in `field` / `-field` notation. Field names are forwarded to
/// the engine unvalidated; an unknown field comes back as an engine query
/// error rather than being rejected here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortSpec {
    field: String,
    descending: bool,
}

impl SortSpec {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (field, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        if field.is_empty() {
            return None;
        }
        Some(Self {
            field: field.to_string(),
            descending,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn direction(&self) -> SortDirection {
        if self.descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

/// Exact-match filter on one field, optionally scoped to a nested document
/// path for engines that index sub-documents separately.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FilterClause {
    pub field: String,
    pub value: String,
    pub nested_path: Option<String>,
}

impl FilterClause {
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            nested_path: None,
        }
    }

    pub fn nested(
        path: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            nested_path: Some(path.into()),
        }
    }
}

/// Immutable structured query: optional full-text input, a canonicalized
/// filter set, an optional sort and a page window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    text: Option<String>,
    filters: Vec<FilterClause>,
    sort: Option<SortSpec>,
    page: PageSpec,
}

impl QueryDescriptor {
    pub fn new(page: PageSpec) -> Self {
        Self {
            text: None,
            filters: Vec::new(),
            sort: None,
            page,
        }
    }

    /// Attach full-text input. Blank input is treated as absent so that
    /// `?query=` and no query parameter describe the same search.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        self.text = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Add a filter clause, keeping the filter set sorted so logically equal
    /// descriptors share one representation.
    pub fn with_filter(mut self, filter: FilterClause) -> Self {
        self.filters.push(filter);
        self.filters.sort();
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn filters(&self) -> &[FilterClause] {
        &self.filters
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> PageSpec {
        self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offset_arithmetic() {
        let page = PageSpec::new(3, 20).expect("valid page");
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);

        let first = PageSpec::new(1, 50).expect("valid page");
        assert_eq!(first.offset(), 0);
    }

    #[test]
    fn page_number_zero_rejected() {
        assert_eq!(PageSpec::new(0, 20), Err(DescriptorError::PageNumber(0)));
    }

    #[test]
    fn page_size_zero_rejected() {
        assert_eq!(PageSpec::new(1, 0), Err(DescriptorError::PageSize(0)));
    }

    #[test]
    fn large_page_offset_does_not_overflow() {
        let page = PageSpec::new(u32::MAX, u32::MAX).expect("valid page");
        assert_eq!(
            page.offset(),
            u64::from(u32::MAX - 1) * u64::from(u32::MAX)
        );
    }

    #[test]
    fn sort_parses_direction_prefix() {
        let sort = SortSpec::parse("-imdb_rating").expect("valid sort");
        assert_eq!(sort.field(), "imdb_rating");
        assert_eq!(sort.direction(), SortDirection::Descending);

        let sort = SortSpec::parse("title").expect("valid sort");
        assert_eq!(sort.direction(), SortDirection::Ascending);
    }

    #[test]
    fn sort_rejects_blank_input() {
        assert_eq!(SortSpec::parse(""), None);
        assert_eq!(SortSpec::parse("-"), None);
        assert_eq!(SortSpec::parse("  "), None);
    }

    #[test]
    fn blank_text_is_absent() {
        let descriptor = QueryDescriptor::new(PageSpec::default()).with_text("   ");
        assert_eq!(descriptor.text(), None);
    }

    #[test]
    fn permuted_filters_are_equal() {
        let a = QueryDescriptor::new(PageSpec::default())
            .with_filter(FilterClause::term("country", "no"))
            .with_filter(FilterClause::nested("genres", "genres.id", "g1"));
        let b = QueryDescriptor::new(PageSpec::default())
            .with_filter(FilterClause::nested("genres", "genres.id", "g1"))
            .with_filter(FilterClause::term("country", "no"));
        assert_eq!(a, b);
    }
}
