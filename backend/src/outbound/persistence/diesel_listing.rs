//! Helpers shared by the paginated admin listings.

use crate::domain::{Page, PageRequest};

/// Apply `column` in the listing's sort direction to a boxed query.
macro_rules! order_by_direction {
    ($query:expr, $column:expr, $direction:expr) => {
        match $direction {
            $crate::domain::SortDirection::Asc => $query.order_by($column.asc()),
            $crate::domain::SortDirection::Desc => $query.order_by($column.desc()),
        }
    };
}

pub(crate) use order_by_direction;

/// `ILIKE` pattern matching `term` anywhere, with wildcards in the term
/// escaped.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// `LIMIT` and `OFFSET` for a page request.
pub(crate) fn limit_offset(request: PageRequest) -> (i64, i64) {
    (
        i64::from(request.limit()),
        i64::try_from(request.offset()).unwrap_or(i64::MAX),
    )
}

/// Wrap one loaded page with the unpaged row count.
pub(crate) fn into_page<T>(items: Vec<T>, request: PageRequest, total: i64) -> Page<T> {
    Page::new(items, request, u64::try_from(total).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cats", "%cats%")]
    #[case("100%", "%100\\%%")]
    #[case("snake_case", "%snake\\_case%")]
    fn search_terms_are_escaped(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(term), expected);
    }

    #[rstest]
    fn third_page_skips_two_pages() {
        let request = PageRequest::new(3, 25).expect("valid page");
        assert_eq!(limit_offset(request), (25, 50));
    }
}
