//! Board query engine
//!
//! Every list page works the same way: a conjunction of optional constraints
//! selects records, a sort key orders them (stable, ties keep input order) and
//! the result is cut into pages. Each page module defines its criteria and
//! sort keys; this module holds the shared machinery.

pub mod accepted;
pub mod completed;
pub mod drivers;
pub mod loads;
pub mod notifications;
pub mod pending;
pub mod published;

use std::cmp::Ordering;
use std::str::FromStr;

use connectcargo_types::{Error, Result};
use serde::Serialize;

pub use accepted::{AcceptedCriteria, Period, TripHistoryCriteria};
pub use completed::{CompletedCriteria, TimeWindow};
pub use drivers::{DriverCriteria, DriverSort};
pub use loads::{FilterKey, FilterTag, LoadCriteria, LoadSort, QuickFilter, NEARBY_KM};
pub use notifications::{NotificationCriteria, NotificationSort, NotificationView};
pub use pending::{PendingCriteria, PendingSort};
pub use published::PublishedCriteria;

/// A set of constraints a record must satisfy
pub trait Criteria<T> {
    fn matches(&self, item: &T) -> bool;
}

/// A comparator selected by key
pub trait SortKey<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Keeps records in input order
#[derive(Debug, Clone, Copy, Default)]
pub struct InputOrder;

impl<T> SortKey<T> for InputOrder {
    fn compare(&self, _a: &T, _b: &T) -> Ordering {
        Ordering::Equal
    }
}

/// Filter then stable-sort a record list
pub fn run_query<T, C, S>(items: &[T], criteria: &C, sort: &S) -> Vec<T>
where
    T: Clone,
    C: Criteria<T>,
    S: SortKey<T>,
{
    let mut selected: Vec<T> = items
        .iter()
        .filter(|item| criteria.matches(item))
        .cloned()
        .collect();
    selected.sort_by(|a, b| sort.compare(a, b));
    selected
}

/// One page of query results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    /// Records that passed the filters
    pub total_matching: usize,
    /// Records before filtering
    pub total_available: usize,
}

impl<T> Page<T> {
    /// True when nothing matched and the empty state should be shown
    pub fn is_empty(&self) -> bool {
        self.total_matching == 0
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Results counter text
    pub fn summary(&self, noun: &str) -> String {
        if self.total_matching == self.total_available {
            format!("Mostrando {} {}", self.total_matching, noun)
        } else {
            format!(
                "Mostrando {} de {} {}",
                self.total_matching, self.total_available, noun
            )
        }
    }
}

/// Cut matching records into a page. The page number is clamped to the valid
/// range; an empty result has a single empty page.
pub fn paginate<T>(matching: Vec<T>, total_available: usize, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_matching = matching.len();
    let total_pages = total_matching.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let items = matching
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        per_page,
        total_pages,
        total_matching,
        total_available,
    }
}

/// Case-insensitive substring match
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Trimmed text constraint, `None` when blank
pub(crate) fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A number usable as a filter bound
pub trait Bound: FromStr {
    /// `false` for values no record can be compared against, like NaN
    fn is_usable(&self) -> bool {
        true
    }
}

impl Bound for u8 {}
impl Bound for u32 {}
impl Bound for u64 {}

impl Bound for f64 {
    fn is_usable(&self) -> bool {
        self.is_finite()
    }
}

/// Parse a raw numeric filter bound.
///
/// Blank input means "no constraint". Anything else must parse to a finite
/// number, otherwise the bound is rejected instead of letting every record
/// through.
pub fn parse_bound<N: Bound>(field: &'static str, raw: &str) -> Result<Option<N>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<N>()
        .ok()
        .filter(Bound::is_usable)
        .map(Some)
        .ok_or_else(|| Error::InvalidFilterValue {
            field,
            value: raw.to_string(),
        })
}

/// Compare two floats, treating NaN as equal
pub(crate) fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Even;

    impl Criteria<u32> for Even {
        fn matches(&self, item: &u32) -> bool {
            item % 2 == 0
        }
    }

    #[test]
    fn test_paginate_clamps_page() {
        let page = paginate((1..=25).collect::<Vec<u32>>(), 30, 9, 10);
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert!(page.has_previous());
        assert!(!page.has_next());

        let first = paginate((1..=25).collect::<Vec<u32>>(), 30, 0, 10);
        assert_eq!(first.page, 1);
        assert_eq!(first.items.len(), 10);
    }

    #[test]
    fn test_empty_result_has_one_empty_page() {
        let page = paginate(Vec::<u32>::new(), 4, 2, 10);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.summary("cargas"), "Mostrando 0 de 4 cargas");
    }

    #[test]
    fn test_run_query_keeps_input_order() {
        let items = vec![4, 1, 2, 8, 3];
        assert_eq!(run_query(&items, &Even, &InputOrder), vec![4, 2, 8]);
    }

    #[test]
    fn test_parse_bound() {
        assert_eq!(parse_bound::<u32>("weight_min", "  ").unwrap(), None);
        assert_eq!(parse_bound::<u32>("weight_min", "1200").unwrap(), Some(1200));
        let err = parse_bound::<u32>("weight_min", "abc").unwrap_err();
        assert!(matches!(err, Error::InvalidFilterValue { field: "weight_min", .. }));
    }

    #[test]
    fn test_parse_bound_rejects_non_finite() {
        assert_eq!(parse_bound::<f64>("min_rating", "4.5").unwrap(), Some(4.5));
        for raw in ["NaN", "nan", "inf", "-inf", "infinity"] {
            let err = parse_bound::<f64>("min_rating", raw).unwrap_err();
            assert!(
                matches!(err, Error::InvalidFilterValue { field: "min_rating", ref value } if value == raw),
                "{raw}"
            );
        }
        assert!(parse_bound::<u32>("weight_min", "-5").is_err());
    }

    #[test]
    fn test_contains_ci_handles_accents() {
        assert!(contains_ci("Bogotá D.C.", "BOGOTÁ"));
        assert!(contains_ci("Bogotá D.C.", "bogotá"));
        assert!(!contains_ci("Cali", "bogotá"));
    }
}
