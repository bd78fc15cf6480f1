//! Client-side filtering and sorting of the matching matrix.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{MatchingItem, MatchingStatus};

/// Status filter: everything, or exactly one status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(MatchingStatus),
}

impl StatusFilter {
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        MatchingStatus::from_str(s).map(Self::Only)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }

    pub fn matches(&self, status: MatchingStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }

    /// Next filter in the cycle `all → complete → … → orphan → all`.
    pub fn next(&self) -> Self {
        let all = MatchingStatus::ALL;
        match self {
            Self::All => Self::Only(all[0]),
            Self::Only(current) => match all.iter().position(|s| s == current) {
                Some(i) if i + 1 < all.len() => Self::Only(all[i + 1]),
                _ => Self::All,
            },
        }
    }
}

/// Recognized sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortKey {
    FileName,
    SegmentCount,
    Status,
}

impl SortKey {
    /// Parse a sort key; unrecognized names yield `None` (no reordering).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "file_name" => Some(Self::FileName),
            "segment_count" => Some(Self::SegmentCount),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileName => "file_name",
            Self::SegmentCount => "segment_count",
            Self::Status => "status",
        }
    }

    fn compare(&self, a: &MatchingItem, b: &MatchingItem) -> Ordering {
        match self {
            Self::FileName => a.file_name.to_lowercase().cmp(&b.file_name.to_lowercase()),
            Self::SegmentCount => a.segment_count.cmp(&b.segment_count),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Current filter selection of the matching view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub status: StatusFilter,
    pub search_query: String,
    /// `None` leaves the filtered order untouched.
    pub sort_by: Option<SortKey>,
    pub sort_order: SortOrder,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            search_query: String::new(),
            sort_by: Some(SortKey::FileName),
            sort_order: SortOrder::Asc,
        }
    }
}

/// Filter by status and file-name search, then stable-sort.
///
/// The input is never modified. Ties keep their input order in both
/// directions.
pub fn filter_and_sort(items: &[MatchingItem], spec: &FilterSpec) -> Vec<MatchingItem> {
    let query = spec.search_query.to_lowercase();

    let mut filtered: Vec<MatchingItem> = items
        .iter()
        .filter(|item| spec.status.matches(item.status))
        .filter(|item| query.is_empty() || item.file_name.to_lowercase().contains(&query))
        .cloned()
        .collect();

    if let Some(key) = spec.sort_by {
        // slice::sort_by is a stable sort
        filtered.sort_by(|a, b| {
            let ord = key.compare(a, b);
            match spec.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }

    filtered
}

/// UDM conversion rate of a file in percent, unclamped.
pub fn conversion_rate(item: &MatchingItem) -> f64 {
    if item.segment_count == 0 {
        return 0.0;
    }
    item.udm_count as f64 / item.segment_count as f64 * 100.0
}

/// Progress bar fill in percent, clamped to `0..=100`.
pub fn progress_width(item: &MatchingItem) -> u16 {
    conversion_rate(item).clamp(0.0, 100.0).round() as u16
}

/// Number of items per status, in display order.
pub fn status_counts(items: &[MatchingItem]) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<&'static str, usize> = MatchingStatus::ALL
        .iter()
        .map(|s| (s.as_str(), 0))
        .collect();
    for item in items {
        *counts.entry(item.status.as_str()).or_default() += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, status: MatchingStatus, segments: u64) -> MatchingItem {
        MatchingItem {
            file_name: name.to_string(),
            nas: None,
            segment_count: segments,
            udm_count: 0,
            segments: Vec::new(),
            status,
            status_detail: String::new(),
            warnings: Vec::new(),
        }
    }

    fn names(items: &[MatchingItem]) -> Vec<&str> {
        items.iter().map(|i| i.file_name.as_str()).collect()
    }

    fn unsorted(status: StatusFilter, query: &str) -> FilterSpec {
        FilterSpec {
            status,
            search_query: query.to_string(),
            sort_by: None,
            sort_order: SortOrder::Asc,
        }
    }

    #[test]
    fn test_status_filter_scenario() {
        let items = vec![
            item("B.mp4", MatchingStatus::Complete, 1),
            item("a.mp4", MatchingStatus::Pending, 1),
        ];
        let spec = FilterSpec {
            status: StatusFilter::Only(MatchingStatus::Complete),
            ..Default::default()
        };
        let result = filter_and_sort(&items, &spec);
        assert_eq!(result, vec![items[0].clone()]);
    }

    #[test]
    fn test_file_name_sort_is_case_insensitive() {
        let items = vec![
            item("B.mp4", MatchingStatus::Complete, 1),
            item("a.mp4", MatchingStatus::Pending, 1),
        ];
        let result = filter_and_sort(&items, &FilterSpec::default());
        assert_eq!(names(&result), vec!["a.mp4", "B.mp4"]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let items = vec![
            item("WSOP_2024.mp4", MatchingStatus::Complete, 1),
            item("HCL_2024.mp4", MatchingStatus::Complete, 1),
        ];
        let result = filter_and_sort(&items, &unsorted(StatusFilter::All, "wsop"));
        assert_eq!(names(&result), vec!["WSOP_2024.mp4"]);
    }

    #[test]
    fn test_all_and_empty_query_keep_every_item() {
        let items = vec![
            item("c.mp4", MatchingStatus::Orphan, 0),
            item("a.mp4", MatchingStatus::Warning, 3),
            item("b.mp4", MatchingStatus::Partial, 2),
        ];
        let result = filter_and_sort(&items, &unsorted(StatusFilter::All, ""));
        assert_eq!(result, items);

        let sorted = filter_and_sort(&items, &FilterSpec::default());
        assert_eq!(sorted.len(), items.len());
        for i in &items {
            assert!(sorted.contains(i));
        }
    }

    #[test]
    fn test_status_filter_is_idempotent() {
        let items = vec![
            item("a", MatchingStatus::Partial, 1),
            item("b", MatchingStatus::Complete, 1),
            item("c", MatchingStatus::Partial, 1),
        ];
        let spec = unsorted(StatusFilter::Only(MatchingStatus::Partial), "");
        let once = filter_and_sort(&items, &spec);
        let twice = filter_and_sort(&once, &spec);
        assert_eq!(once, twice);
        assert_eq!(names(&once), vec!["a", "c"]);
    }

    #[test]
    fn test_sort_is_stable_both_directions() {
        let items = vec![
            item("first", MatchingStatus::Complete, 2),
            item("x", MatchingStatus::Complete, 1),
            item("second", MatchingStatus::Complete, 2),
            item("third", MatchingStatus::Complete, 2),
        ];
        let mut spec = FilterSpec {
            sort_by: Some(SortKey::SegmentCount),
            ..Default::default()
        };

        let asc = filter_and_sort(&items, &spec);
        assert_eq!(names(&asc), vec!["x", "first", "second", "third"]);

        spec.sort_order = SortOrder::Desc;
        let desc = filter_and_sort(&items, &spec);
        assert_eq!(names(&desc), vec!["first", "second", "third", "x"]);
    }

    #[test]
    fn test_status_sort_uses_status_name() {
        let items = vec![
            item("a", MatchingStatus::Warning, 1),
            item("b", MatchingStatus::Complete, 1),
            item("c", MatchingStatus::NoMetadata, 1),
        ];
        let spec = FilterSpec {
            sort_by: Some(SortKey::Status),
            ..Default::default()
        };
        assert_eq!(names(&filter_and_sort(&items, &spec)), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_unrecognized_sort_key_is_noop() {
        assert_eq!(SortKey::parse("udm_count"), None);
        let items = vec![
            item("z", MatchingStatus::Complete, 1),
            item("a", MatchingStatus::Complete, 9),
        ];
        let spec = FilterSpec {
            sort_by: SortKey::parse("udm_count"),
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        assert_eq!(names(&filter_and_sort(&items, &spec)), vec!["z", "a"]);
    }

    #[test]
    fn test_filter_does_not_mutate_input_and_is_repeatable() {
        let items = vec![
            item("b", MatchingStatus::Complete, 1),
            item("a", MatchingStatus::Complete, 1),
        ];
        let snapshot = items.clone();
        let first = filter_and_sort(&items, &FilterSpec::default());
        let second = filter_and_sort(&items, &FilterSpec::default());
        assert_eq!(items, snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn test_conversion_rate_passes_through_overflow() {
        let mut over = item("a", MatchingStatus::Warning, 4);
        over.udm_count = 6;
        assert_eq!(conversion_rate(&over), 150.0);
        assert_eq!(progress_width(&over), 100);

        let empty = item("b", MatchingStatus::NoMetadata, 0);
        assert_eq!(conversion_rate(&empty), 0.0);
    }

    #[test]
    fn test_status_filter_cycle() {
        let mut f = StatusFilter::All;
        let mut seen = Vec::new();
        for _ in 0..7 {
            f = f.next();
            seen.push(f.as_str());
        }
        assert_eq!(
            seen,
            vec!["complete", "partial", "warning", "pending", "no_metadata", "orphan", "all"]
        );
        assert_eq!(StatusFilter::parse("ALL"), Some(StatusFilter::All));
        assert_eq!(StatusFilter::parse("bogus"), None);
    }

    #[test]
    fn test_status_counts() {
        let items = vec![
            item("a", MatchingStatus::Complete, 1),
            item("b", MatchingStatus::Complete, 1),
            item("c", MatchingStatus::Orphan, 0),
        ];
        let counts = status_counts(&items);
        assert_eq!(counts["complete"], 2);
        assert_eq!(counts["orphan"], 1);
        assert_eq!(counts["partial"], 0);
    }
}
