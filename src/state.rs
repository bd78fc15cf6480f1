//! View state for the matching dashboard.

use std::collections::HashSet;

use crate::filter::{filter_and_sort, FilterSpec};
use crate::models::MatchingItem;

/// Filter selection, expanded rows and the selected file.
///
/// Owned by the view that renders it and passed by `&mut`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub filters: FilterSpec,
    pub expanded: HashSet<String>,
    pub selected: Option<String>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole filter selection.
    pub fn set_filters(&mut self, filters: FilterSpec) {
        self.filters = filters;
    }

    pub fn reset_filters(&mut self) {
        self.filters = FilterSpec::default();
    }

    /// Flip membership of `file_name` in the expanded set.
    pub fn toggle_expanded(&mut self, file_name: &str) {
        if !self.expanded.remove(file_name) {
            self.expanded.insert(file_name.to_string());
        }
    }

    pub fn is_expanded(&self, file_name: &str) -> bool {
        self.expanded.contains(file_name)
    }

    pub fn select(&mut self, file_name: Option<String>) {
        self.selected = file_name;
    }

    /// Items that pass the current filters, in display order.
    pub fn visible(&self, items: &[MatchingItem]) -> Vec<MatchingItem> {
        filter_and_sort(items, &self.filters)
    }

    /// Move the selection by `delta` rows within `visible`, clamping at the ends.
    pub fn move_selection(&mut self, visible: &[MatchingItem], delta: isize) {
        if visible.is_empty() {
            self.selected = None;
            return;
        }
        let current = self
            .selected
            .as_deref()
            .and_then(|name| visible.iter().position(|i| i.file_name == name));
        let next = match current {
            Some(idx) => idx.saturating_add_signed(delta).min(visible.len() - 1),
            None => 0,
        };
        self.selected = Some(visible[next].file_name.clone());
    }
}
