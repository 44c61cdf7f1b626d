use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::{Range, RangeInclusive};

use crate::data::datatable::{Field, Todo};
use crate::data::datavalue_compare::compare_datavalues;

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Flip an ascending comparison result for descending order
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Which field the search box matches against, and the text typed into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub field: Field,
    pub text: String,
}

impl SearchConfig {
    pub fn new(field: Field) -> Self {
        Self {
            field,
            text: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub field: Field,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn new(field: Field, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Header activation: the active ascending column flips to descending,
    /// everything else starts ascending.
    pub fn toggle(&mut self, field: Field) {
        self.direction = if self.field == field && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        self.field = field;
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        Self::new(Field::Id, SortDirection::Ascending)
    }
}

/// Keep the records whose `field` contains `text`, ignoring case.
/// Relative order is preserved.
pub fn filter_records<'a>(records: &'a [Todo], field: Field, text: &str) -> Vec<&'a Todo> {
    let needle = text.to_lowercase();
    records
        .iter()
        .filter(|record| {
            record
                .value(field)
                .search_text()
                .is_some_and(|haystack| haystack.contains(&needle))
        })
        .collect()
}

/// Stable sort of `rows` by one field
pub fn sort_records(rows: &mut [&Todo], field: Field, direction: SortDirection) {
    rows.sort_by(|a, b| direction.apply(compare_datavalues(&a.value(field), &b.value(field))));
}

/// Number of pages needed for `count` rows, never less than one
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Slice out one 1-based page, clipped to the bounds of `rows`
pub fn paginate<'r, 'a>(rows: &'r [&'a Todo], page: usize, page_size: usize) -> &'r [&'a Todo] {
    &rows[page_range(rows.len(), page, page_size)]
}

fn page_range(count: usize, page: usize, page_size: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(count);
    let end = page.saturating_mul(page_size).min(count);
    start..end
}

/// The pagination cursor: a 1-based page index over a fixed page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Move to `page` if it exists; out-of-range requests leave the cursor unchanged
    pub fn go_to(&mut self, page: usize, total_pages: usize) -> bool {
        if page == 0 || page > total_pages.max(1) {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next(&mut self, total_pages: usize) -> bool {
        self.go_to(self.page + 1, total_pages)
    }

    pub fn previous(&mut self, total_pages: usize) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.go_to(self.page - 1, total_pages)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self, total_pages: usize) -> bool {
        self.page < total_pages
    }

    /// Pull the cursor back onto the last page when the result set shrank.
    /// Returns true when the page changed.
    pub fn clamp(&mut self, total_pages: usize) -> bool {
        let last = total_pages.max(1);
        if self.page > last {
            self.page = last;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Derived view of the record set: filtered, sorted, and positioned on one page.
///
/// Rebuilt from the full record set for every render; nothing is cached between
/// calls.
#[derive(Debug, Clone)]
pub struct DataView<'a> {
    rows: Vec<&'a Todo>,
    pagination: Pagination,
}

impl<'a> DataView<'a> {
    pub fn compute(
        records: &'a [Todo],
        search: &SearchConfig,
        sort: &SortConfig,
        pagination: Pagination,
    ) -> Self {
        let mut rows = filter_records(records, search.field, &search.text);
        sort_records(&mut rows, sort.field, sort.direction);
        Self { rows, pagination }
    }

    /// Every row that passed the filter, in sorted order
    pub fn rows(&self) -> &[&'a Todo] {
        &self.rows
    }

    pub fn filtered_count(&self) -> usize {
        self.rows.len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.rows.len(), self.pagination.page_size())
    }

    pub fn page(&self) -> usize {
        self.pagination.page()
    }

    pub fn page_rows(&self) -> &[&'a Todo] {
        paginate(&self.rows, self.pagination.page(), self.pagination.page_size())
    }

    pub fn page_numbers(&self) -> RangeInclusive<usize> {
        1..=self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.pagination.has_previous()
    }

    pub fn has_next(&self) -> bool {
        self.pagination.has_next(self.total_pages())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todos(n: i64) -> Vec<Todo> {
        (1..=n).map(|i| Todo::new(1, i, format!("todo {}", i))).collect()
    }

    #[test]
    fn test_page_range_clips_to_bounds() {
        assert_eq!(page_range(25, 3, 10), 20..25);
        assert_eq!(page_range(25, 4, 10), 25..25);
        assert_eq!(page_range(0, 1, 10), 0..0);
        assert_eq!(page_range(5, usize::MAX, 10), 5..5);
    }

    #[test]
    fn test_total_pages_minimum_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }

    #[test]
    fn test_sort_toggle_cycles_direction() {
        let mut sort = SortConfig::default();
        sort.toggle(Field::Id);
        assert_eq!(sort.direction, SortDirection::Descending);
        sort.toggle(Field::Id);
        assert_eq!(sort.direction, SortDirection::Ascending);

        sort.toggle(Field::Id);
        sort.toggle(Field::Title);
        assert_eq!(sort, SortConfig::new(Field::Title, SortDirection::Ascending));
    }

    #[test]
    fn test_view_page_navigation_flags() {
        let records = todos(25);
        let mut pagination = Pagination::default();
        let view = DataView::compute(
            &records,
            &SearchConfig::new(Field::Title),
            &SortConfig::default(),
            pagination,
        );
        assert!(!view.has_previous());
        assert!(view.has_next());
        assert_eq!(view.page_numbers(), 1..=3);

        assert!(pagination.go_to(3, view.total_pages()));
        let view = DataView::compute(
            &records,
            &SearchConfig::new(Field::Title),
            &SortConfig::default(),
            pagination,
        );
        assert!(view.has_previous());
        assert!(!view.has_next());
    }
}
