use todo_grid::data::data_view::{
    paginate, total_pages, DataView, Pagination, SearchConfig, SortConfig,
};
use todo_grid::data::datatable::{Field, Todo};

fn todos(n: i64) -> Vec<Todo> {
    // delivered out of order so the sort stage has work to do
    (1..=n)
        .rev()
        .map(|i| Todo::new((i - 1) / 10 + 1, i, format!("todo {}", i)))
        .collect()
}

fn page_ids(view: &DataView) -> Vec<i64> {
    view.page_rows().iter().map(|r| r.id).collect()
}

fn view_at(records: &[Todo], page: usize) -> DataView<'_> {
    let mut pagination = Pagination::new(10);
    let total = total_pages(records.len(), 10);
    assert!(pagination.go_to(page, total));
    DataView::compute(
        records,
        &SearchConfig::new(Field::Title),
        &SortConfig::default(),
        pagination,
    )
}

#[test]
fn test_twenty_five_records_three_pages() {
    let records = todos(25);

    let first = view_at(&records, 1);
    assert_eq!(first.total_pages(), 3);
    assert_eq!(page_ids(&first), (1..=10).collect::<Vec<_>>());

    let last = view_at(&records, 3);
    assert_eq!(page_ids(&last), vec![21, 22, 23, 24, 25]);
    assert_eq!(last.page_rows().len(), 5);
}

#[test]
fn test_pages_concatenate_to_full_sequence() {
    for count in [0, 1, 9, 10, 11, 25, 40] {
        let records = todos(count);
        let view = DataView::compute(
            &records,
            &SearchConfig::new(Field::Title),
            &SortConfig::default(),
            Pagination::new(10),
        );

        let mut joined = Vec::new();
        for page in view.page_numbers() {
            let slice = paginate(view.rows(), page, 10);
            assert!(slice.len() <= 10);
            joined.extend(slice.iter().map(|r| r.id));
        }
        let all: Vec<i64> = view.rows().iter().map(|r| r.id).collect();
        assert_eq!(joined, all, "count {}", count);
    }
}

#[test]
fn test_navigation_out_of_range_is_rejected() {
    let mut pagination = Pagination::new(10);
    assert!(!pagination.go_to(0, 3));
    assert!(!pagination.go_to(4, 3));
    assert!(!pagination.previous(3));
    assert_eq!(pagination.page(), 1);

    assert!(pagination.go_to(3, 3));
    assert!(!pagination.next(3));
    assert_eq!(pagination.page(), 3);
}

#[test]
fn test_empty_set_still_has_one_page() {
    let mut pagination = Pagination::new(10);
    assert_eq!(total_pages(0, 10), 1);
    assert!(pagination.go_to(1, total_pages(0, 10)));
    assert!(!pagination.has_next(1));
    assert!(paginate(&[], 1, 10).is_empty());
}

#[test]
fn test_slice_past_end_is_empty_not_panic() {
    let records = todos(5);
    let rows: Vec<&Todo> = records.iter().collect();
    assert!(paginate(&rows, 7, 10).is_empty());
    assert_eq!(paginate(&rows, 1, 3).len(), 3);
    assert_eq!(paginate(&rows, 2, 3).len(), 2);
}

#[test]
fn test_zero_page_size_treated_as_one() {
    let pagination = Pagination::new(0);
    assert_eq!(pagination.page_size(), 1);
    assert_eq!(total_pages(3, 0), 3);
}
