use todo_grid::data::data_view::{
    filter_records, total_pages, DataView, Pagination, SearchConfig, SortConfig,
};
use todo_grid::data::datatable::{Field, Todo};

fn sample() -> Vec<Todo> {
    vec![
        Todo::new(1, 1, "delectus aut autem"),
        Todo::new(1, 2, "quis ut nam facilis"),
        Todo::new(2, 12, "ipsa repellendus FUGIT"),
        Todo::new(2, 21, "suscipit repellat esse"),
        Todo::new(3, 31, "Repellendus qui recusandae"),
    ]
}

fn matches(record: &Todo, field: Field, text: &str) -> bool {
    record
        .display(field)
        .to_lowercase()
        .contains(&text.to_lowercase())
}

#[test]
fn test_filter_is_exact_containment_partition() {
    let records = sample();
    for field in Field::ALL {
        for text in ["", "1", "2", "repell", "FUGIT", "zzz", " ", "aut "] {
            let filtered = filter_records(&records, field, text);

            for record in &filtered {
                assert!(matches(record, field, text), "{:?} should match {:?}", record, text);
            }
            let excluded = records
                .iter()
                .filter(|r| !filtered.iter().any(|f| f.id == r.id));
            for record in excluded {
                assert!(!matches(record, field, text), "{:?} should not match {:?}", record, text);
            }
        }
    }
}

#[test]
fn test_filter_case_insensitive_both_ways() {
    let records = sample();
    let upper = filter_records(&records, Field::Title, "REPELLENDUS");
    let lower = filter_records(&records, Field::Title, "repellendus");
    assert_eq!(upper, lower);
    assert_eq!(upper.iter().map(|r| r.id).collect::<Vec<_>>(), vec![12, 31]);
}

#[test]
fn test_filter_numeric_field_uses_string_form() {
    let records = sample();
    let ids: Vec<i64> = filter_records(&records, Field::Id, "1")
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![1, 12, 21, 31]);

    let users: Vec<i64> = filter_records(&records, Field::UserId, "2")
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(users, vec![12, 21]);
}

#[test]
fn test_filter_preserves_original_order() {
    let records = vec![
        Todo::new(1, 9, "b task"),
        Todo::new(1, 3, "a task"),
        Todo::new(1, 5, "c task"),
    ];
    let ids: Vec<i64> = filter_records(&records, Field::Title, "task")
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![9, 3, 5]);
}

#[test]
fn test_empty_search_keeps_everything() {
    let records = sample();
    assert_eq!(filter_records(&records, Field::Title, "").len(), records.len());
}

#[test]
fn test_scenario_search_title_for_a() {
    let records = vec![Todo::new(1, 1, "a"), Todo::new(1, 2, "b")];
    let search = SearchConfig {
        field: Field::Title,
        text: "a".to_string(),
    };
    let view = DataView::compute(&records, &search, &SortConfig::default(), Pagination::default());

    assert_eq!(view.rows().to_vec(), vec![&records[0]]);
    assert_eq!(view.total_pages(), 1);
    assert_eq!(total_pages(view.filtered_count(), 10), 1);
}
