use todo_grid::data::column_order::{ColumnDescriptor, ColumnOrder};
use todo_grid::data::datatable::Field;

fn sorted_labels(order: &ColumnOrder) -> Vec<(Field, String)> {
    let mut pairs: Vec<(Field, String)> = order
        .columns()
        .iter()
        .map(|c| (c.id, c.label.clone()))
        .collect();
    pairs.sort_by_key(|(field, _)| field.name());
    pairs
}

#[test]
fn test_drag_and_drop_moves_and_shifts() {
    let mut order = ColumnOrder::default();
    order.drag_start(0);
    assert_eq!(order.drag_source(), Some(0));
    assert!(order.drop_at(2));
    assert_eq!(order.fields(), vec![Field::Id, Field::Title, Field::UserId]);
    assert_eq!(order.drag_source(), None);

    order.drag_start(2);
    assert!(order.drop_at(0));
    assert_eq!(order.fields(), vec![Field::UserId, Field::Id, Field::Title]);
}

#[test]
fn test_drop_on_same_index_is_noop() {
    let mut order = ColumnOrder::default();
    order.drag_start(1);
    assert!(!order.drop_at(1));
    assert_eq!(order, ColumnOrder::default());
}

#[test]
fn test_every_move_is_a_permutation() {
    let reference = sorted_labels(&ColumnOrder::default());
    for from in 0..3 {
        for to in 0..3 {
            let mut order = ColumnOrder::default();
            order.drag_start(from);
            order.drop_at(to);
            assert_eq!(order.len(), 3);
            assert_eq!(sorted_labels(&order), reference, "move {} -> {}", from, to);
            assert!(order.position(Field::UserId).is_some());
        }
    }
}

#[test]
fn test_labels_travel_with_their_field() {
    let mut order = ColumnOrder::default();
    order.move_column(2, 0);
    for column in order.columns() {
        assert_eq!(column, &ColumnDescriptor::new(column.id));
    }
    assert_eq!(order.get(0).map(|c| c.label.as_str()), Some("Title"));
}

#[test]
fn test_out_of_range_indices_are_ignored() {
    let mut order = ColumnOrder::default();
    order.drag_start(7);
    assert_eq!(order.drag_source(), None);
    assert!(!order.drop_at(0));

    order.drag_start(0);
    assert!(!order.drop_at(9));
    assert_eq!(order, ColumnOrder::default());
}
