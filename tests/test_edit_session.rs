use todo_grid::data::datatable::{Field, Todo};
use todo_grid::data::edit_session::EditSession;
use todo_grid::data::todo_store::TodoStore;
use todo_grid::state::events::StateEvent;
use todo_grid::state::table_state::TableState;

fn store() -> TodoStore {
    TodoStore::from_records(vec![
        Todo::new(1, 1, "delectus aut autem"),
        Todo::new(1, 2, "quis ut nam facilis"),
        Todo::new(2, 3, "fugiat veniam minus"),
    ])
}

#[test]
fn test_save_changes_only_the_title_of_matching_record() {
    let mut store = store();
    let before = store.records().to_vec();

    let mut session = EditSession::default();
    session.begin(&before[1]);
    session.set_title("rewritten");
    assert!(session.save(&mut store));

    let after = store.records();
    assert_eq!(after.len(), before.len());
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert_eq!(after[1].id, before[1].id);
    assert_eq!(after[1].user_id, before[1].user_id);
    assert_eq!(after[1].title, "rewritten");
    assert_eq!(session, EditSession::Idle);
}

#[test]
fn test_cancel_leaves_records_untouched() {
    let mut store = store();
    let before = store.records().to_vec();

    let mut session = EditSession::default();
    session.begin(&before[0]);
    session.set_title("never saved");
    session.cancel();

    assert_eq!(store.records(), before.as_slice());
    assert!(!session.save(&mut store));
    assert_eq!(store.records(), before.as_slice());
}

#[test]
fn test_starting_another_edit_discards_previous_scratch() {
    let mut store = store();
    let records = store.records().to_vec();

    let mut session = EditSession::default();
    session.begin(&records[0]);
    session.set_title("lost");
    session.begin(&records[2]);
    assert_eq!(session.active_id(), Some(3));
    assert_eq!(session.scratch().map(|t| t.title.as_str()), Some("fugiat veniam minus"));

    session.save(&mut store);
    assert_eq!(store.get(1).map(|t| t.title.as_str()), Some("delectus aut autem"));
}

#[test]
fn test_only_title_is_editable() {
    assert!(Field::Title.is_editable());
    assert!(!Field::Id.is_editable());
    assert!(!Field::UserId.is_editable());
}

#[test]
fn test_deleting_record_under_edit_ends_session() {
    let mut state = TableState::default().with_records(store().records().to_vec());

    assert!(state.apply(StateEvent::EditStarted(2)));
    state.apply(StateEvent::EditTitleChanged("pending".to_string()));
    assert!(state.apply(StateEvent::RecordDeleted(2)));

    assert_eq!(state.edit().active_id(), None);
    assert!(state.records().iter().all(|r| r.id != 2));
    // nothing left to save
    assert!(!state.apply(StateEvent::EditSaved));
    assert_eq!(state.records().len(), 2);
}

#[test]
fn test_deleting_other_record_keeps_session() {
    let mut state = TableState::default().with_records(store().records().to_vec());

    state.apply(StateEvent::EditStarted(1));
    state.apply(StateEvent::EditTitleChanged("kept".to_string()));
    state.apply(StateEvent::RecordDeleted(3));

    assert_eq!(state.edit().active_id(), Some(1));
    assert!(state.apply(StateEvent::EditSaved));
    assert_eq!(state.records()[0].title, "kept");
}

#[test]
fn test_edit_unknown_record_is_rejected() {
    let mut state = TableState::default().with_records(store().records().to_vec());
    assert!(!state.apply(StateEvent::EditStarted(99)));
    assert_eq!(state.edit(), &EditSession::Idle);
}
