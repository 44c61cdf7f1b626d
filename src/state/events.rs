//! State events

use crate::data::datatable::{Field, Todo};

/// Every change to the table state arrives as one of these events and is
/// applied to completion before the next one.
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    /// The initial fetch delivered the record set
    RecordsLoaded(Vec<Todo>),

    /// Show or hide the category dropdown
    DropdownToggled,

    /// Hide the category dropdown (pointer went down outside of it)
    DropdownDismissed,

    /// A category was chosen in the dropdown
    CategorySelected(Field),

    /// Search box contents changed
    SearchChanged(String),

    /// A column header was activated
    SortRequested(Field),

    /// Jump to a 1-based page
    PageRequested(usize),
    NextPage,
    PreviousPage,

    /// Header drag started on a display column
    ColumnDragStarted(usize),

    /// Header dropped on a display column
    ColumnDropped(usize),

    /// Drag released somewhere other than a header
    ColumnDragCancelled,

    /// Begin editing the record with this id
    EditStarted(i64),

    /// The title input of the row under edit changed
    EditTitleChanged(String),
    EditSaved,
    EditCancelled,

    /// Remove the record with this id
    RecordDeleted(i64),
}

impl StateEvent {
    /// Short name for log lines; record payloads are not worth printing
    pub fn name(&self) -> &'static str {
        match self {
            StateEvent::RecordsLoaded(_) => "RecordsLoaded",
            StateEvent::DropdownToggled => "DropdownToggled",
            StateEvent::DropdownDismissed => "DropdownDismissed",
            StateEvent::CategorySelected(_) => "CategorySelected",
            StateEvent::SearchChanged(_) => "SearchChanged",
            StateEvent::SortRequested(_) => "SortRequested",
            StateEvent::PageRequested(_) => "PageRequested",
            StateEvent::NextPage => "NextPage",
            StateEvent::PreviousPage => "PreviousPage",
            StateEvent::ColumnDragStarted(_) => "ColumnDragStarted",
            StateEvent::ColumnDropped(_) => "ColumnDropped",
            StateEvent::ColumnDragCancelled => "ColumnDragCancelled",
            StateEvent::EditStarted(_) => "EditStarted",
            StateEvent::EditTitleChanged(_) => "EditTitleChanged",
            StateEvent::EditSaved => "EditSaved",
            StateEvent::EditCancelled => "EditCancelled",
            StateEvent::RecordDeleted(_) => "RecordDeleted",
        }
    }
}
