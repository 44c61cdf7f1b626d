use tracing::{debug, info, warn};

use crate::data::column_order::ColumnOrder;
use crate::data::data_view::{DataView, Pagination, SearchConfig, SortConfig};
use crate::data::datatable::{Field, Todo};
use crate::data::edit_session::EditSession;
use crate::data::todo_store::TodoStore;
use crate::state::events::StateEvent;

/// Owns everything the table screen shows. All mutation goes through
/// [`TableState::apply`]; the visible rows are derived on demand by [`TableState::view`].
#[derive(Debug, Clone)]
pub struct TableState {
    store: TodoStore,
    search: SearchConfig,
    sort: SortConfig,
    pagination: Pagination,
    columns: ColumnOrder,
    edit: EditSession,
    dropdown_visible: bool,
    loaded: bool,
}

impl TableState {
    pub fn new(page_size: usize, category: Field, sort: SortConfig) -> Self {
        Self {
            store: TodoStore::new(),
            search: SearchConfig::new(category),
            sort,
            pagination: Pagination::new(page_size),
            columns: ColumnOrder::default(),
            edit: EditSession::Idle,
            dropdown_visible: false,
            loaded: false,
        }
    }

    /// State with records already loaded, as if the fetch had completed
    pub fn with_records(mut self, records: Vec<Todo>) -> Self {
        self.apply(StateEvent::RecordsLoaded(records));
        self
    }

    /// Apply one event. Returns true when anything observable changed.
    pub fn apply(&mut self, event: StateEvent) -> bool {
        debug!(target: "state", "Applying {}", event.name());

        let changed = match event {
            StateEvent::RecordsLoaded(records) => {
                self.store.replace_all(records);
                self.loaded = true;
                info!(target: "state", "Table populated with {} records", self.store.len());
                true
            }
            StateEvent::DropdownToggled => {
                self.dropdown_visible = !self.dropdown_visible;
                true
            }
            StateEvent::DropdownDismissed => std::mem::replace(&mut self.dropdown_visible, false),
            StateEvent::CategorySelected(field) => {
                self.search.field = field;
                self.search.text.clear();
                self.dropdown_visible = false;
                true
            }
            StateEvent::SearchChanged(text) => {
                if self.search.text == text {
                    false
                } else {
                    self.search.text = text;
                    true
                }
            }
            StateEvent::SortRequested(field) => {
                self.sort.toggle(field);
                debug!(target: "state", "Sorting by {} {:?}", field, self.sort.direction);
                true
            }
            StateEvent::PageRequested(page) => {
                let total = self.total_pages();
                self.pagination.go_to(page, total)
            }
            StateEvent::NextPage => {
                let total = self.total_pages();
                self.pagination.next(total)
            }
            StateEvent::PreviousPage => {
                let total = self.total_pages();
                self.pagination.previous(total)
            }
            StateEvent::ColumnDragStarted(index) => {
                self.columns.drag_start(index);
                false
            }
            StateEvent::ColumnDropped(index) => self.columns.drop_at(index),
            StateEvent::ColumnDragCancelled => {
                self.columns.cancel_drag();
                false
            }
            StateEvent::EditStarted(id) => match self.store.get(id) {
                Some(record) => {
                    self.edit.begin(record);
                    true
                }
                None => {
                    warn!(target: "state", "Cannot edit record {}: not in the table", id);
                    false
                }
            },
            StateEvent::EditTitleChanged(title) => {
                let editing = self.edit.active_id().is_some();
                self.edit.set_title(title);
                editing
            }
            StateEvent::EditSaved => self.edit.save(&mut self.store),
            StateEvent::EditCancelled => {
                let editing = self.edit.active_id().is_some();
                self.edit.cancel();
                editing
            }
            StateEvent::RecordDeleted(id) => {
                let deleted = self.store.delete(id);
                if self.edit.is_editing(id) {
                    // the session would otherwise point at a record that no longer exists
                    self.edit.cancel();
                }
                deleted
            }
        };

        if changed {
            self.clamp_page();
        }
        changed
    }

    /// Keep the cursor on an existing page after the result set shrank
    fn clamp_page(&mut self) {
        let total = self.total_pages();
        if self.pagination.clamp(total) {
            debug!(target: "state", "Page clamped to {}", self.pagination.page());
        }
    }

    /// Filter → sort → paginate over the full record set
    pub fn view(&self) -> DataView<'_> {
        DataView::compute(self.store.records(), &self.search, &self.sort, self.pagination)
    }

    pub fn total_pages(&self) -> usize {
        self.view().total_pages()
    }

    pub fn records(&self) -> &[Todo] {
        self.store.records()
    }

    pub fn search(&self) -> &SearchConfig {
        &self.search
    }

    pub fn sort(&self) -> &SortConfig {
        &self.sort
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn columns(&self) -> &ColumnOrder {
        &self.columns
    }

    pub fn edit(&self) -> &EditSession {
        &self.edit
    }

    pub fn dropdown_visible(&self) -> bool {
        self.dropdown_visible
    }

    /// False until the initial fetch has succeeded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(
            crate::data::data_view::DEFAULT_PAGE_SIZE,
            Field::Title,
            SortConfig::default(),
        )
    }
}
