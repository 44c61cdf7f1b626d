use tracing::debug;

use crate::data::datatable::Todo;
use crate::data::todo_store::TodoStore;

/// Inline row editing. At most one row is edited at a time; its fields are
/// mirrored into a scratch copy until the edit is saved or cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditSession {
    #[default]
    Idle,
    Editing { id: i64, scratch: Todo },
}

impl EditSession {
    /// Start editing `record`. Any edit already in progress is discarded unsaved.
    pub fn begin(&mut self, record: &Todo) {
        if let EditSession::Editing { id, .. } = self {
            if *id != record.id {
                debug!(target: "edit", "Discarding unsaved edit of record {}", id);
            }
        }
        debug!(target: "edit", "Editing record {}", record.id);
        *self = EditSession::Editing {
            id: record.id,
            scratch: record.clone(),
        };
    }

    /// Update the scratch title. Ignored while idle.
    pub fn set_title(&mut self, title: impl Into<String>) {
        if let EditSession::Editing { scratch, .. } = self {
            scratch.title = title.into();
        }
    }

    /// Write the scratch copy back over the record with the same id and return
    /// to idle. Returns true when a record was replaced.
    pub fn save(&mut self, store: &mut TodoStore) -> bool {
        match std::mem::take(self) {
            EditSession::Idle => false,
            EditSession::Editing { id, scratch } => {
                let saved = store.replace(scratch);
                debug!(target: "edit", "Saved record {} (replaced: {})", id, saved);
                saved
            }
        }
    }

    /// Drop the scratch copy; the record set is untouched
    pub fn cancel(&mut self) {
        if let EditSession::Editing { id, .. } = self {
            debug!(target: "edit", "Cancelled edit of record {}", id);
        }
        *self = EditSession::Idle;
    }

    pub fn active_id(&self) -> Option<i64> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing { id, .. } => Some(*id),
        }
    }

    pub fn is_editing(&self, record_id: i64) -> bool {
        self.active_id() == Some(record_id)
    }

    pub fn scratch(&self) -> Option<&Todo> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing { scratch, .. } => Some(scratch),
        }
    }
}
