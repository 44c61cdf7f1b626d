use tracing::{debug, warn};

use crate::data::datatable::Field;

/// Display metadata for one table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub id: Field,
    pub label: String,
}

impl ColumnDescriptor {
    pub fn new(id: Field) -> Self {
        Self {
            id,
            label: id.label().to_string(),
        }
    }
}

/// Left-to-right display order of the table columns.
///
/// Always a permutation of the initial column set; columns are only moved,
/// never added or removed. Independent of the search and sort fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOrder {
    columns: Vec<ColumnDescriptor>,
    drag_source: Option<usize>,
}

impl ColumnOrder {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            columns,
            drag_source: None,
        }
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn fields(&self) -> Vec<Field> {
        self.columns.iter().map(|c| c.id).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(index)
    }

    pub fn position(&self, field: Field) -> Option<usize> {
        self.columns.iter().position(|c| c.id == field)
    }

    /// Column currently being dragged, if any
    pub fn drag_source(&self) -> Option<usize> {
        self.drag_source
    }

    pub fn drag_start(&mut self, index: usize) {
        if index >= self.columns.len() {
            warn!(target: "columns", "Ignoring drag start on column {} of {}", index, self.columns.len());
            self.drag_source = None;
            return;
        }
        debug!(target: "columns", "Drag start on column {}", index);
        self.drag_source = Some(index);
    }

    /// Complete a drag: move the dragged column to `index`, shifting the columns
    /// in between. Returns true when the order changed.
    pub fn drop_at(&mut self, index: usize) -> bool {
        let Some(source) = self.drag_source.take() else {
            debug!(target: "columns", "Drop on column {} without a drag in progress", index);
            return false;
        };
        self.move_column(source, index)
    }

    pub fn cancel_drag(&mut self) {
        self.drag_source = None;
    }

    /// Remove the column at `from` and reinsert it at `to`
    pub fn move_column(&mut self, from: usize, to: usize) -> bool {
        let len = self.columns.len();
        if from >= len || to >= len {
            warn!(target: "columns", "Ignoring column move {} -> {} with {} columns", from, to, len);
            return false;
        }
        if from == to {
            return false;
        }

        let column = self.columns.remove(from);
        debug!(target: "columns", "Moving column '{}' from {} to {}", column.label, from, to);
        self.columns.insert(to, column);
        true
    }

    /// Move a column one place left; the first column wraps around to the end
    pub fn move_left(&mut self, index: usize) -> bool {
        if index >= self.columns.len() {
            return false;
        }
        let to = if index == 0 {
            self.columns.len() - 1
        } else {
            index - 1
        };
        self.move_column(index, to)
    }

    /// Move a column one place right; the last column wraps around to the front
    pub fn move_right(&mut self, index: usize) -> bool {
        let len = self.columns.len();
        if index >= len {
            return false;
        }
        let to = if index == len - 1 { 0 } else { index + 1 };
        self.move_column(index, to)
    }
}

impl Default for ColumnOrder {
    fn default() -> Self {
        Self::new(
            [Field::UserId, Field::Id, Field::Title]
                .into_iter()
                .map(ColumnDescriptor::new)
                .collect(),
        )
    }
}
