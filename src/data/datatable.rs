use serde::{Deserialize, Serialize};
use std::fmt;

/// One todo item as delivered by the remote source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub user_id: i64,
    pub id: i64,
    pub title: String,
}

impl Todo {
    pub fn new(user_id: i64, id: i64, title: impl Into<String>) -> Self {
        Self {
            user_id,
            id,
            title: title.into(),
        }
    }

    /// Value of a single field, typed for comparison
    pub fn value(&self, field: Field) -> DataValue {
        match field {
            Field::UserId => DataValue::Integer(self.user_id),
            Field::Id => DataValue::Integer(self.id),
            Field::Title => DataValue::String(self.title.clone()),
        }
    }

    /// Display form of a field, as rendered in a table cell
    pub fn display(&self, field: Field) -> String {
        self.value(field).to_string()
    }
}

/// The fields of a [`Todo`] that can drive search, sort and display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "userId")]
    UserId,
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "title")]
    Title,
}

impl Field {
    /// Category selector order
    pub const ALL: [Field; 3] = [Field::Id, Field::UserId, Field::Title];

    /// Name used on the wire and in config files
    pub fn name(&self) -> &'static str {
        match self {
            Field::UserId => "userId",
            Field::Id => "id",
            Field::Title => "title",
        }
    }

    /// Header label for the table column
    pub fn label(&self) -> &'static str {
        match self {
            Field::UserId => "User Id",
            Field::Id => "Todo Id",
            Field::Title => "Title",
        }
    }

    /// Only the title can be changed through an edit session
    pub fn is_editable(&self) -> bool {
        matches!(self, Field::Title)
    }

    pub fn parse(name: &str) -> Option<Field> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    Integer(i64),
    String(String),
    Null,
}

impl DataValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Lower-cased string form used by the search filter. `None` for null values,
    /// which never match a search.
    pub fn search_text(&self) -> Option<String> {
        match self {
            DataValue::Null => None,
            other => Some(other.to_string().to_lowercase()),
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::Null => Ok(()),
        }
    }
}
