//! State management for the table screen
//!
//! `TableState` is the single owner of the records and every UI selection;
//! `StateEvent` is the only way to change it.

pub mod dispatcher;
pub mod events;
pub mod table_state;
