//! Data layer: records, the derived table view, column order and row editing
//!
//! Everything here is independent of the terminal and is recomputed or mutated
//! synchronously by the state container.

pub mod column_order;
pub mod data_view;
pub mod datatable;
pub mod datavalue_compare;
pub mod edit_session;
pub mod todo_store;
