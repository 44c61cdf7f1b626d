//! Terminal front end: ratatui rendering and crossterm event mapping

pub mod table_app;
pub mod table_renderer;
