pub mod api_client;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
pub mod utils;
