//! Configuration module
//!
//! Settings file handling: source endpoint, display and startup defaults.

pub mod config;
