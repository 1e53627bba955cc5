//! Database layer for the inventory store
//!
//! Handles SQLite database operations including:
//! - Schema creation and migrations
//! - CRUD operations for users, categories and items
//! - Parameterised filter queries

pub mod models;
pub mod schema;
pub mod connection;
pub mod migrations;
pub mod queries;

pub use connection::Database;
pub use models::*;
