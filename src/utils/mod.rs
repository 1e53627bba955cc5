//! Utility functions

pub mod id_gen;

pub use id_gen::{generate_database_id, generate_id};
