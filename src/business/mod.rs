//! Business logic layer for the inventory
//!
//! This module provides the high-level Inventory API for managing
//! users, categories, items and their derived stock status.

pub mod inventory;
pub mod users;
pub mod categories;
pub mod items;
pub mod search;
pub mod status;
pub mod filter;

pub use inventory::Inventory;
