//! # Inventory Management Core
//!
//! Item, category and user stores for a console inventory tool.
//!
//! ## Features
//!
//! - SQLite storage with schema migrations
//! - Salted PBKDF2-HMAC-SHA1 credentials
//! - Stock and status derivation (`stock = quantity - sold`)
//! - Criteria filtering over items with whitelisted operators
//! - Role-aware console session (users and admins)
//!
//! ## Example
//!
//! ```no_run
//! use imscore::{Inventory, NewItem};
//! use std::path::Path;
//!
//! let mut inventory = Inventory::open_or_create(Path::new("/path/to/data")).unwrap();
//!
//! let id = inventory.add_item(&NewItem::new("Widget", 250, 40, 5)).unwrap();
//! inventory.sell_item(&id.unwrap(), 3).unwrap();
//!
//! for item in inventory.get_items().unwrap() {
//!     println!("{}: {} in stock ({})", item.name, item.stock, item.status);
//! }
//! ```

pub mod crypto;
pub mod database;
pub mod business;
pub mod commands;
pub mod session;
pub mod config;
pub mod utils;
pub mod error;

// Re-export main types
pub use error::{InventoryError, Result};
pub use database::models::{
    Category, Item, ItemStatus, ItemUpdate, NewItem, NewUser, User, UserRole,
};
pub use business::Inventory;
pub use business::filter::{Comparison, Criteria, FilterField};
pub use business::status::{derive_status, derive_stock};
pub use session::{MenuCommand, Session};

/// Database version constant
pub const DB_VERSION: &str = "2";

/// Database filename
pub const DATABASE_FILENAME: &str = "inventory.db";

/// PBKDF2 iteration count
pub const PBKDF2_ITERATIONS: u32 = 10_000;

/// Salt length in bytes
pub const SALT_LENGTH: usize = 16;

/// Derived hash length in bytes
pub const HASH_LENGTH: usize = 20;

/// Minimum search phrase length
pub const SEARCH_MIN_LENGTH: usize = 2;
