//! Data models for inventory database entities

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// Access level of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Read-only access to the catalogue
    #[default]
    User,
    /// Full access to items and categories
    Admin,
}

impl UserRole {
    /// Value persisted in the `user_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    /// True for admin accounts
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => Err(InventoryError::InvalidInput(format!("unknown role '{}'", other))),
        }
    }
}

/// Stock status of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    InStock,
    OutOfStock,
    LowStock,
    /// Fallback for persisted values that do not parse
    Unknown,
}

impl ItemStatus {
    /// All statuses, in display order
    pub const ALL: [ItemStatus; 4] = [
        ItemStatus::InStock,
        ItemStatus::LowStock,
        ItemStatus::OutOfStock,
        ItemStatus::Unknown,
    ];

    /// Value persisted in the `item_status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::InStock => "InStock",
            ItemStatus::OutOfStock => "OutOfStock",
            ItemStatus::LowStock => "LowStock",
            ItemStatus::Unknown => "Unknown",
        }
    }

    /// Parse a persisted value, mapping anything unrecognised to `Unknown`
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(ItemStatus::Unknown)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ItemStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| InventoryError::InvalidInput(format!("unknown status '{}'", wanted)))
    }
}

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: String,
    /// Login email, stored lowercased
    pub email: String,
    /// Display name
    pub username: String,
    /// Stored credential: base64(salt ‖ hash)
    #[serde(skip_serializing)]
    pub password: String,
    /// Postal address
    pub address: String,
    /// Base64 salt used for `password`
    #[serde(skip_serializing)]
    pub salt: String,
    /// Access level
    pub role: UserRole,
}

/// Registration request
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    /// Plain-text password, hashed before it reaches the store
    pub password: String,
    pub address: String,
    pub role: UserRole,
}

/// Item category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique category ID (UUID)
    pub id: String,
    /// Unique category name
    pub name: String,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Inventory item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique item ID (UUID)
    pub id: String,
    /// Unique item name
    pub name: String,
    pub description: String,
    /// Unit price in minor currency units
    pub price: u32,
    /// Derived from stock and minimum quantity
    pub status: ItemStatus,
    /// Units ever received
    pub quantity: u32,
    /// Units sold
    pub sold: u32,
    /// Threshold below which the item is low on stock
    pub min_quantity: u32,
    /// `quantity - sold`
    pub stock: u32,
    /// Owning category, if any
    pub category_id: Option<String>,
    /// Creation timestamp
    pub create_timestamp: DateTime<Utc>,
    /// Last modification timestamp
    pub change_timestamp: DateTime<Utc>,
}

impl Item {
    /// True when the item should be reordered
    pub fn needs_restock(&self) -> bool {
        matches!(self.status, ItemStatus::LowStock | ItemStatus::OutOfStock)
    }
}

/// Request to create an item. Stock and status are derived, never supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub price: u32,
    pub quantity: u32,
    pub sold: u32,
    pub min_quantity: u32,
    pub category_id: Option<String>,
}

impl NewItem {
    /// Create a request with no description, nothing sold and no category
    pub fn new(name: &str, price: u32, quantity: u32, min_quantity: u32) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            price,
            quantity,
            sold: 0,
            min_quantity,
            category_id: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_sold(mut self, sold: u32) -> Self {
        self.sold = sold;
        self
    }

    pub fn with_category(mut self, category_id: &str) -> Self {
        self.category_id = Some(category_id.to_string());
        self
    }
}

/// Partial update of an item; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u32>,
    pub quantity: Option<u32>,
    pub sold: Option<u32>,
    pub min_quantity: Option<u32>,
    /// `Some(None)` clears the category
    pub category_id: Option<Option<String>>,
}

impl ItemUpdate {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        *self == ItemUpdate::default()
    }
}
