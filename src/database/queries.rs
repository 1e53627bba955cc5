//! SQL query operations for database access
//!
//! This module provides low-level query functions for database operations.
//! For business-level operations, use the Inventory API.

use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use rusqlite::types::Value;
use chrono::{DateTime, Utc};
use crate::error::Result;

/// Timestamp format used in database
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a DateTime for database storage
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp from database
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    chrono::NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .map(|ndt| DateTime::from_naive_utc_and_offset(ndt, Utc))
}

/// Get current timestamp formatted for database
pub fn now_timestamp() -> String {
    format_timestamp(&Utc::now())
}

// ============================================================================
// Properties queries
// ============================================================================

/// Get database ID from properties
pub fn get_database_id(conn: &Connection) -> Result<Option<String>> {
    let result = conn.query_row(
        "SELECT database_id FROM inventory_properties LIMIT 1",
        [],
        |row| row.get(0),
    );
    Ok(result.ok())
}

/// Set properties (insert new row)
pub fn set_properties(conn: &Connection, database_id: &str, version: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO inventory_properties (database_id, version, create_timestamp, update_timestamp)
         VALUES (?, ?, ?, ?)",
        params![database_id, version, now_timestamp(), now_timestamp()],
    )?;
    Ok(())
}

// ============================================================================
// Users queries
// ============================================================================

const USER_COLUMNS: &str =
    "user_id, user_email, user_username, user_password, user_address, user_type, salt";

fn read_user(row: &Row<'_>) -> rusqlite::Result<RawUser> {
    Ok(RawUser {
        user_id: row.get(0)?,
        email: row.get(1)?,
        username: row.get(2)?,
        password: row.get(3)?,
        address: row.get(4)?,
        user_type: row.get(5)?,
        salt: row.get(6)?,
    })
}

/// Insert a user unless the email is taken. Returns true when a row was written.
pub fn insert_user(conn: &Connection, user: &RawUser) -> Result<bool> {
    let rows = conn.execute(
        "INSERT INTO users (user_id, user_email, user_username, user_password, user_address, user_type, salt)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(user_email) DO NOTHING",
        params![
            user.user_id,
            user.email,
            user.username,
            user.password,
            user.address,
            user.user_type,
            user.salt
        ],
    )?;
    Ok(rows > 0)
}

/// Get a user by email
pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<RawUser>> {
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE user_email = ?", USER_COLUMNS),
            params![email],
            read_user,
        )
        .optional()?;
    Ok(user)
}

/// Get all users ordered by email
pub fn get_all_users(conn: &Connection) -> Result<Vec<RawUser>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users ORDER BY user_email",
        USER_COLUMNS
    ))?;
    let users = stmt.query_map([], read_user)?;
    users.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Replace the stored credential for a user
pub fn update_user_password(
    conn: &Connection,
    email: &str,
    password: &str,
    salt: &str,
) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE users SET user_password = ?, salt = ? WHERE user_email = ?",
        params![password, salt, email],
    )?;
    Ok(rows > 0)
}

/// Change a user's role
pub fn update_user_role(conn: &Connection, user_id: &str, user_type: &str) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE users SET user_type = ? WHERE user_id = ?",
        params![user_type, user_id],
    )?;
    Ok(rows > 0)
}

/// Delete a user by ID
pub fn delete_user(conn: &Connection, user_id: &str) -> Result<bool> {
    let rows = conn.execute("DELETE FROM users WHERE user_id = ?", params![user_id])?;
    Ok(rows > 0)
}

// ============================================================================
// Categories queries
// ============================================================================

/// Get all categories ordered by name
pub fn get_all_categories(conn: &Connection) -> Result<Vec<RawCategory>> {
    let mut stmt = conn.prepare(
        "SELECT category_id, category_name FROM categories ORDER BY category_name COLLATE NOCASE"
    )?;

    let categories = stmt.query_map([], |row| {
        Ok(RawCategory {
            category_id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;

    categories.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Insert a category unless the name is taken
pub fn insert_category(conn: &Connection, category_id: &str, name: &str) -> Result<bool> {
    let rows = conn.execute(
        "INSERT INTO categories (category_id, category_name) VALUES (?, ?)
         ON CONFLICT(category_name) DO NOTHING",
        params![category_id, name],
    )?;
    Ok(rows > 0)
}

/// Rename a category. Returns false when the ID is unknown or the name is taken.
pub fn rename_category(conn: &Connection, category_id: &str, name: &str) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE OR IGNORE categories SET category_name = ? WHERE category_id = ?",
        params![name, category_id],
    )?;
    Ok(rows > 0)
}

/// Delete a category; items referencing it are uncategorised by the foreign key
pub fn delete_category(conn: &Connection, category_id: &str) -> Result<bool> {
    let rows = conn.execute(
        "DELETE FROM categories WHERE category_id = ?",
        params![category_id],
    )?;
    Ok(rows > 0)
}

// ============================================================================
// Items queries
// ============================================================================

const ITEM_COLUMNS: &str = "item_id, item_name, item_description, item_price, item_status, \
    item_quantity_available, item_sold, item_min_quantity, item_stock, category_id, \
    create_timestamp, change_timestamp";

fn read_item(row: &Row<'_>) -> rusqlite::Result<RawItem> {
    Ok(RawItem {
        item_id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        status: row.get(4)?,
        quantity: row.get(5)?,
        sold: row.get(6)?,
        min_quantity: row.get(7)?,
        stock: row.get(8)?,
        category_id: row.get(9)?,
        create_timestamp: row.get(10)?,
        change_timestamp: row.get(11)?,
    })
}

/// Get all items ordered by name
pub fn get_all_items_raw(conn: &Connection) -> Result<Vec<RawItem>> {
    query_items_where(conn, "1 = 1", Vec::new())
}

/// Get items matching a WHERE fragment. The fragment must only reference
/// positional parameters; values are always bound, never interpolated.
pub fn query_items_where(
    conn: &Connection,
    where_clause: &str,
    values: Vec<Value>,
) -> Result<Vec<RawItem>> {
    let sql = format!(
        "SELECT {} FROM items WHERE {} ORDER BY item_name COLLATE NOCASE",
        ITEM_COLUMNS, where_clause
    );
    let mut stmt = conn.prepare(&sql)?;
    let items = stmt.query_map(params_from_iter(values), read_item)?;
    items.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Get a single item by ID
pub fn get_item_raw(conn: &Connection, item_id: &str) -> Result<Option<RawItem>> {
    let item = conn
        .query_row(
            &format!("SELECT {} FROM items WHERE item_id = ?", ITEM_COLUMNS),
            params![item_id],
            read_item,
        )
        .optional()?;
    Ok(item)
}

/// Insert an item unless the name is taken
pub fn insert_item(conn: &Connection, item: &RawItem) -> Result<bool> {
    let rows = conn.execute(
        "INSERT INTO items (item_id, item_name, item_description, item_price, item_status,
                            item_quantity_available, item_sold, item_min_quantity, item_stock,
                            category_id, create_timestamp, change_timestamp)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(item_name) DO NOTHING",
        params![
            item.item_id,
            item.name,
            item.description,
            item.price,
            item.status,
            item.quantity,
            item.sold,
            item.min_quantity,
            item.stock,
            item.category_id,
            item.create_timestamp,
            item.change_timestamp
        ],
    )?;
    Ok(rows > 0)
}

/// Overwrite every mutable column of an item. Returns false when the ID is
/// unknown or the new name collides with another item.
pub fn update_item(conn: &Connection, item: &RawItem) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE OR IGNORE items SET
             item_name = ?, item_description = ?, item_price = ?, item_status = ?,
             item_quantity_available = ?, item_sold = ?, item_min_quantity = ?, item_stock = ?,
             category_id = ?, change_timestamp = ?
         WHERE item_id = ?",
        params![
            item.name,
            item.description,
            item.price,
            item.status,
            item.quantity,
            item.sold,
            item.min_quantity,
            item.stock,
            item.category_id,
            now_timestamp(),
            item.item_id
        ],
    )?;
    Ok(rows > 0)
}

/// Delete an item by ID
pub fn delete_item(conn: &Connection, item_id: &str) -> Result<bool> {
    let rows = conn.execute("DELETE FROM items WHERE item_id = ?", params![item_id])?;
    Ok(rows > 0)
}

/// Inventory statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryStats {
    /// Number of items
    pub total_items: u32,
    /// Number of categories
    pub total_categories: u32,
    /// Items with status LowStock
    pub low_stock_items: u32,
    /// Items with status OutOfStock
    pub out_of_stock_items: u32,
    /// Sum of stock over all items
    pub units_in_stock: u64,
}

/// Get inventory statistics
pub fn get_inventory_stats(conn: &Connection) -> Result<InventoryStats> {
    let count = |sql: &str| -> Result<u32> { Ok(conn.query_row(sql, [], |row| row.get(0))?) };

    let units_in_stock: i64 = conn.query_row(
        "SELECT COALESCE(SUM(item_stock), 0) FROM items",
        [],
        |row| row.get(0),
    )?;

    Ok(InventoryStats {
        total_items: count("SELECT COUNT(*) FROM items")?,
        total_categories: count("SELECT COUNT(*) FROM categories")?,
        low_stock_items: count("SELECT COUNT(*) FROM items WHERE item_status = 'LowStock'")?,
        out_of_stock_items: count("SELECT COUNT(*) FROM items WHERE item_status = 'OutOfStock'")?,
        units_in_stock: units_in_stock.max(0) as u64,
    })
}

// ============================================================================
// Raw data structures
// ============================================================================

/// Raw user row
#[derive(Debug, Clone)]
pub struct RawUser {
    pub user_id: String,
    pub email: String,
    pub username: String,
    /// base64(salt ‖ hash)
    pub password: String,
    pub address: String,
    /// "user" or "admin"
    pub user_type: String,
    /// base64 salt
    pub salt: String,
}

/// Raw category row
#[derive(Debug, Clone)]
pub struct RawCategory {
    pub category_id: String,
    pub name: String,
}

/// Raw item row (status still a string)
#[derive(Debug, Clone)]
pub struct RawItem {
    pub item_id: String,
    pub name: String,
    pub description: String,
    pub price: u32,
    /// Persisted status name, may be anything
    pub status: String,
    pub quantity: u32,
    pub sold: u32,
    pub min_quantity: u32,
    pub stock: u32,
    pub category_id: Option<String>,
    pub create_timestamp: Option<String>,
    pub change_timestamp: Option<String>,
}
