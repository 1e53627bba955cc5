//! Database migration logic for version upgrades
//!
//! Version 1 stores only quantity, sold and minimum quantity per item.
//! Version 2 adds the stored stock column, the category reference and timestamps.

use rusqlite::Connection;
use tracing::{info, warn};
use crate::error::Result;

/// Current database version
pub const CURRENT_VERSION: &str = crate::DB_VERSION;

/// Upgrade database to the latest version
pub fn upgrade_database(conn: &Connection, current_version: &str) -> Result<()> {
    let version: u32 = current_version.parse().unwrap_or(1);

    if version < 2 {
        upgrade_to_v2(conn)?;
    }

    Ok(())
}

/// Upgrade from v1 to v2
/// Adds item_stock, category_id and timestamps, then recomputes stock and status
fn upgrade_to_v2(conn: &Connection) -> Result<()> {
    info!("Upgrading database to version 2");

    // ALTER fails when the column already exists; that is fine
    let _ = conn.execute("ALTER TABLE items ADD COLUMN item_stock INTEGER NOT NULL DEFAULT 0", []);
    let _ = conn.execute(
        "ALTER TABLE items ADD COLUMN category_id CHAR(36) REFERENCES categories(category_id) ON DELETE SET NULL",
        [],
    );
    let _ = conn.execute("ALTER TABLE items ADD COLUMN create_timestamp TEXT", []);
    let _ = conn.execute("ALTER TABLE items ADD COLUMN change_timestamp TEXT", []);

    normalize_legacy_rows(conn)?;

    conn.execute(
        "UPDATE items SET item_stock = MAX(item_quantity_available - item_sold, 0)",
        [],
    )?;
    conn.execute(
        "UPDATE items SET item_status = CASE
             WHEN item_stock = 0 THEN 'OutOfStock'
             WHEN item_stock < item_min_quantity THEN 'LowStock'
             ELSE 'InStock'
         END",
        [],
    )?;
    conn.execute(
        "UPDATE items SET create_timestamp = COALESCE(create_timestamp, datetime('now')),
                          change_timestamp = COALESCE(change_timestamp, datetime('now'))",
        [],
    )?;

    Ok(())
}

/// Bring v1 rows in line with the v2 column types and the
/// `quantity >= sold >= 0` rule before stock is recomputed
fn normalize_legacy_rows(conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE categories SET category_name = category_id WHERE category_name IS NULL",
        [],
    )?;
    conn.execute(
        "UPDATE items SET
             item_name = COALESCE(item_name, item_id),
             item_description = COALESCE(item_description, ''),
             item_price = MAX(COALESCE(item_price, 0), 0),
             item_quantity_available = MAX(COALESCE(item_quantity_available, 0), 0),
             item_sold = MAX(COALESCE(item_sold, 0), 0),
             item_min_quantity = MAX(COALESCE(item_min_quantity, 0), 0)",
        [],
    )?;

    let oversold = conn.execute(
        "UPDATE items SET item_sold = item_quantity_available
         WHERE item_sold > item_quantity_available",
        [],
    )?;
    if oversold > 0 {
        warn!(count = oversold, "Capped sold at quantity for legacy items");
    }

    Ok(())
}

/// Check if database version is compatible
pub fn is_version_compatible(version: &str) -> bool {
    let v: u32 = version.parse().unwrap_or(0);
    v <= CURRENT_VERSION.parse::<u32>().unwrap_or(2)
}

/// Get the current database version from properties
pub fn get_database_version(conn: &Connection) -> Result<String> {
    let version: String = conn.query_row(
        "SELECT version FROM inventory_properties LIMIT 1",
        [],
        |row| row.get(0),
    ).unwrap_or_else(|_| "1".to_string());

    Ok(version)
}

/// Set the database version in properties
pub fn set_database_version(conn: &Connection, version: &str) -> Result<()> {
    conn.execute(
        "UPDATE inventory_properties SET version = ?, update_timestamp = datetime('now')",
        [version],
    )?;
    Ok(())
}
