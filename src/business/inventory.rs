//! Main Inventory API
//!
//! This module provides the primary interface for interacting with
//! an inventory database.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::database::{Category, Database, Item, migrations, queries};
use crate::database::queries::InventoryStats;
use crate::error::{InventoryError, Result};
use crate::utils::generate_database_id;
use crate::{DATABASE_FILENAME, DB_VERSION};

/// Main inventory interface
pub struct Inventory {
    /// Path to the database file
    pub(crate) path: PathBuf,
    /// Database connection
    pub(crate) db: Option<Database>,
    /// Cached items, ordered by name
    pub(crate) items_cache: Option<Vec<Item>>,
    /// Cached categories, ordered by name
    pub(crate) categories_cache: Option<Vec<Category>>,
}

impl Inventory {
    /// Open an existing inventory database, upgrading older schemas in place
    pub fn open(db_path: &Path) -> Result<Self> {
        if !db_path.exists() {
            return Err(InventoryError::DatabaseNotFound(
                db_path.to_string_lossy().to_string()
            ));
        }

        let mut db = Database::open(db_path)?;

        let version = migrations::get_database_version(db.connection()?)?;
        if !migrations::is_version_compatible(&version) {
            return Err(InventoryError::InvalidVersion(version));
        }
        if version != DB_VERSION {
            Self::upgrade(&mut db, &version)?;
        }

        Ok(Self::from_database(db_path.to_path_buf(), db))
    }

    /// Create a new inventory database at the given path
    pub fn create(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(db_path)?;
        queries::set_properties(db.connection()?, &generate_database_id(), DB_VERSION)?;
        info!(path = %db_path.display(), "Created inventory database");

        Ok(Self::from_database(db_path.to_path_buf(), db))
    }

    /// Open the inventory in `folder`, creating it on first use
    pub fn open_or_create(folder: &Path) -> Result<Self> {
        Self::open_or_create_file(&folder.join(DATABASE_FILENAME))
    }

    /// Open the database file, creating it on first use
    pub fn open_or_create_file(db_path: &Path) -> Result<Self> {
        if db_path.exists() {
            Self::open(db_path)
        } else {
            Self::create(db_path)
        }
    }

    /// Throw-away in-memory inventory
    pub fn in_memory() -> Result<Self> {
        let db = Database::in_memory()?;
        queries::set_properties(db.connection()?, &generate_database_id(), DB_VERSION)?;
        Ok(Self::from_database(PathBuf::from(":memory:"), db))
    }

    fn from_database(path: PathBuf, db: Database) -> Self {
        Self {
            path,
            db: Some(db),
            items_cache: None,
            categories_cache: None,
        }
    }

    fn upgrade(db: &mut Database, from_version: &str) -> Result<()> {
        info!(from = from_version, to = DB_VERSION, "Upgrading database schema");
        db.begin_transaction()?;

        let result = (|| -> Result<()> {
            let conn = db.connection()?;
            migrations::upgrade_database(conn, from_version)?;
            migrations::set_database_version(conn, DB_VERSION)
        })();

        match result {
            Ok(()) => db.commit_transaction(),
            Err(e) => {
                db.rollback_transaction()?;
                Err(e)
            }
        }
    }

    /// Connection of the open database
    pub(crate) fn conn(&self) -> Result<&Connection> {
        self.db.as_ref()
            .ok_or_else(|| InventoryError::DatabaseError("Database not open".to_string()))?
            .connection()
    }

    /// Clear all caches
    pub(crate) fn clear_caches(&mut self) {
        self.items_cache = None;
        self.categories_cache = None;
    }

    /// Close the inventory
    pub fn close(&mut self) {
        self.clear_caches();
        if let Some(mut db) = self.db.take() {
            db.close();
            debug!(path = %self.path.display(), "Closed inventory");
        }
    }

    /// Check if the database is open
    pub fn is_open(&self) -> bool {
        self.db.is_some()
    }

    /// Get the database path
    pub fn database_path(&self) -> &Path {
        &self.path
    }

    /// Schema version stored in the database
    pub fn version(&self) -> Result<String> {
        migrations::get_database_version(self.conn()?)
    }

    /// Unique ID generated when the database was created
    pub fn database_id(&self) -> Result<Option<String>> {
        queries::get_database_id(self.conn()?)
    }

    /// Counts for the menu banner
    pub fn stats(&self) -> Result<InventoryStats> {
        queries::get_inventory_stats(self.conn()?)
    }
}

impl Drop for Inventory {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub fn create_test_inventory() -> (Inventory, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let inventory = Inventory::create(&temp_dir.path().join(DATABASE_FILENAME)).unwrap();
        (inventory, temp_dir)
    }

    #[test]
    fn test_create_and_reopen() {
        let (mut inventory, temp) = create_test_inventory();
        assert!(inventory.is_open());
        let id = inventory.database_id().unwrap().unwrap();
        assert_eq!(id.len(), 32);
        inventory.close();
        assert!(!inventory.is_open());
        assert!(inventory.version().is_err());

        let reopened = Inventory::open(&temp.path().join(DATABASE_FILENAME)).unwrap();
        assert_eq!(reopened.version().unwrap(), DB_VERSION);
        assert_eq!(reopened.database_id().unwrap().unwrap(), id);
    }

    #[test]
    fn test_open_nonexistent() {
        let result = Inventory::open(Path::new("/nonexistent/path/inventory.db"));
        assert!(matches!(result, Err(InventoryError::DatabaseNotFound(_))));
    }

    #[test]
    fn test_open_or_create_creates_folder() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("nested").join("data");
        let inventory = Inventory::open_or_create(&folder).unwrap();
        assert_eq!(inventory.database_path(), folder.join(DATABASE_FILENAME));
        assert!(folder.join(DATABASE_FILENAME).exists());
        drop(inventory);

        Inventory::open_or_create(&folder).unwrap();
    }

    #[test]
    fn test_rejects_newer_version() {
        let (inventory, temp) = create_test_inventory();
        migrations::set_database_version(inventory.conn().unwrap(), "99").unwrap();
        drop(inventory);

        let result = Inventory::open(&temp.path().join(DATABASE_FILENAME));
        assert!(matches!(result, Err(InventoryError::InvalidVersion(v)) if v == "99"));
    }

    const LEGACY_V1_SCHEMA: &str = r#"
        CREATE TABLE inventory_properties (
            database_id TEXT PRIMARY KEY, version TEXT,
            create_timestamp TEXT, update_timestamp TEXT
        );
        INSERT INTO inventory_properties (database_id, version) VALUES ('legacy', '1');
        CREATE TABLE users (
            user_id TEXT PRIMARY KEY, user_email TEXT UNIQUE, user_username TEXT,
            user_password TEXT, user_address TEXT, user_type TEXT, salt TEXT
        );
        CREATE TABLE categories (category_id TEXT PRIMARY KEY, category_name TEXT UNIQUE);
        CREATE TABLE items (
            item_id TEXT PRIMARY KEY, item_name TEXT UNIQUE, item_description TEXT,
            item_price INTEGER, item_status TEXT, item_quantity_available INTEGER,
            item_sold INTEGER, item_min_quantity INTEGER
        );
    "#;

    fn create_legacy_database(rows: &str) -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DATABASE_FILENAME);
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(LEGACY_V1_SCHEMA).unwrap();
        conn.execute_batch(rows).unwrap();
        (temp, path)
    }

    #[test]
    fn test_open_upgrades_v1_database() {
        let (_temp, path) = create_legacy_database(
            "INSERT INTO items VALUES ('i1', 'Bolt', '', 5, 'whatever', 10, 7, 5);",
        );

        let mut inventory = Inventory::open(&path).unwrap();
        assert_eq!(inventory.version().unwrap(), DB_VERSION);

        let item = inventory.get_item("i1").unwrap().unwrap();
        assert_eq!(item.stock, 3);
        assert_eq!(item.status, crate::ItemStatus::LowStock);
    }

    #[test]
    fn test_upgraded_legacy_rows_stay_readable() {
        let (_temp, path) = create_legacy_database(
            r#"
            INSERT INTO items VALUES ('i1', 'Bolt', NULL, 5, 'InStock', 10, 2, 1);
            INSERT INTO items VALUES ('i2', 'Nut', '', 5, 'InStock', -4, NULL, 1);
        "#,
        );

        let mut inventory = Inventory::open(&path).unwrap();
        assert_eq!(inventory.get_items().unwrap().len(), 2);

        let bolt = inventory.get_item("i1").unwrap().unwrap();
        assert_eq!(bolt.description, "");
        assert_eq!(bolt.stock, 8);

        let nut = inventory.get_item("i2").unwrap().unwrap();
        assert_eq!((nut.quantity, nut.sold, nut.stock), (0, 0, 0));
        assert_eq!(nut.status, crate::ItemStatus::OutOfStock);
    }

    #[test]
    fn test_upgraded_oversold_item_can_be_edited() {
        let (_temp, path) = create_legacy_database(
            "INSERT INTO items VALUES ('i1', 'Bolt', '', 5, 'InStock', 5, 7, 1);",
        );

        let mut inventory = Inventory::open(&path).unwrap();
        let item = inventory.get_item("i1").unwrap().unwrap();
        assert_eq!((item.quantity, item.sold, item.stock), (5, 5, 0));

        let update = crate::ItemUpdate { price: Some(9), ..Default::default() };
        assert!(inventory.update_item("i1", update).unwrap());
        assert_eq!(inventory.get_item("i1").unwrap().unwrap().price, 9);

        assert!(inventory.update_quantity("i1", 8).unwrap());
        assert_eq!(inventory.get_item("i1").unwrap().unwrap().stock, 3);
    }

    #[test]
    fn test_in_memory() {
        let inventory = Inventory::in_memory().unwrap();
        assert_eq!(inventory.version().unwrap(), DB_VERSION);
        assert_eq!(inventory.stats().unwrap(), InventoryStats::default());
    }
}
