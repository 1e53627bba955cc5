//! Database schema definitions

/// SQL to create the properties table
pub const CREATE_PROPERTIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS inventory_properties (
    database_id     CHAR(32) NOT NULL PRIMARY KEY,
    version         CHAR(10),
    create_timestamp TEXT,
    update_timestamp TEXT
)
"#;

/// SQL to create the users table
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id         CHAR(36) NOT NULL PRIMARY KEY,
    user_email      VARCHAR NOT NULL UNIQUE,
    user_username   VARCHAR NOT NULL,
    user_password   CHAR(48) NOT NULL,
    user_address    VARCHAR NOT NULL DEFAULT '',
    user_type       VARCHAR NOT NULL DEFAULT 'user',
    salt            CHAR(24) NOT NULL
)
"#;

/// SQL to create the categories table
pub const CREATE_CATEGORIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    category_id     CHAR(36) NOT NULL PRIMARY KEY,
    category_name   VARCHAR NOT NULL COLLATE NOCASE UNIQUE
)
"#;

/// SQL to create the items table
pub const CREATE_ITEMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    item_id                 CHAR(36) NOT NULL PRIMARY KEY,
    item_name               VARCHAR NOT NULL COLLATE NOCASE UNIQUE,
    item_description        VARCHAR NOT NULL DEFAULT '',
    item_price              INTEGER NOT NULL DEFAULT 0,
    item_status             VARCHAR NOT NULL,
    item_quantity_available INTEGER NOT NULL DEFAULT 0,
    item_sold               INTEGER NOT NULL DEFAULT 0,
    item_min_quantity       INTEGER NOT NULL DEFAULT 0,
    item_stock              INTEGER NOT NULL DEFAULT 0,
    category_id             CHAR(36) REFERENCES categories(category_id) ON DELETE SET NULL,
    create_timestamp        TEXT,
    change_timestamp        TEXT
)
"#;

/// Index used by category filters
pub const CREATE_ITEMS_CATEGORY_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_items_category ON items (category_id)
"#;

/// All table creation statements in order
pub const CREATE_ALL_TABLES: &[&str] = &[
    CREATE_PROPERTIES_TABLE,
    CREATE_USERS_TABLE,
    CREATE_CATEGORIES_TABLE,
    CREATE_ITEMS_TABLE,
    CREATE_ITEMS_CATEGORY_INDEX,
];
