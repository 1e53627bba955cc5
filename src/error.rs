//! Error types for the inventory core

use thiserror::Error;

/// Main error type for inventory operations
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Database file not found at the specified path
    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Stored credential could not be decoded
    #[error("Credential error: {0}")]
    CredentialError(String),

    /// Item not found
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Category not found
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Caller supplied a value that violates an invariant
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid database version
    #[error("Invalid database version: {0}")]
    InvalidVersion(String),

    /// Settings could not be read or written
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Operation not permitted for the current user
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

impl From<rusqlite::Error> for InventoryError {
    fn from(err: rusqlite::Error) -> Self {
        InventoryError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::ConfigError(err.to_string())
    }
}

impl InventoryError {
    /// Errors caused by what the user typed; the session reports them and carries on
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            InventoryError::InvalidInput(_)
                | InventoryError::ItemNotFound(_)
                | InventoryError::CategoryNotFound(_)
                | InventoryError::UserNotFound(_)
                | InventoryError::PermissionDenied(_)
        )
    }
}

/// Result type alias for inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InventoryError::DatabaseNotFound("/path/to/db".to_string());
        assert!(err.to_string().contains("/path/to/db"));

        let err = InventoryError::ItemNotFound("item123".to_string());
        assert!(err.to_string().contains("item123"));

        let err = InventoryError::InvalidInput("sold exceeds quantity".to_string());
        assert_eq!(err.to_string(), "Invalid input: sold exceeds quantity");

        let err = InventoryError::InvalidVersion("999".to_string());
        assert!(err.to_string().contains("999"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(InventoryError::InvalidInput("x".to_string()).is_recoverable());
        assert!(InventoryError::PermissionDenied("x".to_string()).is_recoverable());
        assert!(!InventoryError::DatabaseError("x".to_string()).is_recoverable());
        assert!(!InventoryError::CredentialError("x".to_string()).is_recoverable());
    }

    #[test]
    fn test_error_from_rusqlite() {
        let sqlite_err = rusqlite::Error::QueryReturnedNoRows;
        let err: InventoryError = sqlite_err.into();
        match err {
            InventoryError::DatabaseError(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected DatabaseError"),
        }
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: InventoryError = json_err.into();
        assert!(matches!(err, InventoryError::ConfigError(_)));
    }
}
