//! User operations
//!
//! Registration, login and credential management.

use tracing::{debug, info, warn};

use crate::crypto::{self, hash_password};
use crate::crypto::password::decode_salt;
use crate::database::{NewUser, User, UserRole, queries};
use crate::database::queries::RawUser;
use crate::error::{InventoryError, Result};
use crate::utils::generate_id;
use super::inventory::Inventory;

/// Canonical form of an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Inventory {
    /// Register a new user. Returns false when the email is already taken.
    pub fn register(&mut self, new_user: NewUser) -> Result<bool> {
        let email = normalize_email(&new_user.email);
        if email.is_empty() {
            return Err(InventoryError::InvalidInput("email must not be empty".to_string()));
        }
        let username = new_user.username.trim();
        if username.is_empty() {
            return Err(InventoryError::InvalidInput("username must not be empty".to_string()));
        }
        if new_user.password.is_empty() {
            return Err(InventoryError::InvalidInput("password must not be empty".to_string()));
        }

        let hashed = crypto::hash_new_password(&new_user.password);
        let raw = RawUser {
            user_id: generate_id(),
            email,
            username: username.to_string(),
            password: hashed.stored,
            address: new_user.address.trim().to_string(),
            user_type: new_user.role.as_str().to_string(),
            salt: hashed.salt,
        };

        let registered = queries::insert_user(self.conn()?, &raw)?;
        if registered {
            info!(email = %raw.email, role = %new_user.role, "Registered user");
        } else {
            debug!(email = %raw.email, "Email already registered");
        }
        Ok(registered)
    }

    /// Check credentials. Unknown emails and wrong passwords both give false.
    pub fn login(&self, email: &str, password: &str) -> Result<bool> {
        let email = normalize_email(email);
        let Some(raw) = queries::get_user_by_email(self.conn()?, &email)? else {
            warn!(email = %email, "Login for unknown email");
            return Ok(false);
        };

        let ok = crypto::verify_password(password, &raw.salt, &raw.password)?;
        if ok {
            info!(email = %email, "User logged in");
        } else {
            warn!(email = %email, "Wrong password");
        }
        Ok(ok)
    }

    /// Look up a user by email
    pub fn get_user(&self, email: &str) -> Result<Option<User>> {
        queries::get_user_by_email(self.conn()?, &normalize_email(email))?
            .map(user_from_raw)
            .transpose()
    }

    /// All users ordered by email
    pub fn list_users(&self) -> Result<Vec<User>> {
        queries::get_all_users(self.conn()?)?
            .into_iter()
            .map(user_from_raw)
            .collect()
    }

    /// Replace a user's password with a freshly salted hash.
    ///
    /// Returns false without writing when the new password is the current one.
    pub fn reset_password(&mut self, user: &mut User, new_password: &str) -> Result<bool> {
        let current_salt = decode_salt(&user.salt)?;
        if hash_password(new_password, &current_salt) == user.password {
            debug!(email = %user.email, "New password equals the current one");
            return Ok(false);
        }

        let hashed = crypto::hash_new_password(new_password);
        let conn = self.conn()?;
        if !queries::update_user_password(conn, &user.email, &hashed.stored, &hashed.salt)? {
            return Err(InventoryError::UserNotFound(user.email.clone()));
        }

        info!(email = %user.email, "Password reset");
        user.password = hashed.stored;
        user.salt = hashed.salt;
        Ok(true)
    }

    /// Change a user's role
    pub fn set_user_role(&mut self, user_id: &str, role: UserRole) -> Result<bool> {
        let changed = queries::update_user_role(self.conn()?, user_id, role.as_str())?;
        if changed {
            info!(user_id, %role, "Changed user role");
        }
        Ok(changed)
    }

    /// Delete a user. Returns false when the ID does not exist.
    pub fn delete_user(&mut self, user_id: &str) -> Result<bool> {
        let deleted = queries::delete_user(self.conn()?, user_id)?;
        if deleted {
            info!(user_id, "Deleted user");
        }
        Ok(deleted)
    }
}

fn user_from_raw(raw: RawUser) -> Result<User> {
    Ok(User {
        role: raw.user_type.parse()?,
        id: raw.user_id,
        email: raw.email,
        username: raw.username,
        password: raw.password,
        address: raw.address,
        salt: raw.salt,
    })
}
