//! Password hashing and verification
//!
//! Layout of the stored value (before base64):
//!
//! ```text
//! +----------------+----------------------+
//! | salt (16 B)    | PBKDF2 output (20 B) |
//! +----------------+----------------------+
//! ```
//!
//! The salt is also persisted on its own (base64) so that login can re-derive
//! the stored value and compare.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha1::Sha1;

use crate::error::{InventoryError, Result};
use crate::{HASH_LENGTH, PBKDF2_ITERATIONS, SALT_LENGTH};

/// A freshly hashed credential ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword {
    /// Base64 of the raw salt bytes
    pub salt: String,
    /// Base64 of `salt ‖ hash`
    pub stored: String,
}

/// Generate a random salt from the thread-local CSPRNG
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    rand::rng().fill_bytes(&mut salt);
    salt
}

/// Derive the stored value for `password` under `salt`
pub fn hash_password(password: &str, salt: &[u8; SALT_LENGTH]) -> String {
    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha1>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut hash);

    let mut combined = [0u8; SALT_LENGTH + HASH_LENGTH];
    combined[..SALT_LENGTH].copy_from_slice(salt);
    combined[SALT_LENGTH..].copy_from_slice(&hash);

    STANDARD.encode(combined)
}

/// Hash a password with a brand new salt (registration and reset)
pub fn hash_new_password(password: &str) -> HashedPassword {
    let salt = generate_salt();
    HashedPassword {
        salt: STANDARD.encode(salt),
        stored: hash_password(password, &salt),
    }
}

/// Decode a persisted base64 salt
pub fn decode_salt(salt_b64: &str) -> Result<[u8; SALT_LENGTH]> {
    let bytes = STANDARD
        .decode(salt_b64.trim())
        .map_err(|e| InventoryError::CredentialError(format!("salt is not base64: {}", e)))?;

    bytes.as_slice().try_into().map_err(|_| {
        InventoryError::CredentialError(format!(
            "salt must be {} bytes, got {}",
            SALT_LENGTH,
            bytes.len()
        ))
    })
}

/// Check `password` against a persisted salt and stored value
pub fn verify_password(password: &str, salt_b64: &str, stored: &str) -> Result<bool> {
    let salt = decode_salt(salt_b64)?;
    let computed = hash_password(password, &salt);
    Ok(constant_time_eq(computed.as_bytes(), stored.as_bytes()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
