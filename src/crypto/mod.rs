//! Credential hashing
//!
//! PBKDF2-HMAC-SHA1 with a per-credential random salt. The stored value is
//! `base64(salt ‖ hash)` so it stays byte-compatible with existing user rows.

pub mod password;

pub use password::{
    HashedPassword, generate_salt, hash_new_password, hash_password, verify_password,
};
