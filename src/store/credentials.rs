//! Password hashing
//!
//! Hashes are bcrypt strings (`$2b$<cost>$...`), salt included.

use bcrypt::BcryptError;

/// Hash a password with a fresh random salt at the given bcrypt cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}

/// Check a password against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}
