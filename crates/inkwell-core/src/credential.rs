//! Password hashing and verification.
//!
//! Hashes are Argon2id PHC strings with a fresh random salt per call, so the
//! same password never hashes to the same string twice.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::{Error, Result};

/// Hash `plaintext` into a self-describing PHC string.
pub fn hash(plaintext: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(plaintext.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::Hash(e.to_string()))
}

/// Check `plaintext` against a stored hash. A malformed hash verifies as
/// `false`; the digest comparison itself is constant-time.
pub fn verify(plaintext: &str, hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(plaintext.as_bytes(), &parsed)
    .is_ok()
}
