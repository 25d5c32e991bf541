//! Sign-in code generation and hashing.

use anyhow::anyhow;
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::RngExt;

use crate::error::AdminAuthError;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*-_=+";

/// Generate a sign-in code with length drawn uniformly from
/// `[min_len, max_len]`, from the thread-local CSPRNG.
///
/// Redraws until the code contains at least one character of each class
/// (upper, lower, digit, symbol). At the configured lengths a redraw is
/// rare, so the loop terminates almost immediately.
pub fn generate_code(min_len: usize, max_len: usize) -> String {
    let charset: Vec<u8> = [UPPER, LOWER, DIGITS, SYMBOLS].concat();
    let mut rng = rand::rng();
    loop {
        let len = rng.random_range(min_len..=max_len);
        let code: String = (0..len)
            .map(|_| charset[rng.random_range(0..charset.len())] as char)
            .collect();
        if has_all_classes(&code) {
            return code;
        }
    }
}

fn has_all_classes(code: &str) -> bool {
    code.bytes().any(|b| UPPER.contains(&b))
        && code.bytes().any(|b| LOWER.contains(&b))
        && code.bytes().any(|b| DIGITS.contains(&b))
        && code.bytes().any(|b| SYMBOLS.contains(&b))
}

/// Hash a code for storage. The salt is randomized per call, so hashing the
/// same code twice yields different digests.
pub fn hash_code(code: &str) -> Result<String, AdminAuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(code.as_bytes(), &salt)
        .map_err(|e| AdminAuthError::Internal(anyhow!("hash code: {e}")))?;
    Ok(digest.to_string())
}

/// Check a candidate code against a stored digest. Constant-time with
/// respect to correctness; an unparsable digest reports a plain mismatch.
pub fn verify_code(code: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(code.as_bytes(), &parsed)
        .is_ok()
}

/// Audit-safe rendition of a code: everything but the last three characters
/// masked, e.g. `****k3F`.
pub fn masked_tail(code: &str) -> String {
    let tail: String = code.chars().skip(code.chars().count().saturating_sub(3)).collect();
    format!("****{tail}")
}
