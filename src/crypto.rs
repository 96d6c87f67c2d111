//! Credential and token hashing.
//!
//! Passwords are stored as `salt$digest` where the digest is a domain-tagged
//! SHA-256 over salt and password; verification compares digests in constant
//! time. Session and user tokens are random strings stored only as digests,
//! so a leaked database does not yield usable bearer tokens.

use rand::Rng;
use rand::distributions::Alphanumeric;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const PASSWORD_DOMAIN: &[u8] = b"subgate-password-v1:";
const TOKEN_DOMAIN: &[u8] = b"subgate-token-v1:";

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(PASSWORD_DOMAIN);
    hasher.update(salt.as_bytes());
    hasher.update(b"$");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash a password with a fresh random salt. Output format: `salt$digest`.
pub fn hash_password(password: &str) -> String {
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    let digest = password_digest(&salt, password);
    format!("{}${}", salt, digest)
}

/// Verify a password against a stored `salt$digest` value.
///
/// The digest comparison is constant-time. Malformed stored values never
/// verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    let candidate = password_digest(salt, password);
    candidate.as_bytes().ct_eq(digest.as_bytes()).into()
}

/// Generate an opaque bearer token with the given prefix.
pub fn generate_token(prefix: &str) -> String {
    let body: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(40)
        .map(char::from)
        .collect();
    format!("{}_{}", prefix, body)
}

/// Digest a secret (session or user token) for storage and lookup.
pub fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(TOKEN_DOMAIN);
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}
