//! Password digests for the staff registry
//!
//! Passwords are salted per row, peppered with SECRET_KEY and stored as
//! `sha256:<salt hex>:<digest hex>`. Rows written by older deployments may
//! still hold plaintext; those are loaded as-is, never shown, and flagged
//! by the doctor.

use rand::Rng;
use sha2::{Digest, Sha256};

const DIGEST_PREFIX: &str = "sha256:";
const SALT_LEN: usize = 16;

/// Digest a plaintext password with a fresh random salt and the server pepper
pub fn digest_password(pepper: &str, password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::thread_rng().gen();
    digest_with_salt(pepper, &salt, password)
}

/// Deterministic digest for a known salt
pub fn digest_with_salt(pepper: &str, salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pepper.as_bytes());
    hasher.update([0u8]);
    hasher.update(salt);
    hasher.update([0u8]);
    hasher.update(password.as_bytes());
    format!(
        "{}{}:{}",
        DIGEST_PREFIX,
        hex::encode(salt),
        hex::encode(hasher.finalize())
    )
}

/// Check a plaintext password against a stored digest
pub fn verify_password(pepper: &str, stored: &str, password: &str) -> bool {
    let Some((salt_hex, _)) = split_digest(stored) else {
        return false;
    };
    match hex::decode(salt_hex) {
        Ok(salt) => digest_with_salt(pepper, &salt, password) == stored,
        Err(_) => false,
    }
}

/// Whether a stored value is already a salted digest
pub fn is_digest(stored: &str) -> bool {
    split_digest(stored).is_some_and(|(salt, digest)| {
        salt.len() == SALT_LEN * 2 && digest.len() == 64 && is_hex(salt) && is_hex(digest)
    })
}

fn split_digest(stored: &str) -> Option<(&str, &str)> {
    stored.strip_prefix(DIGEST_PREFIX)?.split_once(':')
}

#[inline]
fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}
