//! Password hashing and verification.
//!
//! Credentials are stored as Argon2 PHC strings with a random per-password
//! salt. Verification never errors: a stored hash that fails to parse simply
//! does not match, so corrupted rows degrade to a failed login instead of a
//! crash.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

/// Opaque, irreversible password credential in PHC string format.
///
/// The inner string is never logged or serialised; `Debug` redacts it so
/// accidental `{:?}` formatting of a user cannot leak hashes.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedCredential(String);

impl HashedCredential {
    /// Wrap a PHC string loaded from storage.
    ///
    /// No validation happens here; malformed values are tolerated and fail
    /// verification instead.
    pub fn from_phc_string(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// The PHC string for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for HashedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HashedCredential(<redacted>)")
    }
}

/// Catastrophic hashing failure, treated as fatal by callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// Salt generation or the hash computation itself failed.
    #[error("password hashing failed: {message}")]
    Hash { message: String },
}

impl CredentialError {
    fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }
}

/// Hash a plaintext password with a fresh random salt.
///
/// # Errors
///
/// Returns [`CredentialError::Hash`] only when the operating system's random
/// source or the Argon2 computation fails.
pub fn hash_password(plaintext: &str) -> Result<HashedCredential, CredentialError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|err| CredentialError::hash(err.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|err| CredentialError::hash(err.to_string()))?;

    let phc = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|err| CredentialError::hash(err.to_string()))?
        .to_string();
    Ok(HashedCredential(phc))
}

/// Check a plaintext password against a stored credential.
///
/// Returns `false` for any mismatch, including stored values that are not
/// valid PHC strings.
pub fn verify_password(plaintext: &str, hashed: &HashedCredential) -> bool {
    let Ok(parsed) = PasswordHash::new(hashed.as_str()) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}
