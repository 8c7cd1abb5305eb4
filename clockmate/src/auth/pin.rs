//! PIN validation, hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};

use crate::{errors::Error, types::Role};

/// The two PIN formats in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinKind {
    Employee,
    Admin,
}

impl PinKind {
    /// Exact number of digits.
    pub fn length(self) -> usize {
        match self {
            PinKind::Employee => 6,
            PinKind::Admin => 8,
        }
    }

    /// Role of the accounts that log in with this kind of PIN.
    pub fn role(self) -> Role {
        match self {
            PinKind::Employee => Role::Employee,
            PinKind::Admin => Role::Admin,
        }
    }
}

/// True if `pin` is exactly the right number of ASCII digits for its kind.
pub fn is_valid_pin(pin: &str, kind: PinKind) -> bool {
    pin.len() == kind.length() && pin.bytes().all(|b| b.is_ascii_digit())
}

/// Argon2 hashing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Argon2Params {
    /// Create Argon2 instance with these parameters.
    pub fn to_argon2(self) -> Result<Argon2<'static>, Error> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None).map_err(|e| Error::Internal {
            operation: format!("create argon2 params: {e}"),
        })?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Params {
    /// Secure defaults for production (Argon2id RFC recommendations)
    fn default() -> Self {
        Self {
            memory_kib: 19456, // 19 MB
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Hash a PIN with a fresh random salt, producing a PHC string.
pub fn hash_pin(pin: &str, params: Argon2Params) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = params.to_argon2()?;

    let hash = argon2.hash_password(pin.as_bytes(), &salt).map_err(|e| Error::Internal {
        operation: format!("hash PIN: {e}"),
    })?;

    Ok(hash.to_string())
}

/// Verify a PIN against a stored hash.
///
/// Verification uses the parameters embedded in the hash itself. A stored value that is not a
/// valid PHC string never matches.
pub fn verify_pin(pin: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Skipping malformed PIN hash: {e}");
            return false;
        }
    };

    Argon2::default().verify_password(pin.as_bytes(), &parsed_hash).is_ok()
}

/// Run [`hash_pin`] on the blocking thread pool.
pub async fn hash_pin_blocking(pin: String, params: Argon2Params) -> Result<String, Error> {
    tokio::task::spawn_blocking(move || hash_pin(&pin, params))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn PIN hashing task: {e}"),
        })?
}
