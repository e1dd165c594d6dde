//! Credential storage primitives.
//!
//! Secrets are stored only as one-way digests. [`PasswordDigest`] has no
//! accessor for the underlying PHC string and a redacted `Debug`, so the
//! stored hash cannot reach logs or payloads; reading it simply does not
//! compile. Plaintext never persists past a [`SecretHasher`] call.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::domain::Error;

/// One-way digest of a user's secret, in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Derives and checks password digests with a memory-hard KDF.
///
/// The work parameters are tunable so hashing stays expensive as hardware
/// improves; each derivation uses a fresh random salt.
#[derive(Clone)]
pub struct SecretHasher {
    argon2: Argon2<'static>,
}

impl SecretHasher {
    /// Hasher with the library's recommended parameters.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hasher with explicit work parameters (memory in KiB, iteration
    /// count, lanes).
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, Error> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|err| Error::internal(format!("invalid hash parameters: {err}")))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Derive a digest from a plaintext secret with a fresh random salt.
    pub fn digest(&self, plaintext: &str) -> Result<PasswordDigest, Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;
        Ok(PasswordDigest(hash.to_string()))
    }

    /// Recompute and compare. A digest that fails to parse verifies as
    /// false rather than erroring; callers only learn match or no match.
    pub fn verify(&self, digest: &PasswordDigest, plaintext: &str) -> bool {
        PasswordHash::new(&digest.0)
            .map(|parsed| {
                self.argon2
                    .verify_password(plaintext.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

impl Default for SecretHasher {
    fn default() -> Self {
        Self::new()
    }
}
