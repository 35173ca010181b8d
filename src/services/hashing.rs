use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use sha2::{Digest, Sha256};

#[derive(Debug, thiserror::Error)]
pub enum HashingError {
    #[error("invalid hashing parameters: {0}")]
    Params(argon2::Error),

    #[error("password hashing failed: {0}")]
    Hash(#[from] argon2::password_hash::Error),
}

/// Argon2id password hasher.
///
/// Digests are PHC strings carrying algorithm, version, cost and salt, so a
/// digest produced under one cost still verifies after the cost changes.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    /// Digest of a random secret under the current parameters.
    dummy_digest: String,
}

impl PasswordHasher {
    /// `cost` is the iteration count; `memory_kib` the memory per hash.
    pub fn new(cost: u32, memory_kib: u32) -> Result<Self, HashingError> {
        let params = Params::new(memory_kib, cost, 1, None).map_err(HashingError::Params)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let secret = SaltString::generate(&mut OsRng);
        let salt = SaltString::generate(&mut OsRng);
        let dummy_digest = argon2
            .hash_password(secret.as_str().as_bytes(), &salt)?
            .to_string();

        Ok(Self {
            argon2,
            dummy_digest,
        })
    }

    pub fn hash(&self, password: &str) -> Result<String, HashingError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Returns `Ok(false)` on mismatch; errors only for malformed digests.
    pub fn verify(&self, digest: &str, password: &str) -> Result<bool, HashingError> {
        let parsed_hash = PasswordHash::new(digest)?;
        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Spends the same work as [`verify`](Self::verify) when there is no
    /// stored digest to check against. Always a mismatch.
    pub fn verify_missing(&self, password: &str) -> bool {
        let _ = self.verify(&self.dummy_digest, password);
        false
    }
}

/// SHA-256 hex digest of a bearer token, the form tokens are stored in.
pub fn token_fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
