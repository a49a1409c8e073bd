/// Password hashing using Argon2id
///
/// The hasher is constructed from an explicit [`HashConfig`] so the work
/// factor is injected rather than read from ambient state, and the same
/// instance is reused for every hash and verification.
///
/// A hash runs only when the caller actually changed the password in the
/// current mutation. The service signals this explicitly (a password present
/// in the patch); this module never sees, and must never be handed, an
/// already-hashed value.
///
/// # Example
///
/// ```
/// use taskhub_accounts::auth::password::CredentialHasher;
/// use taskhub_accounts::config::HashConfig;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = CredentialHasher::new(&HashConfig {
///     memory_kib: 1024,
///     iterations: 1,
///     parallelism: 1,
/// })?;
///
/// let hash = hasher.hash("secret12")?;
/// assert!(hasher.verify("secret12", &hash)?);
/// assert!(!hasher.verify("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

use crate::config::HashConfig;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Hashing parameters are invalid
    #[error("invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// Failed to hash password
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Stored hash is not a valid PHC string
    #[error("invalid password hash format: {0}")]
    InvalidHash(String),
}

/// One-way password hasher with a fixed, injected work factor
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Creates a hasher from the given work factor
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::InvalidParams` if the configuration is outside
    /// the ranges the `argon2` crate accepts (e.g. memory below 8 KiB per lane).
    pub fn new(config: &HashConfig) -> Result<Self, PasswordError> {
        let params = ParamsBuilder::new()
            .m_cost(config.memory_kib)
            .t_cost(config.iterations)
            .p_cost(config.parallelism)
            .output_len(32)
            .build()
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hashes a plaintext password
    ///
    /// Each call generates a fresh 16-byte salt from the OS RNG, so hashing
    /// the same password twice yields different PHC strings.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::HashError` if hashing fails.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored hash
    ///
    /// Parameters are taken from the PHC string itself, so hashes produced
    /// under an older work factor still verify. Comparison is constant-time.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::InvalidHash` if the stored value is not a
    /// parseable PHC string, `PasswordError::VerifyError` on backend failure.
    /// A wrong password is `Ok(false)`, not an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(e.to_string())),
        }
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> CredentialHasher {
        CredentialHasher::new(&HashConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("test params should be valid")
    }

    #[test]
    fn test_hash_is_phc_argon2id() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("secret12").expect("hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=1024"));
        assert!(hash.contains("t=1"));
    }

    #[test]
    fn test_hash_produces_different_salts() {
        let hasher = cheap_hasher();

        let hash1 = hasher.hash("same_password").expect("hash 1 should succeed");
        let hash2 = hasher.hash("same_password").expect("hash 2 should succeed");

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_roundtrip() {
        let hasher = cheap_hasher();
        let passwords = ["secret12", "with spaces 7", "unicode-密码-パスワード"];

        for password in passwords {
            let hash = hasher.hash(password).expect("hash should succeed");
            let verified = hasher.verify(password, &hash).expect("verify should succeed");
            assert!(verified, "password {:?} should verify", password);
        }
    }

    #[test]
    fn test_verify_wrong_password() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("correct1").expect("hash should succeed");

        let verified = hasher.verify("wrong123", &hash).expect("verify should succeed");
        assert!(!verified);
    }

    #[test]
    fn test_verify_invalid_hash_errors() {
        let hasher = cheap_hasher();

        let result = hasher.verify("secret12", "not-a-phc-string");
        assert!(matches!(result, Err(PasswordError::InvalidHash(_))));
    }

    #[test]
    fn test_rejects_unusable_params() {
        let result = CredentialHasher::new(&HashConfig {
            memory_kib: 1, // below the argon2 minimum
            iterations: 1,
            parallelism: 1,
        });
        assert!(matches!(result, Err(PasswordError::InvalidParams(_))));
    }

    #[test]
    fn test_production_work_factor_verifies() {
        let hasher = CredentialHasher::new(&HashConfig::default()).expect("defaults are valid");
        let hash = hasher.hash("secret12").expect("hash should succeed");

        assert!(hash.contains("m=65536"));
        assert!(hasher.verify("secret12", &hash).expect("verify should succeed"));
    }
}
