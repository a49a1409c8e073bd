/// Configuration for the account subsystem
///
/// The hashing work factor and the token signing secret are injected into
/// [`CredentialHasher`](crate::auth::password::CredentialHasher) and
/// [`TokenSigner`](crate::auth::token::TokenSigner) as explicit configuration.
/// Nothing in this crate reads ambient process state at use sites; `from_env`
/// exists only for the composition root.
///
/// # Environment Variables
///
/// - `JWT_SECRET`: Secret key for token signing (required)
/// - `TOKEN_ISSUER`: Issuer claim pinned into every token (default: taskhub)
/// - `ARGON2_MEMORY_KIB`: Argon2id memory cost in KiB (default: 65536)
/// - `ARGON2_ITERATIONS`: Argon2id passes (default: 3)
/// - `ARGON2_PARALLELISM`: Argon2id lanes (default: 4)
///
/// # Example
///
/// ```no_run
/// use taskhub_accounts::config::AuthConfig;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AuthConfig::from_env()?;
/// assert!(!config.token.secret.is_empty());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// An environment variable has an unparseable value
    #[error("invalid value for {var}: {message}")]
    InvalidVar {
        var: &'static str,
        message: String,
    },
}

/// Complete configuration for the account subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token signing configuration
    pub token: TokenConfig,

    /// Password hashing configuration
    pub hash: HashConfig,
}

/// Token signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Secret key for HS256 signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Issuer claim pinned into every signed token
    pub issuer: String,
}

impl TokenConfig {
    /// Creates a token configuration with the default issuer
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

/// Default issuer claim
pub const DEFAULT_ISSUER: &str = "taskhub";

/// Argon2id work factor
///
/// The defaults match the production parameters: 64 MiB memory, 3 passes,
/// 4 lanes. Tests may construct cheaper instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes
    pub iterations: u32,

    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: 65536, // 64 MiB
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl AuthConfig {
    /// Loads configuration from environment variables
    ///
    /// Reads a `.env` file first if one is present.
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is missing or a numeric variable
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;
        let issuer = env::var("TOKEN_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string());

        let defaults = HashConfig::default();
        let hash = HashConfig {
            memory_kib: env_u32("ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: env_u32("ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: env_u32("ARGON2_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Self {
            token: TokenConfig { secret, issuer },
            hash,
        })
    }
}

/// Reads an optional u32 environment variable, falling back to a default
fn env_u32(var: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw.parse().map_err(|e| ConfigError::InvalidVar {
            var,
            message: format!("{} ({})", raw, e),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_config_defaults() {
        let config = HashConfig::default();
        assert_eq!(config.memory_kib, 65536);
        assert_eq!(config.iterations, 3);
        assert_eq!(config.parallelism, 4);
    }

    #[test]
    fn test_token_config_default_issuer() {
        let config = TokenConfig::new("secret-key");
        assert_eq!(config.issuer, DEFAULT_ISSUER);
        assert_eq!(config.secret, "secret-key");
    }

    #[test]
    fn test_env_u32_default_when_unset() {
        let value = env_u32("TASKHUB_TEST_UNSET_VAR", 42).expect("default should apply");
        assert_eq!(value, 42);
    }
}
