/// Session token signing and verification
///
/// Session tokens are HS256-signed JWTs embedding the account identity. They
/// deliberately carry no expiry claim: a session ends only when its token is
/// removed from the account's token list, so verification here proves the
/// signature and issuer, and the service layer checks list membership.
///
/// Every issued token gets a fresh `jti`, which makes each token a distinct
/// string even when two logins land on the same second. Single-token
/// revocation relies on that.
///
/// # Example
///
/// ```
/// use taskhub_accounts::auth::token::TokenSigner;
/// use taskhub_accounts::config::TokenConfig;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let signer = TokenSigner::new(TokenConfig::new("secret-key-at-least-32-bytes-long"));
///
/// let account_id = Uuid::new_v4();
/// let token = signer.sign(account_id)?;
///
/// let claims = signer.verify(&token)?;
/// assert_eq!(claims.sub, account_id);
/// # Ok(())
/// # }
/// ```

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::TokenConfig;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to create token
    #[error("failed to create token: {0}")]
    Create(String),

    /// Token failed signature or claim validation
    #[error("failed to validate token: {0}")]
    Validation(String),

    /// Token was signed for a different issuer
    #[error("invalid token issuer")]
    InvalidIssuer,
}

/// Claims embedded in a session token
///
/// There is intentionally no `exp` claim; see the module docs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - account ID
    pub sub: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Unique token ID
    pub jti: Uuid,
}

/// Signs and verifies session tokens with an injected secret
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
    issuer: String,
}

impl TokenSigner {
    /// Creates a signer from explicit configuration
    pub fn new(config: TokenConfig) -> Self {
        Self {
            secret: config.secret,
            issuer: config.issuer,
        }
    }

    /// Signs a fresh session token for an account
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Create` if encoding fails.
    pub fn sign(&self, account_id: Uuid) -> Result<String, TokenError> {
        let claims = SessionClaims {
            sub: account_id,
            iss: self.issuer.clone(),
            iat: Utc::now().timestamp(),
            jti: Uuid::new_v4(),
        };

        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(self.secret.as_bytes());

        encode(&header, &claims, &key).map_err(|e| TokenError::Create(e.to_string()))
    }

    /// Verifies a token's signature and issuer, returning its claims
    ///
    /// Does NOT check the account's token list; a verified-but-revoked token
    /// is the service layer's concern.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidIssuer` when the issuer claim does not
    /// match, `TokenError::Validation` for any other failure.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        // Session tokens never expire; revocation is removal from the token list.
        validation.validate_exp = false;
        validation.required_spec_claims.remove("exp");

        let data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
                _ => TokenError::Validation(e.to_string()),
            }
        })?;

        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The secret stays out of debug output.
        f.debug_struct("TokenSigner")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ISSUER;

    fn test_signer() -> TokenSigner {
        TokenSigner::new(TokenConfig::new("test-secret-key-at-least-32-bytes-long"))
    }

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let signer = test_signer();
        let account_id = Uuid::new_v4();

        let token = signer.sign(account_id).expect("should sign");
        let claims = signer.verify(&token).expect("should verify");

        assert_eq!(claims.sub, account_id);
        assert_eq!(claims.iss, DEFAULT_ISSUER);
        assert!(claims.iat <= Utc::now().timestamp());
    }

    #[test]
    fn test_each_token_is_distinct() {
        let signer = test_signer();
        let account_id = Uuid::new_v4();

        let token1 = signer.sign(account_id).expect("should sign");
        let token2 = signer.sign(account_id).expect("should sign");

        // Same account, same second: jti still separates them.
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_verify_with_wrong_secret_fails() {
        let signer = test_signer();
        let other = TokenSigner::new(TokenConfig::new("a-completely-different-secret-keyxx"));

        let token = signer.sign(Uuid::new_v4()).expect("should sign");
        let result = other.verify(&token);

        assert!(matches!(result, Err(TokenError::Validation(_))));
    }

    #[test]
    fn test_verify_rejects_foreign_issuer() {
        let foreign = TokenSigner::new(TokenConfig {
            secret: "shared-secret-key-for-issuer-testxx".to_string(),
            issuer: "someone-else".to_string(),
        });
        let ours = TokenSigner::new(TokenConfig::new("shared-secret-key-for-issuer-testxx"));

        let token = foreign.sign(Uuid::new_v4()).expect("should sign");
        let result = ours.verify(&token);

        assert!(matches!(result, Err(TokenError::InvalidIssuer)));
    }

    #[test]
    fn test_verify_garbage_fails() {
        let signer = test_signer();
        assert!(signer.verify("not-a-token").is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let signer = test_signer();
        let rendered = format!("{:?}", signer);
        assert!(!rendered.contains("test-secret-key"));
    }
}
