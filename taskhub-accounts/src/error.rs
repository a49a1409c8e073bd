/// Error types for account operations
///
/// Every service operation returns `Result<T, AccountError>` so callers (the
/// HTTP layer, tests) always receive a typed failure rather than a panic or a
/// stringly error.
///
/// The taxonomy:
///
/// - [`AccountError::Validation`]: malformed or duplicate input, user-correctable
/// - [`AccountError::InvalidCredentials`]: generic authentication failure,
///   never field-specific
/// - [`AccountError::NotFound`]: the operation targets a missing account
/// - [`AccountError::Store`] / [`AccountError::Credential`] /
///   [`AccountError::Token`]: infrastructure failures, not self-recoverable

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::password::PasswordError;
use crate::auth::token::TokenError;
use crate::store::StoreError;

/// Result type alias for account operations
pub type AccountResult<T> = Result<T, AccountError>;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Human-readable reason
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Unified error type for account operations
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// One or more fields failed validation, in priority order
    #[error("validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Generic authentication failure
    ///
    /// Deliberately carries no detail: unknown email and wrong password both
    /// produce this exact value, so callers cannot enumerate accounts.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The targeted account does not exist
    #[error("account {0} not found")]
    NotFound(Uuid),

    /// Storage backend failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Password hashing backend failure
    #[error(transparent)]
    Credential(#[from] PasswordError),

    /// Token signing backend failure
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl AccountError {
    /// Single-field validation error constructor
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AccountError::Validation(vec![FieldError::new(field, message)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AccountError::InvalidCredentials;
        assert_eq!(err.to_string(), "invalid credentials");

        let id = Uuid::new_v4();
        let err = AccountError::NotFound(id);
        assert_eq!(err.to_string(), format!("account {} not found", id));
    }

    #[test]
    fn test_validation_error_counts_fields() {
        let err = AccountError::Validation(vec![
            FieldError::new("email", "not a valid email address"),
            FieldError::new("password", "too short"),
        ]);
        assert_eq!(err.to_string(), "validation failed: 2 field error(s)");
    }

    #[test]
    fn test_invalid_field_constructor() {
        let err = AccountError::invalid_field("age", "must be at least 10");
        match err {
            AccountError::Validation(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "age");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
