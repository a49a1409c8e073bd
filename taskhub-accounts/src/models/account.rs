/// Account model and its public projection
///
/// # Schema
///
/// ```sql
/// CREATE TABLE accounts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     age INTEGER NOT NULL DEFAULT 13,
///     tokens TEXT[] NOT NULL DEFAULT '{}',
///     avatar BYTEA,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE UNIQUE INDEX accounts_email_key ON accounts (LOWER(email));
/// ```
///
/// # Redaction
///
/// [`Account`] intentionally does NOT implement `Serialize`. The only way an
/// account leaves the trust boundary is [`Account::to_public`], which yields a
/// [`PublicAccount`] without the password hash, the token list, or the avatar
/// blob. Forgetting to redact is a compile error, not a runtime leak.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user identity with credentials and session tokens
///
/// The email is stored lower-cased and is unique case-insensitively across
/// all accounts. `tokens` holds one entry per active login session, in
/// issuance order; entries carry no expiry and die only by removal.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID (UUID v4), immutable after creation
    pub id: Uuid,

    /// Display name, trimmed, never empty
    pub name: String,

    /// Lower-cased email address, unique across all accounts
    pub email: String,

    /// Argon2id PHC string; the plaintext password is never persisted
    pub password_hash: String,

    /// Account holder's age; at least 10
    pub age: i32,

    /// Active session tokens, oldest first
    pub tokens: Vec<String>,

    /// Optional avatar image bytes, excluded from all outward views
    pub avatar: Option<Vec<u8>>,

    /// When the account was created (maintained by the store)
    pub created_at: DateTime<Utc>,

    /// When the account was last updated (maintained by the store)
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Produces the public-safe projection of this account
    ///
    /// Excludes `password_hash`, `tokens`, and `avatar`; includes everything
    /// else. Every outward-facing read goes through this.
    pub fn to_public(&self) -> PublicAccount {
        PublicAccount {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            age: self.age,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// The redacted projection of an account safe to expose externally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicAccount {
    /// Account ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Account holder's age
    pub age: i32,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new account
///
/// Fields are expected to be validated and normalized (see
/// [`crate::validate`]) and the password already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Trimmed display name
    pub name: String,

    /// Normalized (lower-cased) email address
    pub email: String,

    /// Argon2id PHC string
    pub password_hash: String,

    /// Age, with the default already applied
    pub age: i32,
}

/// Input for updating an existing account
///
/// Only non-`None` fields are written. `password_hash` is `Some` exactly when
/// the caller changed the password in this mutation; an unrelated update must
/// leave it `None` so the stored hash is never touched, let alone re-hashed.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    /// New display name
    pub name: Option<String>,

    /// New normalized email address
    pub email: Option<String>,

    /// New password hash (only when the password itself changed)
    pub password_hash: Option<String>,

    /// New age
    pub age: Option<i32>,

    /// New avatar (use `Some(None)` to clear)
    pub avatar: Option<Option<Vec<u8>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account {
            id: Uuid::new_v4(),
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
            age: 20,
            tokens: vec!["token-1".to_string(), "token-2".to_string()],
            avatar: Some(vec![0xFF, 0xD8, 0xFF]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_to_public_keeps_profile_fields() {
        let account = sample_account();
        let public = account.to_public();

        assert_eq!(public.id, account.id);
        assert_eq!(public.name, "Ann");
        assert_eq!(public.email, "ann@example.com");
        assert_eq!(public.age, 20);
    }

    #[test]
    fn test_public_view_has_no_sensitive_keys() {
        let public = sample_account().to_public();
        let value = serde_json::to_value(&public).expect("should serialize");
        let keys: Vec<&String> = value
            .as_object()
            .expect("should be an object")
            .keys()
            .collect();

        for key in keys {
            let lowered = key.to_lowercase();
            assert!(!lowered.contains("password"), "leaked key: {}", key);
            assert!(!lowered.contains("token"), "leaked key: {}", key);
            assert!(!lowered.contains("avatar"), "leaked key: {}", key);
        }
    }

    #[test]
    fn test_changes_default_touches_nothing() {
        let changes = AccountChanges::default();
        assert!(changes.name.is_none());
        assert!(changes.email.is_none());
        assert!(changes.password_hash.is_none());
        assert!(changes.age.is_none());
        assert!(changes.avatar.is_none());
    }
}
