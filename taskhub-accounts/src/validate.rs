/// Field validation and normalization pipeline
///
/// Pure result-returning validation, run before every persistence write that
/// touches a validated field. Checks are collected in priority order:
///
/// 1. email format
/// 2. email uniqueness (case-insensitive, excluding self on update)
/// 3. password constraints (≥ 7 characters, no "password" substring)
/// 4. age ≥ 10
/// 5. name non-empty
///
/// Normalization happens here too: names are trimmed, emails are trimmed and
/// lower-cased, a missing age becomes the default. The service only ever
/// persists the normalized output.
///
/// # Example
///
/// ```
/// use taskhub_accounts::store::MemoryAccountStore;
/// use taskhub_accounts::validate::{validate_signup, SignupDraft};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryAccountStore::new();
///
/// let valid = validate_signup(&store, SignupDraft {
///     name: "  Ann  ".to_string(),
///     email: "ANN@Example.com".to_string(),
///     password: "secret12".to_string(),
///     age: None,
/// })
/// .await?;
///
/// assert_eq!(valid.name, "Ann");
/// assert_eq!(valid.email, "ann@example.com");
/// assert_eq!(valid.age, 13);
/// # Ok(())
/// # }
/// ```

use uuid::Uuid;
use validator::ValidateEmail;

use crate::error::{AccountError, FieldError};
use crate::store::AccountStore;

/// Minimum password length, in characters
pub const MIN_PASSWORD_CHARS: usize = 7;

/// Substring a password must not contain, compared case-insensitively
const FORBIDDEN_PASSWORD_SUBSTRING: &str = "password";

/// Minimum accepted age
pub const MIN_AGE: i32 = 10;

/// Age applied when a signup omits one
pub const DEFAULT_AGE: i32 = 13;

/// Unvalidated signup input
#[derive(Debug, Clone)]
pub struct SignupDraft {
    /// Display name
    pub name: String,

    /// Email address, any casing
    pub email: String,

    /// Plaintext password
    pub password: String,

    /// Age; `None` applies the default
    pub age: Option<i32>,
}

/// A signup draft that passed validation, normalized
#[derive(Debug, Clone)]
pub struct ValidSignup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: i32,
}

/// Unvalidated profile update; only `Some` fields are touched
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    /// New display name
    pub name: Option<String>,

    /// New email address, any casing
    pub email: Option<String>,

    /// New plaintext password
    ///
    /// `Some` here is the explicit "the password was changed in this
    /// mutation" signal the hasher contract requires.
    pub password: Option<String>,

    /// New age
    pub age: Option<i32>,
}

/// A profile patch that passed validation, normalized
#[derive(Debug, Clone, Default)]
pub struct ValidPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<i32>,
}

/// Validates and normalizes a signup draft
///
/// # Errors
///
/// Returns `AccountError::Validation` with every failed check in priority
/// order, or `AccountError::Store` if the uniqueness lookup itself fails.
pub async fn validate_signup(
    store: &dyn AccountStore,
    draft: SignupDraft,
) -> Result<ValidSignup, AccountError> {
    let mut errors = Vec::new();

    let name = draft.name.trim().to_string();
    let email = draft.email.trim().to_lowercase();

    if !email.validate_email() {
        errors.push(FieldError::new("email", "not a valid email address"));
    } else if store.find_by_email(&email).await?.is_some() {
        errors.push(FieldError::new("email", "already registered"));
    }

    check_password(&draft.password, &mut errors);

    let age = draft.age.unwrap_or(DEFAULT_AGE);
    check_age(age, &mut errors);

    if name.is_empty() {
        errors.push(FieldError::new("name", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(ValidSignup {
            name,
            email,
            password: draft.password,
            age,
        })
    } else {
        Err(AccountError::Validation(errors))
    }
}

/// Validates and normalizes a profile patch
///
/// Only present fields are checked; the uniqueness lookup excludes the
/// account being updated, so re-submitting your own email is not a conflict.
///
/// # Errors
///
/// As [`validate_signup`].
pub async fn validate_patch(
    store: &dyn AccountStore,
    account_id: Uuid,
    patch: ProfilePatch,
) -> Result<ValidPatch, AccountError> {
    let mut errors = Vec::new();

    let name = patch.name.map(|n| n.trim().to_string());
    let email = patch.email.map(|e| e.trim().to_lowercase());

    if let Some(email) = &email {
        if !email.validate_email() {
            errors.push(FieldError::new("email", "not a valid email address"));
        } else if let Some(existing) = store.find_by_email(email).await? {
            if existing.id != account_id {
                errors.push(FieldError::new("email", "already registered"));
            }
        }
    }

    if let Some(password) = &patch.password {
        check_password(password, &mut errors);
    }

    if let Some(age) = patch.age {
        check_age(age, &mut errors);
    }

    if let Some(name) = &name {
        if name.is_empty() {
            errors.push(FieldError::new("name", "must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(ValidPatch {
            name,
            email,
            password: patch.password,
            age: patch.age,
        })
    } else {
        Err(AccountError::Validation(errors))
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        errors.push(FieldError::new(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_CHARS),
        ));
    }
    if password
        .to_lowercase()
        .contains(FORBIDDEN_PASSWORD_SUBSTRING)
    {
        errors.push(FieldError::new(
            "password",
            "must not contain \"password\"",
        ));
    }
}

fn check_age(age: i32, errors: &mut Vec<FieldError>) {
    if age < MIN_AGE {
        errors.push(FieldError::new(
            "age",
            format!("must be at least {}", MIN_AGE),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::NewAccount;
    use crate::store::MemoryAccountStore;

    fn draft(email: &str, password: &str, age: Option<i32>) -> SignupDraft {
        SignupDraft {
            name: "Ann".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            age,
        }
    }

    fn fields(err: AccountError) -> Vec<String> {
        match err {
            AccountError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    async fn seed(store: &MemoryAccountStore, email: &str) -> Uuid {
        store
            .insert(NewAccount {
                name: "Seed".to_string(),
                email: email.to_string(),
                password_hash: "$argon2id$stub".to_string(),
                age: 13,
            })
            .await
            .expect("seed insert should succeed")
            .id
    }

    #[tokio::test]
    async fn test_valid_draft_is_normalized() {
        let store = MemoryAccountStore::new();
        let valid = validate_signup(
            &store,
            SignupDraft {
                name: "  Ann  ".to_string(),
                email: " ANN@Example.com ".to_string(),
                password: "secret12".to_string(),
                age: None,
            },
        )
        .await
        .expect("draft should validate");

        assert_eq!(valid.name, "Ann");
        assert_eq!(valid.email, "ann@example.com");
        assert_eq!(valid.age, DEFAULT_AGE);
    }

    #[tokio::test]
    async fn test_bad_email_format() {
        let store = MemoryAccountStore::new();
        let err = validate_signup(&store, draft("not-an-email", "secret12", None))
            .await
            .unwrap_err();
        assert_eq!(fields(err), vec!["email"]);
    }

    #[tokio::test]
    async fn test_short_password() {
        let store = MemoryAccountStore::new();
        let err = validate_signup(&store, draft("ann@example.com", "short6", None))
            .await
            .unwrap_err();
        assert_eq!(fields(err), vec!["password"]);
    }

    #[tokio::test]
    async fn test_password_substring_any_case() {
        let store = MemoryAccountStore::new();
        for bad in ["password1", "MyPassWord", "xxPASSWORDxx"] {
            let err = validate_signup(&store, draft("ann@example.com", bad, None))
                .await
                .unwrap_err();
            assert_eq!(fields(err), vec!["password"], "should reject {:?}", bad);
        }
    }

    #[tokio::test]
    async fn test_exactly_seven_chars_passes() {
        let store = MemoryAccountStore::new();
        assert!(
            validate_signup(&store, draft("ann@example.com", "abcdefg", None))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_age_below_minimum() {
        let store = MemoryAccountStore::new();
        let err = validate_signup(&store, draft("ann@example.com", "secret12", Some(9)))
            .await
            .unwrap_err();
        assert_eq!(fields(err), vec!["age"]);

        assert!(
            validate_signup(&store, draft("ann2@example.com", "secret12", Some(10)))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_reported_before_password() {
        let store = MemoryAccountStore::new();
        seed(&store, "ann@example.com").await;

        let err = validate_signup(&store, draft("ANN@EXAMPLE.COM", "short", None))
            .await
            .unwrap_err();
        // Priority order: uniqueness first, then the password failure.
        assert_eq!(fields(err), vec!["email", "password"]);
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let store = MemoryAccountStore::new();
        let err = validate_signup(
            &store,
            SignupDraft {
                name: "   ".to_string(),
                email: "ann@example.com".to_string(),
                password: "secret12".to_string(),
                age: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(fields(err), vec!["name"]);
    }

    #[tokio::test]
    async fn test_patch_uniqueness_excludes_self() {
        let store = MemoryAccountStore::new();
        let ann = seed(&store, "ann@example.com").await;
        seed(&store, "bob@example.com").await;

        // Own email, different casing: fine.
        let patch = ProfilePatch {
            email: Some("Ann@Example.com".to_string()),
            ..Default::default()
        };
        let valid = validate_patch(&store, ann, patch).await.expect("should pass");
        assert_eq!(valid.email.as_deref(), Some("ann@example.com"));

        // Someone else's email: conflict.
        let patch = ProfilePatch {
            email: Some("bob@example.com".to_string()),
            ..Default::default()
        };
        let err = validate_patch(&store, ann, patch).await.unwrap_err();
        assert_eq!(fields(err), vec!["email"]);
    }

    #[tokio::test]
    async fn test_empty_patch_is_valid() {
        let store = MemoryAccountStore::new();
        let ann = seed(&store, "ann@example.com").await;

        let valid = validate_patch(&store, ann, ProfilePatch::default())
            .await
            .expect("empty patch should validate");
        assert!(valid.name.is_none());
        assert!(valid.password.is_none());
    }
}
