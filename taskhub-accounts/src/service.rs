/// The account service orchestrator
///
/// Every account operation is an explicit, ordered sequence here: validation
/// gates the input, the hasher transforms the password exactly when it
/// changed, the store persists, token operations handle sessions, the cascade
/// runs before an account delete, and every outward-facing result passes
/// through the public projection. There are no hidden save/remove hooks; what
/// happens on a mutation is what this file says happens.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskhub_accounts::auth::password::CredentialHasher;
/// use taskhub_accounts::auth::token::TokenSigner;
/// use taskhub_accounts::config::AuthConfig;
/// use taskhub_accounts::events::LogNotifier;
/// use taskhub_accounts::service::AccountService;
/// use taskhub_accounts::store::{MemoryAccountStore, MemoryTaskStore};
/// use taskhub_accounts::validate::SignupDraft;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AuthConfig::from_env()?;
/// let service = AccountService::new(
///     Arc::new(MemoryAccountStore::new()),
///     Arc::new(MemoryTaskStore::new()),
///     Arc::new(LogNotifier),
///     CredentialHasher::new(&config.hash)?,
///     TokenSigner::new(config.token),
/// );
///
/// let account = service
///     .signup(SignupDraft {
///         name: "Ann".to_string(),
///         email: "ann@example.com".to_string(),
///         password: "secret12".to_string(),
///         age: Some(20),
///     })
///     .await?;
///
/// let token = service.login("ann@example.com", "secret12").await?;
/// service.logout(account.id, &token).await?;
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::password::CredentialHasher;
use crate::auth::token::TokenSigner;
use crate::error::{AccountError, AccountResult, FieldError};
use crate::events::{AccountEvent, Notifier};
use crate::models::account::{Account, AccountChanges, NewAccount, PublicAccount};
use crate::store::{AccountStore, StoreError, TaskStore};
use crate::validate::{self, ProfilePatch, SignupDraft};

/// Orchestrates account signup, authentication, profile changes, and removal
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    tasks: Arc<dyn TaskStore>,
    notifier: Arc<dyn Notifier>,
    hasher: CredentialHasher,
    signer: TokenSigner,
}

impl AccountService {
    /// Creates a service from its explicit parts
    ///
    /// Stores, notifier, hasher, and signer are all injected; the service
    /// itself holds no configuration and reads no ambient state.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        tasks: Arc<dyn TaskStore>,
        notifier: Arc<dyn Notifier>,
        hasher: CredentialHasher,
        signer: TokenSigner,
    ) -> Self {
        Self {
            accounts,
            tasks,
            notifier,
            hasher,
            signer,
        }
    }

    /// Registers a new account
    ///
    /// Validates and normalizes the draft, hashes the password, persists the
    /// account, then emits [`AccountEvent::Created`] (best-effort) and
    /// returns the public view.
    pub async fn signup(&self, draft: SignupDraft) -> AccountResult<PublicAccount> {
        let valid = validate::validate_signup(self.accounts.as_ref(), draft).await?;

        let password_hash = self.hasher.hash(&valid.password)?;

        let account = self
            .accounts
            .insert(NewAccount {
                name: valid.name,
                email: valid.email,
                password_hash,
                age: valid.age,
            })
            .await
            .map_err(duplicate_to_validation)?;

        tracing::info!(account_id = %account.id, "account created");

        self.emit(AccountEvent::Created {
            email: account.email.clone(),
            name: account.name.clone(),
        });

        Ok(account.to_public())
    }

    /// Authenticates by email and password and opens a new session
    ///
    /// Returns the session token.
    pub async fn login(&self, email: &str, password: &str) -> AccountResult<String> {
        let account = self.find_by_credentials(email, password).await?;
        self.issue_token(account.id).await
    }

    /// Issues a new session token for an account
    ///
    /// Signs the token and appends it to the account's token list atomically
    /// at the store layer, so concurrent issuance cannot lose a session.
    pub async fn issue_token(&self, account_id: Uuid) -> AccountResult<String> {
        let token = self.signer.sign(account_id)?;

        if !self.accounts.append_token(account_id, &token).await? {
            return Err(AccountError::NotFound(account_id));
        }

        Ok(token)
    }

    /// Looks up an account by credentials
    ///
    /// Unknown email and wrong password yield the identical
    /// [`AccountError::InvalidCredentials`]; callers cannot tell which
    /// happened, by design.
    pub async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> AccountResult<Account> {
        let email = email.trim().to_lowercase();

        let Some(account) = self.accounts.find_by_email(&email).await? else {
            return Err(AccountError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &account.password_hash)? {
            return Err(AccountError::InvalidCredentials);
        }

        Ok(account)
    }

    /// Resolves a session token to its account
    ///
    /// The signature must verify AND the token must still be present in the
    /// account's token list; a revoked token fails even though its signature
    /// is intact.
    pub async fn authenticate(&self, token: &str) -> AccountResult<PublicAccount> {
        let claims = self
            .signer
            .verify(token)
            .map_err(|_| AccountError::InvalidCredentials)?;

        let Some(account) = self.accounts.find_by_id(claims.sub).await? else {
            return Err(AccountError::InvalidCredentials);
        };

        if !account.tokens.iter().any(|t| t == token) {
            return Err(AccountError::InvalidCredentials);
        }

        Ok(account.to_public())
    }

    /// Ends one session by revoking its token
    ///
    /// Revoking a token that is not present (or targeting an account that no
    /// longer exists) is a no-op, not an error.
    pub async fn logout(&self, account_id: Uuid, token: &str) -> AccountResult<()> {
        self.accounts.remove_token(account_id, token).await?;
        Ok(())
    }

    /// Ends every session for an account
    pub async fn logout_all(&self, account_id: Uuid) -> AccountResult<()> {
        self.accounts.clear_tokens(account_id).await?;
        Ok(())
    }

    /// Reads an account's public view
    pub async fn me(&self, account_id: Uuid) -> AccountResult<PublicAccount> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        Ok(account.to_public())
    }

    /// Applies a profile patch
    ///
    /// The patch is validated (uniqueness excluding self), and the password
    /// is hashed exactly when the patch carries one; an update that does not
    /// touch the password leaves the stored hash byte-identical. A password
    /// change also ends every existing session.
    pub async fn update_profile(
        &self,
        account_id: Uuid,
        patch: ProfilePatch,
    ) -> AccountResult<PublicAccount> {
        let valid = validate::validate_patch(self.accounts.as_ref(), account_id, patch).await?;

        let password_changed = valid.password.is_some();
        let password_hash = match valid.password {
            Some(plaintext) => Some(self.hasher.hash(&plaintext)?),
            None => None,
        };

        let changes = AccountChanges {
            name: valid.name,
            email: valid.email,
            password_hash,
            age: valid.age,
            avatar: None,
        };

        let account = self
            .accounts
            .update(account_id, changes)
            .await
            .map_err(duplicate_to_validation)?
            .ok_or(AccountError::NotFound(account_id))?;

        if password_changed {
            // A credential change invalidates every open session.
            self.accounts.clear_tokens(account_id).await?;
        }

        Ok(account.to_public())
    }

    /// Deletes an account and everything it owns
    ///
    /// Owned tasks are removed first, sequentially; if that fails the
    /// account record is left untouched and the whole operation fails. Only
    /// after both steps complete is [`AccountEvent::Deleted`] emitted.
    pub async fn delete_account(&self, account_id: Uuid) -> AccountResult<()> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        let removed = self.tasks.delete_by_owner(account_id).await?;
        tracing::debug!(account_id = %account_id, removed, "cascade-deleted owned tasks");

        if !self.accounts.delete(account_id).await? {
            return Err(AccountError::NotFound(account_id));
        }

        tracing::info!(account_id = %account_id, "account deleted");

        self.emit(AccountEvent::Deleted {
            email: account.email,
            name: account.name,
        });

        Ok(())
    }

    /// Stores an avatar image for the account
    pub async fn set_avatar(&self, account_id: Uuid, bytes: Vec<u8>) -> AccountResult<()> {
        let changes = AccountChanges {
            avatar: Some(Some(bytes)),
            ..Default::default()
        };

        self.accounts
            .update(account_id, changes)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        Ok(())
    }

    /// Removes the account's avatar, if any
    pub async fn clear_avatar(&self, account_id: Uuid) -> AccountResult<()> {
        let changes = AccountChanges {
            avatar: Some(None),
            ..Default::default()
        };

        self.accounts
            .update(account_id, changes)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        Ok(())
    }

    /// Reads the account's avatar bytes
    ///
    /// The avatar never appears in [`PublicAccount`]; this is the only read
    /// path for it.
    pub async fn avatar(&self, account_id: Uuid) -> AccountResult<Vec<u8>> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        account.avatar.ok_or(AccountError::NotFound(account_id))
    }

    /// Emits a lifecycle event, fire-and-forget
    ///
    /// The notifier runs on its own task; failures (and panics) there never
    /// reach the account operation that triggered the event.
    fn emit(&self, event: AccountEvent) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            notifier.notify(event).await;
        });
    }
}

/// Maps the store's duplicate-email backstop onto the same field error the
/// validator produces, so callers see one shape either way
fn duplicate_to_validation(err: StoreError) -> AccountError {
    match err {
        StoreError::DuplicateEmail => {
            AccountError::Validation(vec![FieldError::new("email", "already registered")])
        }
        other => AccountError::Store(other),
    }
}
