/// Persistence seam for accounts and tasks
///
/// The service talks to storage only through the [`AccountStore`] and
/// [`TaskStore`] traits. Two implementations ship with the crate:
///
/// - [`postgres`]: sqlx-backed Postgres stores for production
/// - [`memory`]: in-memory stores for hermetic tests
///
/// Consistency relies on per-record atomicity of the store: the token
/// mutations (`append_token`, `remove_token`, `clear_tokens`) are single
/// operations at the store layer, never read-modify-write sequences in the
/// caller, so two concurrent logins for one account cannot lose a token.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::account::{Account, AccountChanges, NewAccount};
use crate::models::task::{NewTask, TaskRecord};

pub mod memory;
pub mod postgres;

pub use memory::{MemoryAccountStore, MemoryTaskStore};
pub use postgres::{PgAccountStore, PgTaskStore};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The email is already registered to another account
    ///
    /// The store-level backstop for the uniqueness invariant; the validator
    /// normally catches duplicates first, but a race between its check and
    /// the write lands here.
    #[error("email already registered")]
    DuplicateEmail,

    /// The storage backend failed
    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage operations for account records
///
/// Callers pass emails already normalized to lower case; lookups are
/// case-insensitive regardless, matching the uniqueness invariant.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new account, assigning its id and timestamps
    async fn insert(&self, data: NewAccount) -> Result<Account, StoreError>;

    /// Finds an account by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Finds an account by email, case-insensitively
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Applies the non-`None` fields of `changes`; returns the updated
    /// account, or `None` if it does not exist
    async fn update(&self, id: Uuid, changes: AccountChanges)
        -> Result<Option<Account>, StoreError>;

    /// Deletes an account record; returns whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Atomically appends a session token to the account's token list;
    /// returns whether the account existed
    async fn append_token(&self, id: Uuid, token: &str) -> Result<bool, StoreError>;

    /// Removes one matching session token; absent tokens are a no-op.
    /// Returns whether the account existed
    async fn remove_token(&self, id: Uuid, token: &str) -> Result<bool, StoreError>;

    /// Clears the account's entire token list; returns whether the account
    /// existed
    async fn clear_tokens(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Storage operations for the referenced task entity
///
/// Only the owner-keyed queries the account subsystem needs; the task's own
/// business schema lives elsewhere.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a task owned by an account
    async fn insert(&self, data: NewTask) -> Result<TaskRecord, StoreError>;

    /// Lists every task whose owner is the given account
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<TaskRecord>, StoreError>;

    /// Deletes every task whose owner is the given account; returns how many
    /// were removed
    async fn delete_by_owner(&self, owner: Uuid) -> Result<u64, StoreError>;
}
