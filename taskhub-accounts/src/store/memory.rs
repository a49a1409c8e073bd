/// In-memory store implementations
///
/// Hermetic [`AccountStore`]/[`TaskStore`] implementations backed by a
/// `HashMap` behind an async lock. They exist for tests and demos, so the
/// suite runs without external dependencies, and they mirror the Postgres
/// stores' semantics: case-insensitive email uniqueness, per-record atomic
/// token mutations, store-maintained timestamps.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::account::{Account, AccountChanges, NewAccount};
use crate::models::task::{NewTask, TaskRecord};
use crate::store::{AccountStore, StoreError, TaskStore};

/// In-memory account store
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert(&self, data: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;

        // Mirror the unique index backstop.
        if accounts
            .values()
            .any(|a| a.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            age: data.age,
            tokens: Vec::new(),
            avatar: None,
            created_at: now,
            updated_at: now,
        };

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<Account>, StoreError> {
        let mut accounts = self.accounts.write().await;

        if let Some(new_email) = &changes.email {
            if accounts
                .values()
                .any(|a| a.id != id && a.email.eq_ignore_ascii_case(new_email))
            {
                return Err(StoreError::DuplicateEmail);
            }
        }

        let Some(account) = accounts.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            account.name = name;
        }
        if let Some(email) = changes.email {
            account.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            account.password_hash = password_hash;
        }
        if let Some(age) = changes.age {
            account.age = age;
        }
        if let Some(avatar) = changes.avatar {
            account.avatar = avatar;
        }
        account.updated_at = Utc::now();

        Ok(Some(account.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.accounts.write().await.remove(&id).is_some())
    }

    async fn append_token(&self, id: Uuid, token: &str) -> Result<bool, StoreError> {
        let mut accounts = self.accounts.write().await;
        let Some(account) = accounts.get_mut(&id) else {
            return Ok(false);
        };

        account.tokens.push(token.to_string());
        account.updated_at = Utc::now();
        Ok(true)
    }

    async fn remove_token(&self, id: Uuid, token: &str) -> Result<bool, StoreError> {
        let mut accounts = self.accounts.write().await;
        let Some(account) = accounts.get_mut(&id) else {
            return Ok(false);
        };

        // At most one entry goes; an absent token is a no-op.
        if let Some(pos) = account.tokens.iter().position(|t| t == token) {
            account.tokens.remove(pos);
            account.updated_at = Utc::now();
        }
        Ok(true)
    }

    async fn clear_tokens(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut accounts = self.accounts.write().await;
        let Some(account) = accounts.get_mut(&id) else {
            return Ok(false);
        };

        account.tokens.clear();
        account.updated_at = Utc::now();
        Ok(true)
    }
}

/// In-memory task store
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, TaskRecord>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, data: NewTask) -> Result<TaskRecord, StoreError> {
        let mut tasks = self.tasks.write().await;

        let now = Utc::now();
        let task = TaskRecord {
            id: Uuid::new_v4(),
            owner: data.owner,
            description: data.description,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<TaskRecord>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<TaskRecord> = tasks.values().filter(|t| t.owner == owner).cloned().collect();
        owned.sort_by_key(|t| t.created_at);
        Ok(owned)
    }

    async fn delete_by_owner(&self, owner: Uuid) -> Result<u64, StoreError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|_, t| t.owner != owner);
        Ok((before - tasks.len()) as u64)
    }
}
