/// Postgres store implementations
///
/// sqlx-backed [`AccountStore`]/[`TaskStore`] implementations. Connection
/// pooling is the embedding application's concern; these take a ready
/// [`PgPool`].
///
/// Token mutations are single `UPDATE` statements using Postgres array
/// operators, so each one is atomic per row and concurrent logins cannot
/// lose an append (see the hazard note on [`crate::store`]).
///
/// # Example
///
/// ```no_run
/// use taskhub_accounts::store::{AccountStore, PgAccountStore};
/// use taskhub_accounts::models::account::NewAccount;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let store = PgAccountStore::new(pool);
///
/// let account = store
///     .insert(NewAccount {
///         name: "Ann".to_string(),
///         email: "ann@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         age: 20,
///     })
///     .await?;
/// println!("created account {}", account.id);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::account::{Account, AccountChanges, NewAccount};
use crate::models::task::{NewTask, TaskRecord};
use crate::store::{AccountStore, StoreError, TaskStore};

const ACCOUNT_COLUMNS: &str =
    "id, name, email, password_hash, age, tokens, avatar, created_at, updated_at";

/// Postgres-backed account store
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique-index violation on the email column to the typed duplicate
/// error; everything else stays an infrastructure failure
fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.constraint().is_some_and(|c| c.contains("email")) {
            return StoreError::DuplicateEmail;
        }
    }
    err.into()
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn insert(&self, data: NewAccount) -> Result<Account, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO accounts (name, email, password_hash, age)
            VALUES ($1, $2, $3, $4)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.age)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<Account>, StoreError> {
        // Build the UPDATE from whichever fields are present.
        let mut query = String::from("UPDATE accounts SET updated_at = NOW()");
        let mut bind_count = 1;

        if changes.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if changes.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if changes.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }
        if changes.age.is_some() {
            bind_count += 1;
            query.push_str(&format!(", age = ${}", bind_count));
        }
        if changes.avatar.is_some() {
            bind_count += 1;
            query.push_str(&format!(", avatar = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Account>(&query).bind(id);

        if let Some(name) = changes.name {
            q = q.bind(name);
        }
        if let Some(email) = changes.email {
            q = q.bind(email);
        }
        if let Some(password_hash) = changes.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(age) = changes.age {
            q = q.bind(age);
        }
        if let Some(avatar) = changes.avatar {
            q = q.bind(avatar);
        }

        let account = q
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)?;

        Ok(account)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn append_token(&self, id: Uuid, token: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET tokens = array_append(tokens, $2), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_token(&self, id: Uuid, token: &str) -> Result<bool, StoreError> {
        // array_remove drops every matching element; issued tokens carry a
        // unique jti, so at most one element ever matches.
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET tokens = array_remove(tokens, $2), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_tokens(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE accounts SET tokens = '{}', updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Postgres-backed task store
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn insert(&self, data: NewTask) -> Result<TaskRecord, StoreError> {
        let task = sqlx::query_as::<_, TaskRecord>(
            r#"
            INSERT INTO tasks (owner, description)
            VALUES ($1, $2)
            RETURNING id, owner, description, completed, created_at, updated_at
            "#,
        )
        .bind(data.owner)
        .bind(data.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<TaskRecord>, StoreError> {
        let tasks = sqlx::query_as::<_, TaskRecord>(
            r#"
            SELECT id, owner, description, completed, created_at, updated_at
            FROM tasks
            WHERE owner = $1
            ORDER BY created_at
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn delete_by_owner(&self, owner: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE owner = $1")
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
