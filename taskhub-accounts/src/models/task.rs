/// The referenced task entity
///
/// Tasks live outside this subsystem; the account side only needs the
/// `owner` back-reference for cascade deletion. The Account→Tasks association
/// is a computed relationship, always resolved by querying tasks where
/// `owner` equals the account id, never cached or embedded on the account.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner UUID NOT NULL,
///     description TEXT NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE INDEX tasks_owner_idx ON tasks (owner);
/// ```
///
/// There is no foreign key from `owner` to `accounts`; referential integrity
/// on delete is enforced by the service's cascade, not by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A work item owned by an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskRecord {
    /// Unique task ID
    pub id: Uuid,

    /// Owning account's ID
    pub owner: Uuid,

    /// What needs doing
    pub description: String,

    /// Whether the task is done
    pub completed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Owning account's ID
    pub owner: Uuid,

    /// What needs doing
    pub description: String,
}
