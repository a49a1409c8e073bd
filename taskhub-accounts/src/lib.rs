//! # Taskhub Accounts
//!
//! Account identity and credential lifecycle management for the Taskhub
//! task-tracking backend. This crate owns everything with real invariants:
//! email uniqueness, password hashing correctness, session token issuance and
//! revocation, and cascade deletion of an account's owned tasks.
//!
//! The HTTP layer, notification delivery, and datastore bootstrapping live
//! elsewhere; this crate exposes them as seams (`store::AccountStore`,
//! `store::TaskStore`, `events::Notifier`) plus a transport-free
//! [`service::AccountService`] orchestrator.
//!
//! ## Module Organization
//!
//! - `models`: Account and task records, plus the public account projection
//! - `auth`: Password hashing and session token signing
//! - `store`: Persistence traits with Postgres and in-memory implementations
//! - `validate`: Field validation and normalization pipeline
//! - `service`: The account service orchestrator
//! - `events`: Account lifecycle events and the notification seam
//! - `config`: Configuration for hashing and token signing
//! - `error`: Common error types

pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod service;
pub mod store;
pub mod validate;

/// Current version of the Taskhub accounts library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
