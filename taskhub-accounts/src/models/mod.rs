/// Data models for the account subsystem
///
/// # Models
///
/// - `account`: Account records, mutation inputs, and the public projection
/// - `task`: The referenced task entity, correlated to accounts by `owner`
///
/// Persistence lives behind the traits in [`crate::store`]; these types are
/// plain records shared by every store implementation.

pub mod account;
pub mod task;
