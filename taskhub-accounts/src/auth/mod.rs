/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Session token signing and verification
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with an injected, fixed work factor
/// - **Session Tokens**: HS256-signed opaque credentials with no expiry;
///   revocation happens by removing a token from the account's token list
/// - **Constant-time Comparison**: Password verification uses the constant-time
///   operations of the `argon2` crate

pub mod password;
pub mod token;
