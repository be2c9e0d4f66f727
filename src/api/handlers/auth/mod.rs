//! Auth handlers and supporting modules.
//!
//! Passwords are stored as Argon2id PHC strings; a `NULL` password marks an
//! account that can only sign in through an external identity provider.
//! Sessions are random 32-byte tokens handed out in an `HttpOnly` cookie; the
//! database only ever sees their SHA-256 hash.
//!
//! ## Error codes
//!
//! Login and password change report failures as `{"error": "<code>"}` using
//! [`crate::error_code::ErrorCode`], each code with a fixed HTTP status.

pub(crate) mod hashing;
pub(crate) mod login;
pub(crate) mod password;
pub(crate) mod principal;
pub(crate) mod session;
mod state;
pub(crate) mod storage;
pub(crate) mod totp;
pub(crate) mod types;
pub(crate) mod utils;

pub use state::{AuthConfig, AuthState};
