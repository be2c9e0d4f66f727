//! # Linkdeck
//!
//! `linkdeck` manages the websites that belong to a user's link-in-bio
//! profile. It serves an HTTP/JSON API for the pages of the web app and ships
//! a typed client for the same endpoints.
//!
//! ## Websites and plans
//!
//! Websites are listed in two groups, custom domain first, each ordered by
//! `position` descending. On the `FREE` plan only the first website of each
//! group is usable; the rest are returned with `$disabled: true`.
//!
//! Reordering submits the full id list. Positions are rewritten as the
//! reverse index of that list inside one transaction, and the request is
//! rejected without changes if any id belongs to someone else.
//!
//! ## Sessions
//!
//! Login verifies an Argon2id password hash and, when enabled, a TOTP code.
//! The session token lives in the `linkdeck_session` cookie; the database only
//! stores its SHA-256 hash.

pub mod api;
pub mod cli;
pub mod client;
pub mod error_code;
pub mod sites;

#[cfg(test)]
mod test_support;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
