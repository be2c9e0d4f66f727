//! Endpoints for the signed-in user's profile and websites.
//!
//! Every handler resolves a [`context::ViewerContext`] first: the session must
//! be valid and the user row must still exist, otherwise the request ends with
//! `401`. Handlers only parse inputs and map outcomes; `storage` owns the SQL.
//!
//! Website ownership is enforced by scoping every query to the viewer's id.
//! The reorder mutation rejects the whole request when any id is foreign.

pub(crate) mod context;
pub(crate) mod me;
pub(crate) mod order;
pub(crate) mod profile;
pub(crate) mod storage;
pub(crate) mod types;
pub mod username;
pub(crate) mod websites;

pub use username::{UsernameChecker, ViewerState};
