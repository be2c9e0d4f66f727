//! API handlers for linkdeck.
//!
//! `auth` owns credentials and sessions, `viewer` owns everything scoped to the
//! signed-in user (profile, websites, ordering).

pub mod auth;
pub mod health;
pub mod root;
pub mod viewer;
