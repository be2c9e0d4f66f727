//! Typed client for the linkdeck HTTP API.
//!
//! Besides the HTTP wrapper this module holds the state a page keeps while
//! talking to the API: the login flow, the password change form, and the
//! optimistic website list. Each state machine is driven by the result of an
//! [`ApiClient`] call, so it can be tested without a browser.

pub mod api;
pub mod error;
pub mod login;
pub mod messages;
pub mod password;
pub mod reorder;

pub use self::api::ApiClient;
pub use self::error::ClientError;
pub use self::login::{LoginFlow, LoginState};
pub use self::password::ChangePasswordForm;
pub use self::reorder::{Direction, Sortable, SortableList};

pub use crate::api::handlers::auth::types::{
    ChangePasswordRequest, LoginRequest, MessageResponse, SessionResponse,
};
pub use crate::api::handlers::viewer::types::{MeResponse, UpdateProfileRequest};
pub use crate::sites::{ListedWebsite, Website, WebsiteListing};
