//! Signed-in user resolution for handlers that need a session.

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;

use super::{session::authenticate_session, storage::SessionRecord, types::MessageResponse};

/// The user behind a live session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
}

impl From<SessionRecord> for Principal {
    fn from(record: SessionRecord) -> Self {
        Self {
            user_id: record.user_id,
        }
    }
}

/// Resolve a session cookie into a principal, or return 401 for missing sessions.
pub async fn require_auth(headers: &HeaderMap, pool: &PgPool) -> Result<Principal, StatusCode> {
    authenticate_session(headers, pool)
        .await?
        .map(Principal::from)
        .ok_or(StatusCode::UNAUTHORIZED)
}

/// Turn a `require_auth` failure into the response body the account
/// endpoints send: 401 carries `{"message": "Not authenticated"}`.
pub(crate) fn rejection(status: StatusCode) -> Response {
    if status == StatusCode::UNAUTHORIZED {
        (status, Json(MessageResponse::new("Not authenticated"))).into_response()
    } else {
        status.into_response()
    }
}
