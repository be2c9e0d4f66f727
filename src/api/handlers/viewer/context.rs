use axum::http::{HeaderMap, StatusCode};
use sqlx::PgPool;
use tracing::error;

use super::storage::{fetch_viewer, ViewerRecord};
use crate::api::handlers::auth::principal::require_auth;
use crate::sites::Owner;

/// Request-scoped context for viewer endpoints: the pool plus the signed-in
/// user's profile row.
pub(crate) struct ViewerContext {
    pub(crate) pool: PgPool,
    pub(crate) user: ViewerRecord,
}

impl ViewerContext {
    /// Authenticate the session and load the user row.
    ///
    /// A session whose user no longer exists is treated as unauthenticated.
    pub(crate) async fn resolve(headers: &HeaderMap, pool: &PgPool) -> Result<Self, StatusCode> {
        let principal = require_auth(headers, pool).await?;

        match fetch_viewer(pool, principal.user_id).await {
            Ok(Some(user)) => Ok(Self {
                pool: pool.clone(),
                user,
            }),
            Ok(None) => Err(StatusCode::UNAUTHORIZED),
            Err(err) => {
                error!("Failed to load viewer: {err}");
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    pub(crate) fn owner(&self) -> Owner {
        Owner {
            name: self.user.name.clone(),
            username: self.user.username.clone(),
            avatar: self.user.avatar.clone(),
            plan: self.user.plan,
        }
    }
}
