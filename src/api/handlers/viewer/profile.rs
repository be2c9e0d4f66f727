//! Profile update for the signed-in user.
//!
//! Flow Overview:
//! 1) Authenticate and load the current profile.
//! 2) Slugify a supplied username and check availability only when it changes.
//! 3) Apply the allow-listed fields.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info};

use super::{
    context::ViewerContext,
    storage::{update_profile as store_profile, ProfileUpdateOutcome},
    types::UpdateProfileRequest,
    username::{ViewerState, USERNAME_TAKEN_MESSAGE},
};
use crate::api::handlers::auth::types::MessageResponse;
use crate::sites::slugify;

#[utoipa::path(
    patch,
    path = "/api/viewer/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 204, description = "Profile updated"),
        (status = 400, description = "Username unavailable or invalid payload", body = MessageResponse),
        (status = 401, description = "Missing or invalid session")
    ),
    tag = "viewer"
)]
pub async fn update_profile(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    viewer_state: Extension<Arc<ViewerState>>,
    payload: Option<Json<UpdateProfileRequest>>,
) -> impl IntoResponse {
    let ctx = match ViewerContext::resolve(&headers, &pool).await {
        Ok(ctx) => ctx,
        Err(status) => return status.into_response(),
    };

    let Some(Json(mut request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload").into_response();
    };

    let username = match request.username.take() {
        Some(raw) => {
            let slug = slugify(&raw);
            if slug.is_empty() {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(MessageResponse::new("Username must contain letters or digits")),
                )
                    .into_response();
            }
            Some(slug)
        }
        None => None,
    };

    if let Some(username) = username.as_deref() {
        if ctx.user.username.as_deref() != Some(username) {
            match viewer_state
                .username_checker()
                .check(&ctx.pool, username, ctx.user.id)
                .await
            {
                Ok(availability) if availability.available => {}
                Ok(availability) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(MessageResponse::new(&availability.message)),
                    )
                        .into_response();
                }
                Err(err) => {
                    error!("Failed to check username availability: {err}");
                    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                }
            }
        }
    }

    let changes = request.into_changes(username);
    match store_profile(&ctx.pool, ctx.user.id, &changes).await {
        Ok(ProfileUpdateOutcome::Updated) => {
            info!(user_id = ctx.user.id, "Profile updated");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(ProfileUpdateOutcome::UsernameTaken) => (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::new(USERNAME_TAKEN_MESSAGE)),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to update profile: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
