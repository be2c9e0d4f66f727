//! Website reorder mutation.
//!
//! The submitted list is the full display order. Ownership is checked and all
//! positions are written inside one transaction, so a rejected request leaves
//! every position untouched.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use tracing::{error, info, warn};

use super::{
    context::ViewerContext,
    storage::{reorder_websites, ReorderOutcome},
    types::WebsiteOrderRequest,
};
use crate::sites::{assign_positions, OrderError};

#[utoipa::path(
    post,
    path = "/api/viewer/website-order",
    request_body = WebsiteOrderRequest,
    responses(
        (status = 204, description = "Positions updated"),
        (status = 400, description = "Duplicate ids or invalid payload"),
        (status = 401, description = "Missing session, or an id is not owned by the caller")
    ),
    tag = "viewer"
)]
pub async fn website_order(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    payload: Option<Json<WebsiteOrderRequest>>,
) -> impl IntoResponse {
    let ctx = match ViewerContext::resolve(&headers, &pool).await {
        Ok(ctx) => ctx,
        Err(status) => return status.into_response(),
    };

    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload").into_response();
    };

    let updates = match assign_positions(&request.ids) {
        Ok(updates) => updates,
        Err(err) => {
            warn!(user_id = ctx.user.id, "Rejected website order: {err}");
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
    };

    if updates.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }

    match reorder_websites(&ctx.pool, ctx.user.id, &updates).await {
        Ok(ReorderOutcome::Applied) => {
            info!(user_id = ctx.user.id, count = updates.len(), "Websites reordered");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(ReorderOutcome::Rejected(err @ OrderError::NotOwned(_))) => {
            warn!(user_id = ctx.user.id, "Rejected website order: {err}");
            StatusCode::UNAUTHORIZED.into_response()
        }
        Ok(ReorderOutcome::Rejected(err)) => {
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        Err(err) => {
            error!("Failed to reorder websites: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
