//! Website listing for the dashboard.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use tracing::error;

use super::{context::ViewerContext, storage};
use crate::sites::{build_listing, WebsiteListing};

#[utoipa::path(
    get,
    path = "/api/viewer/websites",
    responses(
        (status = 200, description = "Websites grouped by domain type", body = WebsiteListing),
        (status = 401, description = "Missing or invalid session")
    ),
    tag = "viewer"
)]
pub async fn list_websites(headers: HeaderMap, pool: Extension<PgPool>) -> impl IntoResponse {
    let ctx = match ViewerContext::resolve(&headers, &pool).await {
        Ok(ctx) => ctx,
        Err(status) => return status.into_response(),
    };

    match storage::list_websites(&ctx.pool, ctx.user.id).await {
        Ok(websites) => {
            let listing = build_listing(&ctx.owner(), websites);
            (StatusCode::OK, Json(listing)).into_response()
        }
        Err(err) => {
            error!("Failed to list websites: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
