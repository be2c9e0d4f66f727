use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;

use super::{context::ViewerContext, types::MeResponse};

#[utoipa::path(
    get,
    path = "/api/viewer/me",
    responses(
        (status = 200, description = "Profile of the signed-in user", body = MeResponse),
        (status = 401, description = "Missing or invalid session")
    ),
    tag = "viewer"
)]
pub async fn get_me(headers: HeaderMap, pool: Extension<PgPool>) -> impl IntoResponse {
    let ctx = match ViewerContext::resolve(&headers, &pool).await {
        Ok(ctx) => ctx,
        Err(status) => return status.into_response(),
    };

    let user = ctx.user;
    let response = MeResponse {
        id: user.id,
        name: user.name,
        username: user.username,
        email: user.email,
        locale: user.locale,
        avatar: user.avatar,
        created_date: user.created_at,
        completed_onboarding: user.completed_onboarding,
        two_factor_enabled: user.two_factor_enabled,
        brand_color: user.brand_color,
        plan: user.plan,
    };
    (StatusCode::OK, Json(response)).into_response()
}
