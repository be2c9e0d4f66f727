//! Landing redirect: signed-in users go to their sites, everyone else to login.

use axum::{
    extract::Extension,
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use sqlx::PgPool;

use super::auth::session::authenticate_session;

pub(crate) const SITES_PATH: &str = "/sites";
pub(crate) const LOGIN_PATH: &str = "/auth/login";

pub async fn root(headers: HeaderMap, pool: Extension<PgPool>) -> impl IntoResponse {
    let location = match authenticate_session(&headers, &pool).await {
        Ok(Some(_)) => SITES_PATH,
        Ok(None) => LOGIN_PATH,
        Err(status) => return status.into_response(),
    };

    let mut response_headers = HeaderMap::new();
    response_headers.insert(LOCATION, HeaderValue::from_static(location));
    (StatusCode::TEMPORARY_REDIRECT, response_headers).into_response()
}
