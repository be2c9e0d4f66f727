//! Credential login with an optional TOTP second factor.
//!
//! Flow Overview:
//! 1) Look up the user by normalized email.
//! 2) Verify the password against the stored Argon2 hash.
//! 3) When 2FA is enabled, require and verify a TOTP code.
//! 4) Create a session and set the `HttpOnly` cookie.
//!
//! Every failure is reported as an `ErrorCode` the client can map to a message.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info};

use super::{
    hashing::verify_password,
    session::session_cookie,
    state::AuthState,
    storage::{insert_session, lookup_credentials_by_email, CredentialRecord},
    totp,
    types::{LoginRequest, SessionResponse},
    utils::{normalize_email, valid_email},
};
use crate::error_code::{ErrorBody, ErrorCode};

/// Decide whether the supplied credentials unlock `record`.
///
/// Checks run in a fixed order: password presence, password match, then the
/// second factor when enabled.
pub(crate) fn check_credentials(
    record: &CredentialRecord,
    password: &str,
    totp_code: Option<&str>,
    totp_issuer: &str,
) -> Result<(), ErrorCode> {
    let Some(stored_hash) = record.password_hash.as_deref() else {
        return Err(ErrorCode::UserMissingPassword);
    };

    match verify_password(password, stored_hash) {
        Ok(true) => {}
        Ok(false) => return Err(ErrorCode::IncorrectPassword),
        Err(err) => {
            error!("Stored password hash is unusable: {err}");
            return Err(ErrorCode::InternalServerError);
        }
    }

    if !record.two_factor_enabled {
        return Ok(());
    }

    let Some(code) = totp_code.map(str::trim).filter(|code| !code.is_empty()) else {
        return Err(ErrorCode::SecondFactorRequired);
    };

    let Some(secret) = record.two_factor_secret.as_deref() else {
        error!(user_id = record.user_id, "Two-factor enabled without a secret");
        return Err(ErrorCode::InternalServerError);
    };

    match totp::verify_code(secret, code, totp_issuer, &record.email) {
        Ok(true) => Ok(()),
        Ok(false) => Err(ErrorCode::IncorrectTwoFactorCode),
        Err(err) => {
            error!("Failed to verify TOTP code: {err}");
            Err(ErrorCode::InternalServerError)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = SessionResponse),
        (status = 400, description = "Account has no password", body = ErrorBody),
        (status = 401, description = "Second factor required or incorrect", body = ErrorBody),
        (status = 403, description = "Incorrect password", body = ErrorBody),
        (status = 404, description = "No account for this email", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload").into_response();
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return ErrorCode::UserNotFound.into_response();
    }

    let record = match lookup_credentials_by_email(&pool, &email).await {
        Ok(Some(record)) => record,
        Ok(None) => return ErrorCode::UserNotFound.into_response(),
        Err(err) => {
            error!("Failed to lookup login record: {err}");
            return ErrorCode::InternalServerError.into_response();
        }
    };

    if let Err(code) = check_credentials(
        &record,
        &request.password,
        request.totp_code.as_deref(),
        auth_state.config().totp_issuer(),
    ) {
        return code.into_response();
    }

    let token =
        match insert_session(&pool, record.user_id, auth_state.config().session_ttl_seconds()).await
        {
            Ok(token) => token,
            Err(err) => {
                error!("Failed to create session: {err}");
                return ErrorCode::InternalServerError.into_response();
            }
        };

    let mut headers = HeaderMap::new();
    match session_cookie(auth_state.config(), &token) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return ErrorCode::InternalServerError.into_response();
        }
    }

    info!(user_id = record.user_id, "User logged in");
    let response = SessionResponse {
        user_id: record.user_id,
        email: record.email,
    };
    (StatusCode::OK, headers, Json(response)).into_response()
}
