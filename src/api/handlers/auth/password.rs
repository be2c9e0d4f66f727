//! Password change for the signed-in user.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use tracing::{error, info};

use super::{
    hashing::{hash_password, verify_password},
    principal::{rejection, require_auth},
    storage::{lookup_credentials_by_id, update_password_hash},
    types::{ChangePasswordRequest, MessageResponse},
};
use crate::error_code::{ErrorBody, ErrorCode};

/// Validate a password change against the stored hash.
///
/// The old password is verified before the equality check, so a caller who
/// does not know the current password never learns whether `new` equals it.
pub(crate) fn check_password_change(
    stored_hash: Option<&str>,
    old_password: &str,
    new_password: &str,
) -> Result<(), ErrorCode> {
    let Some(stored_hash) = stored_hash else {
        return Err(ErrorCode::UserMissingPassword);
    };

    match verify_password(old_password, stored_hash) {
        Ok(true) => {}
        Ok(false) => return Err(ErrorCode::IncorrectPassword),
        Err(err) => {
            error!("Stored password hash is unusable: {err}");
            return Err(ErrorCode::InternalServerError);
        }
    }

    if old_password == new_password {
        return Err(ErrorCode::NewPasswordMatchesOld);
    }

    Ok(())
}

#[utoipa::path(
    patch,
    path = "/api/auth/changepw",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "No password set, or new password equals the old one", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 403, description = "Old password is incorrect", body = ErrorBody),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn change_password(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    payload: Option<Json<ChangePasswordRequest>>,
) -> impl IntoResponse {
    let principal = match require_auth(&headers, &pool).await {
        Ok(principal) => principal,
        Err(status) => return rejection(status),
    };

    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload").into_response();
    };

    let record = match lookup_credentials_by_id(&pool, principal.user_id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(MessageResponse::new("User not found")),
            )
                .into_response();
        }
        Err(err) => {
            error!("Failed to lookup credentials: {err}");
            return ErrorCode::InternalServerError.into_response();
        }
    };

    if let Err(code) = check_password_change(
        record.password_hash.as_deref(),
        &request.old_password,
        &request.new_password,
    ) {
        return code.into_response();
    }

    let new_hash = match hash_password(&request.new_password) {
        Ok(hash) => hash,
        Err(err) => {
            error!("Failed to hash new password: {err}");
            return ErrorCode::InternalServerError.into_response();
        }
    };

    match update_password_hash(&pool, record.user_id, &new_hash).await {
        Ok(true) => {
            info!(user_id = record.user_id, "Password changed");
            (
                StatusCode::OK,
                Json(MessageResponse::new("Password updated successfully")),
            )
                .into_response()
        }
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(MessageResponse::new("User not found")),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to update password: {err}");
            ErrorCode::InternalServerError.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn no_stored_password() {
        assert_eq!(
            check_password_change(None, "old", "new"),
            Err(ErrorCode::UserMissingPassword)
        );
    }

    #[test]
    fn old_password_must_verify() -> Result<()> {
        let hash = hash_password("current")?;
        assert_eq!(
            check_password_change(Some(&hash), "guess", "new"),
            Err(ErrorCode::IncorrectPassword)
        );
        Ok(())
    }

    #[test]
    fn incorrect_old_password_wins_over_equality() -> Result<()> {
        let hash = hash_password("current")?;
        assert_eq!(
            check_password_change(Some(&hash), "guess", "guess"),
            Err(ErrorCode::IncorrectPassword)
        );
        Ok(())
    }

    #[test]
    fn new_password_must_differ() -> Result<()> {
        let hash = hash_password("current")?;
        assert_eq!(
            check_password_change(Some(&hash), "current", "current"),
            Err(ErrorCode::NewPasswordMatchesOld)
        );
        Ok(())
    }

    #[test]
    fn valid_change_is_accepted() -> Result<()> {
        let hash = hash_password("current")?;
        assert_eq!(check_password_change(Some(&hash), "current", "next"), Ok(()));
        Ok(())
    }
}
