//! Error codes returned by the auth endpoints as `{"error": "<code>"}`.
//!
//! The same enum is decoded by the client layer, which maps each code to a
//! user-facing message with an exhaustive match.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    IncorrectPassword,
    UserNotFound,
    #[serde(rename = "missing-password")]
    UserMissingPassword,
    NewPasswordMatchesOld,
    SecondFactorRequired,
    IncorrectTwoFactorCode,
    InternalServerError,
}

impl ErrorCode {
    pub const ALL: [Self; 7] = [
        Self::IncorrectPassword,
        Self::UserNotFound,
        Self::UserMissingPassword,
        Self::NewPasswordMatchesOld,
        Self::SecondFactorRequired,
        Self::IncorrectTwoFactorCode,
        Self::InternalServerError,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IncorrectPassword => "incorrect-password",
            Self::UserNotFound => "user-not-found",
            Self::UserMissingPassword => "missing-password",
            Self::NewPasswordMatchesOld => "new-password-matches-old",
            Self::SecondFactorRequired => "second-factor-required",
            Self::IncorrectTwoFactorCode => "incorrect-two-factor-code",
            Self::InternalServerError => "internal-server-error",
        }
    }

    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::IncorrectPassword => StatusCode::FORBIDDEN,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::UserMissingPassword | Self::NewPasswordMatchesOld => StatusCode::BAD_REQUEST,
            Self::SecondFactorRequired | Self::IncorrectTwoFactorCode => StatusCode::UNAUTHORIZED,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == value)
            .ok_or_else(|| format!("unknown error code: {value}"))
    }
}

/// JSON body for error-code responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorCode,
}

impl IntoResponse for ErrorCode {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody { error: self })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn serde_matches_wire_codes() -> Result<()> {
        for code in ErrorCode::ALL {
            let encoded = serde_json::to_string(&code)?;
            assert_eq!(encoded, format!("\"{}\"", code.as_str()));
            let decoded: ErrorCode = serde_json::from_str(&encoded)?;
            assert_eq!(decoded, code);
        }
        Ok(())
    }

    #[test]
    fn from_str_rejects_unknown_codes() {
        assert_eq!(
            "incorrect-password".parse::<ErrorCode>(),
            Ok(ErrorCode::IncorrectPassword)
        );
        assert!("totally-new-code".parse::<ErrorCode>().is_err());
    }

    #[test]
    fn password_change_statuses() {
        assert_eq!(ErrorCode::UserMissingPassword.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::IncorrectPassword.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::NewPasswordMatchesOld.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::UserNotFound.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn into_response_writes_error_body() -> Result<()> {
        let response = ErrorCode::NewPasswordMatchesOld.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(
            value.get("error").and_then(serde_json::Value::as_str),
            Some("new-password-matches-old")
        );
        Ok(())
    }
}
