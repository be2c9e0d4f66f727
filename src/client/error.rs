use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::error_code::ErrorCode;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("request failed with {status}{}", api_detail(.code.as_ref(), .message.as_deref()))]
    Api {
        status: StatusCode,
        code: Option<ErrorCode>,
        message: Option<String>,
    },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

// The code wins over the free-form message when both are present.
fn api_detail(code: Option<&ErrorCode>, message: Option<&str>) -> String {
    match (code, message) {
        (Some(code), _) => format!(": {code}"),
        (None, Some(message)) => format!(": {message}"),
        (None, None) => String::new(),
    }
}

#[derive(Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ClientError {
    /// Build an `Api` error from a failed response.
    ///
    /// Unknown codes are dropped so callers fall back to a generic message.
    pub(crate) async fn from_response(response: Response) -> Self {
        let status = response.status();
        let payload = response
            .bytes()
            .await
            .ok()
            .and_then(|bytes| serde_json::from_slice::<ErrorPayload>(&bytes).ok());

        let (code, message) = match payload {
            Some(payload) => (
                payload.error.and_then(|raw| raw.parse::<ErrorCode>().ok()),
                payload.message,
            ),
            None => (None, None),
        };

        Self::Api {
            status,
            code,
            message,
        }
    }

    #[must_use]
    pub const fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Api { code, .. } => *code,
            Self::Transport(_) | Self::InvalidUrl(_) => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            Self::InvalidUrl(_) => None,
        }
    }
}
