//! Login page state.
//!
//! `Idle -> Submitting -> {Success, NeedsSecondFactor, Error}`. Once the
//! server has asked for a second factor, every later submission must carry a
//! six-digit code.

use super::{
    api::ApiClient,
    error::ClientError,
    messages::{generic_message, login_message},
};
use crate::api::handlers::auth::types::LoginRequest;
use crate::error_code::ErrorCode;

pub const DEFAULT_REDIRECT: &str = "/";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    Submitting,
    NeedsSecondFactor,
    /// Signed in; the page should do a full navigation to `redirect`.
    Success { redirect: String },
    Error,
}

#[derive(Clone, Debug)]
pub struct LoginFlow {
    state: LoginState,
    second_factor_required: bool,
    message: Option<&'static str>,
    redirect: String,
}

impl Default for LoginFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginFlow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LoginState::Idle,
            second_factor_required: false,
            message: None,
            redirect: DEFAULT_REDIRECT.to_string(),
        }
    }

    /// Redirect to `callback_url` after login. Only same-site paths are
    /// accepted; anything else keeps the default.
    #[must_use]
    pub fn with_callback_url(mut self, callback_url: &str) -> Self {
        if callback_url.starts_with('/') && !callback_url.starts_with("//") {
            self.redirect = callback_url.to_string();
        }
        self
    }

    #[must_use]
    pub const fn state(&self) -> &LoginState {
        &self.state
    }

    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        self.message
    }

    #[must_use]
    pub const fn second_factor_required(&self) -> bool {
        self.second_factor_required
    }

    /// Move to `Submitting`. Returns `false` when the submission must not be
    /// sent: one is already in flight, login already succeeded, or a second
    /// factor is required and `totp_code` is not six digits.
    pub fn begin(&mut self, totp_code: Option<&str>) -> bool {
        if matches!(
            self.state,
            LoginState::Submitting | LoginState::Success { .. }
        ) {
            return false;
        }

        if self.second_factor_required && !totp_code.is_some_and(is_six_digit_code) {
            self.message = Some(login_message(ErrorCode::IncorrectTwoFactorCode));
            return false;
        }

        self.state = LoginState::Submitting;
        self.message = None;
        true
    }

    /// Apply the server's answer to a submission started with [`Self::begin`].
    pub fn finish<T>(&mut self, outcome: &Result<T, ClientError>) {
        if self.state != LoginState::Submitting {
            return;
        }

        match outcome {
            Ok(_) => {
                self.state = LoginState::Success {
                    redirect: self.redirect.clone(),
                };
                self.message = None;
            }
            Err(err) => match err.code() {
                Some(ErrorCode::SecondFactorRequired) => {
                    self.second_factor_required = true;
                    self.state = LoginState::NeedsSecondFactor;
                    self.message = Some(login_message(ErrorCode::SecondFactorRequired));
                }
                Some(code) => {
                    self.state = LoginState::Error;
                    self.message = Some(login_message(code));
                }
                None => {
                    self.state = LoginState::Error;
                    self.message = Some(generic_message());
                }
            },
        }
    }

    /// Run one submission against the API.
    pub async fn submit(
        &mut self,
        client: &ApiClient,
        email: &str,
        password: &str,
        totp_code: Option<&str>,
    ) -> &LoginState {
        if !self.begin(totp_code) {
            return &self.state;
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            totp_code: if self.second_factor_required {
                totp_code.map(str::to_string)
            } else {
                None
            },
        };
        let outcome = client.login(&request).await;
        self.finish(&outcome);
        &self.state
    }
}

fn is_six_digit_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn api_error(status: StatusCode, code: Option<ErrorCode>) -> Result<(), ClientError> {
        Err(ClientError::Api {
            status,
            code,
            message: None,
        })
    }

    #[test]
    fn success_redirects_to_callback() {
        let mut flow = LoginFlow::new().with_callback_url("/sites");
        assert!(flow.begin(None));
        assert_eq!(flow.state(), &LoginState::Submitting);
        flow.finish(&Ok::<(), ClientError>(()));
        assert_eq!(
            flow.state(),
            &LoginState::Success {
                redirect: "/sites".to_string()
            }
        );
    }

    #[test]
    fn external_callback_is_ignored() {
        let mut flow = LoginFlow::new().with_callback_url("https://evil.example/");
        assert!(flow.begin(None));
        flow.finish(&Ok::<(), ClientError>(()));
        assert_eq!(
            flow.state(),
            &LoginState::Success {
                redirect: DEFAULT_REDIRECT.to_string()
            }
        );

        let flow = LoginFlow::new().with_callback_url("//evil.example/");
        assert_eq!(flow.redirect, DEFAULT_REDIRECT);
    }

    #[test]
    fn submit_while_submitting_is_ignored() {
        let mut flow = LoginFlow::new();
        assert!(flow.begin(None));
        assert!(!flow.begin(None));
        assert_eq!(flow.state(), &LoginState::Submitting);
    }

    #[test]
    fn second_factor_then_code() {
        let mut flow = LoginFlow::new();
        assert!(flow.begin(None));
        flow.finish(&api_error(
            StatusCode::UNAUTHORIZED,
            Some(ErrorCode::SecondFactorRequired),
        ));
        assert_eq!(flow.state(), &LoginState::NeedsSecondFactor);
        assert!(flow.second_factor_required());
        assert_eq!(
            flow.message(),
            Some(login_message(ErrorCode::SecondFactorRequired))
        );

        assert!(!flow.begin(None));
        assert!(!flow.begin(Some("12345")));
        assert!(!flow.begin(Some("12a456")));
        assert_eq!(flow.state(), &LoginState::NeedsSecondFactor);

        assert!(flow.begin(Some("123456")));
        assert_eq!(flow.state(), &LoginState::Submitting);
        assert_eq!(flow.message(), None);
    }

    #[test]
    fn error_codes_map_to_messages() {
        let mut flow = LoginFlow::new();
        assert!(flow.begin(None));
        flow.finish(&api_error(StatusCode::NOT_FOUND, Some(ErrorCode::UserNotFound)));
        assert_eq!(flow.state(), &LoginState::Error);
        assert_eq!(
            flow.message(),
            Some("No account exists matching that email address.")
        );

        assert!(flow.begin(None));
        flow.finish(&api_error(StatusCode::BAD_REQUEST, None));
        assert_eq!(flow.message(), Some(generic_message()));
    }

    #[tokio::test]
    async fn submit_drives_the_api() -> anyhow::Result<()> {
        use axum::{response::IntoResponse, routing::post, Json, Router};

        let router = Router::new().route(
            "/api/auth/login",
            post(|Json(body): Json<serde_json::Value>| async move {
                if body["totpCode"] == "654321" {
                    Json(serde_json::json!({"userId": 1, "email": "a@b.c"})).into_response()
                } else {
                    ErrorCode::SecondFactorRequired.into_response()
                }
            }),
        );
        let client = ApiClient::new(&super::super::api::tests::spawn(router).await?)?;

        let mut flow = LoginFlow::new();
        let state = flow.submit(&client, "a@b.c", "pw", Some("654321")).await;
        assert_eq!(state, &LoginState::NeedsSecondFactor);

        let state = flow.submit(&client, "a@b.c", "pw", Some("654321")).await;
        assert_eq!(
            state,
            &LoginState::Success {
                redirect: "/".to_string()
            }
        );
        Ok(())
    }
}
