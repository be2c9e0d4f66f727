use super::{
    api::ApiClient,
    error::ClientError,
    messages::{change_password_message, retry_message, PASSWORD_CHANGED},
};
use crate::api::handlers::auth::types::ChangePasswordRequest;

/// Password change form on the security settings page.
#[derive(Clone, Debug, Default)]
pub struct ChangePasswordForm {
    pub old_password: String,
    pub new_password: String,
    submitting: bool,
    error: Option<&'static str>,
    notice: Option<&'static str>,
}

impl ChangePasswordForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub const fn error(&self) -> Option<&'static str> {
        self.error
    }

    /// Success toast text, set after the password was changed.
    #[must_use]
    pub const fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    /// Returns `false` if a submission is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        self.error = None;
        self.notice = None;
        true
    }

    pub fn finish<T>(&mut self, outcome: &Result<T, ClientError>) {
        self.submitting = false;
        match outcome {
            Ok(_) => {
                self.old_password.clear();
                self.new_password.clear();
                self.notice = Some(PASSWORD_CHANGED);
            }
            Err(err) => {
                self.error = Some(
                    err.code()
                        .map_or(retry_message(), change_password_message),
                );
            }
        }
    }

    /// Send the current inputs. Returns `true` when the password was changed.
    pub async fn submit(&mut self, client: &ApiClient) -> bool {
        if !self.begin() {
            return false;
        }
        let request = ChangePasswordRequest {
            old_password: self.old_password.clone(),
            new_password: self.new_password.clone(),
        };
        let outcome = client.change_password(&request).await;
        self.finish(&outcome);
        outcome.is_ok()
    }
}
