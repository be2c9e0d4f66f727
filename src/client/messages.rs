//! English messages for server error codes.
//!
//! Every table is an exhaustive match, so a new [`ErrorCode`] variant does not
//! compile until each screen decides what to show for it.

use crate::error_code::ErrorCode;

const SOMETHING_WENT_WRONG: &str = "Something went wrong.";
const SOMETHING_WENT_WRONG_TRY_AGAIN: &str = "Something went wrong. Please try again.";

pub const PASSWORD_CHANGED: &str = "Your password has been successfully changed.";

/// Fallback for codes a screen has no specific wording for, and for
/// responses that carried no code at all.
#[must_use]
pub const fn generic_message() -> &'static str {
    SOMETHING_WENT_WRONG
}

/// Generic failure with a nudge to resubmit, used by forms.
#[must_use]
pub const fn retry_message() -> &'static str {
    SOMETHING_WENT_WRONG_TRY_AGAIN
}

#[must_use]
pub const fn login_message(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::SecondFactorRequired => {
            "Two-factor authentication is enabled. Enter the six-digit code from your authenticator app."
        }
        ErrorCode::IncorrectPassword => "Incorrect password. Please try again.",
        ErrorCode::UserNotFound => "No account exists matching that email address.",
        ErrorCode::IncorrectTwoFactorCode => "Incorrect two-factor code. Please try again.",
        ErrorCode::InternalServerError => {
            "Something went wrong. Please try again and contact us if the issue persists."
        }
        ErrorCode::UserMissingPassword | ErrorCode::NewPasswordMatchesOld => generic_message(),
    }
}

#[must_use]
pub const fn change_password_message(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::IncorrectPassword => "Current password is incorrect.",
        ErrorCode::NewPasswordMatchesOld => "New password matches your old password.",
        ErrorCode::UserNotFound
        | ErrorCode::UserMissingPassword
        | ErrorCode::SecondFactorRequired
        | ErrorCode::IncorrectTwoFactorCode
        | ErrorCode::InternalServerError => retry_message(),
    }
}
