//! TOTP second-factor verification (RFC 6238, SHA-1, 6 digits, 30 s step).

use anyhow::{anyhow, Result};
use totp_rs::{Algorithm, Secret, TOTP};

pub const TOTP_DIGITS: usize = 6;
const TOTP_SKEW: u8 = 1;
const TOTP_STEP_SECONDS: u64 = 30;

/// A code is well-formed when it is exactly six ASCII digits.
#[must_use]
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == TOTP_DIGITS && code.bytes().all(|byte| byte.is_ascii_digit())
}

fn build_totp(secret_base32: &str, issuer: &str, account: &str) -> Result<TOTP> {
    let secret = Secret::Encoded(secret_base32.to_string())
        .to_bytes()
        .map_err(|e| anyhow!("invalid TOTP secret: {e:?}"))?;
    TOTP::new(
        Algorithm::SHA1,
        TOTP_DIGITS,
        TOTP_SKEW,
        TOTP_STEP_SECONDS,
        secret,
        Some(issuer.to_string()),
        account.to_string(),
    )
    .map_err(|e| anyhow!("TOTP init error: {e}"))
}

/// Check `code` against the current time window (plus one step of skew).
///
/// # Errors
/// Returns an error if the stored secret cannot be decoded or the clock is unusable.
pub fn verify_code(secret_base32: &str, code: &str, issuer: &str, account: &str) -> Result<bool> {
    let code = code.trim();
    if !is_well_formed_code(code) {
        return Ok(false);
    }
    let totp = build_totp(secret_base32, issuer, account)?;
    totp.check_current(code)
        .map_err(|e| anyhow!("system clock error: {e}"))
}

/// Current code for a secret.
#[cfg(test)]
pub(crate) fn current_code(secret_base32: &str, issuer: &str, account: &str) -> Result<String> {
    build_totp(secret_base32, issuer, account)?
        .generate_current()
        .map_err(|e| anyhow!("system clock error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> String {
        Secret::Raw(b"linkdeck-test-secret".to_vec()).to_encoded().to_string()
    }

    #[test]
    fn well_formed_codes() {
        assert!(is_well_formed_code("012345"));
        assert!(!is_well_formed_code("12345"));
        assert!(!is_well_formed_code("1234567"));
        assert!(!is_well_formed_code("12a456"));
    }

    #[test]
    fn current_code_verifies() -> Result<()> {
        let secret = secret();
        let code = current_code(&secret, "linkdeck", "alice@example.com")?;
        assert!(verify_code(&secret, &code, "linkdeck", "alice@example.com")?);
        Ok(())
    }

    #[test]
    fn malformed_code_is_rejected_without_error() -> Result<()> {
        assert!(!verify_code(&secret(), "abc", "linkdeck", "alice@example.com")?);
        Ok(())
    }

    #[test]
    fn invalid_secret_is_an_error() {
        assert!(verify_code("!!not-base32!!", "123456", "linkdeck", "alice@example.com").is_err());
    }
}
