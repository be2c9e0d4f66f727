//! Username availability checks used by profile updates.
//!
//! Regular deployments only look at the local `users` table. Premium
//! deployments delegate to an external service that also reserves short and
//! branded names; it answers `{"available": bool, "message": string}`.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::time::Duration;
use tracing::{error, info_span, Instrument};
use url::Url;

use super::storage::username_taken;

const PREMIUM_CHECK_TIMEOUT_SECONDS: u64 = 5;
pub(crate) const USERNAME_TAKEN_MESSAGE: &str = "A user exists with that username";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernameAvailability {
    pub available: bool,
    #[serde(default)]
    pub message: String,
}

impl UsernameAvailability {
    fn available() -> Self {
        Self {
            available: true,
            message: String::new(),
        }
    }

    fn taken() -> Self {
        Self {
            available: false,
            message: USERNAME_TAKEN_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PremiumCheckRequest<'a> {
    username: &'a str,
}

#[derive(Debug)]
pub enum UsernameChecker {
    /// Checks the local `users` table only.
    Regular,
    /// Asks an external availability service.
    Premium { url: Url, client: Client },
}

impl UsernameChecker {
    /// Build a checker that posts to the premium availability endpoint.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn premium(url: &str) -> Result<Self> {
        let url = Url::parse(url).context("Invalid premium username URL")?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!("Premium username URL must use http(s): {url}"));
        }

        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(Duration::from_secs(PREMIUM_CHECK_TIMEOUT_SECONDS))
            .build()
            .context("Failed to build premium username HTTP client")?;

        Ok(Self::Premium { url, client })
    }

    /// Check whether `username` can be claimed by `user_id`.
    ///
    /// # Errors
    /// Returns an error if the lookup fails or the remote service misbehaves.
    pub async fn check(
        &self,
        pool: &PgPool,
        username: &str,
        user_id: i64,
    ) -> Result<UsernameAvailability> {
        match self {
            Self::Regular => {
                if username_taken(pool, username, user_id).await? {
                    Ok(UsernameAvailability::taken())
                } else {
                    Ok(UsernameAvailability::available())
                }
            }
            Self::Premium { url, client } => check_premium(client, url, username).await,
        }
    }
}

async fn check_premium(client: &Client, url: &Url, username: &str) -> Result<UsernameAvailability> {
    let span = info_span!("username.premium_check", http.method = "POST", url = %url);
    let response = client
        .post(url.as_str())
        .json(&PremiumCheckRequest { username })
        .send()
        .instrument(span)
        .await
        .context("Premium username request failed")?;

    let status = response.status();
    if !status.is_success() {
        error!("Premium username service returned {status}");
        return Err(anyhow!("Premium username service returned {status}"));
    }

    response
        .json::<UsernameAvailability>()
        .await
        .context("Invalid premium username response")
}

/// Shared state for the viewer endpoints.
#[derive(Debug)]
pub struct ViewerState {
    username_checker: UsernameChecker,
}

impl ViewerState {
    #[must_use]
    pub fn new(username_checker: UsernameChecker) -> Self {
        Self { username_checker }
    }

    #[must_use]
    pub fn username_checker(&self) -> &UsernameChecker {
        &self.username_checker
    }
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(UsernameChecker::Regular)
    }
}
