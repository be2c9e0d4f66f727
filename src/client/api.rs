use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::error::ClientError;
use crate::api::handlers::auth::types::{
    ChangePasswordRequest, LoginRequest, MessageResponse, SessionResponse,
};
use crate::api::handlers::viewer::types::{MeResponse, UpdateProfileRequest, WebsiteOrderRequest};
use crate::sites::WebsiteListing;

const REQUEST_TIMEOUT_SECONDS: u64 = 10;

/// HTTP client holding the session cookie between calls.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
}

impl ApiClient {
    /// # Errors
    /// Returns an error if `base_url` does not parse or the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .cookie_store(true)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;
        Ok(Self {
            base_url: Url::parse(base_url)?,
            http,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let err = ClientError::from_response(response).await;
            debug!("request failed: {err}");
            Err(err)
        }
    }

    /// Log in and keep the session cookie for subsequent calls.
    ///
    /// # Errors
    /// Returns the server's error code (for example `incorrect-password` or
    /// `second-factor-required`) or a transport error.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<SessionResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/login")?)
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `None` when there is no active session.
    ///
    /// # Errors
    /// Returns an error on transport failure or an unexpected status.
    pub async fn session(&self) -> Result<Option<SessionResponse>, ClientError> {
        let response = self.http.get(self.url("/api/auth/session")?).send().await?;
        let response = Self::check(response).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }

    /// # Errors
    /// Returns an error on transport failure or an unexpected status.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.http.post(self.url("/api/auth/logout")?).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// # Errors
    /// Returns an error when not signed in or on transport failure.
    pub async fn me(&self) -> Result<MeResponse, ClientError> {
        let response = self.http.get(self.url("/api/viewer/me")?).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// # Errors
    /// Returns an error when not signed in or on transport failure.
    pub async fn websites(&self) -> Result<WebsiteListing, ClientError> {
        let response = self
            .http
            .get(self.url("/api/viewer/websites")?)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Submit the full id order, highest priority first.
    ///
    /// # Errors
    /// Returns an error if any id is not owned by the caller, ids repeat, or
    /// the request fails.
    pub async fn reorder_websites(&self, ids: &[i64]) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url("/api/viewer/website-order")?)
            .json(&WebsiteOrderRequest { ids: ids.to_vec() })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// # Errors
    /// Returns the server's error code (`incorrect-password`,
    /// `new-password-matches-old`, `missing-password`) or a transport error.
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ClientError> {
        let response = self
            .http
            .patch(self.url("/api/auth/changepw")?)
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// # Errors
    /// Returns an error when the username is unavailable or the request fails.
    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<(), ClientError> {
        let response = self
            .http
            .patch(self.url("/api/viewer/profile")?)
            .json(request)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error_code::ErrorCode;
    use anyhow::{Context, Result};
    use axum::{
        http::StatusCode as AxumStatus,
        response::IntoResponse,
        routing::{get, patch, post},
        Json, Router,
    };
    use serde_json::json;
    use tokio::net::TcpListener;

    /// Serve `router` on an ephemeral port and return its base URL.
    pub(crate) async fn spawn(router: Router) -> Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router.into_make_service()).await;
        });
        Ok(format!("http://{addr}/"))
    }

    fn stub_router() -> Router {
        Router::new()
            .route(
                "/api/auth/login",
                post(|Json(body): Json<serde_json::Value>| async move {
                    match body["password"].as_str() {
                        Some("right") => (
                            [("set-cookie", "linkdeck_session=stub; Path=/; HttpOnly")],
                            Json(json!({"userId": 7, "email": body["email"]})),
                        )
                            .into_response(),
                        Some("weird") => {
                            (AxumStatus::BAD_REQUEST, Json(json!({"error": "brand-new-code"})))
                                .into_response()
                        }
                        _ => ErrorCode::IncorrectPassword.into_response(),
                    }
                }),
            )
            .route(
                "/api/auth/session",
                get(|headers: axum::http::HeaderMap| async move {
                    let signed_in = headers
                        .get("cookie")
                        .and_then(|value| value.to_str().ok())
                        .is_some_and(|value| value.contains("linkdeck_session=stub"));
                    if signed_in {
                        Json(json!({"userId": 7, "email": "a@b.c"})).into_response()
                    } else {
                        AxumStatus::NO_CONTENT.into_response()
                    }
                }),
            )
            .route(
                "/api/auth/changepw",
                patch(|| async {
                    (
                        AxumStatus::UNAUTHORIZED,
                        Json(json!({"message": "Not authenticated"})),
                    )
                }),
            )
    }

    fn login_request(password: &str) -> LoginRequest {
        LoginRequest {
            email: "a@b.c".to_string(),
            password: password.to_string(),
            totp_code: None,
        }
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn login_stores_cookie_for_session() -> Result<()> {
        let client = ApiClient::new(&spawn(stub_router()).await?)?;

        assert!(client.session().await?.is_none());

        let session = client.login(&login_request("right")).await?;
        assert_eq!(session.user_id, 7);

        let session = client.session().await?.context("session expected")?;
        assert_eq!(session.email, "a@b.c");
        Ok(())
    }

    #[tokio::test]
    async fn error_codes_are_decoded() -> Result<()> {
        let client = ApiClient::new(&spawn(stub_router()).await?)?;

        let err = client
            .login(&login_request("wrong"))
            .await
            .err()
            .context("login should fail")?;
        assert_eq!(err.code(), Some(ErrorCode::IncorrectPassword));
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));

        let err = client
            .login(&login_request("weird"))
            .await
            .err()
            .context("login should fail")?;
        assert_eq!(err.code(), None);
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        Ok(())
    }

    #[tokio::test]
    async fn message_only_errors_keep_message() -> Result<()> {
        let client = ApiClient::new(&spawn(stub_router()).await?)?;
        let err = client
            .change_password(&ChangePasswordRequest {
                old_password: "a".to_string(),
                new_password: "b".to_string(),
            })
            .await
            .err()
            .context("change should fail")?;
        match err {
            ClientError::Api { status, code, message } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(code, None);
                assert_eq!(message.as_deref(), Some("Not authenticated"));
            }
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn full_app_round_trip() -> Result<()> {
        use crate::api::{app, AuthConfig, AuthState, ViewerState};
        use crate::sites::Plan;
        use crate::test_support::{insert_user, insert_website, TestDb};
        use std::sync::Arc;

        let Ok(db) = TestDb::new().await else {
            return Ok(());
        };
        let user_id =
            insert_user(&db.pool, "grace@example.com", "grace", Some("pw"), Plan::Free).await?;
        let first = insert_website(&db.pool, user_id, "first", 2, false).await?;
        let second = insert_website(&db.pool, user_id, "second", 1, false).await?;

        let router = app(
            db.pool.clone(),
            Arc::new(AuthState::new(AuthConfig::new(
                "http://localhost:3000".to_string(),
            ))),
            Arc::new(ViewerState::default()),
        )?;
        let client = ApiClient::new(&spawn(router).await?)?;

        client
            .login(&LoginRequest {
                email: "grace@example.com".to_string(),
                password: "pw".to_string(),
                totp_code: None,
            })
            .await?;
        assert_eq!(client.me().await?.username.as_deref(), Some("grace"));

        let listing = client.websites().await?;
        let ids: Vec<i64> = listing.website_groups[1]
            .websites
            .iter()
            .map(|listed| listed.website.id)
            .collect();
        assert_eq!(ids, vec![first, second]);

        client.reorder_websites(&[second, first]).await?;
        let listing = client.websites().await?;
        assert_eq!(listing.website_groups[1].websites[0].website.id, second);

        client.logout().await?;
        assert!(client.session().await?.is_none());
        Ok(())
    }
}
