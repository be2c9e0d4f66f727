//! Database helpers for credentials and sessions.

use anyhow::{anyhow, Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;

use super::utils::{generate_session_token, hash_session_token, is_unique_violation};

/// Fields needed to check a password and an optional second factor.
#[derive(Debug)]
pub(crate) struct CredentialRecord {
    pub(crate) user_id: i64,
    pub(crate) email: String,
    pub(crate) password_hash: Option<String>,
    pub(crate) two_factor_enabled: bool,
    pub(crate) two_factor_secret: Option<String>,
}

/// Minimal data returned for a valid session cookie.
#[derive(Debug)]
pub(crate) struct SessionRecord {
    pub(crate) user_id: i64,
    pub(crate) email: String,
}

const CREDENTIAL_COLUMNS: &str =
    "id, email, password, two_factor_enabled, two_factor_secret";

fn credential_from_row(row: &sqlx::postgres::PgRow) -> CredentialRecord {
    CredentialRecord {
        user_id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password"),
        two_factor_enabled: row.get("two_factor_enabled"),
        two_factor_secret: row.get("two_factor_secret"),
    }
}

/// Look up credentials by normalized email (login).
pub(crate) async fn lookup_credentials_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<CredentialRecord>> {
    let query = format!("SELECT {CREDENTIAL_COLUMNS} FROM users WHERE email = $1");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup credentials by email")?;

    Ok(row.as_ref().map(credential_from_row))
}

/// Look up credentials for an authenticated user (password change).
pub(crate) async fn lookup_credentials_by_id(
    pool: &PgPool,
    user_id: i64,
) -> Result<Option<CredentialRecord>> {
    let query = format!("SELECT {CREDENTIAL_COLUMNS} FROM users WHERE id = $1");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup credentials by id")?;

    Ok(row.as_ref().map(credential_from_row))
}

/// Replace a user's password hash. Returns `false` if the user no longer exists.
pub(crate) async fn update_password_hash(
    pool: &PgPool,
    user_id: i64,
    password_hash: &str,
) -> Result<bool> {
    let query = "UPDATE users SET password = $2 WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(user_id)
        .bind(password_hash)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to update password hash")?;
    Ok(result.rows_affected() == 1)
}

pub(crate) async fn insert_session(pool: &PgPool, user_id: i64, ttl_seconds: i64) -> Result<String> {
    // Store only the hash; the raw token goes back to the caller for the cookie.
    let query = r"
        INSERT INTO user_sessions (user_id, session_hash, expires_at)
        VALUES ($1, $2, NOW() + ($3 * INTERVAL '1 second'))
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );

    for _ in 0..3 {
        let token = generate_session_token()?;
        let token_hash = hash_session_token(&token);
        let result = sqlx::query(query)
            .bind(user_id)
            .bind(token_hash)
            .bind(ttl_seconds)
            .execute(pool)
            .instrument(span.clone())
            .await;

        match result {
            Ok(_) => return Ok(token),
            Err(err) if is_unique_violation(&err) => {}
            Err(err) => return Err(err).context("failed to insert session"),
        }
    }

    Err(anyhow!("failed to generate unique session token"))
}

pub(crate) async fn lookup_session(
    pool: &PgPool,
    token_hash: &[u8],
) -> Result<Option<SessionRecord>> {
    let query = r"
        SELECT users.id, users.email
        FROM user_sessions
        JOIN users ON users.id = user_sessions.user_id
        WHERE user_sessions.session_hash = $1
          AND user_sessions.expires_at > NOW()
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(token_hash)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup session")?;

    let Some(row) = row else {
        return Ok(None);
    };

    // Activity is recorded without extending the session TTL.
    let query = "UPDATE user_sessions SET last_seen_at = NOW() WHERE session_hash = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(token_hash)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to update session last_seen_at")?;

    Ok(Some(SessionRecord {
        user_id: row.get("id"),
        email: row.get("email"),
    }))
}

pub(crate) async fn delete_session(pool: &PgPool, token_hash: &[u8]) -> Result<()> {
    // Logout is idempotent; it's fine if no rows are deleted.
    let query = "DELETE FROM user_sessions WHERE session_hash = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(token_hash)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete session")?;
    Ok(())
}
