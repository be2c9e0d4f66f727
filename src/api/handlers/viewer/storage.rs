//! Database helpers for the viewer's profile and websites.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use tracing::Instrument;

use crate::api::handlers::auth::utils::is_unique_violation;
use crate::sites::{ensure_owned, OrderError, Plan, PositionUpdate, Website};

/// The signed-in user's profile row.
#[derive(Clone, Debug)]
pub(crate) struct ViewerRecord {
    pub(crate) id: i64,
    pub(crate) email: String,
    pub(crate) username: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) avatar: Option<String>,
    pub(crate) locale: Option<String>,
    pub(crate) brand_color: String,
    pub(crate) completed_onboarding: bool,
    pub(crate) two_factor_enabled: bool,
    pub(crate) plan: Plan,
    pub(crate) created_at: String,
}

/// Allow-listed profile changes; `None` leaves a column untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ProfileChanges {
    pub(crate) username: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) avatar: Option<String>,
    pub(crate) time_zone: Option<String>,
    pub(crate) week_start: Option<String>,
    pub(crate) hide_branding: Option<bool>,
    pub(crate) brand_color: Option<String>,
    /// `Some(None)` clears the theme.
    pub(crate) theme: Option<Option<String>>,
    pub(crate) completed_onboarding: Option<bool>,
    pub(crate) locale: Option<String>,
}

/// Outcome of a reorder request; a rejection writes nothing.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ReorderOutcome {
    Applied,
    Rejected(OrderError),
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ProfileUpdateOutcome {
    Updated,
    UsernameTaken,
}

pub(crate) async fn fetch_viewer(pool: &PgPool, user_id: i64) -> Result<Option<ViewerRecord>> {
    let query = r#"
        SELECT
            id,
            email,
            username,
            name,
            avatar,
            locale,
            brand_color,
            completed_onboarding,
            two_factor_enabled,
            plan,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        FROM users
        WHERE id = $1
    "#;
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch viewer")?;

    let Some(row) = row else {
        return Ok(None);
    };

    let plan: String = row.get("plan");
    let plan = plan
        .parse::<Plan>()
        .map_err(anyhow::Error::msg)
        .context("invalid plan stored for user")?;

    Ok(Some(ViewerRecord {
        id: row.get("id"),
        email: row.get("email"),
        username: row.get("username"),
        name: row.get("name"),
        avatar: row.get("avatar"),
        locale: row.get("locale"),
        brand_color: row.get("brand_color"),
        completed_onboarding: row.get("completed_onboarding"),
        two_factor_enabled: row.get("two_factor_enabled"),
        plan,
        created_at: row.get("created_at"),
    }))
}

pub(crate) async fn list_websites(pool: &PgPool, user_id: i64) -> Result<Vec<Website>> {
    let query = r"
        SELECT id, title, slug, description, position, hidden, has_custom_domain, status
        FROM websites
        WHERE user_id = $1
        ORDER BY position DESC, id ASC
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(user_id)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list websites")?;

    Ok(rows
        .iter()
        .map(|row| Website {
            id: row.get("id"),
            title: row.get("title"),
            slug: row.get("slug"),
            description: row.get("description"),
            position: row.get("position"),
            hidden: row.get("hidden"),
            has_custom_domain: row.get("has_custom_domain"),
            status: row.get("status"),
        })
        .collect())
}

/// Apply new positions in one transaction after checking that the caller owns
/// every website. Nothing is written when any id is foreign.
pub(crate) async fn reorder_websites(
    pool: &PgPool,
    user_id: i64,
    updates: &[PositionUpdate],
) -> Result<ReorderOutcome> {
    let ids: Vec<i64> = updates.iter().map(|update| update.id).collect();
    let positions: Vec<i32> = updates.iter().map(|update| update.position).collect();

    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    // Row locks serialize concurrent reorders of the same websites.
    let query = r"
        SELECT id
        FROM websites
        WHERE user_id = $1 AND id = ANY($2)
        FOR UPDATE
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(user_id)
        .bind(&ids)
        .fetch_all(&mut *tx)
        .instrument(span)
        .await
        .context("failed to load owned websites")?;
    let owned: HashSet<i64> = rows.iter().map(|row| row.get("id")).collect();

    if let Err(err) = ensure_owned(&ids, &owned) {
        tx.rollback().await.context("failed to rollback reorder")?;
        return Ok(ReorderOutcome::Rejected(err));
    }

    let query = r"
        UPDATE websites
        SET position = ordered.position
        FROM UNNEST($2::BIGINT[], $3::INTEGER[]) AS ordered(id, position)
        WHERE websites.id = ordered.id AND websites.user_id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .bind(&ids)
        .bind(&positions)
        .execute(&mut *tx)
        .instrument(span)
        .await
        .context("failed to update website positions")?;

    tx.commit().await.context("failed to commit reorder")?;
    Ok(ReorderOutcome::Applied)
}

/// Whether another user already holds `username`.
pub(crate) async fn username_taken(pool: &PgPool, username: &str, user_id: i64) -> Result<bool> {
    let query = "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 AND id <> $2) AS taken";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .bind(user_id)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to check username")?;
    Ok(row.get("taken"))
}

pub(crate) async fn update_profile(
    pool: &PgPool,
    user_id: i64,
    changes: &ProfileChanges,
) -> Result<ProfileUpdateOutcome> {
    let query = r"
        UPDATE users
        SET
            username = COALESCE($2, username),
            name = COALESCE($3, name),
            bio = COALESCE($4, bio),
            avatar = COALESCE($5, avatar),
            time_zone = COALESCE($6, time_zone),
            week_start = COALESCE($7, week_start),
            hide_branding = COALESCE($8, hide_branding),
            brand_color = COALESCE($9, brand_color),
            theme = CASE WHEN $10 THEN $11 ELSE theme END,
            completed_onboarding = COALESCE($12, completed_onboarding),
            locale = COALESCE($13, locale)
        WHERE id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(user_id)
        .bind(changes.username.as_deref())
        .bind(changes.name.as_deref())
        .bind(changes.bio.as_deref())
        .bind(changes.avatar.as_deref())
        .bind(changes.time_zone.as_deref())
        .bind(changes.week_start.as_deref())
        .bind(changes.hide_branding)
        .bind(changes.brand_color.as_deref())
        .bind(changes.theme.is_some())
        .bind(changes.theme.clone().flatten())
        .bind(changes.completed_onboarding)
        .bind(changes.locale.as_deref())
        .execute(pool)
        .instrument(span)
        .await;

    match result {
        Ok(_) => Ok(ProfileUpdateOutcome::Updated),
        // Another user claimed the username between the check and the write.
        Err(err) if is_unique_violation(&err) => Ok(ProfileUpdateOutcome::UsernameTaken),
        Err(err) => Err(err).context("failed to update profile"),
    }
}
