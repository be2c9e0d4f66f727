use crate::api::{self, AuthConfig, UsernameChecker, ViewerState};
use crate::cli::telemetry;
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: SecretString,
    pub frontend_base_url: String,
    pub session_ttl_seconds: i64,
    pub totp_issuer: String,
    pub premium_username_url: Option<String>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the premium checker URL is invalid, the database is
/// unreachable, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let auth_config = AuthConfig::new(args.frontend_base_url)
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_totp_issuer(args.totp_issuer);

    let username_checker = match args.premium_username_url.as_deref() {
        Some(url) => UsernameChecker::premium(url)?,
        None => UsernameChecker::Regular,
    };

    let result = api::new(
        args.port,
        args.dsn.expose_secret().to_string(),
        auth_config,
        ViewerState::new(username_checker),
    )
    .await;

    telemetry::shutdown_tracer();
    result
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("dsn", redact_dsn(args.dsn.expose_secret())),
        ("frontend_base_url", args.frontend_base_url.clone()),
        ("session_ttl_seconds", args.session_ttl_seconds.to_string()),
        ("totp_issuer", args.totp_issuer.clone()),
        (
            "premium_username_url",
            args.premium_username_url
                .clone()
                .unwrap_or_else(|| "none".to_string()),
        ),
    ];
    info!("{}", startup_message(&entries));
}

fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-dsn".to_string(),
    }
}

fn startup_message(entries: &[(&str, String)]) -> String {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "linkdeck {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    message
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}
