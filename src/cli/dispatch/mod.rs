//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action to run, currently only the API
//! server with its full configuration.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{auth, profile};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let auth_opts = auth::Options::parse(matches)?;
    let profile_opts = profile::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn: SecretString::from(dsn),
        frontend_base_url: auth_opts.frontend_base_url,
        session_ttl_seconds: auth_opts.session_ttl_seconds,
        totp_issuer: auth_opts.totp_issuer,
        premium_username_url: profile_opts.premium_username_url,
    }))
}
