use clap::{Arg, ArgMatches, Command};

pub const ARG_FRONTEND_BASE_URL: &str = "frontend-base-url";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_TOTP_ISSUER: &str = "totp-issuer";

const DEFAULT_SESSION_TTL_SECONDS: i64 = 2_592_000;

#[derive(Debug, Clone)]
pub struct Options {
    pub frontend_base_url: String,
    pub session_ttl_seconds: i64,
    pub totp_issuer: String,
}

impl Options {
    /// Parse session and login arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the session TTL is not positive.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let get_non_empty = |id: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
        };

        let session_ttl_seconds = matches
            .get_one::<i64>(ARG_SESSION_TTL_SECONDS)
            .copied()
            .unwrap_or(DEFAULT_SESSION_TTL_SECONDS);
        if session_ttl_seconds <= 0 {
            anyhow::bail!("--{ARG_SESSION_TTL_SECONDS} must be greater than zero");
        }

        Ok(Self {
            frontend_base_url: get_non_empty(ARG_FRONTEND_BASE_URL)
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            session_ttl_seconds,
            totp_issuer: get_non_empty(ARG_TOTP_ISSUER).unwrap_or_else(|| "linkdeck".to_string()),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_FRONTEND_BASE_URL)
                .long(ARG_FRONTEND_BASE_URL)
                .help("Frontend origin allowed by CORS")
                .long_help(
                    "Base URL of the frontend. Its origin is the only one allowed to make\ncredentialed requests, and an https scheme marks the session cookie Secure.",
                )
                .default_value("http://localhost:3000")
                .env("LINKDECK_FRONTEND_BASE_URL"),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Session lifetime in seconds")
                .default_value("2592000")
                .env("LINKDECK_SESSION_TTL_SECONDS")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_TOTP_ISSUER)
                .long(ARG_TOTP_ISSUER)
                .help("Issuer used when checking authenticator codes")
                .default_value("linkdeck")
                .env("LINKDECK_TOTP_ISSUER"),
        )
}
