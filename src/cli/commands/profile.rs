use clap::{Arg, ArgMatches, Command};

pub const ARG_PREMIUM_USERNAME_URL: &str = "premium-username-url";

#[derive(Debug, Clone)]
pub struct Options {
    pub premium_username_url: Option<String>,
}

impl Options {
    /// Parse profile arguments from matches.
    ///
    /// # Errors
    /// Currently infallible; kept fallible to match the other option groups.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        Ok(Self {
            premium_username_url: matches
                .get_one::<String>(ARG_PREMIUM_USERNAME_URL)
                .cloned()
                .filter(|v| !v.trim().is_empty()),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_PREMIUM_USERNAME_URL)
            .long(ARG_PREMIUM_USERNAME_URL)
            .help("Premium username availability endpoint")
            .long_help(
                "When set, username changes are checked by POSTing `{\"username\": ...}` to this URL\ninstead of only looking for a clash in the users table.",
            )
            .env("LINKDECK_PREMIUM_USERNAME_URL"),
    )
}
