use clap::{builder::ValueParser, Arg, ArgAction, ArgMatches, Command};
use std::str::FromStr;

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ARG_LOG_FORMAT: &str = "log-format";

/// Level names accepted by `LINKDECK_LOG_LEVEL`, indexed by verbosity count.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Numeric counts go up to 5 so `-vvvvv` and `LINKDECK_LOG_LEVEL=5` agree.
const MAX_VERBOSITY: u8 = 5;

fn parse_level(level: &str) -> Option<u8> {
    if let Ok(count) = level.parse::<u8>() {
        return (count <= MAX_VERBOSITY).then_some(count);
    }
    let level = level.to_ascii_lowercase();
    LEVEL_NAMES
        .iter()
        .position(|name| *name == level)
        .and_then(|index| u8::try_from(index).ok())
}

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> Result<u8, String> {
        parse_level(level).ok_or_else(|| {
            format!(
                "invalid log level '{level}', expected 0-{MAX_VERBOSITY} or one of: {}",
                LEVEL_NAMES.join(", ")
            )
        })
    })
}

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human oriented.
    #[default]
    Pretty,
    /// One JSON object per event, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub verbosity: u8,
    pub format: LogFormat,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            verbosity: matches.get_one::<u8>(ARG_VERBOSITY).copied().unwrap_or(0),
            format: matches
                .get_one::<LogFormat>(ARG_LOG_FORMAT)
                .copied()
                .unwrap_or_default(),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("LINKDECK_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .arg(
            Arg::new(ARG_LOG_FORMAT)
                .long(ARG_LOG_FORMAT)
                .help("Log output format")
                .default_value("pretty")
                .env("LINKDECK_LOG_FORMAT")
                .global(true)
                .value_parser(|value: &str| value.parse::<LogFormat>()),
        )
}
