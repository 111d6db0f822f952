//! Environment configuration.
//!
//! Everything the monitor needs arrives through the environment at
//! startup; defaults mirror the deployment this service grew out of. The
//! core components receive plain config values and never read the
//! environment themselves, so they stay independently testable.

use std::env;
use std::time::Duration;

use crate::domain::{InvalidLineId, LineId};
use crate::notify::TelegramConfig;
use crate::retry::RetryPolicy;
use crate::schedule::{DEFAULT_SCHEDULES, InvalidSchedule, Timetable};
use crate::tfl::TflConfig;

/// Default monitored lines, matching `RecipeBook::default_lines`.
const DEFAULT_LINES: &str = "northern,victoria,london-overground";

/// Errors from loading the environment configuration.
///
/// All of these are fatal at startup; a monitor with a broken
/// configuration should refuse to run rather than report nonsense.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing or empty
    #[error("{name} environment variable is required")]
    MissingVar { name: &'static str },

    /// An environment variable has an unusable value
    #[error("{name} must be {expected}, got {value:?}")]
    InvalidVar {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    /// A monitored line id failed validation
    #[error("invalid MONITORED_LINES entry: {0}")]
    InvalidLine(#[from] InvalidLineId),

    /// A schedule expression failed to parse
    #[error(transparent)]
    InvalidSchedule(#[from] InvalidSchedule),
}

/// Fully resolved monitor configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// TfL client settings (base URL, app key, retry policy).
    pub tfl: TflConfig,

    /// Telegram delivery settings (token, chat, retry policy).
    pub telegram: TelegramConfig,

    /// Lines to monitor, in report fan-out order.
    pub lines: Vec<LineId>,

    /// When to run scheduled report cycles.
    pub timetable: Timetable,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Required: `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`. Optional, with
    /// defaults: `TFL_API_BASE_URL`, `TFL_APP_KEY`, `MAX_RETRIES`,
    /// `RETRY_DELAY` (seconds), `MONITORED_LINES` (comma-separated),
    /// `SCHEDULES` (semicolon-separated cron expressions).
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = require_var("TELEGRAM_BOT_TOKEN")?;
        let chat_id = parse_required("TELEGRAM_CHAT_ID", "a numeric chat id")?;

        let max_attempts = match optional_var("MAX_RETRIES") {
            Some(raw) => parse_value("MAX_RETRIES", "a positive integer", raw)?,
            None => RetryPolicy::default().max_attempts,
        };
        let delay_secs = match optional_var("RETRY_DELAY") {
            Some(raw) => parse_value("RETRY_DELAY", "a number of seconds", raw)?,
            None => RetryPolicy::default().delay.as_secs(),
        };
        let retry = RetryPolicy::new(max_attempts, Duration::from_secs(delay_secs));

        let mut tfl = TflConfig::new().with_retry(retry.clone());
        if let Some(base_url) = optional_var("TFL_API_BASE_URL") {
            tfl = tfl.with_base_url(base_url);
        }
        if let Some(app_key) = optional_var("TFL_APP_KEY") {
            tfl = tfl.with_app_key(app_key);
        }

        let telegram = TelegramConfig::new(token, chat_id).with_retry(retry);

        let lines = parse_lines(
            &optional_var("MONITORED_LINES").unwrap_or_else(|| DEFAULT_LINES.to_string()),
        )?;

        let timetable = match optional_var("SCHEDULES") {
            Some(raw) => Timetable::parse(&split_entries(&raw))?,
            None => Timetable::parse(&DEFAULT_SCHEDULES)?,
        };

        Ok(Self {
            tfl,
            telegram,
            lines,
            timetable,
        })
    }
}

/// Read an environment variable, treating empty/whitespace as unset.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a required environment variable.
fn require_var(name: &'static str) -> Result<String, ConfigError> {
    optional_var(name).ok_or(ConfigError::MissingVar { name })
}

/// Read and parse a required environment variable.
fn parse_required<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    parse_value(name, expected, require_var(name)?)
}

/// Parse an already-read value, mapping failures to `InvalidVar`.
fn parse_value<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
    value: String,
) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidVar {
        name,
        expected,
        value,
    })
}

/// Parse a comma-separated list of line ids.
fn parse_lines(csv: &str) -> Result<Vec<LineId>, InvalidLineId> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(LineId::parse)
        .collect()
}

/// Split semicolon-separated schedule entries. Cron expressions contain
/// spaces and commas, so the separator has to be something else.
fn split_entries(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
