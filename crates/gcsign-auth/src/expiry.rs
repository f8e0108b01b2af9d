//! Expiry resolution.
//!
//! A signed URL's lifetime is configured either as a relative duration
//! (`expires-in`, e.g. `10m`) or as an absolute epoch in seconds (`expiry`).
//! Both are resolved against a single reference instant into the expiry epoch
//! and the remaining duration, optionally bounded by a scheme maximum.

use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use gcsign_core::{PropertySource, SignError, SignResult};
use regex::Regex;
use thiserror::Error;

/// Longest lifetime a V4 signed URL may have: seven days.
pub const V4_MAX_LIFETIME_SECS: i64 = 604_800;

/// A positive integer with an optional unit suffix; a bare integer means seconds.
static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([1-9][0-9]*)([smhdw])?$").expect("duration regex is valid")
});

/// Errors produced when parsing a duration expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    /// The expression does not match `<n>[s|m|h|d|w]`.
    #[error("'{0}' is not a duration, expected a positive integer with an optional s, m, h, d or w suffix")]
    Malformed(String),

    /// The expression is well formed but does not fit in 64-bit seconds.
    #[error("duration '{0}' is out of range")]
    Overflow(String),
}

/// Parse a duration expression into seconds.
///
/// # Examples
///
/// ```
/// use gcsign_auth::expiry::parse_duration;
///
/// assert_eq!(parse_duration("45").unwrap(), 45);
/// assert_eq!(parse_duration("10m").unwrap(), 600);
/// assert_eq!(parse_duration("7D").unwrap(), 604_800);
/// assert!(parse_duration("0s").is_err());
/// ```
pub fn parse_duration(expr: &str) -> Result<i64, DurationParseError> {
    let caps = DURATION_PATTERN
        .captures(expr)
        .ok_or_else(|| DurationParseError::Malformed(expr.to_owned()))?;

    let amount: i64 = caps[1]
        .parse()
        .map_err(|_| DurationParseError::Overflow(expr.to_owned()))?;

    let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
        None | Some("s") => 1,
        Some("m") => 60,
        Some("h") => 3_600,
        Some("d") => 86_400,
        _ => 604_800,
    };

    amount
        .checked_mul(multiplier)
        .ok_or_else(|| DurationParseError::Overflow(expr.to_owned()))
}

/// How the caller asked for the URL to expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirySpec {
    /// Seconds from the reference instant.
    Relative(i64),
    /// Absolute epoch seconds.
    Absolute(i64),
}

impl ExpirySpec {
    /// Read `expires-in` (preferred) or `expiry` from the configured properties.
    pub fn from_properties(props: &dyn PropertySource) -> SignResult<Self> {
        if let Some(expr) = props.get_optional("expires-in") {
            let seconds = parse_duration(&expr).map_err(|e| {
                SignError::configuration("the expires-in value is not a valid duration")
                    .with_source(e)
            })?;
            return Ok(Self::Relative(seconds));
        }

        if let Some(epoch) = props.get_optional("expiry") {
            let epoch: i64 = epoch.parse().map_err(|e| {
                SignError::configuration("the expiry value is not a valid epoch").with_source(e)
            })?;
            if epoch <= 0 {
                return Err(SignError::configuration(
                    "the expiry value is not a valid epoch",
                ));
            }
            return Ok(Self::Absolute(epoch));
        }

        Err(SignError::configuration(
            "the configuration must specify one of expiry or expires-in",
        ))
    }

    /// Resolve against `now`, rejecting lifetimes above `max_lifetime` seconds.
    pub fn resolve(
        self,
        now: DateTime<Utc>,
        max_lifetime: Option<i64>,
    ) -> SignResult<ResolvedExpiry> {
        let now_epoch = now.timestamp();
        let (expiry_epoch, duration) = match self {
            Self::Relative(seconds) => {
                let epoch = now_epoch
                    .checked_add(seconds)
                    .ok_or_else(out_of_range)?;
                (epoch, seconds)
            }
            Self::Absolute(epoch) => {
                let duration = epoch.checked_sub(now_epoch).ok_or_else(out_of_range)?;
                (epoch, duration)
            }
        };

        if duration <= 0 {
            return Err(SignError::expiry("the configured expiry must be positive"));
        }
        if let Some(max) = max_lifetime {
            if duration > max {
                return Err(SignError::expiry(
                    "the configured expiry exceeds the permitted maximum",
                ));
            }
        }

        let expires_at = DateTime::from_timestamp(expiry_epoch, 0).ok_or_else(out_of_range)?;
        Ok(ResolvedExpiry {
            expiry_epoch,
            duration,
            expires_at,
        })
    }
}

fn out_of_range() -> SignError {
    SignError::configuration("the configured expiry is out of range")
}

/// A lifetime resolved against a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedExpiry {
    /// When the URL stops being valid, in epoch seconds.
    pub expiry_epoch: i64,
    /// Seconds between the reference instant and the expiry.
    pub duration: i64,
    expires_at: DateTime<Utc>,
}

impl ResolvedExpiry {
    /// The expiry as an ISO-8601 UTC timestamp, e.g. `2026-01-15T10:30:30Z`.
    #[must_use]
    pub fn expiration_iso(&self) -> String {
        self.expires_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
