use std::fmt;

use chrono::{DateTime, Utc};

/// Monitoring-plugin status, ordered by severity (OK < WARNING < CRITICAL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Nagios-compatible process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Display unit for the remaining (or elapsed) time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Minutes,
    Hours,
    Days,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Unit::Minutes => "minutes",
            Unit::Hours => "hours",
            Unit::Days => "days",
        };
        f.write_str(s)
    }
}

/// Operator-supplied alerting thresholds, both in minutes before expiry.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub warn_minutes: i64,
    pub crit_minutes: i64,
}

/// Outcome of a freshness check against a parsed CRL.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub status: Status,
    /// Scaled, truncated duration as shown in the message. Always
    /// non-negative; the "expired ... ago" wording carries the sign.
    pub magnitude: i64,
    pub unit: Unit,
    pub expires_at: DateTime<Utc>,
    pub message: String,
}

/// Scale an absolute duration in minutes down to a human unit.
/// Under 4 hours stay in minutes, under 48 hours become hours, the rest
/// becomes days. Magnitudes truncate toward zero.
fn scale(abs_minutes: f64) -> (i64, Unit) {
    if abs_minutes < 240.0 {
        (abs_minutes as i64, Unit::Minutes)
    } else if abs_minutes < 2880.0 {
        ((abs_minutes / 60.0) as i64, Unit::Hours)
    } else {
        ((abs_minutes / 1440.0) as i64, Unit::Days)
    }
}

/// Classify a CRL's `nextUpdate` against `now` and the thresholds.
///
/// Pure function of its inputs: an expired CRL or one inside the critical
/// window is CRITICAL, inside the warning window is WARNING, anything else
/// is OK. Threshold boundaries are inclusive.
///
/// The expiry instant in the message is rendered in UTC and labeled GMT.
pub fn classify(next_update: DateTime<Utc>, now: DateTime<Utc>, thresholds: &Thresholds) -> Verdict {
    let minutes_remaining = (next_update - now).num_seconds() as f64 / 60.0;
    let (magnitude, unit) = scale(minutes_remaining.abs());
    let when = format!("on {} GMT", next_update.format("%a %b %e %H:%M:%S %Y"));

    let (status, message) = if minutes_remaining < 0.0 {
        (
            Status::Critical,
            format!("CRL expired {magnitude} {unit} ago ({when})"),
        )
    } else {
        let status = if minutes_remaining <= thresholds.crit_minutes as f64 {
            Status::Critical
        } else if minutes_remaining <= thresholds.warn_minutes as f64 {
            Status::Warning
        } else {
            Status::Ok
        };
        (status, format!("CRL expires in {magnitude} {unit} ({when})"))
    };

    Verdict {
        status,
        magnitude,
        unit,
        expires_at: next_update,
        message,
    }
}
