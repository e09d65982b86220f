//! Time Expressions
//!
//! A `-from`/`-to` value is exactly one of:
//!
//! - `now` (any case)
//! - a signed duration relative to now (`-1h`, `-15m30s`)
//! - an absolute RFC 3339 timestamp (`2024-01-15T10:30:00.5Z`)
//!
//! Input matching both the duration and the timestamp syntax, or neither, is
//! rejected rather than guessed at.

use chrono::{DateTime, Duration, FixedOffset, Timelike};
use std::fmt;

use super::duration::parse_duration;
use super::error::{TimeExpressionError, TimeResult};

/// Which end of the query window an expression belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    From,
    To,
}

impl TimeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeField::From => "from",
            TimeField::To => "to",
        }
    }
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed, not yet resolved, time expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeExpression {
    Now,
    Relative(Duration),
    Absolute(DateTime<FixedOffset>),
}

impl TimeExpression {
    /// Classify `input` into exactly one expression form.
    pub fn parse(field: TimeField, input: &str) -> TimeResult<Self> {
        if input.eq_ignore_ascii_case("now") {
            return Ok(TimeExpression::Now);
        }

        match (
            parse_duration(input),
            parse_timestamp(input),
        ) {
            (Some(offset), None) => Ok(TimeExpression::Relative(offset)),
            (None, Some(timestamp)) => Ok(TimeExpression::Absolute(timestamp)),
            (Some(_), Some(_)) | (None, None) => Err(TimeExpressionError::Ambiguous {
                field,
                input: input.to_string(),
            }),
        }
    }

    /// Pin the expression to an instant, using `now` for the relative forms.
    pub fn resolve(
        &self,
        field: TimeField,
        input: &str,
        now: DateTime<FixedOffset>,
    ) -> TimeResult<ResolvedTime> {
        let instant = match self {
            TimeExpression::Now => now,
            TimeExpression::Relative(offset) => {
                now.checked_add_signed(*offset)
                    .ok_or_else(|| TimeExpressionError::OutOfRange {
                        field,
                        input: input.to_string(),
                    })?
            }
            TimeExpression::Absolute(timestamp) => *timestamp,
        };

        Ok(ResolvedTime::new(instant))
    }
}

/// Strict RFC 3339: uppercase `T` separator, uppercase `Z` or a numeric
/// offset, and no leap second.
fn parse_timestamp(input: &str) -> Option<DateTime<FixedOffset>> {
    if input.as_bytes().get(10) != Some(&b'T') || input.ends_with('z') {
        return None;
    }

    let timestamp = DateTime::parse_from_rfc3339(input).ok()?;
    if timestamp.nanosecond() >= 1_000_000_000 {
        return None;
    }
    Some(timestamp)
}

/// Parse and resolve a user-supplied time expression in one step.
pub fn resolve(
    field: TimeField,
    input: &str,
    now: DateTime<FixedOffset>,
) -> TimeResult<ResolvedTime> {
    TimeExpression::parse(field, input)?.resolve(field, input, now)
}

/// An absolute point in time, fixed at resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTime {
    instant: DateTime<FixedOffset>,
    text: String,
}

impl ResolvedTime {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self {
            text: format_timestamp(&instant),
            instant,
        }
    }

    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ResolvedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Format as RFC 3339 with nanosecond precision.
///
/// Trailing zeros of the fraction are dropped (and the fraction with them when
/// it is zero), and a zero offset is written as `Z`. Parsing the output yields
/// the same instant and offset, so formatting is idempotent.
pub fn format_timestamp(instant: &DateTime<FixedOffset>) -> String {
    let mut out = instant.format("%Y-%m-%dT%H:%M:%S").to_string();

    // Leap seconds are carried as nanos >= 1s
    let nanos = instant.nanosecond() % 1_000_000_000;
    if nanos > 0 {
        let fraction = format!("{:09}", nanos);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }

    if instant.offset().local_minus_utc() == 0 {
        out.push('Z');
    } else {
        out.push_str(&instant.format("%:z").to_string());
    }

    out
}
