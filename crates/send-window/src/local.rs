//! Conversion of caller timestamps into local wall-clock time.
//!
//! Schedules are written in wall-clock terms ("08:00-17:00 on weekdays"), so
//! the resolver works on [`NaiveDateTime`]. Hosts that hold UTC instants use
//! [`local_wall_clock`] to get the wall-clock time of the notification's zone.

use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;

use crate::error::WindowError;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Interpret `timestamp` as wall-clock time in `timezone`.
///
/// An RFC 3339 timestamp (with offset) is converted into the zone. A naive
/// `YYYY-MM-DDTHH:MM:SS` timestamp is taken as already local and returned as-is.
///
/// # Errors
///
/// Returns [`WindowError::InvalidTimezone`] if `timezone` is not an IANA name,
/// or [`WindowError::InvalidDatetime`] if `timestamp` matches neither form.
///
/// # Examples
///
/// ```
/// use send_window::local_wall_clock;
///
/// // March 15 2026 is EDT (UTC-4), so 14:00 UTC = 10:00 local
/// let local = local_wall_clock("2026-03-15T14:00:00Z", "America/New_York").unwrap();
/// assert_eq!(local.to_string(), "2026-03-15 10:00:00");
/// ```
pub fn local_wall_clock(timestamp: &str, timezone: &str) -> Result<NaiveDateTime, WindowError> {
    let tz = parse_timezone(timezone)?;
    let timestamp = timestamp.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(timestamp) {
        return Ok(instant.with_timezone(&tz).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(timestamp, format).ok())
        .ok_or_else(|| {
            WindowError::InvalidDatetime(format!(
                "'{timestamp}': expected RFC 3339 or YYYY-MM-DDTHH:MM:SS"
            ))
        })
}

/// Parse an IANA timezone string into `Tz`.
fn parse_timezone(s: &str) -> Result<Tz, WindowError> {
    s.parse::<Tz>()
        .map_err(|_| WindowError::InvalidTimezone(format!("'{}'", s)))
}
