//! Conversions between backend wire dates and local calendar values.
//!
//! The backend renders timestamps with a `GMT` zone marker (for example
//! `Mon, 01 Jan 2024 00:00:00 GMT`). The wall-clock part is what the user
//! means, so the marker is dropped on the way in and the local value is read
//! as-is. On the way out the local wall clock is rendered with a bare `GMT`
//! marker, discarding the viewer's own offset. Everything else in the crate
//! handles only `NaiveDateTime`/`NaiveDate`.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::errors::CoreError;

/// Zone marker carried by every wire date.
pub const GMT_MARKER: &str = "GMT";

/// Layouts accepted after the zone marker has been stripped, most common first.
const DATETIME_FORMATS: &[&str] = &[
    // RFC 1123, as rendered by the backend
    "%a, %d %b %Y %H:%M:%S",
    // Default string form of a date
    "%a %b %d %Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%a %b %d %Y", "%a, %d %b %Y"];

/// Layout of the default string form, before the zone is normalized.
const DEFAULT_STRING_FORMAT: &str = "%a %b %d %Y %H:%M:%S";

/// Byte offset of the first `GMT` marker, matched case-insensitively.
fn find_marker(s: &str) -> Option<usize> {
    // ASCII upper-casing never changes byte offsets.
    s.to_ascii_uppercase().find(GMT_MARKER)
}

/// Drop the `GMT` marker and everything after it.
/// Strings without a marker pass through unchanged.
#[must_use]
pub fn strip_zone(wire: &str) -> &str {
    match find_marker(wire) {
        Some(idx) => wire[..idx].trim_end(),
        None => wire,
    }
}

/// Replace a trailing `GMT±hhmm (Zone Name)` annotation with the bare `GMT` token.
/// Strings without a marker pass through unchanged.
#[must_use]
pub fn normalize_zone(s: &str) -> String {
    match find_marker(s) {
        Some(idx) => format!("{}{GMT_MARKER}", &s[..idx]),
        None => s.to_string(),
    }
}

/// Parse a zone-less date or datetime string as a local wall-clock value.
fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Wire date → local date-time, read in the viewer's timezone.
pub fn to_local_date(wire: &str) -> Result<NaiveDateTime, CoreError> {
    parse_naive(strip_zone(wire))
        .ok_or_else(|| CoreError::InvalidDate(format!("unrecognised wire date '{wire}'")))
}

/// Wire date → local calendar day.
pub fn to_local_day(wire: &str) -> Result<NaiveDate, CoreError> {
    to_local_date(wire).map(|dt| dt.date())
}

/// Default string form of a local value, including the viewer's offset,
/// e.g. `Mon Jan 01 2024 00:00:00 GMT+0100`.
#[must_use]
pub fn default_string_form(local: NaiveDateTime) -> String {
    match Local.from_local_datetime(&local).earliest() {
        Some(dt) => dt.format("%a %b %d %Y %H:%M:%S GMT%z").to_string(),
        // Wall-clock time skipped by a DST transition: no offset to show.
        None => format!("{} {GMT_MARKER}", local.format(DEFAULT_STRING_FORMAT)),
    }
}

/// Local date-time → wire date, with the offset normalized to a bare `GMT`.
#[must_use]
pub fn to_wire_date(local: NaiveDateTime) -> String {
    normalize_zone(&default_string_form(local))
}

/// Local calendar day (at midnight) → wire date.
#[must_use]
pub fn day_to_wire_date(day: NaiveDate) -> String {
    to_wire_date(day.and_time(NaiveTime::MIN))
}

/// Numeric form of a wire date: Unix epoch seconds, with the `GMT` marker
/// taken at face value. Any offset after the marker is ignored.
pub fn wire_to_epoch_seconds(wire: &str) -> Result<i64, CoreError> {
    to_local_date(wire).map(|dt| dt.and_utc().timestamp())
}

/// Epoch seconds sent to the backend for a local calendar day.
pub fn day_to_epoch_seconds(day: NaiveDate) -> Result<i64, CoreError> {
    wire_to_epoch_seconds(&day_to_wire_date(day))
}

/// Human-readable day, e.g. `Mon Jan 01 2024`.
#[must_use]
pub fn display_day(day: NaiveDate) -> String {
    day.format("%a %b %d %Y").to_string()
}
