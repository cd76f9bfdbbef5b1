//! Wall-clock ⇄ absolute time.
//!
//! Slot dates and times are stored without a timezone. They mean "local time
//! in the platform timezone", while the process evaluating them usually runs
//! in UTC. Nothing here reads the host's local timezone: every conversion
//! takes the IANA zone explicitly.
//!
//! # Functions
//!
//! - [`wall_clock_to_utc`] — typed conversion of a wall-clock date/time to an instant
//! - [`wall_clock_to_absolute_ms`] — the same, from strings, as epoch milliseconds
//! - [`resolve_wall_clock`] — the instant plus its offset and DST metadata
//! - [`format_for_external_calendar`] — zone-less start/end stamps for calendar pushes

use chrono::{
    DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{Result, SlotError};
use crate::model::{parse_date, parse_time, truncate_to_minute};

/// The timezone every stored wall-clock value is local to.
pub const PLATFORM_TIMEZONE: &str = "America/Mexico_City";

/// Layout of external-calendar timestamps. No `Z` and no offset: the
/// consuming calendar receives the zone name separately.
const EXTERNAL_CALENDAR_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ── wall_clock_to_utc ───────────────────────────────────────────────────────

/// Offset of `tz` at the instant whose UTC fields are `instant`.
///
/// Formats the instant into the zone's calendar fields and reads those fields
/// back as if they were UTC; the difference is the offset in effect.
fn offset_at(instant: NaiveDateTime, tz: &Tz) -> TimeDelta {
    let local_fields = tz.from_utc_datetime(&instant).naive_local();
    local_fields - instant
}

/// Convert a wall-clock date and time in `tz` to the instant it denotes.
///
/// The wall-clock value is first read as if it were UTC. The zone's offset at
/// that provisional instant is subtracted to get a candidate. Near a DST
/// transition the provisional instant can sit on the other side of the
/// change, so the offset is resolved again at the candidate. The second
/// offset wins when the instant it gives reads back as the same wall clock.
/// Seconds in `time` are ignored.
///
/// Local times that do not exist (inside a spring-forward gap) are read with
/// the offset in effect before the transition, which moves them forward by
/// the gap's length: 02:30 on the day New York jumps from 02:00 to 03:00
/// resolves to 03:30 EDT.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use slot_engine::wall_clock_to_utc;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
/// let time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
/// let utc = wall_clock_to_utc(date, time, &chrono_tz::America::Mexico_City);
/// // Mexico City has been UTC-6 all year since 2022
/// assert_eq!(utc.to_rfc3339(), "2025-03-09T16:00:00+00:00");
/// ```
pub fn wall_clock_to_utc(date: NaiveDate, time: NaiveTime, tz: &Tz) -> DateTime<Utc> {
    let wall = date.and_time(truncate_to_minute(time));

    let first = offset_at(wall, tz);
    let candidate = wall.checked_sub_signed(first).unwrap_or(wall);

    let second = offset_at(candidate, tz);
    let resolved = if second == first {
        candidate
    } else {
        let retried = wall.checked_sub_signed(second).unwrap_or(candidate);
        let round_trips = tz.from_utc_datetime(&retried).naive_local() == wall;
        tracing::debug!(
            %wall,
            timezone = %tz.name(),
            provisional_offset_min = first.num_minutes(),
            resolved_offset_min = second.num_minutes(),
            in_gap = !round_trips,
            "wall clock straddles an offset change"
        );
        if round_trips {
            retried
        } else {
            // Clocks spring forward, so the pre-transition offset is the smaller one
            wall.checked_sub_signed(first.min(second)).unwrap_or(candidate)
        }
    };

    resolved.and_utc()
}

/// Convert a `YYYY-MM-DD` date and `HH:MM[:SS]` time in `timezone` to Unix
/// epoch milliseconds.
///
/// # Errors
///
/// Returns [`SlotError::InvalidDate`], [`SlotError::InvalidTime`] or
/// [`SlotError::InvalidTimezone`] when an input cannot be parsed.
pub fn wall_clock_to_absolute_ms(date: &str, time: &str, timezone: &str) -> Result<i64> {
    let date = parse_date(date)?;
    let time = parse_time(time)?;
    let tz = parse_timezone(timezone)?;
    Ok(wall_clock_to_utc(date, time, &tz).timestamp_millis())
}

// ── resolve_wall_clock ──────────────────────────────────────────────────────

/// A wall-clock value resolved to an instant, with zone metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedWallClock {
    /// Unix epoch milliseconds.
    pub epoch_ms: i64,
    /// The instant in UTC (RFC 3339).
    pub utc: String,
    /// The instant in the wall clock's zone (RFC 3339 with offset).
    pub local: String,
    /// The IANA timezone name used.
    pub timezone: String,
    /// The UTC offset at this instant (e.g., "-06:00").
    pub utc_offset: String,
    /// Whether Daylight Saving Time is active at this instant.
    pub dst_active: bool,
}

/// Resolve a wall-clock date and time and describe the resulting instant.
///
/// # Errors
///
/// Same as [`wall_clock_to_absolute_ms`].
pub fn resolve_wall_clock(date: &str, time: &str, timezone: &str) -> Result<ResolvedWallClock> {
    let date = parse_date(date)?;
    let time = parse_time(time)?;
    let tz = parse_timezone(timezone)?;

    let utc = wall_clock_to_utc(date, time, &tz);
    let local = utc.with_timezone(&tz);

    Ok(ResolvedWallClock {
        epoch_ms: utc.timestamp_millis(),
        utc: utc.to_rfc3339(),
        local: local.to_rfc3339(),
        timezone: tz.name().to_string(),
        utc_offset: format_utc_offset(&local),
        dst_active: is_dst_active(&local, &tz),
    })
}

// ── format_for_external_calendar ────────────────────────────────────────────

/// Start and end of an appointment as pushed to an external calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalCalendarWindow {
    /// `YYYY-MM-DDTHH:MM:SS`, wall clock, no offset.
    pub start: String,
    /// `YYYY-MM-DDTHH:MM:SS`, wall clock, no offset.
    pub end: String,
    /// IANA zone the consuming calendar should read both stamps in.
    pub time_zone: String,
}

/// Format an appointment of `duration_minutes` starting at the wall-clock
/// `date`/`time` as zone-less timestamps.
///
/// The end rolls over into the next day (or further) when the duration
/// crosses midnight: `23:30` plus 90 minutes ends at `01:00:00` the day after.
///
/// # Errors
///
/// Returns [`SlotError::InvalidDuration`] for a negative duration, and the
/// parse errors of [`wall_clock_to_absolute_ms`] for malformed inputs.
pub fn format_for_external_calendar(
    date: &str,
    time: &str,
    duration_minutes: i64,
    timezone: &str,
) -> Result<ExternalCalendarWindow> {
    let date = parse_date(date)?;
    let time = parse_time(time)?;
    let tz = parse_timezone(timezone)?;

    if duration_minutes < 0 {
        return Err(SlotError::InvalidDuration(format!(
            "duration must not be negative: {duration_minutes} minutes"
        )));
    }

    let start = date.and_time(time);
    let end = TimeDelta::try_minutes(duration_minutes)
        .and_then(|d| start.checked_add_signed(d))
        .ok_or_else(|| {
            SlotError::InvalidDuration(format!("{duration_minutes} minutes is out of range"))
        })?;

    Ok(ExternalCalendarWindow {
        start: start.format(EXTERNAL_CALENDAR_FORMAT).to_string(),
        end: end.format(EXTERNAL_CALENDAR_FORMAT).to_string(),
        time_zone: tz.name().to_string(),
    })
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Parse an IANA timezone string into `Tz`.
pub(crate) fn parse_timezone(s: &str) -> Result<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| SlotError::InvalidTimezone(format!("'{}'", s)))
}

/// Determine if DST is active for a datetime in a timezone.
fn is_dst_active<T: TimeZone>(dt: &DateTime<T>, tz: &Tz) -> bool {
    // Compare against January 1 and July 1; the smaller offset is standard
    // time in either hemisphere.
    let year = dt.with_timezone(&Utc).year();
    let offset_on = |month: u32| {
        Utc.with_ymd_and_hms(year, month, 1, 12, 0, 0)
            .single()
            .map(|instant| instant.with_timezone(tz).offset().fix().local_minus_utc())
    };

    let current = dt.offset().fix().local_minus_utc();
    match (offset_on(1), offset_on(7)) {
        (Some(jan), Some(jul)) if jan != jul => current > jan.min(jul),
        _ => false,
    }
}

/// Format the UTC offset as a string (e.g., "-06:00", "+09:00").
fn format_utc_offset<T: TimeZone>(dt: &DateTime<T>) -> String {
    let offset_secs = dt.offset().fix().local_minus_utc();
    let sign = if offset_secs >= 0 { "+" } else { "-" };
    let abs_secs = offset_secs.unsigned_abs();
    let hours = abs_secs / 3600;
    let minutes = (abs_secs % 3600) / 60;
    format!("{sign}{hours:02}:{minutes:02}")
}

// ── Tests ───────────────────────────────────────────────────────────────────
