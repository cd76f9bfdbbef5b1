//! Scheduling configuration as read from storage, and the slot status the
//! engine computes from it.
//!
//! Dates are `YYYY-MM-DD`. Times are wall-clock `HH:MM` or `HH:MM:SS` in the
//! platform timezone; seconds are truncated on the way in, so every time the
//! engine compares has minute precision.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

// ── Parsing helpers ─────────────────────────────────────────────────────────

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| SlotError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Parse an `HH:MM` or `HH:MM:SS` wall-clock time, dropping the seconds.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map(truncate_to_minute)
        .map_err(|e| SlotError::InvalidTime(format!("'{}': {}", s, e)))
}

/// Drop seconds and sub-second precision.
pub(crate) fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// Serde adapters for `HH:MM[:SS]` time strings.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(t: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
            match t {
                Some(t) => super::serialize(t, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
            let raw = Option::<String>::deserialize(d)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(s) => crate::model::parse_time(s)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
            }
        }
    }
}

// ── WorkingHours ────────────────────────────────────────────────────────────

/// A professional's weekly working schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    /// Platform weekdays, 1 = Monday … 7 = Sunday.
    pub working_days: BTreeSet<u8>,
}

impl WorkingHours {
    /// Build from string bounds, e.g. `WorkingHours::new("09:00", "17:00", [1, 2, 3, 4, 5])`.
    pub fn new(
        start_time: &str,
        end_time: &str,
        working_days: impl IntoIterator<Item = u8>,
    ) -> Result<Self> {
        let hours = Self {
            start_time: parse_time(start_time)?,
            end_time: parse_time(end_time)?,
            working_days: working_days.into_iter().collect(),
        };
        hours.validate()?;
        Ok(hours)
    }

    /// Check the invariants an active professional's schedule must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.working_days.is_empty() {
            return Err(SlotError::InvalidWorkingHours(
                "working_days must not be empty".to_string(),
            ));
        }
        if let Some(bad) = self.working_days.iter().find(|d| !(1..=7).contains(*d)) {
            return Err(SlotError::InvalidWorkingHours(format!(
                "working day {bad} is outside 1..=7"
            )));
        }
        if self.start_time >= self.end_time {
            return Err(SlotError::InvalidWorkingHours(format!(
                "start_time {} must be before end_time {}",
                self.start_time.format("%H:%M"),
                self.end_time.format("%H:%M")
            )));
        }
        Ok(())
    }

    pub fn works_on(&self, weekday: u8) -> bool {
        self.working_days.contains(&weekday)
    }

    /// Half-open `[start_time, end_time)` at minute precision.
    pub fn covers(&self, time: NaiveTime) -> bool {
        let time = truncate_to_minute(time);
        time >= truncate_to_minute(self.start_time) && time < truncate_to_minute(self.end_time)
    }
}

// ── BlockRule ───────────────────────────────────────────────────────────────

/// Authoring format of a block rule.
///
/// `WeeklyDay` and `WeeklyRange` are what the current editor writes.
/// `FullDay` comes from the previous editor and `TimeRange` from external
/// calendar imports. Anything else deserializes to `Unknown` and never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    WeeklyDay,
    WeeklyRange,
    FullDay,
    TimeRange,
    #[serde(other)]
    Unknown,
}

/// A period during which a professional cannot be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRule {
    pub block_type: BlockType,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(
        default,
        with = "hhmm::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<NaiveTime>,
    #[serde(
        default,
        with = "hhmm::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<NaiveTime>,
    /// Explicit weekday anchor, 1 = Monday … 7 = Sunday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(default)]
    pub is_recurring: bool,
}

impl BlockRule {
    /// A whole-day rule spanning `start_date..=end_date`.
    pub fn new(block_type: BlockType, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            block_type,
            start_date,
            end_date: Some(end_date),
            start_time: None,
            end_time: None,
            day_of_week: None,
            is_recurring: false,
        }
    }

    /// Restrict the rule to `[start, end)` within each matching day.
    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    pub fn with_day_of_week(mut self, day: u8) -> Self {
        self.day_of_week = Some(day);
        self
    }

    pub fn recurring(mut self) -> Self {
        self.is_recurring = true;
        self
    }

    /// Last date of the anchored span; defaults to `start_date`.
    pub fn end_date(&self) -> NaiveDate {
        self.end_date.unwrap_or(self.start_date)
    }

    /// No time bounds at all: the rule takes out every matching day entirely.
    pub fn is_whole_day(&self) -> bool {
        self.start_time.is_none() && self.end_time.is_none()
    }
}

// ── OccupiedTimes ───────────────────────────────────────────────────────────

/// Start times already booked on one date, at minute precision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct OccupiedTimes(BTreeSet<NaiveTime>);

impl OccupiedTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse booked start times from `HH:MM[:SS]` strings.
    pub fn parse<S: AsRef<str>>(times: impl IntoIterator<Item = S>) -> Result<Self> {
        times
            .into_iter()
            .map(|s| parse_time(s.as_ref()))
            .collect::<Result<BTreeSet<_>>>()
            .map(Self)
    }

    pub fn insert(&mut self, time: NaiveTime) {
        self.0.insert(truncate_to_minute(time));
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.0.contains(&truncate_to_minute(time))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<NaiveTime> for OccupiedTimes {
    fn from_iter<I: IntoIterator<Item = NaiveTime>>(iter: I) -> Self {
        Self(iter.into_iter().map(truncate_to_minute).collect())
    }
}

impl TryFrom<Vec<String>> for OccupiedTimes {
    type Error = SlotError;

    fn try_from(times: Vec<String>) -> Result<Self> {
        Self::parse(times)
    }
}

impl From<OccupiedTimes> for Vec<String> {
    fn from(times: OccupiedTimes) -> Self {
        times
            .0
            .iter()
            .map(|t| t.format("%H:%M").to_string())
            .collect()
    }
}

// ── SlotStatus ──────────────────────────────────────────────────────────────

/// Bookability of one (date, time) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Available,
    NotWorkingDay,
    OutsideHours,
    Occupied,
    Blocked,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "available",
            SlotStatus::NotWorkingDay => "not_working_day",
            SlotStatus::OutsideHours => "outside_hours",
            SlotStatus::Occupied => "occupied",
            SlotStatus::Blocked => "blocked",
        }
    }

    /// Only `Available` slots may be booked or rescheduled into.
    pub fn is_bookable(&self) -> bool {
        matches!(self, SlotStatus::Available)
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
