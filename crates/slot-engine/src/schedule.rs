//! A professional's full scheduling snapshot and the engine settings it is
//! evaluated with.
//!
//! Callers fetch working hours, block rules and bookings in one read, load
//! them into a [`Schedule`], and ask it questions. Every answer goes through
//! [`get_slot_status`], so a listing and a booking made from the same
//! snapshot always agree.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::filter::filter_blocks_for_date_range;
use crate::model::{hhmm, BlockRule, OccupiedTimes, SlotStatus, WorkingHours};
use crate::resolver::{get_slot_status, list_day_slots, SlotView, DEFAULT_SLOT_INTERVAL_MINUTES};
use crate::wallclock::{parse_timezone, wall_clock_to_utc, PLATFORM_TIMEZONE};

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// IANA zone the stored wall-clock values are local to.
    pub timezone: String,
    /// Step between candidate slot start times.
    pub slot_interval_minutes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: PLATFORM_TIMEZONE.to_string(),
            slot_interval_minutes: DEFAULT_SLOT_INTERVAL_MINUTES,
        }
    }
}

impl EngineConfig {
    /// The configured zone.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidTimezone`] if `timezone` is not an IANA name.
    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }
}

/// The slot grid of one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySlots {
    pub date: NaiveDate,
    pub slots: Vec<SlotView>,
}

/// A bookable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpenSlot {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
}

/// Working hours, block rules and bookings of one professional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub config: EngineConfig,
    pub working_hours: WorkingHours,
    #[serde(default)]
    pub blocks: Vec<BlockRule>,
    /// Booked start times keyed by date.
    #[serde(default)]
    pub occupied: BTreeMap<NaiveDate, OccupiedTimes>,
}

impl Schedule {
    pub fn new(working_hours: WorkingHours, blocks: Vec<BlockRule>) -> Self {
        Self {
            config: EngineConfig::default(),
            working_hours,
            blocks,
            occupied: BTreeMap::new(),
        }
    }

    /// Parse and validate a JSON schedule document.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidSchedule`] for malformed JSON, and the
    /// errors of [`Schedule::validate`] for a well-formed but invalid one.
    pub fn from_json(json: &str) -> Result<Self> {
        let schedule: Schedule =
            serde_json::from_str(json).map_err(|e| SlotError::InvalidSchedule(e.to_string()))?;
        schedule.validate()?;
        tracing::debug!(
            blocks = schedule.blocks.len(),
            booked_dates = schedule.occupied.len(),
            timezone = %schedule.config.timezone,
            "schedule loaded"
        );
        Ok(schedule)
    }

    /// Check working hours and the configured timezone.
    pub fn validate(&self) -> Result<()> {
        self.working_hours.validate()?;
        self.config.tz()?;
        Ok(())
    }

    /// Record a booking starting at `time` on `date`.
    pub fn book(&mut self, date: NaiveDate, time: NaiveTime) {
        self.occupied.entry(date).or_default().insert(time);
    }

    fn interval(&self) -> u32 {
        self.config.slot_interval_minutes
    }

    /// Status of the slot starting at `time` on `date`.
    pub fn status_at(&self, date: NaiveDate, time: NaiveTime) -> SlotStatus {
        let empty = OccupiedTimes::new();
        let occupied = self.occupied.get(&date).unwrap_or(&empty);
        get_slot_status(date, time, &self.working_hours, &self.blocks, occupied)
    }

    /// The slot grid of `date`.
    pub fn day(&self, date: NaiveDate) -> DaySlots {
        let blocks = filter_blocks_for_date_range(&self.blocks, date, date);
        self.day_with(date, &blocks)
    }

    /// Slot grids for every date in `from..=to`; empty when `from > to`.
    ///
    /// Block rules are narrowed to the range once up front.
    pub fn grid(&self, from: NaiveDate, to: NaiveDate) -> Vec<DaySlots> {
        if from > to {
            return Vec::new();
        }
        let blocks = filter_blocks_for_date_range(&self.blocks, from, to);
        from.iter_days()
            .take_while(|date| *date <= to)
            .map(|date| self.day_with(date, &blocks))
            .collect()
    }

    /// The earliest available slot in `from..=to`, if any.
    ///
    /// Days are resolved one at a time and the search stops at the first
    /// open slot.
    pub fn first_available(&self, from: NaiveDate, to: NaiveDate) -> Option<OpenSlot> {
        if from > to {
            return None;
        }
        let blocks = filter_blocks_for_date_range(&self.blocks, from, to);
        from.iter_days()
            .take_while(|date| *date <= to)
            .find_map(|date| {
                self.day_with(date, &blocks)
                    .slots
                    .into_iter()
                    .find(|slot| slot.status.is_bookable())
                    .map(|slot| OpenSlot {
                        date,
                        time: slot.time,
                    })
            })
    }

    /// The instant a wall-clock slot of this schedule starts at.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidTimezone`] if the configured zone is invalid.
    pub fn slot_instant(&self, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>> {
        let tz = self.config.tz()?;
        Ok(wall_clock_to_utc(date, time, &tz))
    }

    fn day_with(&self, date: NaiveDate, blocks: &[BlockRule]) -> DaySlots {
        let empty = OccupiedTimes::new();
        let occupied = self.occupied.get(&date).unwrap_or(&empty);
        DaySlots {
            date,
            slots: list_day_slots(date, &self.working_hours, blocks, occupied, self.interval()),
        }
    }
}
