//! Slot status resolution.
//!
//! [`get_slot_status`] is the one place a booking decision is made. Booking
//! creation, rescheduling and slot listing all go through it, so they can
//! never disagree about whether a slot is free.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::matcher::{block_applies_to_date, block_covers_time};
use crate::model::{hhmm, truncate_to_minute, BlockRule, OccupiedTimes, SlotStatus, WorkingHours};
use crate::weekday::weekday_of;

/// Grid step used when a caller passes an interval of zero.
pub const DEFAULT_SLOT_INTERVAL_MINUTES: u32 = 30;

/// Resolve the status of the slot starting at `time` on `date`.
///
/// Checks run in a fixed order and the first hit wins:
///
/// 1. `NotWorkingDay` — the date's weekday is not a working day
/// 2. `OutsideHours` — `time` is outside `[start_time, end_time)`
/// 3. `Blocked` — a whole-day block applies to the date
/// 4. `Occupied` — an appointment already starts at `time`
/// 5. `Blocked` — an applicable block covers `time`
/// 6. `Available`
///
/// Never fails: malformed or missing optional block fields make a block
/// non-covering rather than raising an error.
pub fn get_slot_status(
    date: NaiveDate,
    time: NaiveTime,
    working_hours: &WorkingHours,
    blocks: &[BlockRule],
    occupied: &OccupiedTimes,
) -> SlotStatus {
    let time = truncate_to_minute(time);

    let (status, step) = if !working_hours.works_on(weekday_of(date)) {
        (SlotStatus::NotWorkingDay, 1)
    } else if !working_hours.covers(time) {
        (SlotStatus::OutsideHours, 2)
    } else if blocks
        .iter()
        .any(|b| b.is_whole_day() && block_applies_to_date(date, b))
    {
        (SlotStatus::Blocked, 3)
    } else if occupied.contains(time) {
        (SlotStatus::Occupied, 4)
    } else if blocks
        .iter()
        .any(|b| block_applies_to_date(date, b) && block_covers_time(time, b))
    {
        (SlotStatus::Blocked, 5)
    } else {
        (SlotStatus::Available, 6)
    };

    tracing::trace!(%date, %time, %status, step, "slot resolved");
    status
}

/// One entry of a day's slot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub status: SlotStatus,
}

/// Resolve every candidate slot of `date`, from the working-hours start
/// (inclusive) to the end (exclusive) in `interval_minutes` steps.
///
/// A non-working day yields an empty grid.
pub fn list_day_slots(
    date: NaiveDate,
    working_hours: &WorkingHours,
    blocks: &[BlockRule],
    occupied: &OccupiedTimes,
    interval_minutes: u32,
) -> Vec<SlotView> {
    if !working_hours.works_on(weekday_of(date)) {
        return Vec::new();
    }

    let step = if interval_minutes == 0 {
        DEFAULT_SLOT_INTERVAL_MINUTES
    } else {
        interval_minutes
    };

    minutes_of_day(working_hours.start_time, working_hours.end_time, step)
        .filter_map(|m| NaiveTime::from_hms_opt(m / 60, m % 60, 0))
        .map(|time| SlotView {
            time,
            status: get_slot_status(date, time, working_hours, blocks, occupied),
        })
        .collect()
}

fn minutes_of_day(start: NaiveTime, end: NaiveTime, step: u32) -> impl Iterator<Item = u32> {
    use chrono::Timelike;
    let from = start.hour() * 60 + start.minute();
    let to = end.hour() * 60 + end.minute();
    (from..to).step_by(step as usize)
}
