//! # slot-engine
//!
//! Deterministic appointment-slot availability.
//!
//! Decides, for a professional and a calendar date and time, whether an
//! appointment slot can be booked. Weekly working hours, one-off and recurring
//! block rules, already booked start times and imported external-calendar
//! busy periods are reconciled into a single [`SlotStatus`]. Wall-clock
//! values are converted to instants with an explicit IANA zone, so results
//! do not depend on the timezone of the host.
//!
//! ## Modules
//!
//! - `weekday` — Sunday-based ⇄ Monday-based weekday numbers, wrapping weekday ranges
//! - `matcher` — Whether a block rule applies to a date, and whether it covers a time
//! - [`filter`] — Narrow block rules to a queried date range
//! - [`resolver`] — The slot status decision and the day grid built on it
//! - [`wallclock`] — Wall-clock ⇄ absolute time, external-calendar timestamps
//! - [`schedule`] — A professional's scheduling snapshot plus engine settings
//! - [`model`] — Working hours, block rules, bookings, slot status
//! - [`error`] — Error types
//!
//! Block matching and time coverage are not exported. Bookability is decided
//! through [`get_slot_status`] only.

pub mod error;
pub mod filter;
mod matcher;
pub mod model;
pub mod resolver;
pub mod schedule;
pub mod wallclock;
mod weekday;

pub use error::SlotError;
pub use filter::filter_blocks_for_date_range;
pub use model::{
    parse_date, parse_time, BlockRule, BlockType, OccupiedTimes, SlotStatus, WorkingHours,
};
pub use resolver::{get_slot_status, list_day_slots, SlotView, DEFAULT_SLOT_INTERVAL_MINUTES};
pub use schedule::{DaySlots, EngineConfig, OpenSlot, Schedule};
pub use wallclock::{
    format_for_external_calendar, resolve_wall_clock, wall_clock_to_absolute_ms, wall_clock_to_utc,
    ExternalCalendarWindow, ResolvedWallClock, PLATFORM_TIMEZONE,
};
