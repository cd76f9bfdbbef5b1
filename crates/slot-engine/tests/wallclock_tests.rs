//! Wall-clock conversion must not depend on the host timezone and must
//! resolve the offset in effect on the slot's own date.

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use slot_engine::{
    format_for_external_calendar, resolve_wall_clock, wall_clock_to_absolute_ms, PLATFORM_TIMEZONE,
};

fn ms(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
        .timestamp_millis()
}

#[test]
fn platform_zone_slot_converts_to_utc() {
    let result = wall_clock_to_absolute_ms("2025-03-09", "10:00", "America/Mexico_City").unwrap();
    assert_eq!(result, ms(2025, 3, 9, 16, 0));
}

#[test]
fn round_trip_reproduces_wall_clock() {
    let tz: Tz = PLATFORM_TIMEZONE.parse().unwrap();
    let samples = [
        ("2025-03-09", "10:00"),
        ("2022-06-15", "10:00"),
        ("2022-01-15", "08:30"),
    ];
    for (date, time) in samples {
        let epoch = wall_clock_to_absolute_ms(date, time, PLATFORM_TIMEZONE).unwrap();
        let local = Utc.timestamp_millis_opt(epoch).unwrap().with_timezone(&tz);
        assert_eq!(local.format("%Y-%m-%d").to_string(), date);
        assert_eq!(local.format("%H:%M").to_string(), time);
    }
}

#[test]
fn dates_either_side_of_a_dst_change_use_their_own_offset() {
    // US daylight time began 2025-03-09
    let before = wall_clock_to_absolute_ms("2025-03-08", "10:00", "America/New_York").unwrap();
    let after = wall_clock_to_absolute_ms("2025-03-09", "10:00", "America/New_York").unwrap();
    assert_eq!(before, ms(2025, 3, 8, 15, 0));
    assert_eq!(after, ms(2025, 3, 9, 14, 0));
    // One calendar day apart on the wall clock, 23 hours apart in absolute time
    assert_eq!(after - before, 23 * 3_600_000);
}

#[test]
fn platform_zone_historic_dst_is_honoured() {
    // Last Mexican daylight-time period ended 2022-10-30
    let summer = resolve_wall_clock("2022-10-29", "10:00", PLATFORM_TIMEZONE).unwrap();
    let winter = resolve_wall_clock("2022-10-31", "10:00", PLATFORM_TIMEZONE).unwrap();
    assert_eq!(summer.utc_offset, "-05:00");
    assert!(summer.dst_active);
    assert_eq!(winter.utc_offset, "-06:00");
    assert!(!winter.dst_active);
}

#[test]
fn external_calendar_window_is_zone_less() {
    let window =
        format_for_external_calendar("2025-06-10", "23:30", 60, PLATFORM_TIMEZONE).unwrap();
    assert_eq!(window.start, "2025-06-10T23:30:00");
    assert_eq!(window.end, "2025-06-11T00:30:00");
    assert!(!window.start.ends_with('Z'));
    assert!(!window.end.contains('+'));
    assert_eq!(window.time_zone, "America/Mexico_City");
}

#[test]
fn wall_clock_inside_spring_forward_gap_moves_forward() {
    // 02:30 does not exist in New York on 2025-03-09; it reads as 03:30 EDT
    let gap = resolve_wall_clock("2025-03-09", "02:30", "America/New_York").unwrap();
    assert_eq!(gap.utc, "2025-03-09T07:30:00+00:00");
    assert_eq!(gap.local, "2025-03-09T03:30:00-04:00");
    assert!(gap.dst_active);
}

#[test]
fn external_calendar_window_serializes_for_push() {
    let window =
        format_for_external_calendar("2025-06-10", "09:00", 45, PLATFORM_TIMEZONE).unwrap();
    let json = serde_json::to_value(&window).unwrap();
    assert_eq!(json["start"], "2025-06-10T09:00:00");
    assert_eq!(json["end"], "2025-06-10T09:45:00");
    assert_eq!(json["time_zone"], "America/Mexico_City");
}
