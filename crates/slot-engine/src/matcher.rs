//! Block rule evaluation.
//!
//! Four authoring formats share one evaluator. Each (`BlockType`,
//! `is_recurring`) pair maps to a [`MatchRule`]: a weekday predicate and a
//! date predicate, both of which must hold. Recurring rules are weekday
//! patterns that ignore absolute dates once anchored; non-recurring rules are
//! literal date spans.
//!
//! | block type    | recurring              | one-off                       |
//! |---------------|------------------------|-------------------------------|
//! | `weekly_day`  | weekday == day_of_week | date == start_date            |
//! | `weekly_range`| weekday in range       | weekday in range, date in span|
//! | `full_day`    | weekday in date range  | date in span                  |
//! | `time_range`  | weekday in date range  | date in span                  |

use chrono::{NaiveDate, NaiveTime};

use crate::model::{truncate_to_minute, BlockRule, BlockType};
use crate::weekday::{day_of_week_in_range, weekday_of};

/// Which weekdays a rule may match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeekdayRule {
    /// Any weekday.
    Any,
    /// Exactly `day_of_week`; a rule without one matches nothing.
    Explicit,
    /// `day_of_week` when set, otherwise the weekdays of `start_date..end_date`.
    ExplicitOrSpan,
    /// The weekdays of `start_date..end_date`.
    Span,
}

/// Which calendar dates a rule may match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateRule {
    Any,
    StartDateOnly,
    WithinSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MatchRule {
    weekday: WeekdayRule,
    date: DateRule,
}

const fn rule(weekday: WeekdayRule, date: DateRule) -> Option<MatchRule> {
    Some(MatchRule { weekday, date })
}

fn match_rule(block_type: BlockType, is_recurring: bool) -> Option<MatchRule> {
    use DateRule as D;
    use WeekdayRule as W;

    match (block_type, is_recurring) {
        (BlockType::WeeklyDay, true) => rule(W::Explicit, D::Any),
        // The literal date decides; a one-off weekly_day pins a single date.
        (BlockType::WeeklyDay, false) => rule(W::Any, D::StartDateOnly),
        (BlockType::WeeklyRange, true) => rule(W::ExplicitOrSpan, D::Any),
        (BlockType::WeeklyRange, false) => rule(W::ExplicitOrSpan, D::WithinSpan),
        (BlockType::FullDay | BlockType::TimeRange, true) => rule(W::Span, D::Any),
        (BlockType::FullDay | BlockType::TimeRange, false) => rule(W::Any, D::WithinSpan),
        (BlockType::Unknown, _) => None,
    }
}

fn span_weekdays(block: &BlockRule) -> (u8, u8) {
    (weekday_of(block.start_date), weekday_of(block.end_date()))
}

fn weekday_matches(rule: WeekdayRule, weekday: u8, block: &BlockRule) -> bool {
    match rule {
        WeekdayRule::Any => true,
        WeekdayRule::Explicit => block.day_of_week == Some(weekday),
        WeekdayRule::ExplicitOrSpan => {
            let (start, end) = match block.day_of_week {
                Some(day) => (day, day),
                None => span_weekdays(block),
            };
            day_of_week_in_range(weekday, start, end)
        }
        WeekdayRule::Span => {
            let (start, end) = span_weekdays(block);
            day_of_week_in_range(weekday, start, end)
        }
    }
}

fn date_matches(rule: DateRule, date: NaiveDate, block: &BlockRule) -> bool {
    match rule {
        DateRule::Any => true,
        DateRule::StartDateOnly => date == block.start_date,
        DateRule::WithinSpan => date >= block.start_date && date <= block.end_date(),
    }
}

/// Does `block` apply to `date` at all, independent of time of day?
pub(crate) fn block_applies_to_date(date: NaiveDate, block: &BlockRule) -> bool {
    let Some(matcher) = match_rule(block.block_type, block.is_recurring) else {
        return false;
    };
    weekday_matches(matcher.weekday, weekday_of(date), block)
        && date_matches(matcher.date, date, block)
}

/// Does an applicable `block` cover `time` on its matching days?
///
/// Day-type rules without time bounds cover the whole day. Otherwise both
/// bounds are required and the interval is half-open: `09:00–10:00` covers
/// `09:59` but not `10:00`. Partial bounds cover nothing.
pub(crate) fn block_covers_time(time: NaiveTime, block: &BlockRule) -> bool {
    let day_type = matches!(block.block_type, BlockType::FullDay | BlockType::WeeklyDay);
    if day_type && block.is_whole_day() {
        return true;
    }
    match (block.start_time, block.end_time) {
        (Some(start), Some(end)) => {
            let time = truncate_to_minute(time);
            truncate_to_minute(start) <= time && time < truncate_to_minute(end)
        }
        _ => false,
    }
}
