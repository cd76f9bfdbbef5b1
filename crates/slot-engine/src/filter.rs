//! Narrow a professional's block rules to a queried date range.

use chrono::NaiveDate;

use crate::model::BlockRule;

/// Keep the block rules that could apply somewhere in `[range_start, range_end]`.
///
/// Recurring rules match by weekday, not by date, so they are always kept.
/// One-off rules are kept when their `[start_date, end_date]` span overlaps
/// the range. Order is preserved.
pub fn filter_blocks_for_date_range(
    blocks: &[BlockRule],
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Vec<BlockRule> {
    let kept: Vec<BlockRule> = blocks
        .iter()
        .filter(|b| b.is_recurring || (b.start_date <= range_end && b.end_date() >= range_start))
        .cloned()
        .collect();

    tracing::debug!(
        total = blocks.len(),
        kept = kept.len(),
        %range_start,
        %range_end,
        "block rules narrowed to date range"
    );
    kept
}
