//! Interval arithmetic over a stylist's day.
//!
//! All computation happens on half-open `[start, end)` ranges of minute
//! offsets from midnight. The functions here are pure and deterministic;
//! the backends feed them current store state on every request.

use crate::types::{DayAvailability, FreeWindow, WorkInterval};
use chrono::{NaiveTime, Timelike};

pub const NO_WORKING_HOURS: &str = "stylist has no working hours on this day";
pub const NO_FREE_SLOT: &str = "no free slot of the requested duration on this day";

/// Half-open `[start, end)` range of minute offsets from midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteRange {
    pub start: u32,
    pub end: u32,
}

impl MinuteRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn from_times(start: NaiveTime, end: NaiveTime) -> Self {
        Self::new(minute_of_day(start), minute_of_day(end))
    }

    pub fn length(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Whether `minute` is a valid start within this range, i.e. lies in
    /// `[start, end)`.
    pub fn contains_start(&self, minute: u32) -> bool {
        self.start <= minute && minute < self.end
    }
}

pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

pub fn time_of_minute(minute: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(minute * 60, 0).unwrap_or(NaiveTime::MIN)
}

/// Two half-open ranges overlap iff each starts before the other ends.
pub fn overlaps(a: MinuteRange, b: MinuteRange) -> bool {
    b.start < a.end && a.start < b.end
}

/// Subtract every booked range from every work range.
///
/// A booked range fully covering a work range eliminates it, one reaching
/// over an edge trims it, one strictly inside splits it in two. The result
/// is sorted ascending with adjacent survivors coalesced, so no two
/// returned blocks overlap or touch.
pub fn free_blocks(work: &[MinuteRange], booked: &[MinuteRange]) -> Vec<MinuteRange> {
    let mut blocks = Vec::new();
    for &interval in work {
        let mut remaining = vec![interval];
        for &taken in booked {
            let mut survivors = Vec::new();
            for block in remaining {
                if !overlaps(block, taken) {
                    survivors.push(block);
                    continue;
                }
                if block.start < taken.start {
                    survivors.push(MinuteRange::new(block.start, taken.start));
                }
                if taken.end < block.end {
                    survivors.push(MinuteRange::new(taken.end, block.end));
                }
            }
            remaining = survivors;
        }
        blocks.extend(remaining);
    }
    blocks.sort_by_key(|block| block.start);

    let mut coalesced: Vec<MinuteRange> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match coalesced.last_mut() {
            Some(previous) if previous.end >= block.start => previous.end = block.end,
            _ => coalesced.push(block),
        }
    }
    coalesced
}

/// Continuous range of valid starts within one free block, both bounds
/// inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartWindow {
    pub earliest: u32,
    pub latest: u32,
}

/// Keep the blocks long enough for `duration_minutes` and map each to its
/// valid start range `[block.start, block.end - duration]`.
pub fn start_windows(blocks: &[MinuteRange], duration_minutes: u32) -> Vec<StartWindow> {
    blocks
        .iter()
        .filter(|block| block.length() >= duration_minutes)
        .map(|block| StartWindow {
            earliest: block.start,
            latest: block.end - duration_minutes,
        })
        .collect()
}

/// Assemble the availability answer for one stylist and day. An empty
/// window list carries a reason so callers can tell a day off from a day
/// that is fully booked.
pub fn day_availability(
    intervals: &[WorkInterval],
    booked: &[MinuteRange],
    total_duration_minutes: i32,
) -> DayAvailability {
    if intervals.is_empty() {
        return DayAvailability {
            total_duration_minutes,
            windows: Vec::new(),
            reason: Some(NO_WORKING_HOURS.into()),
        };
    }

    let work: Vec<MinuteRange> = intervals
        .iter()
        .map(|interval| MinuteRange::from_times(interval.start, interval.end))
        .collect();
    let blocks = free_blocks(&work, booked);
    let windows: Vec<FreeWindow> = start_windows(&blocks, total_duration_minutes as u32)
        .into_iter()
        .map(|window| FreeWindow {
            earliest_start: time_of_minute(window.earliest),
            latest_start: time_of_minute(window.latest),
        })
        .collect();

    let reason = windows.is_empty().then(|| NO_FREE_SLOT.into());
    DayAvailability {
        total_duration_minutes,
        windows,
        reason,
    }
}
