//! Date and time axes backing the availability grid.
//!
//! Both axes are plain ordered vectors whose index order matches
//! calendar/chronological order; the selection engine's rectangle logic
//! relies on that. Construction is pure and deterministic, so the axes
//! can be rebuilt from the event definition at any time.

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use crate::models::event::{Event, VALID_SLOT_DURATIONS};
use crate::models::slot::{TimeSlot, MINUTES_PER_DAY};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AxisError {
    #[error("invalid date range: {end} is before {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("invalid time window {start}..{end}: need 0 <= start < end <= 1440")]
    InvalidTimeWindow { start: u16, end: u16 },
    #[error("invalid slot duration {0}: must be 15, 30 or 60 minutes")]
    InvalidStep(u16),
}

/// Every calendar day from `start` to `end` inclusive, ascending.
///
/// Operates on pure calendar dates; no instants, no timezone drift.
pub fn date_axis(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, AxisError> {
    if end < start {
        return Err(AxisError::InvalidRange { start, end });
    }

    let mut dates = Vec::with_capacity((end - start).num_days() as usize + 1);
    let mut day = start;
    while day <= end {
        dates.push(day);
        day += Duration::days(1);
    }
    Ok(dates)
}

/// Arithmetic progression from `start` (inclusive) to `end` (exclusive)
/// in steps of `step` minutes.
pub fn time_axis(start: u16, end: u16, step: u16) -> Result<Vec<u16>, AxisError> {
    if start >= end || end > MINUTES_PER_DAY {
        return Err(AxisError::InvalidTimeWindow { start, end });
    }
    if !VALID_SLOT_DURATIONS.contains(&step) {
        return Err(AxisError::InvalidStep(step));
    }

    Ok((start..end).step_by(step as usize).collect())
}

/// The two indexed axes of one event's grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    dates: Vec<NaiveDate>,
    times: Vec<u16>,
}

impl Axis {
    pub fn new(dates: Vec<NaiveDate>, times: Vec<u16>) -> Self {
        Self { dates, times }
    }

    /// Build both axes from an event definition, failing fast before any
    /// rendering when the definition is out of range.
    pub fn for_event(event: &Event) -> Result<Self, AxisError> {
        let dates = date_axis(event.start_date, event.end_date)?;
        let times = time_axis(event.start_time, event.end_time, event.slot_duration)?;
        Ok(Self { dates, times })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn times(&self) -> &[u16] {
        &self.times
    }

    pub fn date_index(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    pub fn time_index(&self, time: u16) -> Option<usize> {
        self.times.binary_search(&time).ok()
    }

    /// Both indices of a slot, or `None` when the slot is off-axis
    /// (stale key from a resize race; callers ignore those).
    pub fn slot_index(&self, slot: &TimeSlot) -> Option<(usize, usize)> {
        Some((self.date_index(slot.date)?, self.time_index(slot.time)?))
    }

    pub fn slot_at(&self, date_index: usize, time_index: usize) -> Option<TimeSlot> {
        let date = *self.dates.get(date_index)?;
        let time = *self.times.get(time_index)?;
        Some(TimeSlot { date, time })
    }

    /// Every slot in the inclusive axis-aligned rectangle spanned by two
    /// index pairs, in either corner order.
    pub fn rectangle(&self, a: (usize, usize), b: (usize, usize)) -> Vec<TimeSlot> {
        let (d0, d1) = (a.0.min(b.0), a.0.max(b.0));
        let (t0, t1) = (a.1.min(b.1), a.1.max(b.1));

        let mut slots = Vec::with_capacity((d1 - d0 + 1) * (t1 - t0 + 1));
        for di in d0..=d1 {
            for ti in t0..=t1 {
                if let Some(slot) = self.slot_at(di, ti) {
                    slots.push(slot);
                }
            }
        }
        slots
    }

    /// All slots of the grid in column-major (date, then time) order
    pub fn all_slots(&self) -> impl Iterator<Item = TimeSlot> + '_ {
        self.dates.iter().flat_map(move |&date| {
            self.times.iter().map(move |&time| TimeSlot { date, time })
        })
    }

    pub fn slot_count(&self) -> usize {
        self.dates.len() * self.times.len()
    }
}
