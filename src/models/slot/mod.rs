// Slot module
// Atomic grid cell value type and its string key codec

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) for minutes-from-midnight values.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Date component format used inside slot keys. Fixed so two
/// participants' keys for the same day are byte-identical regardless of
/// locale.
const KEY_DATE_FORMAT: &str = "%Y-%m-%d";

/// One atomic selectable cell of the availability grid: a calendar day
/// plus an intra-day offset in minutes from midnight.
///
/// Equality and ordering are by `(date, time)`, so a `BTreeSet` of slots
/// iterates in calendar/chronological order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeSlot {
    pub date: NaiveDate,
    /// Minutes from midnight, `0..1440`
    pub time: u16,
}

impl TimeSlot {
    /// Create a slot, validating the time offset
    pub fn new(date: NaiveDate, time: u16) -> Result<Self, String> {
        if time >= MINUTES_PER_DAY {
            return Err(format!(
                "Slot time {} is out of range (must be below {})",
                time, MINUTES_PER_DAY
            ));
        }
        Ok(Self { date, time })
    }

    /// Encode this slot as its canonical string key, `"YYYY-MM-DD:<minutes>"`.
    ///
    /// `parse_key` inverts this exactly for every valid slot.
    pub fn key(&self) -> String {
        format!("{}:{}", self.date.format(KEY_DATE_FORMAT), self.time)
    }

    /// Decode a canonical slot key produced by [`TimeSlot::key`].
    ///
    /// Rejects malformed dates, non-numeric or out-of-range minutes, and
    /// trailing junk.
    pub fn parse_key(key: &str) -> Result<Self, String> {
        let (date_part, time_part) = key
            .split_once(':')
            .ok_or_else(|| format!("Slot key '{}' is missing the ':' separator", key))?;

        let date = NaiveDate::parse_from_str(date_part, KEY_DATE_FORMAT)
            .map_err(|_| format!("Slot key '{}' has an invalid date component", key))?;

        let time = time_part
            .parse::<u16>()
            .map_err(|_| format!("Slot key '{}' has an invalid time component", key))?;

        Self::new(date, time)
    }
}

/// One participant's committed availability. Ordered so serialized
/// payloads and test output are deterministic.
pub type SelectionSet = BTreeSet<TimeSlot>;
