//! Aggregation of all participants' availability into per-slot
//! participation counts, ratios and discrete color tiers.
//!
//! Everything here is derived state: the grid is rebuilt from scratch on
//! every aggregate refetch and never mutated in place.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::models::slot::{SelectionSet, TimeSlot};

/// Aggregate availability as shipped by the event service:
/// date -> minutes-from-midnight -> participant ids.
pub type AvailabilityIndex = HashMap<NaiveDate, HashMap<u16, Vec<String>>>;

/// Discrete heatmap color class derived from the participation ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Empty,
    Quarter,
    Half,
    ThreeQuarters,
    Full,
}

impl Tier {
    /// Classify a participation ratio. Upper bounds are inclusive:
    /// exactly 1 of 4 participants lands in `Quarter`, 3 of 4 in
    /// `ThreeQuarters`.
    pub fn from_ratio(ratio: f32) -> Self {
        if ratio <= 0.0 {
            Tier::Empty
        } else if ratio <= 0.25 {
            Tier::Quarter
        } else if ratio <= 0.5 {
            Tier::Half
        } else if ratio <= 0.75 {
            Tier::ThreeQuarters
        } else {
            Tier::Full
        }
    }
}

/// Derived per-slot aggregate, recomputed on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapCell {
    pub count: usize,
    pub ratio: f32,
    pub tier: Tier,
}

impl HeatmapCell {
    const EMPTY: HeatmapCell = HeatmapCell {
        count: 0,
        ratio: 0.0,
        tier: Tier::Empty,
    };
}

/// All participants' availability, indexed by slot.
#[derive(Debug, Clone, Default)]
pub struct HeatmapGrid {
    slots: BTreeMap<TimeSlot, Vec<String>>,
    total_participants: usize,
}

impl HeatmapGrid {
    /// Build from the event service's aggregate index. Entries with time
    /// offsets outside a day are dropped rather than trusted.
    pub fn from_index(index: &AvailabilityIndex, total_participants: usize) -> Self {
        let mut slots = BTreeMap::new();
        for (&date, by_time) in index {
            for (&time, ids) in by_time {
                let Ok(slot) = TimeSlot::new(date, time) else {
                    continue;
                };
                if !ids.is_empty() {
                    slots.insert(slot, ids.clone());
                }
            }
        }
        Self {
            slots,
            total_participants,
        }
    }

    /// Build from one committed selection set per participant id.
    pub fn from_participant_sets(sets: &HashMap<String, SelectionSet>) -> Self {
        let mut slots: BTreeMap<TimeSlot, Vec<String>> = BTreeMap::new();
        for (id, selection) in sets {
            for &slot in selection {
                slots.entry(slot).or_default().push(id.clone());
            }
        }
        // Deterministic id order regardless of HashMap iteration
        for ids in slots.values_mut() {
            ids.sort();
        }
        Self {
            slots,
            total_participants: sets.len(),
        }
    }

    pub fn total_participants(&self) -> usize {
        self.total_participants
    }

    /// Aggregate for one slot. With no participants every cell is empty;
    /// no division happens on that path.
    pub fn cell(&self, slot: &TimeSlot) -> HeatmapCell {
        let count = self.slots.get(slot).map_or(0, Vec::len);
        if count == 0 || self.total_participants == 0 {
            return HeatmapCell::EMPTY;
        }

        let ratio = count as f32 / self.total_participants as f32;
        HeatmapCell {
            count,
            ratio,
            tier: Tier::from_ratio(ratio),
        }
    }

    /// Participant ids available in `slot`, in stable order.
    pub fn participant_ids(&self, slot: &TimeSlot) -> &[String] {
        self.slots.get(slot).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use test_case::test_case;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn slot(d: u32, time: u16) -> TimeSlot {
        TimeSlot { date: date(d), time }
    }

    #[test_case(0.0, Tier::Empty; "zero ratio")]
    #[test_case(0.1, Tier::Quarter; "below first bound")]
    #[test_case(0.25, Tier::Quarter; "first bound inclusive")]
    #[test_case(0.26, Tier::Half; "just above first bound")]
    #[test_case(0.5, Tier::Half; "second bound inclusive")]
    #[test_case(0.75, Tier::ThreeQuarters; "third bound inclusive")]
    #[test_case(0.76, Tier::Full; "above third bound")]
    #[test_case(1.0, Tier::Full; "everyone")]
    fn tier_thresholds(ratio: f32, expected: Tier) {
        assert_eq!(Tier::from_ratio(ratio), expected);
    }

    fn grid_of_four(count: usize) -> HeatmapGrid {
        let ids: Vec<String> = (0..count).map(|i| format!("p{}", i)).collect();
        let mut by_time = HashMap::new();
        by_time.insert(540u16, ids);
        let mut index = HashMap::new();
        index.insert(date(1), by_time);
        HeatmapGrid::from_index(&index, 4)
    }

    #[test_case(0, Tier::Empty; "nobody")]
    #[test_case(1, Tier::Quarter; "one of four")]
    #[test_case(2, Tier::Half; "two of four")]
    #[test_case(3, Tier::ThreeQuarters; "three of four")]
    #[test_case(4, Tier::Full; "all four")]
    fn tiers_at_four_participants(count: usize, expected: Tier) {
        let cell = grid_of_four(count).cell(&slot(1, 540));
        assert_eq!(cell.count, count);
        assert_eq!(cell.tier, expected);
    }

    #[test]
    fn no_participants_means_every_cell_empty() {
        let grid = HeatmapGrid::from_index(&AvailabilityIndex::new(), 0);
        let cell = grid.cell(&slot(1, 540));
        assert_eq!(cell, HeatmapCell { count: 0, ratio: 0.0, tier: Tier::Empty });
    }

    #[test]
    fn unknown_slot_is_empty() {
        let grid = grid_of_four(3);
        assert_eq!(grid.cell(&slot(2, 540)).tier, Tier::Empty);
    }

    #[test]
    fn from_participant_sets_counts_and_orders_ids() {
        let mut sets = HashMap::new();
        sets.insert("zofia".to_string(), SelectionSet::from([slot(1, 540)]));
        sets.insert(
            "adam".to_string(),
            SelectionSet::from([slot(1, 540), slot(1, 570)]),
        );

        let grid = HeatmapGrid::from_participant_sets(&sets);
        assert_eq!(grid.total_participants(), 2);
        assert_eq!(grid.participant_ids(&slot(1, 540)), ["adam", "zofia"]);
        assert_eq!(grid.cell(&slot(1, 540)).tier, Tier::Full);
        assert_eq!(grid.cell(&slot(1, 570)).tier, Tier::Half);
    }

    #[test]
    fn out_of_range_times_are_dropped() {
        let mut by_time = HashMap::new();
        by_time.insert(2000u16, vec!["p0".to_string()]);
        let mut index = HashMap::new();
        index.insert(date(1), by_time);

        let grid = HeatmapGrid::from_index(&index, 1);
        assert_eq!(grid.cell(&slot(1, 2000 % 1440)).count, 0);
    }
}
