// Property-based tests for the axis generator, the slot key codec and
// the selection engine's rectangle/toggle semantics.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use meetgrid::models::slot::{SelectionSet, TimeSlot};
use meetgrid::services::axis::{date_axis, time_axis, Axis};
use meetgrid::services::selection::{InputMode, SelectionEngine, TOUCH_MOVE_THRESHOLD};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

prop_compose! {
    /// A valid (start, end, step) triple for the time axis
    fn time_window()(start in 0u16..1430, span in 1u16..600, step_index in 0usize..3) -> (u16, u16, u16) {
        let step = [15u16, 30, 60][step_index];
        let end = (start + span).min(1440);
        (start, end, step)
    }
}

prop_compose! {
    /// A small grid plus its engine, between 1x1 and 14x48 cells
    fn engine_grid()(days in 1i64..14, rows in 1usize..48) -> Axis {
        let start = base_date();
        let dates = date_axis(start, start + Duration::days(days - 1)).unwrap();
        let times: Vec<u16> = (0..rows as u16).map(|i| 480 + i * 15).collect();
        Axis::new(dates, times)
    }
}

proptest! {
    #[test]
    fn time_axis_is_strictly_increasing_and_below_end((start, end, step) in time_window()) {
        let times = time_axis(start, end, step).unwrap();

        prop_assert!(!times.is_empty());
        prop_assert_eq!(times[0], start);
        for pair in times.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        prop_assert!(*times.last().unwrap() < end);
    }

    #[test]
    fn slot_keys_round_trip(day_offset in 0i64..3650, time in 0u16..1440) {
        let slot = TimeSlot {
            date: base_date() + Duration::days(day_offset),
            time,
        };
        let decoded = TimeSlot::parse_key(&slot.key()).unwrap();
        prop_assert_eq!(decoded, slot);
    }

    #[test]
    fn rectangle_selection_is_corner_order_independent(
        axis in engine_grid(),
        corner_a in (0usize..14, 0usize..48),
        corner_b in (0usize..14, 0usize..48),
    ) {
        let a = (corner_a.0 % axis.dates().len(), corner_a.1 % axis.times().len());
        let b = (corner_b.0 % axis.dates().len(), corner_b.1 % axis.times().len());

        let committed = SelectionSet::new();

        let mut forward = SelectionEngine::new(axis.clone());
        forward.gesture_start(&axis.slot_at(a.0, a.1).unwrap(), &committed);
        forward.gesture_move(&axis.slot_at(b.0, b.1).unwrap());
        let from_a = forward.gesture_end(&committed).unwrap();

        let mut backward = SelectionEngine::new(axis.clone());
        backward.gesture_start(&axis.slot_at(b.0, b.1).unwrap(), &committed);
        backward.gesture_move(&axis.slot_at(a.0, a.1).unwrap());
        let from_b = backward.gesture_end(&committed).unwrap();

        prop_assert_eq!(&from_a, &from_b);

        let expected_len =
            (a.0.abs_diff(b.0) + 1) * (a.1.abs_diff(b.1) + 1);
        prop_assert_eq!(from_a.len(), expected_len);
    }

    #[test]
    fn column_toggle_twice_is_identity(
        axis in engine_grid(),
        column in 0usize..14,
        seed_slots in proptest::collection::vec((0usize..14, 0usize..48), 0..20),
    ) {
        let column = column % axis.dates().len();
        let original: SelectionSet = seed_slots
            .into_iter()
            .filter_map(|(di, ti)| {
                axis.slot_at(di % axis.dates().len(), ti % axis.times().len())
            })
            .collect();

        let engine = SelectionEngine::new(axis.clone());
        let once = engine.toggle_column(column, &original).unwrap();
        let twice = engine.toggle_column(column, &once).unwrap();

        prop_assert_eq!(twice, original);
    }

    #[test]
    fn row_toggle_twice_is_identity(
        axis in engine_grid(),
        row in 0usize..48,
    ) {
        let row = row % axis.times().len();
        let engine = SelectionEngine::new(axis.clone());

        let once = engine.toggle_row(row, &SelectionSet::new()).unwrap();
        let twice = engine.toggle_row(row, &once).unwrap();

        prop_assert_eq!(once.len(), axis.dates().len());
        prop_assert!(twice.is_empty());
    }

    #[test]
    fn sub_threshold_touch_toggles_exactly_one_slot(
        axis in engine_grid(),
        dx in -9.9f32..9.9,
        dy in -9.9f32..9.9,
    ) {
        let mut engine = SelectionEngine::new(axis.clone());
        engine.set_input_mode(InputMode::TapToggle);
        let committed = SelectionSet::new();
        let slot = axis.slot_at(0, 0).unwrap();

        engine.touch_start((200.0, 200.0), Some(slot));
        engine.touch_move((200.0 + dx, 200.0 + dy));
        let next = engine.touch_end(&committed).unwrap();

        prop_assert_eq!(next.len(), 1);
        prop_assert!(next.contains(&slot));
    }

    #[test]
    fn over_threshold_touch_toggles_nothing(
        axis in engine_grid(),
        extra in 0.1f32..400.0,
        vertical in proptest::bool::ANY,
    ) {
        let mut engine = SelectionEngine::new(axis.clone());
        engine.set_input_mode(InputMode::TapToggle);
        let committed = SelectionSet::new();
        let slot = axis.slot_at(0, 0).unwrap();

        let distance = TOUCH_MOVE_THRESHOLD + extra;
        let target = if vertical {
            (200.0, 200.0 + distance)
        } else {
            (200.0 + distance, 200.0)
        };

        engine.touch_start((200.0, 200.0), Some(slot));
        engine.touch_move(target);
        prop_assert_eq!(engine.touch_end(&committed), None);
    }
}
