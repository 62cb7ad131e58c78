// Integration tests covering the full selection flow: axis construction,
// gesture commits, debounced persistence and the local session cache.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use meetgrid::models::event::Event;
use meetgrid::models::participant::ParticipantSession;
use meetgrid::models::slot::{SelectionSet, TimeSlot};
use meetgrid::services::axis::Axis;
use meetgrid::services::database::Database;
use meetgrid::services::heatmap::{HeatmapGrid, Tier};
use meetgrid::services::selection::SelectionEngine;
use meetgrid::services::session::SessionService;
use meetgrid::services::sync::SyncQueue;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn sample_event() -> Event {
    Event {
        id: "evt_1".to_string(),
        slug: "winter-trip".to_string(),
        title: "Winter trip planning".to_string(),
        description: None,
        start_date: date(1),
        end_date: date(3),
        start_time: 540,
        end_time: 600,
        slot_duration: 30,
        timezone: None,
    }
}

#[test]
fn drag_across_the_whole_grid_commits_every_slot() {
    // 3 dates x 2 times (9:00 and 9:30)
    let axis = Axis::for_event(&sample_event()).unwrap();
    assert_eq!(axis.times(), &[540, 570]);

    let mut engine = SelectionEngine::new(axis.clone());
    let committed = SelectionSet::new();

    let start = axis.slot_at(0, 0).unwrap();
    let end = axis.slot_at(2, 1).unwrap();
    engine.gesture_start(&start, &committed);
    engine.gesture_move(&end);
    let next = engine.gesture_end(&committed).unwrap();

    let expected: SelectionSet = [
        TimeSlot { date: date(1), time: 540 },
        TimeSlot { date: date(1), time: 570 },
        TimeSlot { date: date(2), time: 540 },
        TimeSlot { date: date(2), time: 570 },
        TimeSlot { date: date(3), time: 540 },
        TimeSlot { date: date(3), time: 570 },
    ]
    .into();
    assert_eq!(next, expected);
}

#[test]
fn three_quick_commits_produce_one_write_with_the_final_set() {
    let mut queue = SyncQueue::new();
    let t0 = Instant::now();

    let step = |times: &[u16]| -> SelectionSet {
        times
            .iter()
            .map(|&time| TimeSlot { date: date(1), time })
            .collect()
    };

    queue.commit_at(step(&[540]), t0);
    queue.commit_at(step(&[540, 570]), t0 + Duration::from_millis(150));
    let final_set = step(&[540, 570, 600]);
    queue.commit_at(final_set.clone(), t0 + Duration::from_millis(300));

    // Drain the queue over a generous time range, counting dispatches
    let mut writes = Vec::new();
    for ms in (0..3000).step_by(50) {
        if let Some(write) = queue.due_write_at(t0 + Duration::from_millis(ms)) {
            writes.push(write);
        }
    }

    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].slots, final_set);
}

#[test]
fn a_late_response_for_an_old_write_is_not_current() {
    let mut queue = SyncQueue::new();
    let t0 = Instant::now();

    queue.commit_at(SelectionSet::new(), t0);
    let first = queue.due_write_at(t0 + Duration::from_secs(1)).unwrap();

    // User keeps editing while the first write is on the wire
    let newer: SelectionSet = [TimeSlot { date: date(2), time: 570 }].into();
    queue.commit_at(newer, t0 + Duration::from_secs(1));

    assert!(!queue.response_is_current(first.revision));

    let second = queue.due_write_at(t0 + Duration::from_secs(2)).unwrap();
    assert!(queue.response_is_current(second.revision));
}

#[test]
fn session_survives_an_app_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("meetgrid.db");
    let db_path = db_path.to_str().unwrap();

    let session = ParticipantSession {
        participant_id: "p1".to_string(),
        name: "Ala".to_string(),
        slots: vec![TimeSlot { date: date(2), time: 540 }],
    };

    // First launch: join and cache the session
    {
        let db = Database::new(db_path).unwrap();
        db.initialize_schema().unwrap();
        SessionService::new(&db).save("winter-trip", &session).unwrap();
    }

    // Second launch: the cached identity and slots come back
    {
        let db = Database::new(db_path).unwrap();
        db.initialize_schema().unwrap();
        let restored = SessionService::new(&db).get("winter-trip").unwrap();
        assert_eq!(restored, Some(session));
    }
}

#[test]
fn committed_sets_aggregate_into_the_expected_tiers() {
    let axis = Axis::for_event(&sample_event()).unwrap();
    let everyone: Vec<TimeSlot> = axis.all_slots().collect();

    // Four participants with varying overlap on the 9:00 slot of day 1
    let target = TimeSlot { date: date(1), time: 540 };
    let mut sets = std::collections::HashMap::new();
    sets.insert("p1".to_string(), SelectionSet::from_iter(everyone.clone()));
    sets.insert("p2".to_string(), SelectionSet::from([target]));
    sets.insert("p3".to_string(), SelectionSet::from([target]));
    sets.insert("p4".to_string(), SelectionSet::new());

    let heatmap = HeatmapGrid::from_participant_sets(&sets);
    assert_eq!(heatmap.total_participants(), 4);

    // 3 of 4 on the target slot
    assert_eq!(heatmap.cell(&target).tier, Tier::ThreeQuarters);
    // 1 of 4 everywhere else p1 selected
    let lonely = TimeSlot { date: date(3), time: 570 };
    assert_eq!(heatmap.cell(&lonely).tier, Tier::Quarter);
}
