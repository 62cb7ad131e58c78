use std::time::{Duration, Instant};

use crate::models::slot::SelectionSet;

/// How long after the last commit the write actually goes out. Commits
/// inside the window coalesce into a single write of the latest set.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Monotonic counter over local selection states. Server responses are
/// matched against it so an old in-flight response can never clobber a
/// newer local edit: last-write-wins by local recency, not by response
/// arrival order.
pub type Revision = u64;

#[derive(Debug, Clone, PartialEq)]
struct PendingWrite {
    slots: SelectionSet,
    revision: Revision,
    due_at: Instant,
}

/// A write ready to be dispatched, carrying the full selection set.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundWrite {
    pub slots: SelectionSet,
    pub revision: Revision,
}

/// Debounced write scheduler for one participant's selection.
///
/// Time is passed in explicitly (`*_at` methods) so the debounce logic
/// is testable without sleeping; the convenience wrappers use
/// `Instant::now()`.
#[derive(Debug)]
pub struct SyncQueue {
    debounce: Duration,
    revision: Revision,
    pending: Option<PendingWrite>,
    in_flight: Option<Revision>,
}

impl Default for SyncQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncQueue {
    pub fn new() -> Self {
        Self::with_debounce(DEBOUNCE_WINDOW)
    }

    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            debounce,
            revision: 0,
            pending: None,
            in_flight: None,
        }
    }

    /// Record a committed selection and (re)arm the debounce window.
    /// An already pending write is replaced, not queued behind.
    pub fn commit(&mut self, slots: SelectionSet) -> Revision {
        self.commit_at(slots, Instant::now())
    }

    pub fn commit_at(&mut self, slots: SelectionSet, now: Instant) -> Revision {
        self.revision += 1;
        self.pending = Some(PendingWrite {
            slots,
            revision: self.revision,
            due_at: now + self.debounce,
        });
        self.revision
    }

    /// Take the write whose debounce window has elapsed, if any. The
    /// caller dispatches it; a newer commit before the response lands
    /// simply schedules the next write.
    pub fn due_write(&mut self) -> Option<OutboundWrite> {
        self.due_write_at(Instant::now())
    }

    pub fn due_write_at(&mut self, now: Instant) -> Option<OutboundWrite> {
        if self.pending.as_ref().is_none_or(|p| now < p.due_at) {
            return None;
        }
        let pending = self.pending.take()?;
        self.in_flight = Some(pending.revision);
        Some(OutboundWrite {
            slots: pending.slots,
            revision: pending.revision,
        })
    }

    /// Whether a response stamped with `revision` still describes the
    /// newest local state and may be applied.
    pub fn response_is_current(&self, revision: Revision) -> bool {
        revision == self.revision
    }

    /// Mark the dispatched write finished (success or failure). Stale
    /// revisions are ignored.
    pub fn finish_write(&mut self, revision: Revision) {
        if self.in_flight == Some(revision) {
            self.in_flight = None;
        }
    }

    pub fn is_writing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn current_revision(&self) -> Revision {
        self.revision
    }

    /// Time until the pending write becomes due, for frame scheduling.
    pub fn next_due_in(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.due_at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::slot::TimeSlot;
    use chrono::NaiveDate;

    fn slots(times: &[u16]) -> SelectionSet {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        times.iter().map(|&time| TimeSlot { date, time }).collect()
    }

    #[test]
    fn write_is_not_due_before_the_window_elapses() {
        let mut queue = SyncQueue::new();
        let t0 = Instant::now();

        queue.commit_at(slots(&[540]), t0);
        assert_eq!(queue.due_write_at(t0 + Duration::from_millis(499)), None);
        assert!(queue.has_pending());
    }

    #[test]
    fn commits_inside_the_window_coalesce_into_one_write() {
        let mut queue = SyncQueue::new();
        let t0 = Instant::now();

        queue.commit_at(slots(&[540]), t0);
        queue.commit_at(slots(&[540, 570]), t0 + Duration::from_millis(100));
        queue.commit_at(slots(&[570]), t0 + Duration::from_millis(200));

        // Window re-armed by the last commit: nothing due at t0+500
        assert_eq!(queue.due_write_at(t0 + Duration::from_millis(500)), None);

        let write = queue.due_write_at(t0 + Duration::from_millis(700)).unwrap();
        assert_eq!(write.slots, slots(&[570]));
        assert_eq!(write.revision, 3);

        // Exactly one write: the queue is drained
        assert_eq!(queue.due_write_at(t0 + Duration::from_millis(1500)), None);
    }

    #[test]
    fn stale_responses_are_rejected() {
        let mut queue = SyncQueue::new();
        let t0 = Instant::now();

        let first = queue.commit_at(slots(&[540]), t0);
        let write = queue.due_write_at(t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(write.revision, first);

        // A newer local edit arrives while the write is in flight
        let second = queue.commit_at(slots(&[570]), t0 + Duration::from_secs(2));

        assert!(!queue.response_is_current(first));
        assert!(queue.response_is_current(second));
    }

    #[test]
    fn finish_write_clears_only_the_matching_revision() {
        let mut queue = SyncQueue::new();
        let t0 = Instant::now();

        queue.commit_at(slots(&[540]), t0);
        let first = queue.due_write_at(t0 + Duration::from_secs(1)).unwrap();

        queue.commit_at(slots(&[570]), t0 + Duration::from_secs(1));
        let second = queue.due_write_at(t0 + Duration::from_secs(2)).unwrap();
        assert!(queue.is_writing());

        // The older response returning late must not clear the newer write
        queue.finish_write(first.revision);
        assert!(queue.is_writing());

        queue.finish_write(second.revision);
        assert!(!queue.is_writing());
    }

    #[test]
    fn next_due_in_tracks_the_armed_window() {
        let mut queue = SyncQueue::with_debounce(Duration::from_millis(200));
        let t0 = Instant::now();

        assert_eq!(queue.next_due_in(t0), None);
        queue.commit_at(slots(&[540]), t0);
        assert_eq!(
            queue.next_due_in(t0 + Duration::from_millis(150)),
            Some(Duration::from_millis(50))
        );
        // Past due clamps to zero
        assert_eq!(
            queue.next_due_in(t0 + Duration::from_millis(300)),
            Some(Duration::ZERO)
        );
    }
}
