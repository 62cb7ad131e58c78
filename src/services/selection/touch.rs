use crate::models::slot::TimeSlot;

/// Displacement (logical pixels, per axis) at or beyond which a touch
/// is a scroll rather than a tap.
pub const TOUCH_MOVE_THRESHOLD: f32 = 10.0;

/// Tracks one touch between press and release to decide tap vs scroll.
///
/// The decision is by accumulated displacement from the press origin:
/// once either axis crosses the threshold the touch is a scroll for the
/// rest of its lifetime, even if the finger returns to the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct TapTracker {
    active: Option<TapState>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TapState {
    origin: (f32, f32),
    slot: Option<TimeSlot>,
    moved: bool,
}

impl TapTracker {
    /// Begin tracking a press. `slot` is the cell under the finger, or
    /// `None` when the press landed on chrome (headers, gaps).
    pub fn start(&mut self, position: (f32, f32), slot: Option<TimeSlot>) {
        self.active = Some(TapState {
            origin: position,
            slot,
            moved: false,
        });
    }

    pub fn record_move(&mut self, position: (f32, f32)) {
        let Some(state) = &mut self.active else {
            return;
        };
        let dx = (position.0 - state.origin.0).abs();
        let dy = (position.1 - state.origin.1).abs();
        if dx >= TOUCH_MOVE_THRESHOLD || dy >= TOUCH_MOVE_THRESHOLD {
            state.moved = true;
        }
    }

    /// Finish the touch: `Some(slot)` when it stayed a tap over a cell.
    pub fn finish(&mut self) -> Option<TimeSlot> {
        let state = self.active.take()?;
        if state.moved {
            return None;
        }
        state.slot
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }
}
