use crate::models::slot::{SelectionSet, TimeSlot};
use crate::services::axis::Axis;

use super::touch::TapTracker;

/// Whether an in-progress gesture will add or remove slots. Fixed at
/// gesture start by the anchor slot's membership in the committed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Add,
    Remove,
}

/// Visual classification of one cell for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotVisual {
    Empty,
    Selected,
    PreviewAdd,
    PreviewRemove,
}

/// How raw input is interpreted.
///
/// The two modes are mutually exclusive so one physical gesture is never
/// interpreted twice: in `TapToggle` (small touch layouts) the drag
/// entry points are suppressed entirely and dragging scrolls instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    PointerDrag,
    TapToggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    Dragging {
        intent: Intent,
        anchor: (usize, usize),
        cursor: (usize, usize),
    },
}

/// Stateful interpreter turning pointer/touch gestures into committed
/// selection sets.
///
/// The engine never owns the committed selection: it reads it by
/// reference for membership tests and returns a fresh set on commit, so
/// a render happening mid-update can never observe a half-applied
/// rectangle.
pub struct SelectionEngine {
    axis: Axis,
    gesture: GestureState,
    input_mode: InputMode,
    disabled: bool,
    tap: TapTracker,
}

impl SelectionEngine {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            gesture: GestureState::Idle,
            input_mode: InputMode::default(),
            disabled: false,
            tap: TapTracker::default(),
        }
    }

    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Switching modes aborts anything in progress so the two input
    /// sources can never both be live.
    pub fn set_input_mode(&mut self, mode: InputMode) {
        if self.input_mode != mode {
            self.input_mode = mode;
            self.gesture = GestureState::Idle;
            self.tap.cancel();
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disabling mid-gesture cancels it without emitting; `classify`
    /// keeps answering so read-only rendering continues to work.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.gesture = GestureState::Idle;
            self.tap.cancel();
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, GestureState::Dragging { .. })
    }

    // --- continuous pointer gestures -------------------------------------

    /// Begin a drag on `slot`. The slot's current membership in
    /// `committed` fixes the gesture intent: dragging from a selected
    /// slot removes, from an empty slot adds.
    pub fn gesture_start(&mut self, slot: &TimeSlot, committed: &SelectionSet) {
        if self.disabled || self.input_mode == InputMode::TapToggle {
            return;
        }
        let Some(indices) = self.axis.slot_index(slot) else {
            return;
        };

        let intent = if committed.contains(slot) {
            Intent::Remove
        } else {
            Intent::Add
        };
        self.gesture = GestureState::Dragging {
            intent,
            anchor: indices,
            cursor: indices,
        };
    }

    /// Extend the drag preview to `slot`. Off-axis slots (the pointer
    /// left the grid, or a stale key raced a layout change) are ignored
    /// and the last valid cursor is retained.
    pub fn gesture_move(&mut self, slot: &TimeSlot) {
        if self.disabled {
            return;
        }
        let GestureState::Dragging { cursor, .. } = &mut self.gesture else {
            return;
        };
        if let Some(indices) = self.axis.slot_index(slot) {
            *cursor = indices;
        }
    }

    /// Finish the drag: applies the inclusive anchor-cursor rectangle to
    /// a copy of `committed` and returns the new set. The engine returns
    /// to idle with no residual preview either way.
    pub fn gesture_end(&mut self, committed: &SelectionSet) -> Option<SelectionSet> {
        let GestureState::Dragging { intent, anchor, cursor } = self.gesture else {
            return None;
        };
        self.gesture = GestureState::Idle;

        let mut next = committed.clone();
        for slot in self.axis.rectangle(anchor, cursor) {
            match intent {
                Intent::Add => {
                    next.insert(slot);
                }
                Intent::Remove => {
                    next.remove(&slot);
                }
            }
        }
        Some(next)
    }

    /// Abort the drag with no emission (pointer capture lost, input
    /// disabled mid-drag).
    pub fn gesture_cancel(&mut self) {
        self.gesture = GestureState::Idle;
    }

    /// Per-frame rendering query. Pure: reports the preview state while
    /// a drag is live and falls back to committed membership otherwise.
    pub fn classify(&self, slot: &TimeSlot, committed: &SelectionSet) -> SlotVisual {
        if let GestureState::Dragging { intent, anchor, cursor } = self.gesture {
            if let Some((di, ti)) = self.axis.slot_index(slot) {
                let in_rectangle = di >= anchor.0.min(cursor.0)
                    && di <= anchor.0.max(cursor.0)
                    && ti >= anchor.1.min(cursor.1)
                    && ti <= anchor.1.max(cursor.1);
                if in_rectangle {
                    return match intent {
                        Intent::Add => SlotVisual::PreviewAdd,
                        Intent::Remove => SlotVisual::PreviewRemove,
                    };
                }
            }
        }

        if committed.contains(slot) {
            SlotVisual::Selected
        } else {
            SlotVisual::Empty
        }
    }

    // --- discrete taps (TapToggle mode) ----------------------------------

    /// Record a touch press at `position` over `slot` (or none when the
    /// press landed on chrome). Only meaningful in `TapToggle` mode.
    pub fn touch_start(&mut self, position: (f32, f32), slot: Option<TimeSlot>) {
        if self.disabled || self.input_mode != InputMode::TapToggle {
            return;
        }
        self.tap.start(position, slot);
    }

    /// Track finger movement; crossing the displacement threshold turns
    /// the touch into a scroll that will produce no selection change.
    pub fn touch_move(&mut self, position: (f32, f32)) {
        if self.disabled {
            return;
        }
        self.tap.record_move(position);
    }

    /// Finish the touch. A genuine tap toggles exactly the one touched
    /// slot; a scroll (or a press outside the grid) returns `None`.
    pub fn touch_end(&mut self, committed: &SelectionSet) -> Option<SelectionSet> {
        let slot = self.tap.finish()?;
        if self.disabled {
            return None;
        }
        self.axis.slot_index(&slot)?;

        let mut next = committed.clone();
        if !next.remove(&slot) {
            next.insert(slot);
        }
        Some(next)
    }

    pub fn touch_cancel(&mut self) {
        self.tap.cancel();
    }

    // --- bulk operations --------------------------------------------------

    /// Toggle every slot of one date column: deselects when the column is
    /// fully selected, selects it whole otherwise. Same tie-break as the
    /// single-cell drag intent, never a mixed partial result.
    pub fn toggle_column(
        &self,
        date_index: usize,
        committed: &SelectionSet,
    ) -> Option<SelectionSet> {
        if self.disabled {
            return None;
        }
        let date = *self.axis.dates().get(date_index)?;
        let column: Vec<TimeSlot> = self
            .axis
            .times()
            .iter()
            .map(|&time| TimeSlot { date, time })
            .collect();
        Some(Self::toggle_slots(&column, committed))
    }

    /// Toggle every slot of one time row across all dates.
    pub fn toggle_row(&self, time_index: usize, committed: &SelectionSet) -> Option<SelectionSet> {
        if self.disabled {
            return None;
        }
        let time = *self.axis.times().get(time_index)?;
        let row: Vec<TimeSlot> = self
            .axis
            .dates()
            .iter()
            .map(|&date| TimeSlot { date, time })
            .collect();
        Some(Self::toggle_slots(&row, committed))
    }

    /// Toggle the block of `slots_per_hour` consecutive rows starting at
    /// `time_index` (clamped at the end of the axis), across all dates.
    pub fn toggle_hour_block(
        &self,
        time_index: usize,
        slots_per_hour: usize,
        committed: &SelectionSet,
    ) -> Option<SelectionSet> {
        if self.disabled || time_index >= self.axis.times().len() {
            return None;
        }

        let mut block = Vec::new();
        for offset in 0..slots_per_hour {
            let Some(&time) = self.axis.times().get(time_index + offset) else {
                break;
            };
            for &date in self.axis.dates() {
                block.push(TimeSlot { date, time });
            }
        }
        Some(Self::toggle_slots(&block, committed))
    }

    /// Replace the selection with the full grid.
    pub fn select_all(&self) -> Option<SelectionSet> {
        if self.disabled {
            return None;
        }
        Some(self.axis.all_slots().collect())
    }

    /// Empty the selection.
    pub fn clear_all(&self) -> Option<SelectionSet> {
        if self.disabled {
            return None;
        }
        Some(SelectionSet::new())
    }

    fn toggle_slots(slots: &[TimeSlot], committed: &SelectionSet) -> SelectionSet {
        let all_selected = slots.iter().all(|slot| committed.contains(slot));
        let mut next = committed.clone();
        if all_selected {
            for slot in slots {
                next.remove(slot);
            }
        } else {
            for slot in slots {
                next.insert(*slot);
            }
        }
        next
    }
}
