//! Interactive availability grid.
//!
//! Allocates one rect per slot, paints it from the engine's
//! classification, and translates raw egui pointer state into engine
//! gesture calls by hit-testing those rects. Each painted rect carries
//! its slot, so a pointer coordinate always maps back to a logical slot
//! key without the engine knowing anything about layout.

use chrono::NaiveDate;
use egui::{Align2, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use crate::models::slot::{SelectionSet, TimeSlot};
use crate::services::selection::{InputMode, SelectionEngine};

use super::palette::SlotPalette;
use super::{
    format_day_label, format_hour_label, weekday_abbrev, CELL_MIN_WIDTH, EDIT_CELL_HEIGHT,
    EDIT_CELL_HEIGHT_TOUCH, HEADER_HEIGHT, TIME_LABEL_WIDTH,
};

/// Outcome of one frame of grid interaction.
#[derive(Default)]
pub struct GridResponse {
    /// New committed selection when a gesture or bulk toggle finished
    /// this frame.
    pub committed: Option<SelectionSet>,
}

struct PointerSnapshot {
    primary_pressed: bool,
    primary_released: bool,
    press_origin: Option<Pos2>,
    latest_pos: Option<Pos2>,
}

/// Render the edit grid and feed its input into the selection engine.
pub fn render_availability_grid(
    ui: &mut egui::Ui,
    engine: &mut SelectionEngine,
    committed: &SelectionSet,
    slots_per_hour: usize,
    palette: &SlotPalette,
) -> GridResponse {
    let mut result = GridResponse::default();
    let tap_toggle = engine.input_mode() == InputMode::TapToggle;
    let disabled = engine.is_disabled();

    let dates: Vec<NaiveDate> = engine.axis().dates().to_vec();
    let times: Vec<u16> = engine.axis().times().to_vec();
    if dates.is_empty() || times.is_empty() {
        return result;
    }

    let cell_height = if tap_toggle {
        EDIT_CELL_HEIGHT_TOUCH
    } else {
        EDIT_CELL_HEIGHT
    };
    let col_width = ((ui.available_width() - TIME_LABEL_WIDTH) / dates.len() as f32)
        .max(CELL_MIN_WIDTH);

    ui.spacing_mut().item_spacing = Vec2::ZERO;

    render_header_row(ui, engine, committed, &dates, col_width, tap_toggle, palette, &mut result);

    // Rects are collected during painting and hit-tested afterwards, so
    // gesture handling sees the same geometry the user sees.
    let mut cell_rects: Vec<(Rect, TimeSlot)> = Vec::with_capacity(dates.len() * times.len());

    for (ti, &time) in times.iter().enumerate() {
        let is_hour_start = time % 60 == 0;

        ui.horizontal(|ui| {
            let label_sense = if tap_toggle && is_hour_start && !disabled {
                Sense::click()
            } else {
                Sense::hover()
            };
            let (label_rect, label_response) =
                ui.allocate_exact_size(Vec2::new(TIME_LABEL_WIDTH, cell_height), label_sense);

            if is_hour_start {
                ui.painter().text(
                    Pos2::new(label_rect.right() - 4.0, label_rect.top()),
                    Align2::RIGHT_TOP,
                    format_hour_label(time),
                    FontId::proportional(10.0),
                    palette.label_text,
                );
            }
            if tap_toggle && is_hour_start && label_response.clicked() {
                if let Some(next) = engine.toggle_hour_block(ti, slots_per_hour, committed) {
                    result.committed = Some(next);
                }
            }

            for &date in &dates {
                let slot = TimeSlot { date, time };
                // In tap mode the cells must not claim drags: dragging
                // scrolls, and the engine's tap tracker sorts out the rest.
                let sense = if tap_toggle {
                    Sense::hover()
                } else {
                    Sense::click_and_drag()
                };
                let (rect, response) =
                    ui.allocate_exact_size(Vec2::new(col_width, cell_height), sense);

                let visual = engine.classify(&slot, committed);
                ui.painter().rect_filled(rect, 0.0, palette.fill(visual));
                paint_cell_border(ui, rect, is_hour_start, palette);

                if disabled {
                    ui.painter().rect_filled(rect, 0.0, palette.disabled_overlay);
                } else if response.hovered() {
                    ui.painter().rect_filled(rect, 0.0, palette.hover_overlay);
                    ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
                }

                cell_rects.push((rect, slot));
            }
        });
    }

    dispatch_pointer_input(ui, engine, committed, &cell_rects, tap_toggle, &mut result);

    result
}

#[allow(clippy::too_many_arguments)]
fn render_header_row(
    ui: &mut egui::Ui,
    engine: &SelectionEngine,
    committed: &SelectionSet,
    dates: &[NaiveDate],
    col_width: f32,
    tap_toggle: bool,
    palette: &SlotPalette,
    result: &mut GridResponse,
) {
    let clickable = tap_toggle && !engine.is_disabled();

    ui.horizontal(|ui| {
        let (rect, _) =
            ui.allocate_exact_size(Vec2::new(TIME_LABEL_WIDTH, HEADER_HEIGHT), Sense::hover());
        ui.painter().rect_filled(rect, 0.0, palette.header_bg);

        for (di, &date) in dates.iter().enumerate() {
            let sense = if clickable { Sense::click() } else { Sense::hover() };
            let (rect, response) =
                ui.allocate_exact_size(Vec2::new(col_width, HEADER_HEIGHT), sense);

            ui.painter().rect_filled(rect, 0.0, palette.header_bg);
            ui.painter().line_segment(
                [rect.left_bottom(), rect.right_bottom()],
                Stroke::new(1.0, palette.hour_gridline),
            );
            ui.painter().text(
                Pos2::new(rect.center().x, rect.top() + 3.0),
                Align2::CENTER_TOP,
                weekday_abbrev(date),
                FontId::proportional(10.0),
                palette.label_text,
            );
            ui.painter().text(
                Pos2::new(rect.center().x, rect.bottom() - 3.0),
                Align2::CENTER_BOTTOM,
                format_day_label(date),
                FontId::proportional(11.0),
                palette.header_text,
            );

            if clickable {
                if response.hovered() {
                    ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
                }
                if response.clicked() {
                    if let Some(next) = engine.toggle_column(di, committed) {
                        result.committed = Some(next);
                    }
                }
            }
        }
    });
}

fn paint_cell_border(ui: &egui::Ui, rect: Rect, is_hour_start: bool, palette: &SlotPalette) {
    let top_color = if is_hour_start {
        palette.hour_gridline
    } else {
        palette.gridline
    };
    ui.painter().line_segment(
        [rect.left_top(), rect.right_top()],
        Stroke::new(1.0, top_color),
    );
    ui.painter().line_segment(
        [rect.right_top(), rect.right_bottom()],
        Stroke::new(1.0, palette.gridline),
    );
}

/// Feed raw pointer state into the engine. Presses and releases are read
/// from the frame input rather than per-cell responses so a drag keeps
/// tracking whichever cell the pointer is over, exactly like the
/// hit-testing the original did on every pointer move.
fn dispatch_pointer_input(
    ui: &egui::Ui,
    engine: &mut SelectionEngine,
    committed: &SelectionSet,
    cell_rects: &[(Rect, TimeSlot)],
    tap_toggle: bool,
    result: &mut GridResponse,
) {
    let pointer = ui.input(|i| PointerSnapshot {
        primary_pressed: i.pointer.primary_pressed(),
        primary_released: i.pointer.primary_released(),
        press_origin: i.pointer.press_origin(),
        latest_pos: i.pointer.latest_pos(),
    });

    let slot_at = |pos: Pos2| {
        cell_rects
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, slot)| *slot)
    };

    if tap_toggle {
        if pointer.primary_pressed {
            if let Some(origin) = pointer.press_origin.or(pointer.latest_pos) {
                engine.touch_start((origin.x, origin.y), slot_at(origin));
            }
        }
        if let Some(pos) = pointer.latest_pos {
            engine.touch_move((pos.x, pos.y));
        }
        if pointer.primary_released {
            if let Some(next) = engine.touch_end(committed) {
                result.committed = Some(next);
            }
        }
        return;
    }

    if pointer.primary_pressed {
        if let Some(origin) = pointer.press_origin.or(pointer.latest_pos) {
            if let Some(slot) = slot_at(origin) {
                engine.gesture_start(&slot, committed);
            }
        }
    }

    if engine.is_dragging() {
        if let Some(slot) = pointer.latest_pos.and_then(slot_at) {
            engine.gesture_move(&slot);
        }
        // Keep the preview rectangle tracking the pointer
        ui.ctx().request_repaint();
    }

    if pointer.primary_released && engine.is_dragging() {
        if let Some(next) = engine.gesture_end(committed) {
            result.committed = Some(next);
        }
    }
}
