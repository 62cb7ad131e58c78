//! Read-only heatmap grid.
//!
//! Same geometry as the edit grid, but cells are painted by tier and the
//! only interaction is a hover tooltip naming who is available.

use std::collections::HashMap;

use egui::{Align2, FontId, Pos2, Sense, Stroke, Vec2};

use crate::models::slot::TimeSlot;
use crate::services::axis::Axis;
use crate::services::heatmap::HeatmapGrid;

use super::palette::HeatmapPalette;
use super::{
    format_day_label, format_hour_label, weekday_abbrev, CELL_MIN_WIDTH, HEADER_HEIGHT,
    TIME_LABEL_WIDTH, VIEW_CELL_HEIGHT, VIEW_CELL_HEIGHT_TOUCH,
};

pub fn render_heatmap_grid(
    ui: &mut egui::Ui,
    axis: &Axis,
    heatmap: &HeatmapGrid,
    participant_names: &HashMap<String, String>,
    palette: &HeatmapPalette,
    compact: bool,
) {
    let dates = axis.dates();
    let times = axis.times();
    if dates.is_empty() || times.is_empty() {
        return;
    }

    let cell_height = if compact {
        VIEW_CELL_HEIGHT_TOUCH
    } else {
        VIEW_CELL_HEIGHT
    };
    let col_width =
        ((ui.available_width() - TIME_LABEL_WIDTH) / dates.len() as f32).max(CELL_MIN_WIDTH);

    ui.spacing_mut().item_spacing = Vec2::ZERO;

    // Header row
    ui.horizontal(|ui| {
        let (rect, _) =
            ui.allocate_exact_size(Vec2::new(TIME_LABEL_WIDTH, HEADER_HEIGHT), Sense::hover());
        ui.painter().rect_filled(rect, 0.0, palette.header_bg);

        for &date in dates {
            let (rect, _) =
                ui.allocate_exact_size(Vec2::new(col_width, HEADER_HEIGHT), Sense::hover());
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
        }
    });

    for &time in times {
        let is_hour_start = time % 60 == 0;

        ui.horizontal(|ui| {
            let (label_rect, _) =
                ui.allocate_exact_size(Vec2::new(TIME_LABEL_WIDTH, cell_height), Sense::hover());
            if is_hour_start {
                ui.painter().text(
                    Pos2::new(label_rect.right() - 4.0, label_rect.top()),
                    Align2::RIGHT_TOP,
                    format_hour_label(time),
                    FontId::proportional(10.0),
                    palette.label_text,
                );
            }

            for &date in dates {
                let slot = TimeSlot { date, time };
                let (rect, response) =
                    ui.allocate_exact_size(Vec2::new(col_width, cell_height), Sense::hover());

                let cell = heatmap.cell(&slot);
                ui.painter().rect_filled(rect, 0.0, palette.fill(cell.tier));

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

                if response.hovered() {
                    response.on_hover_text(slot_tooltip(heatmap, participant_names, &slot));
                }
            }
        });
    }
}

fn slot_tooltip(
    heatmap: &HeatmapGrid,
    participant_names: &HashMap<String, String>,
    slot: &TimeSlot,
) -> String {
    let ids = heatmap.participant_ids(slot);
    if ids.is_empty() {
        return "Nikt nie jest dostępny".to_string();
    }

    let names: Vec<&str> = ids
        .iter()
        .map(|id| participant_names.get(id).map_or(id.as_str(), String::as_str))
        .collect();
    format!("{} dostępnych: {}", names.len(), names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::heatmap::AvailabilityIndex;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn slot() -> TimeSlot {
        TimeSlot {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            time: 540,
        }
    }

    fn heatmap_with(ids: &[&str]) -> HeatmapGrid {
        let mut by_time = HashMap::new();
        by_time.insert(540u16, ids.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        let mut index = AvailabilityIndex::new();
        index.insert(slot().date, by_time);
        HeatmapGrid::from_index(&index, ids.len().max(1))
    }

    #[test]
    fn tooltip_names_available_participants() {
        let mut names = HashMap::new();
        names.insert("p1".to_string(), "Ala".to_string());
        names.insert("p2".to_string(), "Jan".to_string());

        let text = slot_tooltip(&heatmap_with(&["p1", "p2"]), &names, &slot());
        assert_eq!(text, "2 dostępnych: Ala, Jan");
    }

    #[test]
    fn tooltip_falls_back_to_ids_for_unknown_names() {
        let text = slot_tooltip(&heatmap_with(&["p9"]), &HashMap::new(), &slot());
        assert_eq!(text, "1 dostępnych: p9");
    }

    #[test]
    fn empty_cell_has_a_nobody_tooltip() {
        let text = slot_tooltip(&heatmap_with(&[]), &HashMap::new(), &slot());
        assert_eq!(text, "Nikt nie jest dostępny");
    }
}
