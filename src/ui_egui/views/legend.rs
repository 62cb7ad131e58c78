//! Color legend explaining the grid cells in each mode.

use egui::{Color32, Sense, Stroke, Vec2};

use super::palette::{HeatmapPalette, SlotPalette};

const SWATCH_SIZE: Vec2 = Vec2::new(14.0, 14.0);

fn swatch(ui: &mut egui::Ui, color: Color32, border: Color32, label: &str) {
    let (rect, _) = ui.allocate_exact_size(SWATCH_SIZE, Sense::hover());
    ui.painter().rect_filled(rect, 2.0, color);
    ui.painter().rect_stroke(rect, 2.0, Stroke::new(1.0, border));
    ui.add_space(4.0);
    ui.label(label);
    ui.add_space(12.0);
}

/// Legend for the edit grid: the four visual slot states.
pub fn render_edit_legend(ui: &mut egui::Ui, palette: &SlotPalette) {
    ui.horizontal_wrapped(|ui| {
        swatch(ui, palette.empty_bg, palette.gridline, "wolne");
        swatch(ui, palette.selected_bg, palette.gridline, "zaznaczone");
        swatch(ui, palette.preview_add_bg, palette.gridline, "dodawanie");
        swatch(ui, palette.preview_remove_bg, palette.gridline, "usuwanie");
    });
}

/// Legend for the heatmap: the five participation tiers.
pub fn render_heatmap_legend(ui: &mut egui::Ui, palette: &HeatmapPalette) {
    ui.horizontal_wrapped(|ui| {
        swatch(ui, palette.empty, palette.gridline, "nikt");
        swatch(ui, palette.quarter, palette.gridline, "do 25%");
        swatch(ui, palette.half, palette.gridline, "do 50%");
        swatch(ui, palette.three_quarters, palette.gridline, "do 75%");
        swatch(ui, palette.full, palette.gridline, "wszyscy");
    });
}
