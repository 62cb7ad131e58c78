use egui::Color32;

use crate::services::heatmap::Tier;
use crate::services::selection::SlotVisual;
use crate::ui_egui::theme::GridTheme;

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

/// Cell colors for the interactive edit grid.
#[derive(Clone, Copy)]
pub struct SlotPalette {
    pub empty_bg: Color32,
    pub selected_bg: Color32,
    pub preview_add_bg: Color32,
    pub preview_remove_bg: Color32,
    pub hover_overlay: Color32,
    pub disabled_overlay: Color32,
    pub gridline: Color32,
    pub hour_gridline: Color32,
    pub header_bg: Color32,
    pub header_text: Color32,
    pub label_text: Color32,
}

impl SlotPalette {
    pub fn from_theme(theme: &GridTheme) -> Self {
        let selected = theme.accent;
        let removing = if theme.is_dark {
            Color32::from_rgb(160, 75, 70)
        } else {
            Color32::from_rgb(225, 130, 120)
        };

        Self {
            empty_bg: theme.grid_background,
            selected_bg: selected,
            preview_add_bg: blend(theme.grid_background, selected, 0.55),
            preview_remove_bg: blend(theme.grid_background, removing, 0.65),
            hover_overlay: with_alpha(theme.text_primary, 14),
            disabled_overlay: with_alpha(theme.app_background, 120),
            gridline: theme.gridline,
            hour_gridline: theme.hour_gridline,
            header_bg: theme.header_background,
            header_text: theme.text_primary,
            label_text: theme.text_secondary,
        }
    }

    pub fn fill(&self, visual: SlotVisual) -> Color32 {
        match visual {
            SlotVisual::Empty => self.empty_bg,
            SlotVisual::Selected => self.selected_bg,
            SlotVisual::PreviewAdd => self.preview_add_bg,
            SlotVisual::PreviewRemove => self.preview_remove_bg,
        }
    }
}

/// Cell colors for the read-only heatmap grid, one per tier.
#[derive(Clone, Copy)]
pub struct HeatmapPalette {
    pub empty: Color32,
    pub quarter: Color32,
    pub half: Color32,
    pub three_quarters: Color32,
    pub full: Color32,
    pub gridline: Color32,
    pub hour_gridline: Color32,
    pub header_bg: Color32,
    pub header_text: Color32,
    pub label_text: Color32,
}

impl HeatmapPalette {
    pub fn from_theme(theme: &GridTheme) -> Self {
        let base = theme.grid_background;
        let accent = theme.accent;

        Self {
            empty: base,
            quarter: blend(base, accent, 0.25),
            half: blend(base, accent, 0.5),
            three_quarters: blend(base, accent, 0.75),
            full: accent,
            gridline: theme.gridline,
            hour_gridline: theme.hour_gridline,
            header_bg: theme.header_background,
            header_text: theme.text_primary,
            label_text: theme.text_secondary,
        }
    }

    pub fn fill(&self, tier: Tier) -> Color32 {
        match tier {
            Tier::Empty => self.empty,
            Tier::Quarter => self.quarter,
            Tier::Half => self.half,
            Tier::ThreeQuarters => self.three_quarters,
            Tier::Full => self.full,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heatmap_tiers_darken_monotonically_toward_accent() {
        let palette = HeatmapPalette::from_theme(&GridTheme::light());
        // Light theme: more participants means less distance to the accent
        let distance = |c: Color32| {
            let a = GridTheme::light().accent;
            (c.r() as i32 - a.r() as i32).abs()
                + (c.g() as i32 - a.g() as i32).abs()
                + (c.b() as i32 - a.b() as i32).abs()
        };
        assert!(distance(palette.empty) > distance(palette.quarter));
        assert!(distance(palette.quarter) > distance(palette.half));
        assert!(distance(palette.half) > distance(palette.three_quarters));
        assert!(distance(palette.three_quarters) >= distance(palette.full));
    }

    #[test]
    fn slot_fill_distinguishes_all_four_states() {
        let palette = SlotPalette::from_theme(&GridTheme::light());
        let fills = [
            palette.fill(SlotVisual::Empty),
            palette.fill(SlotVisual::Selected),
            palette.fill(SlotVisual::PreviewAdd),
            palette.fill(SlotVisual::PreviewRemove),
        ];
        for i in 0..fills.len() {
            for j in (i + 1)..fills.len() {
                assert_ne!(fills[i], fills[j]);
            }
        }
    }
}
