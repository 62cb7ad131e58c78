//! Theme definitions for the egui shell.

use egui::Color32;

use crate::models::settings::Settings;

/// Colors shared by the whole application chrome; the grid palettes are
/// derived from this in `views::palette`.
#[derive(Debug, Clone)]
pub struct GridTheme {
    /// Whether this is a dark theme (affects base egui::Visuals)
    pub is_dark: bool,

    pub app_background: Color32,
    pub panel_background: Color32,
    pub grid_background: Color32,
    pub header_background: Color32,
    pub gridline: Color32,
    pub hour_gridline: Color32,
    pub accent: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
}

impl GridTheme {
    pub fn light() -> Self {
        Self {
            is_dark: false,
            app_background: Color32::from_rgb(245, 245, 245),
            panel_background: Color32::from_rgb(255, 255, 255),
            grid_background: Color32::from_rgb(252, 252, 253),
            header_background: Color32::from_rgb(240, 240, 243),
            gridline: Color32::from_rgb(225, 225, 228),
            hour_gridline: Color32::from_rgb(195, 195, 200),
            accent: Color32::from_rgb(60, 140, 90),
            text_primary: Color32::from_rgb(40, 40, 40),
            text_secondary: Color32::from_rgb(100, 100, 100),
        }
    }

    pub fn dark() -> Self {
        Self {
            is_dark: true,
            app_background: Color32::from_rgb(30, 30, 30),
            panel_background: Color32::from_rgb(40, 40, 40),
            grid_background: Color32::from_rgb(36, 36, 38),
            header_background: Color32::from_rgb(48, 48, 52),
            gridline: Color32::from_rgb(58, 58, 62),
            hour_gridline: Color32::from_rgb(85, 85, 92),
            accent: Color32::from_rgb(95, 180, 125),
            text_primary: Color32::from_rgb(240, 240, 240),
            text_secondary: Color32::from_rgb(170, 170, 170),
        }
    }

    /// Resolve the theme for the current settings, honouring the system
    /// preference when enabled.
    pub fn for_settings(settings: &Settings) -> Self {
        let name = if settings.use_system_theme {
            match dark_light::detect() {
                dark_light::Mode::Dark => "Dark",
                dark_light::Mode::Light => "Light",
                dark_light::Mode::Default => settings.theme.as_str(),
            }
        } else {
            settings.theme.as_str()
        };

        if name.eq_ignore_ascii_case("dark") {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn apply_to_context(&self, ctx: &egui::Context) {
        let mut visuals = if self.is_dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };

        visuals.window_fill = self.panel_background;
        visuals.panel_fill = self.app_background;
        visuals.widgets.noninteractive.bg_fill = self.panel_background;
        visuals.override_text_color = Some(self.text_primary);

        ctx.set_visuals(visuals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_theme_wins_when_system_detection_is_off() {
        let mut settings = Settings::default();
        settings.use_system_theme = false;
        settings.theme = "Dark".to_string();
        assert!(GridTheme::for_settings(&settings).is_dark);

        settings.theme = "Light".to_string();
        assert!(!GridTheme::for_settings(&settings).is_dark);
    }
}
