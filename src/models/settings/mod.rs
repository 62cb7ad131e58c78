// Settings module
// Persisted application settings

/// User-facing settings stored in the local database.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub theme: String,
    /// Follow the OS light/dark preference instead of `theme`
    pub use_system_theme: bool,
    pub time_format: String,
    /// Force the tap-to-toggle grid layout normally reserved for small
    /// touch screens
    pub compact_touch_layout: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "Light".to_string(),
            use_system_theme: true,
            time_format: "24h".to_string(),
            compact_touch_layout: false,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), String> {
        if !matches!(self.theme.as_str(), "Light" | "Dark") {
            return Err(format!("Unknown theme '{}'", self.theme));
        }
        if !matches!(self.time_format.as_str(), "12h" | "24h") {
            return Err(format!("Unknown time format '{}'", self.time_format));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn rejects_unknown_values() {
        let mut settings = Settings::default();
        settings.theme = "Solarized".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.time_format = "metric".to_string();
        assert!(settings.validate().is_err());
    }
}
