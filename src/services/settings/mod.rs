// Settings service
// Load/update the single persisted settings row

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Row};

use crate::models::settings::Settings;
use crate::services::database::Database;

pub struct SettingsService<'a> {
    db: &'a Database,
}

impl<'a> SettingsService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get the current settings
    pub fn get(&self) -> Result<Settings> {
        self.db
            .connection()
            .query_row(
                "SELECT theme, use_system_theme, time_format, compact_touch_layout
                 FROM settings WHERE id = 1",
                [],
                row_to_settings,
            )
            .context("Failed to load settings")
    }

    /// Update settings
    pub fn update(&self, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|reason| anyhow!("Invalid settings: {}", reason))?;

        self.db
            .connection()
            .execute(
                "UPDATE settings
                 SET theme = ?1,
                     use_system_theme = ?2,
                     time_format = ?3,
                     compact_touch_layout = ?4,
                     updated_at = CURRENT_TIMESTAMP
                 WHERE id = 1",
                params![
                    settings.theme,
                    settings.use_system_theme,
                    settings.time_format,
                    settings.compact_touch_layout,
                ],
            )
            .context("Failed to update settings")?;

        Ok(())
    }
}

fn row_to_settings(row: &Row<'_>) -> rusqlite::Result<Settings> {
    Ok(Settings {
        theme: row.get(0)?,
        use_system_theme: row.get(1)?,
        time_format: row.get(2)?,
        compact_touch_layout: row.get(3)?,
    })
}
